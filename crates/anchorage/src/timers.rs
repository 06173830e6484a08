use std::{
    cmp::Ordering,
    collections::binary_heap::BinaryHeap,
    time::{Duration, Instant},
};

/// A pending deadline.
#[derive(Debug)]
struct Pending<K> {
    /// Scheduled time for the deadline.
    time: Instant,
    /// What the deadline is for.
    key: K,
}

impl<K> PartialEq for Pending<K> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl<K> Eq for Pending<K> {}

/// Reverse order so the closest deadline is at the top.
impl<K> PartialOrd for Pending<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so the closest deadline is at the top.
impl<K> Ord for Pending<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.time.cmp(&self.time)
    }
}

/// A heap of keyed deadlines. Time is always passed in explicitly, so the
/// owner decides what "now" means and tests can drive a manual clock.
///
/// Each key has at most one pending deadline: scheduling a key again
/// replaces its previous deadline.
#[derive(Debug)]
pub struct Timers<K> {
    /// Pending deadline heap.
    pending: BinaryHeap<Pending<K>>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            pending: BinaryHeap::new(),
        }
    }
}

impl<K: Copy + Eq> Timers<K> {
    /// Schedule `key` to fire `duration` after `now`.
    pub fn schedule(&mut self, now: Instant, key: K, duration: Duration) {
        self.cancel(key);
        self.pending.push(Pending {
            time: now + duration,
            key,
        });
    }

    /// Drop any pending deadline for `key`.
    pub fn cancel(&mut self, key: K) {
        self.pending.retain(|p| p.key != key);
    }

    /// Is a deadline pending for `key`?
    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|p| p.key == key)
    }

    /// The wait until the next deadline. `None` if nothing is pending, and
    /// zero if the closest deadline is already in the past.
    pub fn current_wait(&self, now: Instant) -> Option<Duration> {
        self.pending.peek().map(|top| {
            top.time
                .checked_duration_since(now)
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Remove and return every key whose deadline is at or before `now`, in
    /// deadline order.
    pub fn collect(&mut self, now: Instant) -> Vec<K> {
        let mut v = vec![];
        while let Some(n) = self.pending.pop() {
            if n.time <= now {
                v.push(n.key);
            } else {
                self.pending.push(n);
                break;
            }
        }
        v
    }

    /// Is anything pending?
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

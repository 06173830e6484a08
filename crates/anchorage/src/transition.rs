//! Abortable open/close transitions.
//!
//! A transition is a deadline plus an [`AbortSignal`]. Hosts poll it; it
//! settles as completed once its deadline passes, or as aborted as soon as
//! its signal fires. Aborting is ordinary control flow, not an error.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

/// Observes whether an [`AbortController`] has fired.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Rc<Cell<bool>>);

impl AbortSignal {
    /// Has the owning controller aborted?
    pub fn aborted(&self) -> bool {
        self.0.get()
    }
}

/// Fires a shared [`AbortSignal`].
#[derive(Debug, Default)]
pub struct AbortController {
    /// The signal handed to transitions.
    signal: AbortSignal,
}

impl AbortController {
    /// A fresh, unfired controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle on this controller's signal.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Fire the signal. Idempotent.
    pub fn abort(&self) {
        self.signal.0.set(true);
    }
}

/// Which way a surface is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    /// Opening.
    Open,
    /// Closing.
    Close,
}

/// How a transition settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionOutcome {
    /// Ran to its deadline.
    Completed,
    /// Cancelled through its signal.
    Aborted,
}

impl TransitionOutcome {
    /// Was the transition aborted?
    pub fn was_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// An in-flight transition.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Direction of travel.
    kind: TransitionKind,
    /// Start time.
    started: Instant,
    /// Total length.
    duration: Duration,
    /// Cancellation.
    signal: AbortSignal,
}

impl Transition {
    /// Start a transition at `now`.
    pub fn start(kind: TransitionKind, now: Instant, duration: Duration, signal: AbortSignal) -> Self {
        Self {
            kind,
            started: now,
            duration,
            signal,
        }
    }

    /// Direction of travel.
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// When the transition completes if not aborted.
    pub fn deadline(&self) -> Instant {
        self.started + self.duration
    }

    /// Settle the transition if it is done. Aborts win over completion.
    pub fn poll(&self, now: Instant) -> Option<TransitionOutcome> {
        if self.signal.aborted() {
            Some(TransitionOutcome::Aborted)
        } else if now >= self.deadline() {
            Some(TransitionOutcome::Completed)
        } else {
            None
        }
    }

    /// Fraction of the duration elapsed at `now`, in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_at_deadline() {
        let now = Instant::now();
        let ac = AbortController::new();
        let t = Transition::start(TransitionKind::Open, now, Duration::from_millis(100), ac.signal());
        assert_eq!(t.poll(now + Duration::from_millis(50)), None);
        assert_eq!(t.progress(now + Duration::from_millis(50)), 0.5);
        assert_eq!(
            t.poll(now + Duration::from_millis(100)),
            Some(TransitionOutcome::Completed)
        );
    }

    #[test]
    fn abort_settles_immediately() {
        let now = Instant::now();
        let ac = AbortController::new();
        let t = Transition::start(TransitionKind::Close, now, Duration::from_secs(1), ac.signal());
        ac.abort();
        ac.abort();
        let outcome = t.poll(now).unwrap();
        assert!(outcome.was_aborted());
        assert_eq!(t.kind(), TransitionKind::Close);
    }
}

use std::collections::HashMap;

use super::ElementId;

/// A single observed attribute change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The element whose attribute changed.
    pub target: ElementId,
    /// The attribute name.
    pub attribute: String,
    /// The value before the change, if the attribute was present.
    pub old_value: Option<String>,
}

/// The document-wide attribute observer. There is exactly one per document:
/// hosts register themselves with an attribute filter, and every matching
/// change is queued as a [`MutationRecord`] for a single dispatch pass.
#[derive(Debug, Default)]
pub(crate) struct AttributeObserver {
    /// Registered targets and the attribute names they care about.
    targets: HashMap<ElementId, Vec<String>>,
    /// Records waiting for delivery.
    queue: Vec<MutationRecord>,
}

impl AttributeObserver {
    /// Register (or re-register) a target with an attribute filter.
    pub(crate) fn observe(&mut self, target: ElementId, filter: &[&str]) {
        self.targets
            .insert(target, filter.iter().map(|s| s.to_string()).collect());
    }

    /// Stop observing a target. Queued records for it are dropped.
    pub(crate) fn unobserve(&mut self, target: ElementId) {
        self.targets.remove(&target);
        self.queue.retain(|r| r.target != target);
    }

    /// Is the target registered?
    pub(crate) fn is_observing(&self, target: ElementId) -> bool {
        self.targets.contains_key(&target)
    }

    /// Queue a record if the target is observed for this attribute.
    pub(crate) fn notify(&mut self, target: ElementId, attribute: &str, old_value: Option<String>) {
        let Some(filter) = self.targets.get(&target) else {
            return;
        };
        if filter.iter().any(|f| f == attribute) {
            self.queue.push(MutationRecord {
                target,
                attribute: attribute.to_string(),
                old_value,
            });
        }
    }

    /// Drain queued records in the order they were produced.
    pub(crate) fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.queue)
    }
}

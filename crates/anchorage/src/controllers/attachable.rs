//! Binding a host element to the control that triggers it.
//!
//! A host finds its control one of three ways, in order: the element named
//! by its `for` attribute, an explicitly attached element, or its parent
//! element. Changes to `for` are picked up through the document's single
//! attribute observer.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    dom::{Document, ElementId},
    error::Result,
};

/// The attribute naming the control by id.
pub const FOR_ATTRIBUTE: &str = "for";

/// The resolved control changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    /// The control before the change.
    pub previous: Option<ElementId>,
    /// The control after the change.
    pub next: Option<ElementId>,
}

/// Tracks the control for one host.
#[derive(Debug)]
pub struct AttachableController {
    /// The host element.
    host: ElementId,
    /// An explicitly attached control.
    attached: Option<ElementId>,
    /// The last resolved control.
    current: Option<ElementId>,
}

impl AttachableController {
    /// Create a controller for `host` and register the host with the
    /// document's attribute observer.
    pub fn new(doc: &mut Document, host: ElementId) -> Self {
        doc.observe_attributes(host, &[FOR_ATTRIBUTE]);
        Self {
            host,
            attached: None,
            current: None,
        }
    }

    /// The host element.
    pub fn host(&self) -> ElementId {
        self.host
    }

    /// The last resolved control. Updated by every operation that can change
    /// the resolution.
    pub fn current_control(&self) -> Option<ElementId> {
        self.current
    }

    /// The host's `for` attribute.
    pub fn html_for<'a>(&self, doc: &'a Document) -> Option<&'a str> {
        doc.get_attribute(self.host, FOR_ATTRIBUTE)
    }

    /// Set or remove the host's `for` attribute.
    pub fn set_html_for(&mut self, doc: &mut Document, value: Option<&str>) -> Result<Option<ControlChange>> {
        match value {
            Some(v) => doc.set_attribute(self.host, FOR_ATTRIBUTE, v)?,
            None => {
                doc.remove_attribute(self.host, FOR_ATTRIBUTE)?;
            }
        }
        Ok(self.on_for_change(doc))
    }

    /// Resolve the control from the document as it is now.
    pub fn control(&self, doc: &Document) -> Option<ElementId> {
        if let Some(id) = self.html_for(doc) {
            if id.is_empty() || !doc.is_connected(self.host) {
                return None;
            }
            return doc.get_element_by_id(doc.root_node(self.host), id);
        }
        self.attached
            .filter(|&c| doc.exists(c))
            .or_else(|| doc.parent_element(self.host))
    }

    /// Bind an explicit control. The `for` attribute is removed so that it
    /// does not override the attachment.
    pub fn attach(&mut self, doc: &mut Document, control: ElementId) -> Result<Option<ControlChange>> {
        if self.current == Some(control) && self.attached == Some(control) {
            return Ok(None);
        }
        self.attached = Some(control);
        doc.remove_attribute(self.host, FOR_ATTRIBUTE)?;
        Ok(self.set_current(Some(control)))
    }

    /// Unbind the control. `for` is set to the empty string so that neither
    /// the attachment nor the parent fallback applies.
    pub fn detach(&mut self, doc: &mut Document) -> Result<Option<ControlChange>> {
        self.attached = None;
        doc.set_attribute(self.host, FOR_ATTRIBUTE, "")?;
        Ok(self.set_current(None))
    }

    /// The host joined the document. Registers the host with the attribute
    /// observer if a disconnect removed it.
    pub fn host_connected(&mut self, doc: &mut Document) -> Option<ControlChange> {
        if !doc.is_observed(self.host) {
            doc.observe_attributes(self.host, &[FOR_ATTRIBUTE]);
        }
        let control = self.control(doc);
        self.set_current(control)
    }

    /// The host left the document. The host stops observing `for` until it
    /// reconnects.
    pub fn host_disconnected(&mut self, doc: &mut Document) -> Option<ControlChange> {
        doc.unobserve_attributes(self.host);
        self.set_current(None)
    }

    /// The `for` attribute changed.
    pub fn on_for_change(&mut self, doc: &Document) -> Option<ControlChange> {
        let control = self.control(doc);
        self.set_current(control)
    }

    /// Record the resolved control, reporting a change.
    fn set_current(&mut self, next: Option<ElementId>) -> Option<ControlChange> {
        let previous = self.current;
        if previous == next {
            return None;
        }
        self.current = next;
        debug!(host = ?self.host, ?previous, ?next, "control changed");
        Some(ControlChange { previous, next })
    }
}

/// Lookup from observed host to its controller.
pub trait AttachableHosts {
    /// The controller registered for `host`.
    fn controller_mut(&mut self, host: ElementId) -> Option<&mut AttachableController>;
}

impl AttachableHosts for HashMap<ElementId, AttachableController> {
    fn controller_mut(&mut self, host: ElementId) -> Option<&mut AttachableController> {
        self.get_mut(&host)
    }
}

/// Drain the document's attribute records and hand each `for` change to
/// the controller that owns the mutated host. Returns the resulting control
/// changes, in record order.
pub fn deliver_for_mutations(
    doc: &mut Document,
    hosts: &mut impl AttachableHosts,
) -> Vec<(ElementId, ControlChange)> {
    let records = doc.take_mutation_records();
    let mut changes = Vec::new();
    for record in records {
        if record.attribute != FOR_ATTRIBUTE {
            continue;
        }
        let Some(controller) = hosts.controller_mut(record.target) else {
            continue;
        };
        if let Some(change) = controller.on_for_change(doc) {
            changes.push((record.target, change));
        }
    }
    changes
}

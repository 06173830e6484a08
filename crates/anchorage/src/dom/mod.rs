//! An in-process element tree standing in for the DOM.
//!
//! The [`Document`] is an arena of [`Element`]s keyed by [`ElementId`]. It
//! models exactly what the controllers read and write: tree structure and
//! root nodes (including shadow roots), attributes, inline style, layout
//! rects, writing direction, tab indices, focus, popovers, the viewport, and
//! a single document-wide attribute observer.

/// Element storage and capability traits.
mod element;
/// Attribute observation.
mod mutation;
/// Inline style records.
mod style;
/// Viewport metrics.
mod viewport;

use std::any::Any;

pub use element::{
    Capability, Element, ListItem, NodeKind, Outset, Positionable, TextDirection,
};
pub use mutation::MutationRecord;
use mutation::AttributeObserver;
use slotmap::{SlotMap, new_key_type};
pub use style::StyleMap;
use tracing::trace;
pub use viewport::Viewport;

use crate::{
    error::{Error, Result},
    geom::Rect,
};

new_key_type! {
    /// Opaque identifier for an element stored in the document arena.
    pub struct ElementId;
}

/// The element tree.
#[derive(Debug)]
pub struct Document {
    /// Node arena.
    nodes: SlotMap<ElementId, Element>,
    /// The document node.
    root: ElementId,
    /// The body element.
    body: ElementId,
    /// Window metrics.
    viewport: Viewport,
    /// The focused element.
    focused: Option<ElementId>,
    /// Does the platform support top-layer popovers?
    popover_supported: bool,
    /// The single attribute observer.
    observer: AttributeObserver,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document containing a connected, empty `body`.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element::new(NodeKind::Document, "#document"));
        let mut body = Element::new(NodeKind::Element, "body");
        body.parent = Some(root);
        let body = nodes.insert(body);
        nodes[root].children.push(body);
        Self {
            nodes,
            root,
            body,
            viewport: Viewport::default(),
            focused: None,
            popover_supported: true,
            observer: AttributeObserver::default(),
        }
    }

    /// Look up a node, failing on stale ids.
    fn get(&self, id: ElementId) -> Result<&Element> {
        self.nodes.get(id).ok_or(Error::NoSuchElement(id))
    }

    /// Mutable node lookup, failing on stale ids.
    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.nodes.get_mut(id).ok_or(Error::NoSuchElement(id))
    }

    /// The document node.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The body element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Borrow an element.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    /// Is this id live in the arena?
    pub fn exists(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(Element::new(NodeKind::Element, tag))
    }

    /// Create a detached element that is itself a list item.
    pub fn create_item(&mut self, tag: &str, item: impl ListItem) -> ElementId {
        let id = self.create_element(tag);
        self.nodes[id].capability = Capability::Item(Box::new(item));
        id
    }

    /// Replace an element's capability.
    pub fn set_capability(&mut self, id: ElementId, capability: Capability) -> Result<()> {
        self.get_mut(id)?.capability = capability;
        Ok(())
    }

    /// Give an element a positioning-rect override.
    pub fn set_positionable(
        &mut self,
        id: ElementId,
        positionable: impl Positionable + 'static,
    ) -> Result<()> {
        self.get_mut(id)?.positionable = Some(Box::new(positionable));
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already in the tree.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        let len = self.get(parent)?.children.len();
        self.insert_child(parent, len, child)
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    pub fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) -> Result<()> {
        self.get(parent)?;
        let kind = self.get(child)?.kind;
        if kind != NodeKind::Element {
            return Err(Error::Hierarchy(format!(
                "{kind:?} nodes cannot be inserted as children"
            )));
        }
        if self.contains_composed(child, parent) {
            return Err(Error::Hierarchy(
                "cannot insert an element into its own subtree".into(),
            ));
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Unlink a node from its parent's child list.
    fn detach(&mut self, child: ElementId) {
        if let Some(parent) = self.nodes[child].parent.take()
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != child);
        }
    }

    /// Remove an element (and its subtree) from the tree. The element stays
    /// in the arena and can be re-inserted. Focus inside the removed subtree
    /// is dropped.
    pub fn remove(&mut self, child: ElementId) -> Result<()> {
        if self.get(child)?.kind != NodeKind::Element {
            return Err(Error::Hierarchy("only elements can be removed".into()));
        }
        self.detach(child);
        if let Some(f) = self.focused
            && self.contains_composed(child, f)
        {
            self.focused = None;
        }
        Ok(())
    }

    /// Attach a shadow root to `host`.
    pub fn attach_shadow(&mut self, host: ElementId) -> Result<ElementId> {
        let h = self.get(host)?;
        if h.kind != NodeKind::Element || h.shadow_root.is_some() {
            return Err(Error::Hierarchy(
                "shadow roots attach once, to elements".into(),
            ));
        }
        let mut sr = Element::new(NodeKind::ShadowRoot, "#shadow-root");
        sr.parent = Some(host);
        let sr = self.nodes.insert(sr);
        self.nodes[host].shadow_root = Some(sr);
        Ok(sr)
    }

    /// The shadow root attached to `host`, if any.
    pub fn shadow_root(&self, host: ElementId) -> Option<ElementId> {
        self.nodes.get(host)?.shadow_root
    }

    /// The parent node. For a shadow root this is its host.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id)?.parent
    }

    /// The parent, if it is an element. Children of the document node or of
    /// a shadow root have no parent element.
    pub fn parent_element(&self, id: ElementId) -> Option<ElementId> {
        if self.nodes.get(id)?.kind == NodeKind::ShadowRoot {
            return None;
        }
        let p = self.parent(id)?;
        (self.nodes[p].kind == NodeKind::Element).then_some(p)
    }

    /// Children in order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map_or(&[], |e| e.children.as_slice())
    }

    /// The root of the tree containing `id`: the document node, a shadow
    /// root, or the topmost ancestor of a detached subtree.
    pub fn root_node(&self, id: ElementId) -> ElementId {
        let mut cur = id;
        while let Some(e) = self.nodes.get(cur) {
            if e.kind == NodeKind::ShadowRoot {
                break;
            }
            match e.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        cur
    }

    /// Is the node connected to the document, possibly through shadow hosts?
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut cur = id;
        while let Some(e) = self.nodes.get(cur) {
            if e.kind == NodeKind::Document {
                return true;
            }
            match e.parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
        false
    }

    /// Is `node` an inclusive descendant of `ancestor` within one tree
    /// (not crossing shadow boundaries)?
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            let Some(e) = self.nodes.get(c) else {
                return false;
            };
            if e.kind == NodeKind::ShadowRoot {
                return false;
            }
            cur = e.parent;
        }
        false
    }

    /// Like [`Document::contains`], but crossing shadow boundaries.
    pub fn contains_composed(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.nodes.get(c).and_then(|e| e.parent);
        }
        false
    }

    /// Element descendants of `scope` in tree order, not entering shadow
    /// roots.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Find the first element with a matching `id` attribute under `scope`
    /// (typically a root node).
    pub fn get_element_by_id(&self, scope: ElementId, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(scope)
            .into_iter()
            .find(|e| self.get_attribute(*e, "id") == Some(id))
    }

    /// An attribute value.
    pub fn get_attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes.get(id)?.attribute(name)
    }

    /// Is the attribute present?
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute and notify the attribute observer.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        let old = self
            .get_mut(id)?
            .attrs
            .insert(name.to_string(), value.to_string());
        trace!(?id, name, value, "set attribute");
        self.observer.notify(id, name, old);
        Ok(())
    }

    /// Remove an attribute, notifying the observer if it was present.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Result<Option<String>> {
        let old = self.get_mut(id)?.attrs.remove(name);
        if old.is_some() {
            self.observer.notify(id, name, old.clone());
        }
        Ok(old)
    }

    /// The computed writing direction: the nearest `dir` attribute on the
    /// element or its composed ancestors, defaulting to left-to-right.
    pub fn computed_direction(&self, id: ElementId) -> TextDirection {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(e) = self.nodes.get(c) else { break };
            match e.attribute("dir").map(str::to_ascii_lowercase).as_deref() {
                Some("rtl") => return TextDirection::Rtl,
                Some("ltr") => return TextDirection::Ltr,
                _ => {}
            }
            cur = e.parent;
        }
        TextDirection::Ltr
    }

    /// Record a layout result for an element.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> Result<()> {
        rect.validate()?;
        self.get_mut(id)?.rect = rect;
        Ok(())
    }

    /// Is the element connected and not hidden by `display: none` on itself
    /// or any composed ancestor?
    pub fn is_rendered(&self, id: ElementId) -> bool {
        if !self.is_connected(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            let e = &self.nodes[c];
            if e.style.is_display_none() {
                return false;
            }
            cur = e.parent;
        }
        true
    }

    /// The element's rect in viewport coordinates. Unrendered elements
    /// measure as a zero rect.
    pub fn bounding_client_rect(&self, id: ElementId) -> Rect {
        if !self.is_rendered(id) {
            return Rect::zero();
        }
        self.nodes[id].rect
    }

    /// The rect used for surface positioning: the element's
    /// [`Positionable`] override when it has one, else its bounding rect.
    pub fn surface_position_rect(&self, id: ElementId) -> Rect {
        let rect = self.bounding_client_rect(id);
        match self.nodes.get(id).and_then(|e| e.positionable.as_ref()) {
            Some(p) => p.surface_position_rect(rect),
            None => rect,
        }
    }

    /// The inline style.
    pub fn style(&self, id: ElementId) -> Option<&StyleMap> {
        self.nodes.get(id).map(|e| &e.style)
    }

    /// Replace the inline style in one batch.
    pub fn set_style(&mut self, id: ElementId, style: StyleMap) -> Result<()> {
        self.get_mut(id)?.style = style;
        Ok(())
    }

    /// Bind a style record to an attribute. Only `style` accepts a style
    /// record; anything else is a wiring bug and fails immediately.
    pub fn bind_style(&mut self, id: ElementId, attribute: &str, style: StyleMap) -> Result<()> {
        if attribute != "style" {
            return Err(Error::Directive(format!(
                "a style record can only be bound to the `style` attribute, not `{attribute}`"
            )));
        }
        self.set_style(id, style)
    }

    /// The tab index, delegating to the list item when there is one.
    pub fn tab_index(&self, id: ElementId) -> i32 {
        match self.nodes.get(id) {
            Some(Element {
                capability: Capability::Item(i),
                ..
            }) => i.tab_index(),
            Some(e) => e.tab_index,
            None => -1,
        }
    }

    /// Set the tab index, delegating to the list item when there is one.
    pub fn set_tab_index(&mut self, id: ElementId, index: i32) -> Result<()> {
        let e = self.get_mut(id)?;
        match &mut e.capability {
            Capability::Item(i) => i.set_tab_index(index),
            _ => e.tab_index = index,
        }
        Ok(())
    }

    /// Make an element the tab stop (`0`) or take it out of the tab order
    /// (`-1`). Removed elements are skipped.
    pub fn set_tab_stop(&mut self, id: ElementId, stop: bool) {
        let index = if stop { 0 } else { -1 };
        if let Some(e) = self.nodes.get_mut(id) {
            match &mut e.capability {
                Capability::Item(i) => i.set_tab_index(index),
                _ => e.tab_index = index,
            }
        }
    }

    /// The list item capability, if the element is an item.
    pub fn item(&self, id: ElementId) -> Option<&dyn ListItem> {
        match &self.nodes.get(id)?.capability {
            Capability::Item(i) => Some(i.as_ref()),
            _ => None,
        }
    }

    /// Mutable list item access.
    pub fn item_mut(&mut self, id: ElementId) -> Option<&mut (dyn ListItem + 'static)> {
        match &mut self.nodes.get_mut(id)?.capability {
            Capability::Item(i) => Some(i.as_mut()),
            _ => None,
        }
    }

    /// Downcast a list item to a concrete type.
    pub fn item_as<T: Any>(&self, id: ElementId) -> Option<&T> {
        self.item(id)?.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast of a list item.
    pub fn item_as_mut<T: Any>(&mut self, id: ElementId) -> Option<&mut T> {
        self.item_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// The item exposed by an item-hosting element.
    pub fn nested_item(&self, id: ElementId) -> Option<ElementId> {
        match self.nodes.get(id)?.capability {
            Capability::ItemHost(inner) => Some(inner),
            _ => None,
        }
    }

    /// Focus an element. Only connected elements can take focus.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.is_connected(id) {
            return false;
        }
        trace!(?id, "focus");
        self.focused = Some(id);
        true
    }

    /// The focused element.
    pub fn active_element(&self) -> Option<ElementId> {
        self.focused
    }

    /// Window metrics.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable window metrics.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Measure a fixed element filling the viewport: the scrollbar-adjusted client
    /// area.
    pub fn usable_viewport(&self) -> Rect {
        self.viewport.usable()
    }

    /// Declare whether the platform supports top-layer popovers.
    pub fn set_popover_supported(&mut self, supported: bool) {
        self.popover_supported = supported;
    }

    /// Does the platform support top-layer popovers?
    pub fn popover_supported(&self) -> bool {
        self.popover_supported
    }

    /// Promote an element to the top layer.
    pub fn show_popover(&mut self, id: ElementId) -> Result<()> {
        if !self.popover_supported {
            return Err(Error::Popover("popovers are not supported".into()));
        }
        if !self.is_connected(id) {
            return Err(Error::Popover("element is not connected".into()));
        }
        self.get_mut(id)?.popover_open = true;
        Ok(())
    }

    /// Remove an element from the top layer.
    pub fn hide_popover(&mut self, id: ElementId) -> Result<()> {
        self.get_mut(id)?.popover_open = false;
        Ok(())
    }

    /// Is the element showing in the top layer?
    pub fn is_popover_open(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|e| e.popover_open)
    }

    /// Register `target` with the document's attribute observer.
    pub fn observe_attributes(&mut self, target: ElementId, filter: &[&str]) {
        self.observer.observe(target, filter);
    }

    /// Remove `target` from the attribute observer.
    pub fn unobserve_attributes(&mut self, target: ElementId) {
        self.observer.unobserve(target);
    }

    /// Is `target` registered with the attribute observer?
    pub fn is_observed(&self, target: ElementId) -> bool {
        self.observer.is_observing(target)
    }

    /// Drain pending attribute records.
    pub fn take_mutation_records(&mut self) -> Vec<MutationRecord> {
        self.observer.take_records()
    }
}

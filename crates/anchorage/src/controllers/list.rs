//! Keyboard navigation over a list with a single tab stop.
//!
//! Every item has tab index `-1` except the tab stop, which has `0`.
//! Navigation always demotes the current tab stop before promoting the
//! target, so there is never a moment with two.

use tracing::trace;

use crate::{
    dom::{Document, ElementId, TextDirection},
    event::{KeyCode, KeyEvent},
};

/// An item together with its position in the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRecord {
    /// The item element.
    pub item: ElementId,
    /// Index into the item list.
    pub index: usize,
}

/// Is this element an enabled list item?
pub fn is_enabled(doc: &Document, id: ElementId) -> bool {
    doc.item(id).is_some_and(|i| !i.disabled())
}

/// The enabled item holding the tab stop.
pub fn active_item(doc: &Document, items: &[ElementId]) -> Option<ItemRecord> {
    items
        .iter()
        .position(|&id| doc.tab_index(id) == 0 && is_enabled(doc, id))
        .map(|index| ItemRecord {
            item: items[index],
            index,
        })
}

/// The first enabled item.
pub fn first_enabled(doc: &Document, items: &[ElementId]) -> Option<ElementId> {
    items.iter().copied().find(|&id| is_enabled(doc, id))
}

/// The last enabled item.
pub fn last_enabled(doc: &Document, items: &[ElementId]) -> Option<ElementId> {
    items.iter().rev().copied().find(|&id| is_enabled(doc, id))
}

/// The next enabled item after `index`. Without `wrap`, a search that would
/// cross the end returns `None`. When nothing else is enabled the item at
/// `index` itself is returned.
pub fn next_item(doc: &Document, items: &[ElementId], index: usize, wrap: bool) -> Option<ElementId> {
    let n = items.len();
    for step in 1..n {
        let i = (index + step) % n;
        if i < index && !wrap {
            return None;
        }
        if is_enabled(doc, items[i]) {
            return Some(items[i]);
        }
    }
    items.get(index).copied()
}

/// The previous enabled item before `index`, mirroring [`next_item`].
pub fn previous_item(doc: &Document, items: &[ElementId], index: usize, wrap: bool) -> Option<ElementId> {
    let n = items.len();
    for step in 1..n {
        let i = (index + n - step) % n;
        if i > index && !wrap {
            return None;
        }
        if is_enabled(doc, items[i]) {
            return Some(items[i]);
        }
    }
    items.get(index).copied()
}

/// Hand the tab stop to `target` and focus it. The current tab stop, if any,
/// is demoted first.
fn promote(doc: &mut Document, items: &[ElementId], target: ElementId) {
    for &id in items {
        if id != target && doc.tab_index(id) == 0 {
            doc.set_tab_stop(id, false);
        }
    }
    doc.set_tab_stop(target, true);
    doc.focus(target);
    trace!(?target, "activated item");
}

/// Returns the candidate list of elements to filter into items.
pub type ItemQuery = Box<dyn Fn(&Document) -> Vec<ElementId>>;

/// Arrow-key navigation for a list host.
pub struct ListNavigationController {
    /// The list host; its computed direction decides the inline arrows.
    host: ElementId,
    /// Produces candidate elements, in order.
    query: ItemQuery,
    /// Wrap around at the ends?
    wrap: bool,
}

impl std::fmt::Debug for ListNavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListNavigationController")
            .field("host", &self.host)
            .field("wrap", &self.wrap)
            .finish_non_exhaustive()
    }
}

impl ListNavigationController {
    /// A wrapping controller for the candidates `query` returns.
    pub fn new(host: ElementId, query: impl Fn(&Document) -> Vec<ElementId> + 'static) -> Self {
        Self {
            host,
            query: Box::new(query),
            wrap: true,
        }
    }

    /// A controller whose candidates are the host's children.
    pub fn children_of(host: ElementId) -> Self {
        Self::new(host, move |doc| doc.children(host).to_vec())
    }

    /// Builder-style wrap setting.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Does navigation wrap?
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Change wrapping.
    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    /// The list host.
    pub fn host(&self) -> ElementId {
        self.host
    }

    /// The current items: candidates that are items, or that host one.
    pub fn items(&self, doc: &Document) -> Vec<ElementId> {
        (self.query)(doc)
            .into_iter()
            .filter_map(|id| {
                if doc.item(id).is_some() {
                    Some(id)
                } else {
                    doc.nested_item(id).filter(|&inner| doc.item(inner).is_some())
                }
            })
            .collect()
    }

    /// The item holding the tab stop.
    pub fn active_item(&self, doc: &Document) -> Option<ItemRecord> {
        active_item(doc, &self.items(doc))
    }

    /// Handle a navigation key. Returns the newly activated item.
    pub fn handle_keydown(&self, doc: &mut Document, event: &mut KeyEvent) -> Option<ElementId> {
        if event.default_prevented() {
            return None;
        }
        let code = event.code();
        if !matches!(
            code,
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End
        ) {
            return None;
        }
        let items = self.items(doc);
        if items.is_empty() {
            return None;
        }
        event.prevent_default();

        let rtl = doc.computed_direction(self.host) == TextDirection::Rtl;
        let (inline_prev, inline_next) = if rtl {
            (KeyCode::Right, KeyCode::Left)
        } else {
            (KeyCode::Left, KeyCode::Right)
        };
        match code {
            KeyCode::Home => self.activate_first(doc, &items),
            KeyCode::End => self.activate_last(doc, &items),
            c if c == KeyCode::Down || c == inline_next => self.activate_next(doc, &items),
            c if c == KeyCode::Up || c == inline_prev => self.activate_previous(doc, &items),
            _ => None,
        }
    }

    /// Activate the first enabled item of `items`.
    fn activate_first(&self, doc: &mut Document, items: &[ElementId]) -> Option<ElementId> {
        let target = first_enabled(doc, items)?;
        promote(doc, items, target);
        Some(target)
    }

    /// Activate the last enabled item of `items`.
    fn activate_last(&self, doc: &mut Document, items: &[ElementId]) -> Option<ElementId> {
        let target = last_enabled(doc, items)?;
        promote(doc, items, target);
        Some(target)
    }

    /// Step forward from the tab stop within `items`.
    fn activate_next(&self, doc: &mut Document, items: &[ElementId]) -> Option<ElementId> {
        let Some(active) = active_item(doc, items) else {
            return self.activate_first(doc, items);
        };
        let target = next_item(doc, items, active.index, self.wrap)?;
        promote(doc, items, target);
        Some(target)
    }

    /// Step backward from the tab stop within `items`.
    fn activate_previous(&self, doc: &mut Document, items: &[ElementId]) -> Option<ElementId> {
        let Some(active) = active_item(doc, items) else {
            return self.activate_last(doc, items);
        };
        let target = previous_item(doc, items, active.index, self.wrap)?;
        promote(doc, items, target);
        Some(target)
    }

    /// Move the tab stop to the first enabled item.
    pub fn activate_first_item(&self, doc: &mut Document) -> Option<ElementId> {
        let items = self.items(doc);
        self.activate_first(doc, &items)
    }

    /// Move the tab stop to the last enabled item.
    pub fn activate_last_item(&self, doc: &mut Document) -> Option<ElementId> {
        let items = self.items(doc);
        self.activate_last(doc, &items)
    }

    /// Move the tab stop forward. With no tab stop, starts at the first
    /// enabled item. `None` leaves the tab stop where it was.
    pub fn activate_next_item(&self, doc: &mut Document) -> Option<ElementId> {
        let items = self.items(doc);
        self.activate_next(doc, &items)
    }

    /// Move the tab stop backward. With no tab stop, starts at the last
    /// enabled item. `None` leaves the tab stop where it was.
    pub fn activate_previous_item(&self, doc: &mut Document) -> Option<ElementId> {
        let items = self.items(doc);
        self.activate_previous(doc, &items)
    }

    /// Remove every item from the tab order.
    pub fn on_deactivate_items(&self, doc: &mut Document) {
        for id in self.items(doc) {
            doc.set_tab_stop(id, false);
        }
    }

    /// An item asked to become the tab stop, e.g. on hover or click.
    /// Ignored for elements that are not enabled items of this list.
    pub fn on_request_activation(&self, doc: &mut Document, target: ElementId) -> bool {
        let items = self.items(doc);
        if !items.contains(&target) || !is_enabled(doc, target) {
            return false;
        }
        promote(doc, &items, target);
        true
    }

    /// Re-establish the single tab stop after the item set changed. The
    /// first enabled item that is already in the tab order (any tab index
    /// above -1) keeps the stop; otherwise the first enabled item gets it.
    pub fn on_slotchange(&self, doc: &mut Document) -> Option<ElementId> {
        let items = self.items(doc);
        let mut keeper = None;
        for &id in &items {
            if keeper.is_none() && doc.tab_index(id) > -1 && is_enabled(doc, id) {
                keeper = Some(id);
                continue;
            }
            doc.set_tab_stop(id, false);
        }
        if keeper.is_none() {
            keeper = first_enabled(doc, &items);
        }
        if let Some(id) = keeper {
            doc.set_tab_stop(id, true);
        }
        keeper
    }
}

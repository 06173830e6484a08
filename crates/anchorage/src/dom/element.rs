use std::{any::Any, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::{ElementId, StyleMap};
use crate::geom::Rect;

/// The kind of node stored in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node itself. There is exactly one.
    Document,
    /// A shadow root attached to a host element. It is the root node of its
    /// subtree.
    ShadowRoot,
    /// An ordinary element.
    Element,
}

/// Writing direction, as resolved from `dir` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// An element that can take part in list navigation and typeahead.
///
/// Implementors own their tab index: the list controllers guarantee that at
/// most one enabled item in a list reports `0` at a time.
pub trait ListItem: Any {
    /// Disabled items are skipped by navigation and typeahead.
    fn disabled(&self) -> bool;
    /// `0` for the list's tab stop, `-1` otherwise.
    fn tab_index(&self) -> i32;
    /// Update the tab index.
    fn set_tab_index(&mut self, index: i32);
    /// Text matched by typeahead. Normalization happens in the controller.
    fn typeahead_text(&self) -> &str;
    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Elements whose visual bounds differ from their layout box supply the rect
/// used for surface positioning.
pub trait Positionable {
    /// Map the element's layout rect to the rect used for positioning.
    fn surface_position_rect(&self, layout: Rect) -> Rect;
}

/// Extends the layout rect on every side, e.g. for a focus ring drawn outside
/// the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outset(pub f64);

impl Positionable for Outset {
    fn surface_position_rect(&self, layout: Rect) -> Rect {
        layout.outset(self.0)
    }
}

/// Behavioral capabilities an element exposes to the controllers.
#[derive(Default)]
pub enum Capability {
    /// A plain element.
    #[default]
    None,
    /// The element is itself a list item.
    Item(Box<dyn ListItem>),
    /// The element wraps a list item and exposes it as its `item`.
    ItemHost(ElementId),
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Item(i) => write!(f, "Item({:?})", i.typeahead_text()),
            Self::ItemHost(id) => write!(f, "ItemHost({id:?})"),
        }
    }
}

/// A node in the document arena.
pub struct Element {
    /// Node kind.
    pub(crate) kind: NodeKind,
    /// Lowercase tag name.
    pub(crate) tag: String,
    /// Attributes by name.
    pub(crate) attrs: BTreeMap<String, String>,
    /// Parent node. For a shadow root this is its host.
    pub(crate) parent: Option<ElementId>,
    /// Child nodes in order. Shadow roots are not listed here.
    pub(crate) children: Vec<ElementId>,
    /// Attached shadow root, if any.
    pub(crate) shadow_root: Option<ElementId>,
    /// Layout rect in viewport coordinates, as produced by layout.
    pub(crate) rect: Rect,
    /// Inline style.
    pub(crate) style: StyleMap,
    /// Tab index for elements that are not list items.
    pub(crate) tab_index: i32,
    /// Behavioral capability.
    pub(crate) capability: Capability,
    /// Optional positioning-rect override.
    pub(crate) positionable: Option<Box<dyn Positionable>>,
    /// Is this element showing as a top-layer popover?
    pub(crate) popover_open: bool,
}

impl Element {
    /// Construct a detached node.
    pub(crate) fn new(kind: NodeKind, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            shadow_root: None,
            rect: Rect::zero(),
            style: StyleMap::new(),
            tab_index: -1,
            capability: Capability::None,
            positionable: None,
            popover_open: false,
        }
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The inline style.
    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    /// The element's capability.
    pub fn capability(&self) -> &Capability {
        &self.capability
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

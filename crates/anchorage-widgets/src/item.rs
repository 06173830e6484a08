//! Menu items.

use std::any::Any;

use anchorage::dom::ListItem;
use serde::{Deserialize, Serialize};

/// What an item does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    /// A command in a menu.
    #[default]
    MenuItem,
    /// A choice in a select.
    Option,
    /// A navigation link.
    Link,
}

/// A list item with a headline. Typeahead matches against the headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Primary text.
    pub headline: String,
    /// Secondary text.
    pub supporting_text: Option<String>,
    /// Value submitted by a select.
    pub value: String,
    /// Disabled items cannot be activated or navigated to.
    pub disabled: bool,
    /// Selected state, for select options.
    pub selected: bool,
    /// Activating this item leaves the menu open.
    pub keep_open: bool,
    /// Item role.
    pub kind: ItemKind,
    /// Current tab index.
    tab_index: i32,
}

impl MenuItem {
    /// An enabled menu item.
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            supporting_text: None,
            value: String::new(),
            disabled: false,
            selected: false,
            keep_open: false,
            kind: ItemKind::MenuItem,
            tab_index: -1,
        }
    }

    /// A select option with a value.
    pub fn option(headline: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ItemKind::Option,
            ..Self::new(headline)
        }
    }

    /// Builder-style disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Builder-style selected flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Builder-style keep-open flag.
    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }
}

impl ListItem for MenuItem {
    fn disabled(&self) -> bool {
        self.disabled
    }

    fn tab_index(&self) -> i32 {
        self.tab_index
    }

    fn set_tab_index(&mut self, index: i32) {
        self.tab_index = index;
    }

    fn typeahead_text(&self) -> &str {
        &self.headline
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! A select: a field that shows the chosen option and opens a menu of
//! options below it.

use std::{
    mem,
    time::{Duration, Instant},
};

use anchorage::{
    Context, Corner, ElementId, KeyCode, KeyEvent, Positioning, TypeaheadController,
    controllers::DEFAULT_TYPEAHEAD_DELAY, dom::Document,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    MenuItem,
    error::{Error, Result},
    menu::{CloseReason, FocusState, Menu, MenuOptions},
};

/// Select configuration. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectOptions {
    /// Skip the menu transitions.
    pub quick: bool,
    /// Menu positioning mode.
    pub positioning: Positioning,
    /// Corner of the field the menu aligns to.
    pub anchor_corner: Corner,
    /// Corner of the menu that aligns to the field.
    pub menu_corner: Corner,
    /// Typeahead inactivity window in milliseconds, open or closed.
    pub typeahead_delay_ms: u64,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            quick: false,
            positioning: Positioning::Popover,
            anchor_corner: Corner::END_START,
            menu_corner: Corner::START_START,
            typeahead_delay_ms: DEFAULT_TYPEAHEAD_DELAY.as_millis() as u64,
        }
    }
}

impl SelectOptions {
    /// Load options from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Options for the inner menu.
    fn menu_options(&self) -> MenuOptions {
        MenuOptions {
            quick: self.quick,
            positioning: self.positioning,
            anchor_corner: self.anchor_corner,
            menu_corner: self.menu_corner,
            typeahead_delay_ms: self.typeahead_delay_ms,
            default_focus: FocusState::None,
            ..MenuOptions::default()
        }
    }
}

/// Notifications for user-driven selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectEvent {
    /// The value changed in response to user input.
    Input,
    /// The value change was committed.
    Change,
}

/// A select widget.
#[derive(Debug)]
pub struct Select {
    /// The element showing the selection; anchors the menu.
    field: ElementId,
    /// The option menu.
    menu: Menu,
    /// Selects options directly while the menu is closed.
    typeahead: TypeaheadController,
    /// The selected option.
    selected: Option<ElementId>,
    /// The option selected at construction, restored by [`Select::reset`].
    initial: Option<ElementId>,
    /// Undelivered events.
    events: Vec<SelectEvent>,
}

impl Select {
    /// Build a select on `field`, with options as the children of
    /// `menu_host`. The first option marked selected becomes the selection.
    pub fn new(doc: &mut Document, field: ElementId, menu_host: ElementId, options: &SelectOptions) -> Result<Self> {
        let mut menu = Menu::new(doc, menu_host, options.menu_options())?;
        menu.set_anchor_element(Some(field));
        let mut typeahead = TypeaheadController::new(Duration::from_millis(options.typeahead_delay_ms));
        typeahead.set_active(true);
        let initial = menu
            .items(doc)
            .into_iter()
            .find(|&id| doc.item_as::<MenuItem>(id).is_some_and(|i| i.selected));
        let mut select = Self {
            field,
            menu,
            typeahead,
            selected: None,
            initial,
            events: Vec::new(),
        };
        select.apply_selection(doc, initial);
        Ok(select)
    }

    /// The field element.
    pub fn field(&self) -> ElementId {
        self.field
    }

    /// The option menu.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Mutable access to the option menu.
    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    /// The option elements.
    pub fn options(&self, doc: &Document) -> Vec<ElementId> {
        self.menu.items(doc)
    }

    /// The selected option.
    pub fn selected_option(&self) -> Option<ElementId> {
        self.selected
    }

    /// Position of the selected option.
    pub fn selected_index(&self, doc: &Document) -> Option<usize> {
        let selected = self.selected?;
        self.options(doc).iter().position(|&id| id == selected)
    }

    /// The selected option's value, or the empty string.
    pub fn value(&self, doc: &Document) -> String {
        self.selected_item(doc).map(|i| i.value.clone()).unwrap_or_default()
    }

    /// The selected option's headline, or the empty string.
    pub fn display_text(&self, doc: &Document) -> String {
        self.selected_item(doc).map(|i| i.headline.clone()).unwrap_or_default()
    }

    /// The selected option's item.
    fn selected_item<'a>(&self, doc: &'a Document) -> Option<&'a MenuItem> {
        doc.item_as::<MenuItem>(self.selected?)
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<SelectEvent> {
        mem::take(&mut self.events)
    }

    /// Select the first option with `value`. Does not emit events.
    pub fn select(&mut self, doc: &mut Document, value: &str) -> Result<()> {
        let target = self
            .options(doc)
            .into_iter()
            .find(|&id| doc.item_as::<MenuItem>(id).is_some_and(|i| i.value == value))
            .ok_or_else(|| Error::NoSuchOption(value.to_string()))?;
        self.apply_selection(doc, Some(target));
        Ok(())
    }

    /// Select the option at `index`. Does not emit events.
    pub fn select_index(&mut self, doc: &mut Document, index: usize) -> Result<()> {
        let target = *self.options(doc).get(index).ok_or(Error::OutOfRange(index))?;
        self.apply_selection(doc, Some(target));
        Ok(())
    }

    /// Restore the initial selection. Does not emit events.
    pub fn reset(&mut self, doc: &mut Document) {
        self.apply_selection(doc, self.initial);
    }

    /// Mark `target` as the only selected option and give it the tab stop.
    /// Returns true if the selection changed.
    fn apply_selection(&mut self, doc: &mut Document, target: Option<ElementId>) -> bool {
        for id in self.options(doc) {
            let on = Some(id) == target;
            if let Some(item) = doc.item_as_mut::<MenuItem>(id) {
                item.selected = on;
            }
            doc.set_tab_stop(id, on);
        }
        let changed = self.selected != target;
        self.selected = target;
        changed
    }

    /// Select an option on behalf of the user.
    fn commit(&mut self, doc: &mut Document, item: ElementId) {
        if doc.item_as::<MenuItem>(item).is_none_or(|i| i.disabled) {
            return;
        }
        if self.apply_selection(doc, Some(item)) {
            debug!(?item, "selection changed");
            self.events.push(SelectEvent::Input);
            self.events.push(SelectEvent::Change);
        }
    }

    /// Select `item` and close the menu.
    fn choose<C: Context>(&mut self, ctx: &mut C, item: ElementId, reason: CloseReason) -> Result<()> {
        self.commit(ctx.doc_mut(), item);
        self.menu.handle_item_activated(ctx, item, reason)?;
        Ok(())
    }

    /// Open the menu with the selected option active, or the first option
    /// if nothing is selected.
    pub async fn open<C: Context>(&mut self, ctx: &mut C) -> Result<()> {
        self.typeahead.end_typeahead(ctx.doc_mut());
        self.menu.show(ctx).await?;
        let doc = ctx.doc_mut();
        let activated = self.selected.is_some_and(|s| self.menu.activate_item(doc, s));
        if !activated {
            self.menu.activate_next_item(doc);
        }
        Ok(())
    }

    /// An option was clicked.
    pub fn handle_item_activated<C: Context>(&mut self, ctx: &mut C, item: ElementId) -> Result<()> {
        self.choose(ctx, item, CloseReason::ClickSelection)
    }

    /// Handle a key on the field or the open menu.
    ///
    /// While closed, arrows, Enter and Space open the menu and anything
    /// printable selects by typeahead without opening. While open, Enter and
    /// Space choose the active option and other keys go to the menu.
    pub async fn handle_keydown<C: Context>(&mut self, ctx: &mut C, event: &mut KeyEvent) -> Result<()> {
        if event.default_prevented() {
            return Ok(());
        }
        if self.menu.is_open() {
            let choosing = event.code() == KeyCode::Enter
                || (event.is_space() && !self.menu.typeahead().is_typing_ahead());
            if choosing && let Some(active) = self.menu.active_item(ctx.doc()) {
                event.prevent_default();
                return self.choose(ctx, active, CloseReason::KeydownSelection);
            }
            self.menu.handle_keydown(ctx, event)?;
            return Ok(());
        }

        let opens = matches!(event.code(), KeyCode::Up | KeyCode::Down | KeyCode::Enter)
            || (event.is_space() && !self.typeahead.is_typing_ahead());
        if opens {
            event.prevent_default();
            return self.open(ctx).await;
        }
        let now = ctx.now();
        let items = self.options(ctx.doc());
        if let Some(item) = self.typeahead.on_keydown(ctx.doc_mut(), &items, event, now) {
            self.commit(ctx.doc_mut(), item);
            ctx.doc_mut().focus(self.field);
        }
        Ok(())
    }

    /// Focus left the menu.
    pub fn handle_focusout<C: Context>(&mut self, ctx: &mut C, related: Option<ElementId>) -> Result<bool> {
        self.menu.handle_focusout(ctx, related)
    }

    /// Advance transitions and typeahead sessions.
    pub fn poll<C: Context>(&mut self, ctx: &mut C) -> Result<()> {
        self.menu.poll(ctx)?;
        let now = ctx.now();
        self.typeahead.poll(ctx.doc_mut(), now);
        Ok(())
    }

    /// How long until the select next needs [`Select::poll`].
    pub fn current_wait(&self, now: Instant) -> Option<Duration> {
        let typeahead = self.typeahead.deadline().map(|d| d.saturating_duration_since(now));
        match (self.menu.current_wait(now), typeahead) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use anchorage::{
        Rect,
        testing::{Harness, ms},
    };
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        h: Harness,
        field: ElementId,
        options: Vec<ElementId>,
        select: Select,
    }

    fn fixture(opts: SelectOptions) -> Fixture {
        let mut h = Harness::with_viewport(800.0, 600.0);
        let body = h.doc.body();
        let field = h.doc.create_element("md-select");
        h.doc.append_child(body, field).unwrap();
        h.doc.set_rect(field, Rect::new(50.0, 50.0, 200.0, 56.0)).unwrap();
        let host = h.doc.create_element("md-menu");
        h.doc.append_child(body, host).unwrap();
        h.doc.set_rect(host, Rect::new(0.0, 0.0, 200.0, 160.0)).unwrap();
        let mut options = Vec::new();
        for item in [
            MenuItem::option("Apple", "apple"),
            MenuItem::option("Banana", "banana").with_selected(true),
            MenuItem::option("Blueberry", "blueberry"),
            MenuItem::option("Cherry", "cherry").with_disabled(true),
        ] {
            let id = h.doc.create_item("md-select-option", item);
            h.doc.append_child(host, id).unwrap();
            options.push(id);
        }
        h.doc.focus(field);
        let select = Select::new(&mut h.doc, field, host, &opts).unwrap();
        Fixture {
            h,
            field,
            options,
            select,
        }
    }

    fn quick() -> SelectOptions {
        SelectOptions {
            quick: true,
            ..SelectOptions::default()
        }
    }

    #[test]
    fn initial_selection_comes_from_the_options() {
        let f = fixture(quick());
        assert_eq!(f.select.selected_index(&f.h.doc), Some(1));
        assert_eq!(f.select.value(&f.h.doc), "banana");
        assert_eq!(f.select.display_text(&f.h.doc), "Banana");
        assert_eq!(f.h.doc.tab_index(f.options[1]), 0);
    }

    #[tokio::test]
    async fn keyboard_open_choose_and_close() {
        let mut f = fixture(quick());
        let mut down = KeyEvent::new(KeyCode::Down);
        f.select.handle_keydown(&mut f.h, &mut down).await.unwrap();
        assert!(f.select.menu().is_open());
        assert_eq!(f.h.doc.active_element(), Some(f.options[1]));

        let mut down = KeyEvent::new(KeyCode::Down);
        f.select.handle_keydown(&mut f.h, &mut down).await.unwrap();
        let mut enter = KeyEvent::new(KeyCode::Enter);
        f.select.handle_keydown(&mut f.h, &mut enter).await.unwrap();

        assert!(!f.select.menu().is_open());
        assert_eq!(f.select.value(&f.h.doc), "blueberry");
        assert_eq!(f.select.take_events(), vec![SelectEvent::Input, SelectEvent::Change]);
        assert_eq!(f.h.doc.active_element(), Some(f.field));
    }

    #[tokio::test]
    async fn choosing_the_current_option_emits_nothing() {
        let mut f = fixture(quick());
        f.select.open(&mut f.h).await.unwrap();
        let mut space = KeyEvent::new(' ');
        f.select.handle_keydown(&mut f.h, &mut space).await.unwrap();
        assert!(space.default_prevented());
        assert!(!f.select.menu().is_open());
        assert!(f.select.take_events().is_empty());
    }

    #[tokio::test]
    async fn disabled_options_cannot_be_clicked() {
        let mut f = fixture(quick());
        f.select.open(&mut f.h).await.unwrap();
        f.select.handle_item_activated(&mut f.h, f.options[3]).unwrap();
        assert!(f.select.menu().is_open());
        assert_eq!(f.select.value(&f.h.doc), "banana");
        f.select.handle_item_activated(&mut f.h, f.options[0]).unwrap();
        assert!(!f.select.menu().is_open());
        assert_eq!(f.select.value(&f.h.doc), "apple");
    }

    #[tokio::test]
    async fn closed_typeahead_selects_without_opening() {
        let mut f = fixture(quick());
        let mut b = KeyEvent::new('b');
        f.select.handle_keydown(&mut f.h, &mut b).await.unwrap();
        assert!(!f.select.menu().is_open());
        assert_eq!(f.select.value(&f.h.doc), "blueberry");
        assert_eq!(f.h.doc.active_element(), Some(f.field));
        assert_eq!(f.select.take_events(), vec![SelectEvent::Input, SelectEvent::Change]);
        assert_eq!(f.select.current_wait(f.h.now()), Some(ms(200)));

        // Space continues the session instead of opening.
        let mut space = KeyEvent::new(' ');
        f.select.handle_keydown(&mut f.h, &mut space).await.unwrap();
        assert!(!f.select.menu().is_open());

        f.h.advance(ms(200));
        f.select.poll(&mut f.h).unwrap();
        assert!(f.select.current_wait(f.h.now()).is_none());
        assert_eq!(f.select.value(&f.h.doc), "blueberry");
    }

    #[test]
    fn programmatic_selection_is_silent() {
        let mut f = fixture(quick());
        f.select.select(&mut f.h.doc, "apple").unwrap();
        assert_eq!(f.select.selected_index(&f.h.doc), Some(0));
        f.select.select_index(&mut f.h.doc, 2).unwrap();
        assert_eq!(f.select.display_text(&f.h.doc), "Blueberry");
        assert!(matches!(
            f.select.select(&mut f.h.doc, "durian"),
            Err(Error::NoSuchOption(v)) if v == "durian"
        ));
        assert!(matches!(
            f.select.select_index(&mut f.h.doc, 9),
            Err(Error::OutOfRange(9))
        ));
        f.select.reset(&mut f.h.doc);
        assert_eq!(f.select.value(&f.h.doc), "banana");
        assert!(f.select.take_events().is_empty());
        let selected: Vec<bool> = f
            .options
            .iter()
            .map(|&id| f.h.doc.item_as::<MenuItem>(id).unwrap().selected)
            .collect();
        assert_eq!(selected, vec![false, true, false, false]);
    }

    #[test]
    fn options_from_json() {
        let o = SelectOptions::from_json(r#"{"positioning": "fixed", "typeahead-delay-ms": 500}"#).unwrap();
        assert_eq!(o.positioning, Positioning::Fixed);
        assert_eq!(o.typeahead_delay_ms, 500);
        assert!(!o.quick);
    }
}

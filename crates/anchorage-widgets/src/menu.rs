//! A menu: a list of items floating next to an anchor.
//!
//! The menu owns one controller of each kind. Opening positions the
//! surface, runs the open transition, arms typeahead and moves focus into
//! the list. Closing aborts an open transition that is still running, runs
//! the close transition and then hides the surface.

use std::{
    mem,
    time::{Duration, Instant},
};

use anchorage::{
    AbortController, Context, Corner, ElementId, KeyCode, KeyEvent, ListNavigationController,
    PositionProperties, Positioning, RepositionStrategy, SurfacePositionController, SurfaceStyles, Timers,
    Transition, TransitionKind, TransitionOutcome, TypeaheadController, controllers::DEFAULT_TYPEAHEAD_DELAY,
    dom::Document,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{MenuItem, error::Result};

/// Where focus goes when the menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusState {
    /// Leave focus alone.
    None,
    /// Focus the menu itself.
    ListRoot,
    /// Focus the first enabled item.
    #[default]
    FirstItem,
    /// Focus the last enabled item.
    LastItem,
}

/// Menu configuration. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MenuOptions {
    /// Id of the anchor element, looked up in the menu's root node.
    pub anchor: Option<String>,
    /// Corner of the anchor the menu aligns to.
    pub anchor_corner: Corner,
    /// Corner of the menu that aligns to the anchor.
    pub menu_corner: Corner,
    /// Positioning mode.
    pub positioning: Positioning,
    /// Skip the open and close transitions.
    pub quick: bool,
    /// The menu has content that overflows it, such as submenus.
    pub has_overflow: bool,
    /// Inline-axis offset in pixels.
    pub x_offset: f64,
    /// Block-axis offset in pixels.
    pub y_offset: f64,
    /// Never flip horizontally.
    pub no_horizontal_flip: bool,
    /// Never flip vertically.
    pub no_vertical_flip: bool,
    /// Stop at the first and last items instead of wrapping.
    pub no_navigation_wrap: bool,
    /// Typeahead inactivity window in milliseconds.
    pub typeahead_delay_ms: u64,
    /// Focus target on open.
    pub default_focus: FocusState,
    /// Leave focus in place on close.
    pub skip_restore_focus: bool,
    /// Ignore clicks outside the menu and anchor.
    pub stay_open_on_outside_click: bool,
    /// Ignore focus leaving the menu.
    pub stay_open_on_focusout: bool,
    /// Open transition length in milliseconds.
    pub open_duration_ms: u64,
    /// Close transition length in milliseconds.
    pub close_duration_ms: u64,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            anchor: None,
            anchor_corner: Corner::END_START,
            menu_corner: Corner::START_START,
            positioning: Positioning::Absolute,
            quick: false,
            has_overflow: false,
            x_offset: 0.0,
            y_offset: 0.0,
            no_horizontal_flip: false,
            no_vertical_flip: false,
            no_navigation_wrap: false,
            typeahead_delay_ms: DEFAULT_TYPEAHEAD_DELAY.as_millis() as u64,
            default_focus: FocusState::FirstItem,
            skip_restore_focus: false,
            stay_open_on_outside_click: false,
            stay_open_on_focusout: false,
            open_duration_ms: 300,
            close_duration_ms: 150,
        }
    }
}

impl MenuOptions {
    /// Load options from JSON. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// The typeahead inactivity window.
    pub fn typeahead_delay(&self) -> Duration {
        Duration::from_millis(self.typeahead_delay_ms)
    }

    /// Transition length for a direction.
    fn duration(&self, kind: TransitionKind) -> Duration {
        Duration::from_millis(match kind {
            TransitionKind::Open => self.open_duration_ms,
            TransitionKind::Close => self.close_duration_ms,
        })
    }
}

/// Why the menu closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseReason {
    /// [`Menu::close`] was called.
    Programmatic,
    /// Escape was pressed.
    Escape,
    /// An item was clicked.
    ClickSelection,
    /// An item was activated from the keyboard.
    KeydownSelection,
    /// Focus left the menu.
    FocusOut,
    /// A click landed outside the menu and its anchor.
    OutsideClick,
}

/// Lifecycle notifications, drained with [`Menu::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// Opening has started.
    Opening,
    /// The open transition finished.
    Opened,
    /// Closing has started.
    Closing(CloseReason),
    /// The close transition finished and the surface is hidden.
    Closed,
}

/// Deadlines the menu waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuTimer {
    /// The running transition.
    Transition,
    /// The typeahead session.
    Typeahead,
}

/// A menu widget. The host element is also the floating surface; its
/// children are the items.
#[derive(Debug)]
pub struct Menu {
    /// The menu element.
    host: ElementId,
    /// Configuration.
    options: MenuOptions,
    /// Is the menu open (or opening)?
    open: bool,
    /// Explicitly set anchor, used when no anchor id resolves.
    anchor_element: Option<ElementId>,
    /// Surface placement.
    position: SurfacePositionController,
    /// Keyboard navigation.
    nav: ListNavigationController,
    /// Prefix search.
    typeahead: TypeaheadController,
    /// Cancels the running transition.
    abort: AbortController,
    /// The running transition.
    transition: Option<Transition>,
    /// How the last transition settled.
    last_outcome: Option<(TransitionKind, TransitionOutcome)>,
    /// Pending deadlines.
    timers: Timers<MenuTimer>,
    /// Focus to restore on close.
    last_focused: Option<ElementId>,
    /// Why the menu last closed.
    close_reason: Option<CloseReason>,
    /// Undelivered events.
    events: Vec<MenuEvent>,
}

impl Menu {
    /// Build a closed menu on `host`. The surface starts hidden.
    pub fn new(doc: &mut Document, host: ElementId, options: MenuOptions) -> Result<Self> {
        doc.bind_style(host, "style", SurfaceStyles::hidden().to_style_map())?;
        let nav = ListNavigationController::children_of(host).with_wrap(!options.no_navigation_wrap);
        let typeahead = TypeaheadController::new(options.typeahead_delay());
        Ok(Self {
            host,
            options,
            open: false,
            anchor_element: None,
            position: SurfacePositionController::new(),
            nav,
            typeahead,
            abort: AbortController::new(),
            transition: None,
            last_outcome: None,
            timers: Timers::default(),
            last_focused: None,
            close_reason: None,
            events: Vec::new(),
        })
    }

    /// The menu element.
    pub fn host(&self) -> ElementId {
        self.host
    }

    /// Is the menu open?
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current configuration.
    pub fn options(&self) -> &MenuOptions {
        &self.options
    }

    /// Replace the configuration. Takes effect on the next open.
    pub fn set_options(&mut self, options: MenuOptions) {
        self.nav.set_wrap(!options.no_navigation_wrap);
        self.typeahead.set_delay(options.typeahead_delay());
        self.options = options;
    }

    /// Set an explicit anchor element.
    pub fn set_anchor_element(&mut self, anchor: Option<ElementId>) {
        self.anchor_element = anchor;
    }

    /// The anchor: the element named by the `anchor` option, else the
    /// explicit anchor element.
    pub fn anchor_element(&self, doc: &Document) -> Option<ElementId> {
        if let Some(id) = self.options.anchor.as_deref()
            && let Some(found) = doc.get_element_by_id(doc.root_node(self.host), id)
        {
            return Some(found);
        }
        self.anchor_element.filter(|&a| doc.exists(a))
    }

    /// Why the menu last closed.
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    /// How the most recent transition settled.
    pub fn last_transition_outcome(&self) -> Option<(TransitionKind, TransitionOutcome)> {
        self.last_outcome
    }

    /// The running transition.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// The styles bound to the surface.
    pub fn surface_styles(&self) -> &SurfaceStyles {
        self.position.surface_styles()
    }

    /// The typeahead controller.
    pub fn typeahead(&self) -> &TypeaheadController {
        &self.typeahead
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<MenuEvent> {
        mem::take(&mut self.events)
    }

    /// How long until the menu next needs [`Menu::poll`].
    pub fn current_wait(&self, now: Instant) -> Option<Duration> {
        self.timers.current_wait(now)
    }

    /// Positioning inputs for the current state.
    fn position_props(&self, doc: &Document) -> PositionProperties {
        PositionProperties {
            anchor: self.anchor_element(doc),
            surface: Some(self.host),
            anchor_corner: self.options.anchor_corner,
            surface_corner: self.options.menu_corner,
            positioning: self.options.positioning,
            is_open: self.open,
            x_offset: self.options.x_offset,
            y_offset: self.options.y_offset,
            disable_block_flip: self.options.no_vertical_flip,
            disable_inline_flip: self.options.no_horizontal_flip,
            reposition_strategy: if self.options.has_overflow {
                RepositionStrategy::Resize
            } else {
                RepositionStrategy::Move
            },
        }
    }

    /// Open the menu.
    pub async fn show<C: Context>(&mut self, ctx: &mut C) -> Result<()> {
        if self.open {
            return Ok(());
        }
        self.open = true;
        self.close_reason = None;
        self.last_focused = ctx.doc().active_element();
        self.events.push(MenuEvent::Opening);
        self.cancel_transition(ctx)?;

        let props = self.position_props(ctx.doc());
        self.position.position(ctx, &props).await?;
        self.typeahead.set_active(true);
        debug!(host = ?self.host, anchor = ?props.anchor, "menu opening");
        self.begin_transition(ctx, TransitionKind::Open)?;

        let doc = ctx.doc_mut();
        match self.options.default_focus {
            FocusState::None => {}
            FocusState::ListRoot => {
                doc.focus(self.host);
            }
            FocusState::FirstItem => {
                if self.nav.activate_first_item(doc).is_none() {
                    doc.focus(self.host);
                }
            }
            FocusState::LastItem => {
                if self.nav.activate_last_item(doc).is_none() {
                    doc.focus(self.host);
                }
            }
        }
        Ok(())
    }

    /// Close the menu.
    pub fn close<C: Context>(&mut self, ctx: &mut C) -> Result<()> {
        self.close_with_reason(ctx, CloseReason::Programmatic)
    }

    /// Close the menu, recording why.
    pub fn close_with_reason<C: Context>(&mut self, ctx: &mut C, reason: CloseReason) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.close_reason = Some(reason);
        self.typeahead.end_typeahead(ctx.doc_mut());
        self.typeahead.set_active(false);
        self.timers.cancel(MenuTimer::Typeahead);
        self.cancel_transition(ctx)?;
        self.events.push(MenuEvent::Closing(reason));
        debug!(host = ?self.host, ?reason, "menu closing");

        if !self.options.skip_restore_focus
            && let Some(el) = self.last_focused.take()
        {
            ctx.doc_mut().focus(el);
        }
        self.begin_transition(ctx, TransitionKind::Close)
    }

    /// Start a transition, or settle it at once for quick menus.
    fn begin_transition<C: Context>(&mut self, ctx: &mut C, kind: TransitionKind) -> Result<()> {
        let duration = self.options.duration(kind);
        if self.options.quick || duration.is_zero() {
            return self.settle(ctx, kind, TransitionOutcome::Completed);
        }
        self.abort = AbortController::new();
        let now = ctx.now();
        self.transition = Some(Transition::start(kind, now, duration, self.abort.signal()));
        self.timers.schedule(now, MenuTimer::Transition, duration);
        Ok(())
    }

    /// Stop the running transition. One that already reached its deadline
    /// settles as completed; anything else is aborted.
    fn cancel_transition<C: Context>(&mut self, ctx: &mut C) -> Result<()> {
        let Some(t) = self.transition.as_ref() else {
            return Ok(());
        };
        let kind = t.kind();
        let outcome = match t.poll(ctx.now()) {
            Some(done) => done,
            None => {
                self.abort.abort();
                debug!(?kind, "transition aborted");
                TransitionOutcome::Aborted
            }
        };
        self.settle(ctx, kind, outcome)
    }

    /// Record how a transition ended and apply its effects.
    fn settle<C: Context>(&mut self, ctx: &mut C, kind: TransitionKind, outcome: TransitionOutcome) -> Result<()> {
        self.transition = None;
        self.timers.cancel(MenuTimer::Transition);
        self.last_outcome = Some((kind, outcome));
        match (kind, outcome) {
            (TransitionKind::Open, TransitionOutcome::Completed) => self.events.push(MenuEvent::Opened),
            (TransitionKind::Close, TransitionOutcome::Completed) => {
                let props = self.position_props(ctx.doc());
                self.position.close(ctx, &props)?;
                self.events.push(MenuEvent::Closed);
            }
            (_, TransitionOutcome::Aborted) => {}
        }
        Ok(())
    }

    /// Settle due transitions and expire typeahead.
    pub fn poll<C: Context>(&mut self, ctx: &mut C) -> Result<()> {
        let now = ctx.now();
        for key in self.timers.collect(now) {
            match key {
                MenuTimer::Transition => {
                    let settled = self
                        .transition
                        .as_ref()
                        .and_then(|t| t.poll(now).map(|o| (t.kind(), o)));
                    if let Some((kind, outcome)) = settled {
                        self.settle(ctx, kind, outcome)?;
                    }
                }
                MenuTimer::Typeahead => {
                    self.typeahead.poll(ctx.doc_mut(), now);
                }
            }
        }
        Ok(())
    }

    /// Keep the typeahead deadline in the timer heap.
    fn sync_typeahead_timer(&mut self, now: Instant) {
        match self.typeahead.deadline() {
            Some(d) => self
                .timers
                .schedule(now, MenuTimer::Typeahead, d.saturating_duration_since(now)),
            None => self.timers.cancel(MenuTimer::Typeahead),
        }
    }

    /// Handle a key while the menu has focus. Escape closes; otherwise
    /// typeahead sees the key first, then list navigation. Returns the item
    /// the key activated.
    pub fn handle_keydown<C: Context>(&mut self, ctx: &mut C, event: &mut KeyEvent) -> Result<Option<ElementId>> {
        if !self.open || event.default_prevented() {
            return Ok(None);
        }
        if event.code() == KeyCode::Esc {
            event.prevent_default();
            self.close_with_reason(ctx, CloseReason::Escape)?;
            return Ok(None);
        }
        let now = ctx.now();
        let items = self.nav.items(ctx.doc());
        let typed = self.typeahead.on_keydown(ctx.doc_mut(), &items, event, now);
        self.sync_typeahead_timer(now);
        if typed.is_some() {
            return Ok(typed);
        }
        Ok(self.nav.handle_keydown(ctx.doc_mut(), event))
    }

    /// An item was activated. Closes the menu unless the item keeps it
    /// open. Returns true if the menu closed.
    pub fn handle_item_activated<C: Context>(
        &mut self,
        ctx: &mut C,
        item: ElementId,
        reason: CloseReason,
    ) -> Result<bool> {
        if !self.open {
            return Ok(false);
        }
        let Some(it) = ctx.doc().item_as::<MenuItem>(item) else {
            return Ok(false);
        };
        if it.disabled || it.keep_open {
            return Ok(false);
        }
        self.close_with_reason(ctx, reason)?;
        Ok(true)
    }

    /// Is `node` inside the menu or its anchor?
    fn owns(&self, doc: &Document, node: ElementId) -> bool {
        doc.contains_composed(self.host, node)
            || self
                .anchor_element(doc)
                .is_some_and(|a| doc.contains_composed(a, node))
    }

    /// Focus moved to `related` (or out of the document). Returns true if
    /// the menu closed.
    pub fn handle_focusout<C: Context>(&mut self, ctx: &mut C, related: Option<ElementId>) -> Result<bool> {
        if !self.open || self.options.stay_open_on_focusout {
            return Ok(false);
        }
        if related.is_some_and(|r| self.owns(ctx.doc(), r)) {
            return Ok(false);
        }
        self.close_with_reason(ctx, CloseReason::FocusOut)?;
        Ok(true)
    }

    /// A click landed on `target`. Returns true if the menu closed.
    pub fn handle_outside_click<C: Context>(&mut self, ctx: &mut C, target: ElementId) -> Result<bool> {
        if !self.open || self.options.stay_open_on_outside_click || self.owns(ctx.doc(), target) {
            return Ok(false);
        }
        self.close_with_reason(ctx, CloseReason::OutsideClick)?;
        Ok(true)
    }

    /// The items changed; re-establish the tab stop.
    pub fn on_slotchange(&self, doc: &mut Document) -> Option<ElementId> {
        self.nav.on_slotchange(doc)
    }

    /// The current items.
    pub fn items(&self, doc: &Document) -> Vec<ElementId> {
        self.nav.items(doc)
    }

    /// The item holding the tab stop.
    pub fn active_item(&self, doc: &Document) -> Option<ElementId> {
        self.nav.active_item(doc).map(|r| r.item)
    }

    /// Move the tab stop forward.
    pub fn activate_next_item(&self, doc: &mut Document) -> Option<ElementId> {
        self.nav.activate_next_item(doc)
    }

    /// Move the tab stop backward.
    pub fn activate_previous_item(&self, doc: &mut Document) -> Option<ElementId> {
        self.nav.activate_previous_item(doc)
    }

    /// Give `item` the tab stop and focus.
    pub fn activate_item(&self, doc: &mut Document, item: ElementId) -> bool {
        self.nav.on_request_activation(doc, item)
    }
}

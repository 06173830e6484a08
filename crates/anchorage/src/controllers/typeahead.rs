//! Jump to list items by typing the start of their text.
//!
//! Keystrokes typed in quick succession accumulate in a buffer. Each
//! keystroke activates the first enabled item whose text starts with the
//! buffer, counting forward from the last active item, so typing the same
//! letter repeatedly cycles through the items that share it.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{
    dom::{Document, ElementId},
    event::{KeyCode, KeyEvent},
};

/// Default inactivity window that ends a session.
pub const DEFAULT_TYPEAHEAD_DELAY: Duration = Duration::from_millis(200);

/// An item snapshot taken when a session begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadRecord {
    /// Position in the item list.
    pub index: usize,
    /// The item element.
    pub item: ElementId,
    /// Trimmed, lowercased typeahead text.
    pub text: String,
}

/// Does this key end a session without being typed? Anything that moves
/// the tab stop or focus by other means ends the session.
fn is_terminating(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Enter
            | KeyCode::Esc
            | KeyCode::Tab
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::PageUp
            | KeyCode::PageDown
    ) || code.is_arrow()
}

/// Buffered prefix search over a list.
#[derive(Debug)]
pub struct TypeaheadController {
    /// Inactivity window.
    delay: Duration,
    /// Sessions only begin while the owning list is open.
    active: bool,
    /// Is a session in progress?
    typing: bool,
    /// Characters typed so far this session.
    buffer: String,
    /// Snapshot of the items.
    records: Vec<TypeaheadRecord>,
    /// Index into `records` of the last activated record.
    last_active: Option<usize>,
    /// When the session expires.
    deadline: Option<Instant>,
}

impl Default for TypeaheadController {
    fn default() -> Self {
        Self::new(DEFAULT_TYPEAHEAD_DELAY)
    }
}

impl TypeaheadController {
    /// An inactive controller with the given inactivity window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: false,
            typing: false,
            buffer: String::new(),
            records: Vec::new(),
            last_active: None,
            deadline: None,
        }
    }

    /// The inactivity window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the inactivity window. Applies from the next keystroke.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// May a session begin?
    pub fn active(&self) -> bool {
        self.active
    }

    /// Allow or forbid new sessions.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Is a session in progress?
    pub fn is_typing_ahead(&self) -> bool {
        self.typing
    }

    /// The current buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The session snapshot.
    pub fn records(&self) -> &[TypeaheadRecord] {
        &self.records
    }

    /// When the current session expires.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Route a keystroke: begin a session, or continue the current one.
    /// Returns the item activated by this keystroke.
    pub fn on_keydown(
        &mut self,
        doc: &mut Document,
        items: &[ElementId],
        event: &mut KeyEvent,
        now: Instant,
    ) -> Option<ElementId> {
        if self.typing {
            self.typeahead(doc, event, now)
        } else {
            self.begin_typeahead(doc, items, event, now)
        }
    }

    /// Start a session on a printable keystroke. The current tab stop is
    /// remembered and demoted.
    pub fn begin_typeahead(
        &mut self,
        doc: &mut Document,
        items: &[ElementId],
        event: &mut KeyEvent,
        now: Instant,
    ) -> Option<ElementId> {
        if !self.active || self.typing || event.default_prevented() {
            return None;
        }
        if event.is_space() || is_terminating(event.code()) || event.key.printable().is_none() {
            return None;
        }
        self.typing = true;
        self.buffer.clear();
        self.records = items
            .iter()
            .enumerate()
            .map(|(index, &item)| TypeaheadRecord {
                index,
                item,
                text: doc
                    .item(item)
                    .map(|i| i.typeahead_text().trim().to_lowercase())
                    .unwrap_or_default(),
            })
            .collect();
        self.last_active = self.records.iter().position(|r| doc.tab_index(r.item) == 0);
        if let Some(last) = self.last_active {
            doc.set_tab_stop(self.records[last].item, false);
        }
        debug!(records = self.records.len(), "typeahead session started");
        self.typeahead(doc, event, now)
    }

    /// Feed a keystroke into the current session.
    fn typeahead(&mut self, doc: &mut Document, event: &mut KeyEvent, now: Instant) -> Option<ElementId> {
        if event.default_prevented() {
            return None;
        }
        self.deadline = None;
        if is_terminating(event.code()) {
            self.end_typeahead(doc);
            return None;
        }
        let Some(c) = event.key.printable() else {
            self.deadline = Some(now + self.delay);
            return None;
        };
        if event.is_space() {
            event.prevent_default();
        }
        self.deadline = Some(now + self.delay);
        self.buffer.extend(c.to_lowercase());

        let n = self.records.len();
        let rebase = |index: usize| match self.last_active {
            Some(last) => (index + n - self.records[last].index) % n,
            None => index,
        };
        let mut matches: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                doc.item(r.item).is_some_and(|i| !i.disabled()) && r.text.starts_with(&self.buffer)
            })
            .map(|(pos, _)| pos)
            .collect();
        matches.sort_by_key(|&pos| rebase(self.records[pos].index));

        let Some(&best) = matches.first() else {
            trace!(buffer = %self.buffer, "no typeahead match");
            self.end_typeahead(doc);
            return None;
        };
        let fresh = self.buffer.chars().count() == 1;
        let next = if fresh && self.last_active == Some(best) {
            matches.get(1).copied().unwrap_or(best)
        } else {
            best
        };

        for r in &self.records {
            if doc.tab_index(r.item) == 0 {
                doc.set_tab_stop(r.item, false);
            }
        }
        self.last_active = Some(next);
        let item = self.records[next].item;
        doc.set_tab_stop(item, true);
        doc.focus(item);
        trace!(buffer = %self.buffer, ?item, "typeahead match");
        Some(item)
    }

    /// End the session. If no record holds the tab stop afterwards, it goes
    /// back to the last active item.
    pub fn end_typeahead(&mut self, doc: &mut Document) {
        if !self.typing {
            return;
        }
        let holder = self.records.iter().any(|r| doc.tab_index(r.item) == 0);
        if !holder && let Some(last) = self.last_active {
            doc.set_tab_stop(self.records[last].item, true);
        }
        self.typing = false;
        self.buffer.clear();
        self.records.clear();
        self.last_active = None;
        self.deadline = None;
        debug!("typeahead session ended");
    }

    /// End the session if its inactivity window has passed. Returns true if
    /// a session ended.
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.end_typeahead(doc);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{append_items, ms, tab_stops};

    struct Fixture {
        doc: Document,
        items: Vec<ElementId>,
        ta: TypeaheadController,
        now: Instant,
    }

    impl Fixture {
        fn new(labels: &[&str]) -> Self {
            let mut doc = Document::new();
            let host = doc.create_element("ul");
            doc.append_child(doc.body(), host).unwrap();
            let items = append_items(&mut doc, host, labels).unwrap();
            let mut ta = TypeaheadController::default();
            ta.set_active(true);
            Self {
                doc,
                items,
                ta,
                now: Instant::now(),
            }
        }

        fn press(&mut self, key: impl Into<crate::event::Key>) -> Option<ElementId> {
            let mut ev = KeyEvent::new(key);
            self.ta.on_keydown(&mut self.doc, &self.items, &mut ev, self.now)
        }

        fn wait(&mut self, d: Duration) {
            self.now += d;
            self.ta.poll(&mut self.doc, self.now);
        }
    }

    #[test]
    fn repeated_letter_cycles() {
        let mut f = Fixture::new(&["Apple", "Apricot", "Banana"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();

        assert_eq!(f.press('a'), Some(f.items[1]));
        f.wait(ms(250));
        assert!(!f.ta.is_typing_ahead());
        assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[1]]);

        assert_eq!(f.press('a'), Some(f.items[0]));
        f.wait(ms(250));
        assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[0]]);
    }

    #[test]
    fn buffer_accumulates_within_the_window() {
        let mut f = Fixture::new(&["Apple", "Apricot", "Banana"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();
        assert_eq!(f.press('a'), Some(f.items[1]));
        f.now += ms(100);
        assert_eq!(f.press('P'), Some(f.items[1]));
        f.now += ms(100);
        assert_eq!(f.press('p'), Some(f.items[0]));
        assert_eq!(f.ta.buffer(), "app");
        assert_eq!(f.ta.deadline(), Some(f.now + DEFAULT_TYPEAHEAD_DELAY));
    }

    #[test]
    fn no_match_restores_the_tab_stop() {
        let mut f = Fixture::new(&["Apple", "Apricot", "Banana"]);
        f.doc.set_tab_index(f.items[2], 0).unwrap();
        assert_eq!(f.press('z'), None);
        assert!(!f.ta.is_typing_ahead());
        f.wait(ms(250));
        assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[2]]);
    }

    #[test]
    fn disabled_items_never_match() {
        let mut f = Fixture::new(&["Apple", "!Avocado", "Apricot"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();
        assert_eq!(f.press('a'), Some(f.items[2]));
        assert_eq!(f.ta.records()[1].text, "avocado");
    }

    #[test]
    fn terminating_keys_end_the_session() {
        let mut f = Fixture::new(&["Apple", "Banana"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();
        assert_eq!(f.press('b'), Some(f.items[1]));
        assert_eq!(f.press(KeyCode::Down), None);
        assert!(!f.ta.is_typing_ahead());
        assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[1]]);
    }

    #[test]
    fn sessions_need_an_active_controller() {
        let mut f = Fixture::new(&["Apple", "Banana"]);
        f.ta.set_active(false);
        assert_eq!(f.press('b'), None);
        assert!(!f.ta.is_typing_ahead());
    }

    #[test]
    fn space_begins_nothing_but_continues_a_session() {
        let mut f = Fixture::new(&["New York", "Newark"]);
        assert_eq!(f.press(' '), None);
        assert!(!f.ta.is_typing_ahead());

        assert_eq!(f.press('n'), Some(f.items[0]));
        f.press('e');
        f.press('w');
        let mut space = KeyEvent::new(' ');
        assert_eq!(
            f.ta.on_keydown(&mut f.doc, &f.items, &mut space, f.now),
            Some(f.items[0])
        );
        assert!(space.default_prevented());
        assert_eq!(f.ta.buffer(), "new ");
    }

    #[test]
    fn prevented_keys_begin_nothing() {
        let mut f = Fixture::new(&["Apple", "Banana"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();
        let mut ev = KeyEvent::new('b');
        ev.prevent_default();
        assert_eq!(f.ta.on_keydown(&mut f.doc, &f.items, &mut ev, f.now), None);
        assert!(!f.ta.is_typing_ahead());
        assert_eq!(f.ta.deadline(), None);
        assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[0]]);
    }

    #[test]
    fn navigation_keys_end_the_session() {
        for code in [KeyCode::Home, KeyCode::End, KeyCode::PageUp, KeyCode::PageDown, KeyCode::Tab] {
            let mut f = Fixture::new(&["Apple", "Banana"]);
            f.doc.set_tab_index(f.items[0], 0).unwrap();
            assert_eq!(f.press('b'), Some(f.items[1]));
            assert_eq!(f.press(code), None);
            assert!(!f.ta.is_typing_ahead(), "{code} kept the session");
            assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[1]]);
        }
    }

    #[test]
    fn other_keys_keep_the_session() {
        let mut f = Fixture::new(&["Apple", "Banana"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();
        assert_eq!(f.press('b'), Some(f.items[1]));
        f.now += ms(150);
        assert_eq!(f.press(KeyCode::Backspace), None);
        assert!(f.ta.is_typing_ahead());
        assert_eq!(f.ta.deadline(), Some(f.now + DEFAULT_TYPEAHEAD_DELAY));
    }

    #[test]
    fn a_match_demotes_whoever_holds_the_tab_stop() {
        let mut f = Fixture::new(&["Apple", "Banana", "Blueberry", "Cherry"]);
        f.doc.set_tab_index(f.items[0], 0).unwrap();
        assert_eq!(f.press('b'), Some(f.items[1]));
        // Something else moved the tab stop mid-session.
        f.doc.set_tab_stop(f.items[1], false);
        f.doc.set_tab_stop(f.items[3], true);
        assert_eq!(f.press('l'), Some(f.items[2]));
        assert_eq!(tab_stops(&f.doc, &f.items), vec![f.items[2]]);
    }

    #[test]
    fn without_a_tab_stop_matches_in_order() {
        let mut f = Fixture::new(&["Cherry", "Banana", "Blueberry"]);
        assert_eq!(f.press('b'), Some(f.items[1]));
    }
}

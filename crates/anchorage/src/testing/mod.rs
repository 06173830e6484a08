//! Helpers for driving controllers without a real host.

use std::{
    any::Any,
    time::{Duration, Instant},
};

use crate::{
    context::Context,
    dom::{Document, ElementId, ListItem, Viewport},
    error::Result,
};

/// A [`Context`] with a manual clock and an update counter.
#[derive(Debug)]
pub struct Harness {
    /// The document under test.
    pub doc: Document,
    /// The manual clock.
    now: Instant,
    /// Number of update requests seen.
    updates: usize,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// A harness with an empty document and the default viewport.
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            now: Instant::now(),
            updates: 0,
        }
    }

    /// A harness with a scrollbar-free viewport of the given size.
    pub fn with_viewport(width: f64, height: f64) -> Self {
        let mut h = Self::new();
        *h.doc.viewport_mut() = Viewport::new(width, height);
        h
    }

    /// Move the clock forward.
    pub fn advance(&mut self, d: Duration) {
        self.now += d;
    }

    /// How many times a controller asked for a re-render.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl Context for Harness {
    fn doc(&self) -> &Document {
        &self.doc
    }

    fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    fn request_update(&mut self) {
        self.updates += 1;
    }

    async fn update_complete(&mut self) {
        tokio::task::yield_now().await;
    }

    fn now(&self) -> Instant {
        self.now
    }
}

/// A minimal list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    /// Typeahead text.
    pub text: String,
    /// Skipped by navigation when set.
    pub disabled: bool,
    /// Current tab index.
    pub tab_index: i32,
}

impl TestItem {
    /// An enabled item that is not the tab stop.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            disabled: false,
            tab_index: -1,
        }
    }

    /// A disabled item.
    pub fn disabled(text: &str) -> Self {
        Self {
            disabled: true,
            ..Self::new(text)
        }
    }
}

impl ListItem for TestItem {
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
        &self.text
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Append one [`TestItem`] per entry under `parent`. Entries starting with
/// `!` are disabled.
pub fn append_items(doc: &mut Document, parent: ElementId, labels: &[&str]) -> Result<Vec<ElementId>> {
    let mut ids = Vec::with_capacity(labels.len());
    for label in labels {
        let item = match label.strip_prefix('!') {
            Some(text) => TestItem::disabled(text),
            None => TestItem::new(label),
        };
        let id = doc.create_item("test-item", item);
        doc.append_child(parent, id)?;
        ids.push(id);
    }
    Ok(ids)
}

/// The items currently holding the tab stop.
pub fn tab_stops(doc: &Document, items: &[ElementId]) -> Vec<ElementId> {
    items
        .iter()
        .copied()
        .filter(|&id| doc.tab_index(id) == 0)
        .collect()
}

/// Shorthand for a millisecond duration.
pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Send controller logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init()
        .ok();
}

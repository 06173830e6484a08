use std::{future::Future, time::Instant};

use crate::dom::Document;

/// The host environment controllers run in: the document they read and
/// write, the host's update cycle, and the clock.
///
/// Controllers are owned by their host widget and receive the context on
/// every call, so they never hold references into the host.
pub trait Context {
    /// The document.
    fn doc(&self) -> &Document;

    /// Mutable document access.
    fn doc_mut(&mut self) -> &mut Document;

    /// Ask the host to re-render.
    fn request_update(&mut self);

    /// Resolves once the host has completed its next update, so that styles
    /// applied before the call are reflected in layout.
    fn update_complete(&mut self) -> impl Future<Output = ()>;

    /// The current time.
    fn now(&self) -> Instant;
}

use crate::dom::{Document, ElementId};
use crate::event::Event;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::any::Any;

/// Behaviour attached to part of a [`Document`].
///
/// A [`Page`](crate::page::Page) owns a list of behaviours and offers every
/// event to each of them in registration order. Behaviours keep their own
/// state and reach the shared document only through the `doc` argument, so
/// two behaviours never hold references into each other.
///
/// # Example
///
/// ```rust,ignore
/// use drape_core::{Behavior, Document, Event, EventKind};
///
/// struct ClickCounter { clicks: usize }
///
/// impl Behavior for ClickCounter {
///     fn handle_event(&mut self, _doc: &mut Document, event: &mut Event) {
///         if matches!(event.kind(), EventKind::Click) {
///             self.clicks += 1;
///         }
///     }
/// }
/// ```
pub trait Behavior: Any + Send + 'static {
    /// React to an event. Call [`Event::prevent_default`] to suppress the
    /// page's default action.
    fn handle_event(&mut self, doc: &mut Document, event: &mut Event);

    /// Apply work queued from outside (open requests and the like). Called
    /// by the page before every dispatch and by the runtime once per frame.
    /// Returns whether anything was applied.
    fn poll(&mut self, _doc: &mut Document) -> bool {
        false
    }

    /// Subtree this behaviour draws itself in [`render`](Behavior::render).
    /// The page's own document renderer skips it.
    fn root(&self) -> Option<ElementId> {
        None
    }

    /// Draw on top of the document. The default draws nothing.
    fn render(&self, _doc: &Document, _area: Rect, _buf: &mut Buffer) {}
}

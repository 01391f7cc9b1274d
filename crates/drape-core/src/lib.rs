//! Core runtime for the **drape** overlay toolkit.
//!
//! `drape-core` provides the element tree and the plumbing that overlay
//! widgets attach to. A [`Document`] stands in for a web page: elements
//! carry a tag, attributes, classes and a laid-out [`ratatui::layout::Rect`].
//! Widgets implement [`Behavior`] and are hosted by a [`Page`], which routes
//! events to them and runs the default actions (Tab navigation, activation).
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Document`] | Element arena, focus, listeners, stylesheet, transitions |
//! | [`Element`] | Builder and accessors for a single element |
//! | [`Event`] | Keydown, click, transition-end and resize events |
//! | [`Stylesheet`] | [`VisibilityRule`]s deciding which subtrees are displayed |
//! | [`Behavior`] | Trait implemented by widgets attached to a page |
//! | [`Page`] | Hosts a document and its behaviours, dispatches events |
//! | [`Notifier`] | Outbound notification fan-out to [`Subscriber`]s |
//! | [`Requester`] | Cloneable handle for inbound requests |
//! | [`Program`] | Wires a [`Page`] to a real terminal and drives the event loop |
//!
//! # Event flow
//!
//! 1. **input** -- The [`Program`] reads crossterm events and hands them to
//!    [`Page::dispatch_terminal`], which turns them into [`Event`]s aimed at
//!    the focused or clicked element.
//! 2. **dispatch** -- Every behaviour sees the event and may call
//!    [`Event::prevent_default`].
//! 3. **default action** -- Unless prevented, Tab moves focus and Enter
//!    activates the focused control.
//! 4. **transitions** -- Class changes covered by a timed [`VisibilityRule`]
//!    come back later as transition-end events.
//! 5. **render** -- The page draws the document, then lets behaviours draw
//!    on top.
//!
//! # Quick example
//!
//! ```ignore
//! use drape_core::{Document, Element, Page, Tag};
//! use ratatui::layout::Rect;
//!
//! let mut doc = Document::new();
//! doc.append(
//!     doc.body(),
//!     Element::new(Tag::Button).with_text("OK").with_layout(Rect::new(0, 0, 8, 1)),
//! );
//!
//! #[tokio::main]
//! async fn main() -> drape_core::Result<()> {
//!     drape_core::run(Page::new(doc)).await?;
//!     Ok(())
//! }
//! ```

pub mod behavior;
pub mod dom;
pub mod error;
pub mod event;
pub mod listener;
pub mod notify;
pub mod page;
pub mod render;
pub mod runtime;
pub mod stylesheet;
pub mod testing;
pub mod transition;

pub use behavior::Behavior;
pub use dom::{Document, Element, ElementId, Tag};
pub use error::{Error, Result};
pub use event::{Event, EventKind, Navigation, TerminalEvent};
pub use listener::{ListenerId, ListenerKind, Listeners};
pub use notify::{request_channel, Notifier, RequestQueue, Requester, Subscriber};
pub use page::{BehaviorId, Page};
pub use render::DocumentView;
pub use runtime::{run, run_with, Program, ProgramOptions};
pub use stylesheet::{Stylesheet, VisibilityRule};

//! **drape** -- Focus-trapping dialogs and drawers for [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything you need to build a
//! drape page from a single dependency:
//!
//! ```toml
//! [dependencies]
//! drape = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`drape_core`] are available at the crate root
//!   ([`Document`], [`Element`], [`Page`], [`Behavior`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`drape_widgets`]
//!   ([`Dialog`](widgets::Dialog), [`Sidebar`](widgets::Sidebar) and the
//!   [`Overlay`](widgets::Overlay) they share).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use drape::widgets::{dialog, Dialog};
//! use drape::{Document, Element, Page, Tag};
//! use drape::ratatui::layout::Rect;
//!
//! #[tokio::main]
//! async fn main() -> drape::Result<()> {
//!     let mut doc = Document::new();
//!     let body = doc.body();
//!     doc.append(
//!         body,
//!         Element::new(Tag::Button)
//!             .with_attr("aria-controls", "hello")
//!             .with_text("Open")
//!             .with_layout(Rect::new(2, 1, 10, 1)),
//!     );
//!     let hello = doc.append(
//!         body,
//!         Element::new(Tag::Div)
//!             .with_id("hello")
//!             .with_attr("aria-label", "Hello, drape!")
//!             .with_layout(Rect::new(4, 3, 30, 5)),
//!     );
//!     doc.append(
//!         hello,
//!         Element::new(Tag::Button)
//!             .with_class(dialog::CLOSE_CLASS)
//!             .with_text("Close")
//!             .with_layout(Rect::new(6, 5, 12, 1)),
//!     );
//!
//!     let mut page = Page::new(doc);
//!     let dialog = Dialog::attach(page.document_mut(), "hello")?;
//!     page.add(dialog);
//!     drape::run(page).await?;
//!     Ok(())
//! }
//! ```

pub use drape_core::*;
pub mod widgets {
    pub use drape_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;

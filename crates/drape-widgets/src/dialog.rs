//! Modal dialog: an [`Overlay`] on a `js-dialog` container, drawn as a
//! bordered box over the page while open.
//!
//! # Markup
//!
//! ```rust,ignore
//! let dialog = doc.append(
//!     body,
//!     Element::new(Tag::Div)
//!         .with_id("confirm")
//!         .with_class(dialog::CONTAINER_CLASS)
//!         .with_attr("aria-label", "Delete file?")
//!         .with_layout(Rect::new(10, 5, 40, 8)),
//! );
//! doc.append(dialog, Element::new(Tag::Button).with_class(dialog::CLOSE_CLASS).with_text("Cancel"));
//! doc.append(body, Element::new(Tag::Button).with_attr("aria-controls", "confirm").with_text("Delete"));
//!
//! let dialog = Dialog::attach(&mut doc, "confirm")?;
//! ```

use crate::overlay::{
    render_panel, OpenRequester, Overlay, OverlayNotice, OverlayOptions, OverlayStyle,
};
use drape_core::{
    Behavior, Document, Element, ElementId, Error, Event, Result, Subscriber, VisibilityRule,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Class marking dialog containers.
pub const CONTAINER_CLASS: &str = "js-dialog";
/// Class present while the dialog is shown.
pub const VISIBLE_CLASS: &str = "dialog--is-visible";
/// Class marking controls that close the dialog.
pub const CLOSE_CLASS: &str = "js-dialog__close";

/// A modal dialog.
///
/// Any element whose `aria-controls` names the container opens it. While
/// open, Tab and Shift+Tab cycle between the first and last tabbable
/// controls, Escape or a `js-dialog__close` control closes it and focus
/// returns to the trigger. Clicks on the area around the content do not
/// close a dialog.
pub struct Dialog {
    overlay: Overlay,
    style: OverlayStyle,
}

impl Dialog {
    /// Options every dialog uses.
    pub fn options() -> OverlayOptions {
        OverlayOptions {
            visible_class: VISIBLE_CLASS.into(),
            close_class: CLOSE_CLASS.into(),
            ..OverlayOptions::default()
        }
    }

    /// Turn `container` into a dialog.
    ///
    /// The container gets the `js-dialog` class if it lacks it, and the
    /// stylesheet a rule hiding closed dialogs unless one is already there.
    pub fn new(doc: &mut Document, container: ElementId) -> Self {
        if !doc.stylesheet().has_rule(CONTAINER_CLASS) {
            doc.stylesheet_mut()
                .insert(VisibilityRule::new(CONTAINER_CLASS, VISIBLE_CLASS));
        }
        doc.add_class(container, CONTAINER_CLASS);
        Self {
            overlay: Overlay::new(doc, container, Self::options()),
            style: OverlayStyle::default(),
        }
    }

    /// Turn the element with `id` into a dialog.
    pub fn attach(doc: &mut Document, id: &str) -> Result<Self> {
        let container = doc
            .find_by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        Ok(Self::new(doc, container))
    }

    /// A dialog for every `js-dialog` element in the document.
    pub fn attach_all(doc: &mut Document) -> Vec<Self> {
        doc.query(|e: &Element| e.has_class(CONTAINER_CLASS))
            .into_iter()
            .map(|container| Self::new(doc, container))
            .collect()
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn open(&mut self, doc: &mut Document, trigger: Option<ElementId>) {
        self.overlay.open(doc, trigger);
    }

    pub fn close(&mut self, doc: &mut Document) {
        self.overlay.close(doc);
    }

    pub fn subscribe(&mut self) -> Subscriber<OverlayNotice> {
        self.overlay.subscribe()
    }

    pub fn requester(&self) -> OpenRequester {
        self.overlay.requester()
    }
}

impl Behavior for Dialog {
    fn handle_event(&mut self, doc: &mut Document, event: &mut Event) {
        self.overlay.handle_event(doc, event);
    }

    fn poll(&mut self, doc: &mut Document) -> bool {
        self.overlay.poll(doc)
    }

    fn root(&self) -> Option<ElementId> {
        Some(self.overlay.container())
    }

    fn render(&self, doc: &Document, area: Rect, buf: &mut Buffer) {
        render_panel(doc, self.overlay.container(), &self.style, true, area, buf);
    }
}

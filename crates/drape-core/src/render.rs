//! Plain-text renderer for document subtrees.

use crate::dom::{Document, ElementId, Tag};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// Draws every rendered element with text at its box.
///
/// Buttons are centred and bracketed, disabled controls are dimmed and the
/// focused element uses the focus style. Elements inside an excluded subtree
/// are left to whoever excluded them.
pub struct DocumentView<'a> {
    doc: &'a Document,
    root: ElementId,
    exclude: Vec<ElementId>,
    style: Style,
    focus_style: Style,
}

impl<'a> DocumentView<'a> {
    /// Render the whole document.
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            root: doc.body(),
            exclude: Vec::new(),
            style: Style::default(),
            focus_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Render only the subtree under `root` (excluding `root` itself).
    pub fn root(mut self, root: ElementId) -> Self {
        self.root = root;
        self
    }

    /// Skip the subtrees rooted at `ids`.
    pub fn exclude(mut self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        self.exclude.extend(ids);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn focus_style(mut self, style: Style) -> Self {
        self.focus_style = style;
        self
    }

    fn excluded(&self, id: ElementId) -> bool {
        self.exclude.iter().any(|root| self.doc.contains(*root, id))
    }
}

impl Widget for DocumentView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let active = self.doc.active_element();
        for id in self.doc.descendants(self.root) {
            if self.excluded(id) || !self.doc.is_rendered(id) {
                continue;
            }
            let Some(element) = self.doc.get(id) else {
                continue;
            };
            if element.text().is_empty() {
                continue;
            }
            let clip = element.layout().intersection(area);
            if clip.is_empty() {
                continue;
            }
            let label = match element.tag() {
                Tag::Button => format!("[ {} ]", element.text()),
                _ => element.text().to_string(),
            };
            let mut style = self.style;
            if element.is_disabled() {
                style = style.add_modifier(Modifier::DIM);
            }
            if active == Some(id) {
                style = style.patch(self.focus_style);
            }
            let width = u16::try_from(label.width()).unwrap_or(u16::MAX);
            let x = if element.tag() == Tag::Button {
                clip.x + clip.width.saturating_sub(width) / 2
            } else {
                clip.x
            };
            let max = (clip.right().saturating_sub(x)) as usize;
            buf.set_stringn(x, clip.y, &label, max, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn draws_text_at_layout() {
        let mut doc = Document::new();
        doc.append(
            doc.body(),
            Element::new(Tag::Paragraph)
                .with_text("hello")
                .with_layout(Rect::new(2, 1, 10, 1)),
        );
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        DocumentView::new(&doc).render(area, &mut buf);
        assert_eq!(row(&buf, 1).trim_end(), "  hello");
    }

    #[test]
    fn buttons_are_bracketed_and_centred() {
        let mut doc = Document::new();
        doc.append(
            doc.body(),
            Element::new(Tag::Button)
                .with_text("OK")
                .with_layout(Rect::new(0, 0, 10, 1)),
        );
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        DocumentView::new(&doc).render(area, &mut buf);
        assert_eq!(row(&buf, 0), "  [ OK ]  ");
    }

    #[test]
    fn oversized_label_starts_at_box_edge() {
        let mut doc = Document::new();
        // Label width is u16::MAX + 5 columns.
        doc.append(
            doc.body(),
            Element::new(Tag::Button)
                .with_text("x".repeat(usize::from(u16::MAX) + 1))
                .with_layout(Rect::new(0, 0, 10, 1)),
        );
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        DocumentView::new(&doc).render(area, &mut buf);
        assert_eq!(row(&buf, 0), "[ xxxxxxxx");
    }

    #[test]
    fn excluded_subtree_is_skipped() {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), Element::new(Tag::Div).with_layout(Rect::new(0, 0, 8, 1)));
        doc.append(
            panel,
            Element::new(Tag::Span)
                .with_text("secret")
                .with_layout(Rect::new(0, 0, 8, 1)),
        );
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        DocumentView::new(&doc).exclude([panel]).render(area, &mut buf);
        assert_eq!(row(&buf, 0).trim(), "");
    }
}

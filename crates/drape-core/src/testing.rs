//! Helpers for driving a [`Page`] headlessly in tests.
//!
//! Event constructors build the [`TerminalEvent`]s a real terminal would
//! deliver, and the render helpers draw a page into an in-memory
//! [`Buffer`] -- no tokio runtime or TTY required.
//!
//! ```rust,ignore
//! use drape_core::testing::{render_string, tab};
//!
//! page.dispatch_terminal(tab());
//! assert!(render_string(&page, 40, 10).contains("[ OK ]"));
//! ```

use crate::event::TerminalEvent;
use crate::page::Page;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// A key press without modifiers.
pub fn key(code: KeyCode) -> TerminalEvent {
    TerminalEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// A key press with modifiers.
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> TerminalEvent {
    TerminalEvent::Key(KeyEvent::new(code, modifiers))
}

pub fn tab() -> TerminalEvent {
    key(KeyCode::Tab)
}

/// Shift+Tab as most terminals report it.
pub fn shift_tab() -> TerminalEvent {
    key_with(KeyCode::BackTab, KeyModifiers::SHIFT)
}

pub fn escape() -> TerminalEvent {
    key(KeyCode::Esc)
}

/// Left button press at (column, row).
pub fn left_click(column: u16, row: u16) -> TerminalEvent {
    TerminalEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

/// Render `page` into a fresh buffer of the given size.
pub fn render_buffer(page: &Page, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    page.render(area, &mut buf);
    buf
}

/// Render `page` and return the visible content as a plain string.
///
/// Each row of the buffer is concatenated into a line; rows are separated
/// by newlines.  Trailing whitespace within each row is preserved.
pub fn render_string(page: &Page, width: u16, height: u16) -> String {
    let buf = render_buffer(page, width, height);
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y < area.bottom() - 1 {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element, Tag};

    #[test]
    fn render_string_has_one_line_per_row() {
        let page = Page::new(Document::new());
        let out = render_string(&page, 4, 3);
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().all(|l| l == "    "));
    }

    #[test]
    fn render_string_shows_text() {
        let mut doc = Document::new();
        doc.append(
            doc.body(),
            Element::new(Tag::Heading)
                .with_text("Title")
                .with_layout(Rect::new(0, 1, 10, 1)),
        );
        let out = render_string(&Page::new(doc), 10, 2);
        assert_eq!(out.lines().nth(1).map(str::trim_end), Some("Title"));
    }

    #[test]
    fn shift_tab_is_backtab() {
        match shift_tab() {
            TerminalEvent::Key(k) => assert_eq!(k.code, KeyCode::BackTab),
            other => panic!("unexpected {other:?}"),
        }
    }
}

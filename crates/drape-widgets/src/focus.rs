//! Focus bounds of a container and the Tab-cycle trap built on them.

use drape_core::{Document, ElementId, Event, Navigation};

/// First and last tabbable descendants of a container, in document order.
///
/// Both are `None` when the container holds nothing tabbable, in which case
/// [`FocusScope::trap`] never matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusBounds {
    pub first: Option<ElementId>,
    pub last: Option<ElementId>,
}

impl FocusBounds {
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Whether both ends are still attached and rendered in `doc`.
    pub fn is_current(&self, doc: &Document) -> bool {
        [self.first, self.last]
            .into_iter()
            .flatten()
            .all(|id| doc.is_rendered(id))
    }
}

/// Stateless helper computing and enforcing [`FocusBounds`].
pub struct FocusScope;

impl FocusScope {
    /// Interactive descendants of `container` that are rendered, reduced to
    /// the first and last in document order.
    ///
    /// Call this on every open: contents and layout may change while the
    /// container is hidden.
    pub fn compute_bounds(doc: &Document, container: ElementId) -> FocusBounds {
        let mut candidates = doc
            .descendants(container)
            .into_iter()
            .filter(|id| doc.get(*id).is_some_and(|e| e.is_interactive()) && doc.is_rendered(*id));
        let first = candidates.next();
        let last = candidates.last().or(first);
        FocusBounds { first, last }
    }

    /// Apply the Tab-cycle rule to a keydown `event`.
    ///
    /// Backward navigation on `first` focuses `last`; forward navigation on
    /// `last` focuses `first`. Both prevent the default action. Any other key
    /// or focus position passes through untouched. Returns whether the event
    /// was trapped.
    pub fn trap(doc: &mut Document, bounds: &FocusBounds, event: &mut Event) -> bool {
        let (Some(first), Some(last)) = (bounds.first, bounds.last) else {
            return false;
        };
        let Some(direction) = event.navigation() else {
            return false;
        };
        let active = doc.active_element();
        let target = match direction {
            Navigation::Backward if active == Some(first) => last,
            Navigation::Forward if active == Some(last) => first,
            _ => return false,
        };
        event.prevent_default();
        log::trace!("focus trap wraps {direction:?} to {target:?}");
        doc.focus(target);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use drape_core::{Element, Tag};
    use ratatui::layout::Rect;

    fn boxed(tag: Tag, row: u16) -> Element {
        Element::new(tag).with_layout(Rect::new(0, row, 10, 1))
    }

    /// Container with [A(link), B(disabled button), C(input)].
    fn link_button_input() -> (Document, ElementId, [ElementId; 3]) {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), boxed(Tag::Div, 0).with_id("panel"));
        let a = doc.append(panel, boxed(Tag::A, 0).with_attr("href", "#top"));
        let b = doc.append(panel, boxed(Tag::Button, 1).disabled());
        let c = doc.append(panel, boxed(Tag::Input, 2));
        (doc, panel, [a, b, c])
    }

    fn tab_on(target: ElementId) -> Event {
        Event::keydown(target, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE))
    }

    fn shift_tab_on(target: ElementId) -> Event {
        Event::keydown(target, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
    }

    #[test]
    fn disabled_controls_are_skipped() {
        let (doc, panel, [a, _, c]) = link_button_input();
        let bounds = FocusScope::compute_bounds(&doc, panel);
        assert_eq!(bounds.first, Some(a));
        assert_eq!(bounds.last, Some(c));
    }

    #[test]
    fn unrendered_elements_are_skipped() {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), boxed(Tag::Div, 0));
        doc.append(panel, Element::new(Tag::Button));
        let visible = doc.append(panel, boxed(Tag::Button, 1));
        let inline = doc.append(panel, Element::new(Tag::Input).with_client_rect(Rect::new(0, 2, 4, 1)));
        let bounds = FocusScope::compute_bounds(&doc, panel);
        assert_eq!(bounds.first, Some(visible));
        assert_eq!(bounds.last, Some(inline));
    }

    #[test]
    fn negative_tabindex_is_not_tabbable() {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), boxed(Tag::Div, 0));
        doc.append(panel, boxed(Tag::Div, 0).with_tabindex(-1));
        let zero = doc.append(panel, boxed(Tag::Div, 1).with_tabindex(0));
        let summary = doc.append(panel, boxed(Tag::Summary, 2));
        let bounds = FocusScope::compute_bounds(&doc, panel);
        assert_eq!(bounds, FocusBounds { first: Some(zero), last: Some(summary) });
    }

    #[test]
    fn single_focusable_is_both_ends() {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), boxed(Tag::Div, 0));
        let only = doc.append(panel, boxed(Tag::Button, 0));
        let bounds = FocusScope::compute_bounds(&doc, panel);
        assert_eq!(bounds.first, Some(only));
        assert_eq!(bounds.last, Some(only));
    }

    #[test]
    fn empty_container_has_no_bounds() {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), boxed(Tag::Div, 0));
        doc.append(panel, boxed(Tag::Paragraph, 0).with_text("nothing to focus"));
        let bounds = FocusScope::compute_bounds(&doc, panel);
        assert!(bounds.is_empty());
        let mut ev = tab_on(doc.body());
        assert!(!FocusScope::trap(&mut doc, &bounds, &mut ev));
        assert!(!ev.default_prevented());
    }

    #[test]
    fn tab_on_last_wraps_to_first() {
        let (mut doc, panel, [a, _, c]) = link_button_input();
        let bounds = FocusScope::compute_bounds(&doc, panel);
        doc.focus(c);
        let mut ev = tab_on(c);
        assert!(FocusScope::trap(&mut doc, &bounds, &mut ev));
        assert!(ev.default_prevented());
        assert_eq!(doc.active_element(), Some(a));
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        let (mut doc, panel, [a, _, c]) = link_button_input();
        let bounds = FocusScope::compute_bounds(&doc, panel);
        doc.focus(a);
        let mut ev = shift_tab_on(a);
        assert!(FocusScope::trap(&mut doc, &bounds, &mut ev));
        assert_eq!(doc.active_element(), Some(c));
    }

    #[test]
    fn interior_tab_passes_through() {
        let (mut doc, panel, [a, _, c]) = link_button_input();
        let bounds = FocusScope::compute_bounds(&doc, panel);
        doc.focus(a);
        let mut forward = tab_on(a);
        assert!(!FocusScope::trap(&mut doc, &bounds, &mut forward));
        assert!(!forward.default_prevented());

        doc.focus(c);
        let mut backward = shift_tab_on(c);
        assert!(!FocusScope::trap(&mut doc, &bounds, &mut backward));
        assert_eq!(doc.active_element(), Some(c));
    }

    #[test]
    fn other_keys_pass_through() {
        let (mut doc, panel, [_, _, c]) = link_button_input();
        let bounds = FocusScope::compute_bounds(&doc, panel);
        doc.focus(c);
        let mut ev = Event::keydown(c, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(!FocusScope::trap(&mut doc, &bounds, &mut ev));
        assert_eq!(doc.active_element(), Some(c));
    }

    #[test]
    fn bounds_go_stale_when_removed() {
        let (mut doc, panel, [a, _, _]) = link_button_input();
        let bounds = FocusScope::compute_bounds(&doc, panel);
        assert!(bounds.is_current(&doc));
        doc.remove(a);
        assert!(!bounds.is_current(&doc));
    }
}

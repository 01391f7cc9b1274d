//! The page host: a document plus the behaviours attached to it.

use crate::behavior::Behavior;
use crate::dom::{Document, Element, ElementId, Tag};
use crate::event::{Event, EventKind, Navigation, TerminalEvent};
use crate::render::DocumentView;
use crossterm::event::{KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::Widget;
use ratatui::Frame;
use std::any::Any;
use std::time::Instant;

/// Handle returned by [`Page::add`], used to reach a behaviour again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BehaviorId(usize);

/// Owns a [`Document`] and routes events to its [`Behavior`]s.
///
/// Dispatch is synchronous: [`dispatch`](Page::dispatch) polls every
/// behaviour for queued work, offers the event to each behaviour in
/// registration order and then runs the default action unless a handler
/// prevented it. Default actions are sequential focus navigation for Tab and
/// Shift+Tab, and activation (a synthesized click) for Enter on buttons,
/// links and summaries, and Space on buttons.
///
/// # Example
///
/// ```rust,ignore
/// let mut page = Page::new(doc);
/// let dialog = page.add(Dialog::attach(page.document_mut(), "confirm")?);
/// page.dispatch(Event::click(trigger));
/// assert!(page.get::<Dialog>(dialog).is_some_and(Dialog::is_open));
/// ```
pub struct Page {
    document: Document,
    behaviors: Vec<Box<dyn Behavior>>,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            behaviors: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Attach a behaviour. It sees every event dispatched from now on.
    pub fn add<B: Behavior>(&mut self, behavior: B) -> BehaviorId {
        self.behaviors.push(Box::new(behavior));
        BehaviorId(self.behaviors.len() - 1)
    }

    /// The behaviour behind `id`, if it has type `B`.
    pub fn get<B: Behavior>(&self, id: BehaviorId) -> Option<&B> {
        let behavior: &dyn Behavior = &**self.behaviors.get(id.0)?;
        let behavior: &dyn Any = behavior;
        behavior.downcast_ref()
    }

    /// Run `f` with the behaviour behind `id` and the document.
    pub fn with<B: Behavior, R>(
        &mut self,
        id: BehaviorId,
        f: impl FnOnce(&mut B, &mut Document) -> R,
    ) -> Option<R> {
        let behavior: &mut dyn Behavior = &mut **self.behaviors.get_mut(id.0)?;
        let behavior: &mut dyn Any = behavior;
        let behavior = behavior.downcast_mut::<B>()?;
        Some(f(behavior, &mut self.document))
    }

    /// Let every behaviour apply queued external requests. Returns whether
    /// any behaviour applied something.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        for behavior in &mut self.behaviors {
            applied |= behavior.poll(&mut self.document);
        }
        applied
    }

    /// Route `event` through all behaviours, then run its default action.
    /// Returns the event as handlers left it.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        self.poll();
        let target = event.target();
        let tag = self.document.get(target).map_or("?", |e| e.tag().name());
        log::trace!("dispatch {:?} -> <{tag}> {target:?}", event.kind());
        for behavior in &mut self.behaviors {
            behavior.handle_event(&mut self.document, &mut event);
        }
        if !event.default_prevented() {
            self.default_action(&event);
        }
        event
    }

    /// Translate raw terminal input and dispatch it.
    ///
    /// Key presses target the active element (or the body). A left button
    /// press focuses the closest focusable element under the pointer before
    /// dispatching a click to the hit element. Resizes go to the body.
    pub fn dispatch_terminal(&mut self, event: TerminalEvent) -> Option<Event> {
        let event = match event {
            TerminalEvent::Key(key) if key.kind != KeyEventKind::Release => {
                let target = self
                    .document
                    .active_element()
                    .unwrap_or(self.document.body());
                Event::keydown(target, key)
            }
            TerminalEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let pos = Position::new(mouse.column, mouse.row);
                let target = self
                    .document
                    .element_at(pos)
                    .unwrap_or(self.document.body());
                match self.document.closest(target, Element::is_focusable) {
                    Some(focusable) => {
                        self.document.focus(focusable);
                    }
                    None => self.document.blur(),
                }
                Event::click(target)
            }
            TerminalEvent::Resize(width, height) => {
                Event::resize(self.document.body(), width, height)
            }
            _ => return None,
        };
        Some(self.dispatch(event))
    }

    /// Dispatch transition-end events for transitions due at `now`.
    pub fn fire_due_transitions(&mut self, now: Instant) -> usize {
        let due = self.document.take_due_transitions(now);
        let fired = due.len();
        for element in due {
            self.dispatch(Event::transition_end(element));
        }
        fired
    }

    /// Finish every pending transition immediately.
    pub fn finish_transitions(&mut self) -> usize {
        let all = self.document.take_all_transitions();
        let fired = all.len();
        for element in all {
            self.dispatch(Event::transition_end(element));
        }
        fired
    }

    /// Draw the document, then let each behaviour draw on top.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let owned: Vec<ElementId> = self.behaviors.iter().filter_map(|b| b.root()).collect();
        DocumentView::new(&self.document)
            .exclude(owned)
            .render(area, buf);
        for behavior in &self.behaviors {
            behavior.render(&self.document, area, buf);
        }
    }

    /// Render into a ratatui frame.
    pub fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        self.render(area, frame.buffer_mut());
    }

    fn default_action(&mut self, event: &Event) {
        if let Some(direction) = event.navigation() {
            self.document
                .focus_sequential(direction == Navigation::Forward);
            return;
        }
        if let EventKind::Keydown(key) = event.kind() {
            let target = event.target();
            let activates = self.document.get(target).is_some_and(|e| match key.code {
                KeyCode::Enter => e.is_activatable(),
                KeyCode::Char(' ') => e.is_activatable() && e.tag() == Tag::Button,
                _ => false,
            });
            if activates {
                self.dispatch(Event::click(target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, left_click, render_string, shift_tab, tab};

    #[derive(Default)]
    struct Recorder {
        clicks: Vec<ElementId>,
        keys: usize,
        swallow_tab: bool,
    }

    impl Behavior for Recorder {
        fn handle_event(&mut self, _doc: &mut Document, event: &mut Event) {
            match event.kind() {
                EventKind::Click => self.clicks.push(event.target()),
                EventKind::Keydown(_) => {
                    self.keys += 1;
                    if self.swallow_tab && event.navigation().is_some() {
                        event.prevent_default();
                    }
                }
                _ => {}
            }
        }
    }

    fn page_with_buttons() -> (Page, ElementId, ElementId) {
        let mut doc = Document::new();
        let a = doc.append(
            doc.body(),
            Element::new(Tag::Button).with_text("A").with_layout(Rect::new(0, 0, 6, 1)),
        );
        let b = doc.append(
            doc.body(),
            Element::new(Tag::Button).with_text("B").with_layout(Rect::new(0, 1, 6, 1)),
        );
        (Page::new(doc), a, b)
    }

    #[test]
    fn tab_moves_focus_by_default() {
        let (mut page, a, b) = page_with_buttons();
        page.dispatch_terminal(tab());
        assert_eq!(page.document().active_element(), Some(a));
        page.dispatch_terminal(tab());
        assert_eq!(page.document().active_element(), Some(b));
        page.dispatch_terminal(shift_tab());
        assert_eq!(page.document().active_element(), Some(a));
    }

    #[test]
    fn prevented_tab_keeps_focus() {
        let (mut page, a, _) = page_with_buttons();
        page.add(Recorder {
            swallow_tab: true,
            ..Recorder::default()
        });
        page.document_mut().focus(a);
        let ev = page.dispatch_terminal(tab());
        assert!(ev.is_some_and(|e| e.default_prevented()));
        assert_eq!(page.document().active_element(), Some(a));
    }

    #[test]
    fn enter_activates_focused_button() {
        let (mut page, _, b) = page_with_buttons();
        let rec = page.add(Recorder::default());
        page.document_mut().focus(b);
        page.dispatch_terminal(key(KeyCode::Enter));
        assert_eq!(page.get::<Recorder>(rec).map(|r| r.clicks.clone()), Some(vec![b]));
    }

    #[test]
    fn mouse_click_focuses_and_targets_hit_element() {
        let (mut page, _, b) = page_with_buttons();
        let rec = page.add(Recorder::default());
        page.dispatch_terminal(left_click(2, 1));
        assert_eq!(page.document().active_element(), Some(b));
        assert_eq!(page.get::<Recorder>(rec).map(|r| r.clicks.clone()), Some(vec![b]));
    }

    #[test]
    fn key_release_is_ignored() {
        let (mut page, _, _) = page_with_buttons();
        let mut release = crossterm::event::KeyEvent::new(KeyCode::Tab, crossterm::event::KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(page.dispatch_terminal(TerminalEvent::Key(release)).is_none());
        assert_eq!(page.document().active_element(), None);
    }

    #[test]
    fn with_reaches_typed_behavior() {
        let (mut page, _, _) = page_with_buttons();
        let rec = page.add(Recorder::default());
        let keys = page.with(rec, |r: &mut Recorder, _doc| {
            r.keys = 41;
            r.keys + 1
        });
        assert_eq!(keys, Some(42));
    }

    #[test]
    fn renders_document() {
        let (page, _, _) = page_with_buttons();
        let out = render_string(&page, 6, 2);
        assert!(out.contains("[ A ]"));
        assert!(out.contains("[ B ]"));
    }
}

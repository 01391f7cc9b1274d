use crate::dom::ElementId;
use crate::listener::ListenerKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

/// Raw terminal input as read by the runtime.
///
/// Each variant wraps the corresponding [`crossterm::event::Event`] payload.
/// [`Page::dispatch_terminal`](crate::page::Page::dispatch_terminal) turns
/// these into targeted [`Event`]s: key presses go to the active element,
/// left clicks to the element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl From<crossterm::event::Event> for TerminalEvent {
    fn from(event: crossterm::event::Event) -> Self {
        match event {
            crossterm::event::Event::Key(k) => TerminalEvent::Key(k),
            crossterm::event::Event::Mouse(m) => TerminalEvent::Mouse(m),
            crossterm::event::Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            crossterm::event::Event::FocusGained => TerminalEvent::FocusGained,
            crossterm::event::Event::FocusLost => TerminalEvent::FocusLost,
            crossterm::event::Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}

/// What happened, independent of where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A key press.
    Keydown(KeyEvent),
    /// Primary activation: a left click or a synthesized activation from
    /// Enter/Space.
    Click,
    /// A stylesheet transition on the target finished.
    TransitionEnd,
    /// The viewport changed size.
    Resize { width: u16, height: u16 },
}

impl EventKind {
    /// The listener kind that hears this event.
    pub fn listener_kind(&self) -> ListenerKind {
        match self {
            EventKind::Keydown(_) => ListenerKind::Keydown,
            EventKind::Click => ListenerKind::Click,
            EventKind::TransitionEnd => ListenerKind::TransitionEnd,
            EventKind::Resize { .. } => ListenerKind::Resize,
        }
    }
}

/// Direction of sequential focus navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Forward,
    Backward,
}

/// A targeted event travelling through the page.
///
/// Handlers may call [`prevent_default`](Event::prevent_default) to suppress
/// the page's default action (sequential Tab navigation, Enter activation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    target: ElementId,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            default_prevented: false,
        }
    }

    pub fn keydown(target: ElementId, key: KeyEvent) -> Self {
        Self::new(EventKind::Keydown(key), target)
    }

    pub fn click(target: ElementId) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn transition_end(target: ElementId) -> Self {
        Self::new(EventKind::TransitionEnd, target)
    }

    pub fn resize(target: ElementId, width: u16, height: u16) -> Self {
        Self::new(EventKind::Resize { width, height }, target)
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The key, for keydown events.
    pub fn key(&self) -> Option<&KeyEvent> {
        match &self.kind {
            EventKind::Keydown(key) => Some(key),
            _ => None,
        }
    }

    /// Tab moves forward; Shift+Tab (reported as `BackTab` by most
    /// terminals) moves backward.
    pub fn navigation(&self) -> Option<Navigation> {
        let key = self.key()?;
        match key.code {
            KeyCode::BackTab => Some(Navigation::Backward),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Navigation::Backward)
            }
            KeyCode::Tab => Some(Navigation::Forward),
            _ => None,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

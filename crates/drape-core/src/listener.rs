//! Registry of element listeners.
//!
//! Widgets register a listener for every event kind they react to and keep
//! the returned [`ListenerId`]. A listener hears an event when its element
//! contains the event target (see [`Document::listener_hears`]). Detaching
//! the id is the only way to stop listening, which keeps listener lifetime
//! explicit and owned by the widget that attached it.
//!
//! [`Document::listener_hears`]: crate::dom::Document::listener_hears

use crate::dom::ElementId;
use std::collections::HashMap;

/// Identity of a registered listener. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event kinds a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Keydown,
    Click,
    TransitionEnd,
    Resize,
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    element: ElementId,
    kind: ListenerKind,
}

/// Active listeners keyed by id.
#[derive(Debug, Default)]
pub struct Listeners {
    next: u64,
    active: HashMap<ListenerId, Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its id.
    pub fn attach(&mut self, element: ElementId, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.active.insert(id, Listener { element, kind });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        self.active.remove(&id).is_some()
    }

    /// Element and kind of a registered listener.
    pub fn get(&self, id: ListenerId) -> Option<(ElementId, ListenerKind)> {
        self.active.get(&id).map(|l| (l.element, l.kind))
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.active.contains_key(&id)
    }

    /// Number of listeners registered on `element`.
    pub fn count_on(&self, element: ElementId) -> usize {
        self.active.values().filter(|l| l.element == element).count()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

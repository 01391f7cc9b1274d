//! One-shot transition deadlines.
//!
//! Each element has at most one pending transition; rescheduling replaces
//! the earlier deadline, so a transition-end fires once per visibility
//! change that is still current.

use crate::dom::ElementId;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct Transitions {
    pending: Vec<(ElementId, Instant)>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a transition end for `element` at `due`.
    pub fn schedule(&mut self, element: ElementId, due: Instant) {
        self.pending.retain(|(e, _)| *e != element);
        self.pending.push((element, due));
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, due)| *due).min()
    }

    /// Remove and return the transitions due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ElementId> {
        let mut due: Vec<(ElementId, Instant)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, at)| *at);
        due.into_iter().map(|(e, _)| e).collect()
    }

    /// Remove and return every pending transition, earliest first.
    pub fn take_all(&mut self) -> Vec<ElementId> {
        let mut all = std::mem::take(&mut self.pending);
        all.sort_by_key(|(_, at)| *at);
        all.into_iter().map(|(e, _)| e).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element, Tag};
    use std::time::Duration;

    #[test]
    fn reschedule_replaces_deadline() {
        let mut doc = Document::new();
        let a = doc.append(doc.body(), Element::new(Tag::Div));
        let now = Instant::now();
        let mut t = Transitions::new();
        t.schedule(a, now + Duration::from_secs(10));
        t.schedule(a, now + Duration::from_millis(1));
        assert_eq!(t.len(), 1);
        assert_eq!(t.next_deadline(), Some(now + Duration::from_millis(1)));
    }

    #[test]
    fn take_due_leaves_future_entries() {
        let mut doc = Document::new();
        let a = doc.append(doc.body(), Element::new(Tag::Div));
        let b = doc.append(doc.body(), Element::new(Tag::Div));
        let now = Instant::now();
        let mut t = Transitions::new();
        t.schedule(a, now);
        t.schedule(b, now + Duration::from_secs(60));
        assert_eq!(t.take_due(now), vec![a]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.take_all(), vec![b]);
        assert!(t.is_empty());
    }
}

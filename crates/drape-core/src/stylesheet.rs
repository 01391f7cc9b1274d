//! Class-driven visibility rules.
//!
//! The stylesheet is the only consumer of overlay visibility classes: a
//! [`VisibilityRule`] hides every element carrying its scope class unless the
//! element also carries one of the rule's visible classes. A rule may declare
//! a transition; toggling a visible class on a scoped element then schedules
//! a transition-end event for it.

use crate::dom::Element;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    scope_class: String,
    visible_classes: Vec<String>,
    transition: Option<Duration>,
}

impl VisibilityRule {
    /// Hide `scope_class` elements unless they carry `visible_class`.
    pub fn new(scope_class: impl Into<String>, visible_class: impl Into<String>) -> Self {
        Self {
            scope_class: scope_class.into(),
            visible_classes: vec![visible_class.into()],
            transition: None,
        }
    }

    /// Another class that also reveals scoped elements.
    pub fn with_visible_class(mut self, class: impl Into<String>) -> Self {
        self.visible_classes.push(class.into());
        self
    }

    /// Animate visibility changes over `duration`.
    pub fn with_transition(mut self, duration: Duration) -> Self {
        self.transition = Some(duration);
        self
    }

    pub fn scope_class(&self) -> &str {
        &self.scope_class
    }

    pub fn transition(&self) -> Option<Duration> {
        self.transition
    }

    pub fn applies_to(&self, element: &Element) -> bool {
        element.has_class(&self.scope_class)
    }

    /// Whether this rule hides `element`.
    pub fn hides(&self, element: &Element) -> bool {
        self.applies_to(element) && !self.visible_classes.iter().any(|c| element.has_class(c))
    }
}

/// Ordered set of visibility rules, at most one per scope class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    rules: Vec<VisibilityRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Stylesheet::insert).
    pub fn with_rule(mut self, rule: VisibilityRule) -> Self {
        self.insert(rule);
        self
    }

    /// Add a rule, replacing any rule for the same scope class.
    pub fn insert(&mut self, rule: VisibilityRule) {
        match self
            .rules
            .iter_mut()
            .find(|r| r.scope_class == rule.scope_class)
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn rule(&self, scope_class: &str) -> Option<&VisibilityRule> {
        self.rules.iter().find(|r| r.scope_class == scope_class)
    }

    pub fn has_rule(&self, scope_class: &str) -> bool {
        self.rule(scope_class).is_some()
    }

    pub fn rules(&self) -> &[VisibilityRule] {
        &self.rules
    }

    /// Whether any rule hides `element` (ancestors are not considered).
    pub fn hides(&self, element: &Element) -> bool {
        self.rules.iter().any(|r| r.hides(element))
    }

    /// Transition started by toggling `class` on `element`, if any.
    pub fn transition_for(&self, element: &Element, class: &str) -> Option<Duration> {
        self.rules
            .iter()
            .filter(|r| r.applies_to(element) && r.visible_classes.iter().any(|c| c == class))
            .find_map(|r| r.transition)
    }
}

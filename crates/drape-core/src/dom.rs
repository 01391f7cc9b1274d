//! Retained element tree that widgets attach behaviour to.
//!
//! A [`Document`] is the terminal stand-in for a web page: an arena of
//! [`Element`]s addressed by copyable [`ElementId`]s, rooted at a body
//! element. Besides the tree itself the document owns the state every widget
//! shares: the active (focused) element, the [`Listeners`] registry, the
//! [`Stylesheet`] deciding which subtrees are displayed, and the queue of
//! pending transitions.
//!
//! Elements carry their laid-out box as a [`ratatui::layout::Rect`]. The host
//! assigns boxes; the document only reads them to decide whether an element
//! is rendered and for hit testing.

use crate::listener::{ListenerId, ListenerKind, Listeners};
use crate::stylesheet::Stylesheet;
use crate::transition::Transitions;
use ratatui::layout::{Position, Rect};
use std::collections::BTreeMap;
use std::time::Instant;

/// Handle to an element inside a [`Document`].
///
/// Ids are never reused, so a handle to a removed element stays invalid
/// (see [`Document::is_attached`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Element kinds understood by the focus rules and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Body,
    Div,
    Span,
    Nav,
    Section,
    Heading,
    Paragraph,
    A,
    Button,
    Input,
    Select,
    TextArea,
    IFrame,
    Object,
    Embed,
    Audio,
    Video,
    Details,
    Summary,
}

impl Tag {
    /// Lower-case markup name, used in log output.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Body => "body",
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::Nav => "nav",
            Tag::Section => "section",
            Tag::Heading => "h1",
            Tag::Paragraph => "p",
            Tag::A => "a",
            Tag::Button => "button",
            Tag::Input => "input",
            Tag::Select => "select",
            Tag::TextArea => "textarea",
            Tag::IFrame => "iframe",
            Tag::Object => "object",
            Tag::Embed => "embed",
            Tag::Audio => "audio",
            Tag::Video => "video",
            Tag::Details => "details",
            Tag::Summary => "summary",
        }
    }

    /// Form controls honour the `disabled` attribute.
    pub fn is_form_control(self) -> bool {
        matches!(self, Tag::Input | Tag::Select | Tag::TextArea | Tag::Button)
    }
}

/// A single node of the tree: tag, attributes, classes, text and box.
///
/// Built with the `with_*` methods and handed to [`Document::append`]. Once
/// attached, mutate it through the document so that stylesheet transitions
/// are scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: Tag,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    layout: Rect,
    client_rects: Vec<Rect>,
}

impl Element {
    /// Create an empty element with a zero box.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            layout: Rect::default(),
            client_rects: Vec::new(),
        }
    }

    /// Set the `id` attribute.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    /// Set an arbitrary attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Add a class. Duplicates are ignored.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set the display text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the laid-out box.
    pub fn with_layout(mut self, layout: Rect) -> Self {
        self.layout = layout;
        self
    }

    /// Add a client rect (an inline fragment with its own box).
    pub fn with_client_rect(mut self, rect: Rect) -> Self {
        self.client_rects.push(rect);
        self
    }

    /// Set the `tabindex` attribute.
    pub fn with_tabindex(self, index: i32) -> Self {
        self.with_attr("tabindex", index.to_string())
    }

    /// Mark the element `disabled`.
    pub fn disabled(self) -> Self {
        self.with_attr("disabled", "")
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn layout(&self) -> Rect {
        self.layout
    }

    pub fn client_rects(&self) -> &[Rect] {
        &self.client_rects
    }

    /// `disabled` only applies to form controls.
    pub fn is_disabled(&self) -> bool {
        self.tag.is_form_control() && self.has_attr("disabled")
    }

    /// Parsed `tabindex`. Unparseable values are treated as absent.
    pub fn tabindex(&self) -> Option<i32> {
        self.attr("tabindex").and_then(|v| v.trim().parse().ok())
    }

    /// Whether the element occupies any space: a non-zero box or at least one
    /// client rect.
    pub fn has_box(&self) -> bool {
        self.layout.width > 0 || self.layout.height > 0 || !self.client_rects.is_empty()
    }

    /// Whether the element takes part in sequential (Tab) navigation.
    ///
    /// Links with `href`, enabled form controls, embedded content, elements
    /// with a non-negative `tabindex`, editable regions, media with controls
    /// and `summary`.
    pub fn is_interactive(&self) -> bool {
        let by_tag = match self.tag {
            Tag::Input | Tag::Select | Tag::TextArea | Tag::Button => !self.is_disabled(),
            Tag::IFrame | Tag::Object | Tag::Embed | Tag::Summary => true,
            Tag::Audio | Tag::Video => self.has_attr("controls"),
            _ => false,
        };
        by_tag
            || self.has_attr("href")
            || self.tabindex().is_some_and(|i| i >= 0)
            || self.has_attr("contenteditable")
    }

    /// Whether [`Document::focus`] accepts the element. Any `tabindex`,
    /// including negative ones, makes an element programmatically focusable.
    pub fn is_focusable(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.is_interactive() || self.tabindex().is_some()
    }

    /// Whether Enter (or Space on buttons) activates the element.
    pub fn is_activatable(&self) -> bool {
        match self.tag {
            Tag::Button => !self.is_disabled(),
            Tag::Summary => true,
            Tag::A => self.has_attr("href"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// The element tree plus the page-wide state widgets share.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    body: ElementId,
    active: Option<ElementId>,
    listeners: Listeners,
    stylesheet: Stylesheet,
    transitions: Transitions,
}

impl Document {
    /// Create a document holding only a body element.
    pub fn new() -> Self {
        let body = Node {
            element: Element::new(Tag::Body),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Some(body)],
            body: ElementId(0),
            active: None,
            listeners: Listeners::new(),
            stylesheet: Stylesheet::new(),
            transitions: Transitions::new(),
        }
    }

    /// Create a document with the given stylesheet.
    pub fn with_stylesheet(stylesheet: Stylesheet) -> Self {
        let mut doc = Self::new();
        doc.stylesheet = stylesheet;
        doc
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Append `element` as the last child of `parent`.
    ///
    /// A detached `parent` falls back to the body.
    pub fn append(&mut self, parent: ElementId, element: Element) -> ElementId {
        let parent = if self.is_attached(parent) {
            parent
        } else {
            log::warn!("append to detached parent {parent:?}, using body");
            self.body
        };
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        }));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Detach `id` and its whole subtree. The body cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.body || !self.is_attached(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|c| *c != id);
            }
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for gone in doomed {
            if self.active == Some(gone) {
                self.active = None;
            }
            if let Some(slot) = self.nodes.get_mut(gone.0) {
                *slot = None;
            }
        }
        true
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by each of its ancestors up to the body.
    pub fn inclusive_ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.is_attached(id).then_some(id);
        std::iter::successors(start, move |cur| self.parent(*cur))
    }

    /// Inclusive containment, as `Node.contains`.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.inclusive_ancestors(node).any(|a| a == ancestor)
    }

    /// Nearest inclusive ancestor of `id` matching `pred`.
    pub fn closest(&self, id: ElementId, pred: impl Fn(&Element) -> bool) -> Option<ElementId> {
        self.inclusive_ancestors(id)
            .find(|a| self.get(*a).is_some_and(&pred))
    }

    /// Every attached element (body excluded) matching `pred`, in document
    /// order.
    pub fn query(&self, pred: impl Fn(&Element) -> bool) -> Vec<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(&pred))
            .collect()
    }

    /// First element whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .find(|e| self.get(*e).and_then(Element::id) == Some(id))
    }

    /// Elements referencing `id` through `aria-controls`.
    pub fn controllers_of(&self, id: &str) -> Vec<ElementId> {
        self.query(|e| e.attr("aria-controls") == Some(id))
    }

    pub fn set_attr(&mut self, id: ElementId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.element.attrs.insert(name.into(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) -> bool {
        self.node_mut(id)
            .is_some_and(|node| node.element.attrs.remove(name).is_some())
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    /// Add `class`; returns whether the class list changed.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        let changed = match self.node_mut(id) {
            Some(node) if !node.element.has_class(class) => {
                node.element.classes.push(class.to_string());
                true
            }
            _ => false,
        };
        if changed {
            self.class_changed(id, class);
        }
        changed
    }

    /// Remove `class`; returns whether the class list changed.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        let changed = match self.node_mut(id) {
            Some(node) => {
                let before = node.element.classes.len();
                node.element.classes.retain(|c| c != class);
                before != node.element.classes.len()
            }
            None => false,
        };
        if changed {
            self.class_changed(id, class);
        }
        changed
    }

    /// Add `class` when `on`, remove it otherwise.
    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) -> bool {
        if on {
            self.add_class(id, class)
        } else {
            self.remove_class(id, class)
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.element.text = text.into();
        }
    }

    pub fn set_layout(&mut self, id: ElementId, layout: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.element.layout = layout;
        }
    }

    pub fn set_client_rects(&mut self, id: ElementId, rects: Vec<Rect>) {
        if let Some(node) = self.node_mut(id) {
            node.element.client_rects = rects;
        }
    }

    /// Whether the element is laid out and not hidden by the stylesheet,
    /// itself or through an ancestor.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let Some(element) = self.get(id) else {
            return false;
        };
        element.has_box() && self.is_displayed(id)
    }

    /// Whether no inclusive ancestor is hidden by the stylesheet.
    pub fn is_displayed(&self, id: ElementId) -> bool {
        self.is_attached(id)
            && self
                .inclusive_ancestors(id)
                .filter_map(|a| self.get(a))
                .all(|e| !self.stylesheet.hides(e))
    }

    /// The focused element, `None` when focus rests on the body.
    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Focus `id`. Fails (returning `false`, focus unchanged) when the
    /// element is detached, not focusable or not rendered. Focusing the body
    /// blurs.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if id == self.body {
            self.active = None;
            return true;
        }
        let focusable = self.get(id).is_some_and(Element::is_focusable);
        if !focusable || !self.is_rendered(id) {
            return false;
        }
        if self.active != Some(id) {
            log::trace!("focus {id:?}");
        }
        self.active = Some(id);
        true
    }

    /// Move focus to the body.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Focus `id`, making it programmatically focusable with `tabindex="-1"`
    /// first if needed.
    pub fn move_focus(&mut self, id: ElementId) -> bool {
        if self.focus(id) {
            return true;
        }
        if self.get(id).is_some_and(|e| e.tabindex().is_none() && !e.is_disabled()) {
            self.set_attr(id, "tabindex", "-1");
            return self.focus(id);
        }
        false
    }

    /// Rendered, interactive elements in document order.
    pub fn tabbable(&self) -> Vec<ElementId> {
        self.query(Element::is_interactive)
            .into_iter()
            .filter(|id| self.is_rendered(*id))
            .collect()
    }

    /// Sequential focus navigation. Wraps around at either end; starts from
    /// the first (or last) tabbable element when focus is elsewhere.
    pub fn focus_sequential(&mut self, forward: bool) -> Option<ElementId> {
        let order = self.tabbable();
        if order.is_empty() {
            return None;
        }
        let pos = self.active.and_then(|a| order.iter().position(|e| *e == a));
        let next = match (pos, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(p), true) => (p + 1) % order.len(),
            (Some(0), false) => order.len() - 1,
            (Some(p), false) => p - 1,
        };
        let target = order[next];
        self.active = Some(target);
        Some(target)
    }

    /// Topmost rendered element under `pos`. Later elements in document order
    /// paint over earlier ones.
    pub fn element_at(&self, pos: Position) -> Option<ElementId> {
        self.descendants(self.body).into_iter().rev().find(|id| {
            self.is_rendered(*id)
                && self.get(*id).is_some_and(|e| {
                    e.layout.contains(pos) || e.client_rects.iter().any(|r| r.contains(pos))
                })
        })
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn stylesheet_mut(&mut self) -> &mut Stylesheet {
        &mut self.stylesheet
    }

    /// Register a listener of `kind` on `element`.
    pub fn add_listener(&mut self, element: ElementId, kind: ListenerKind) -> ListenerId {
        self.listeners.attach(element, kind)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.detach(id)
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Whether listener `id` is registered for `kind` on an attached element
    /// containing `target`.
    pub fn listener_hears(&self, id: ListenerId, kind: ListenerKind, target: ElementId) -> bool {
        match self.listeners.get(id) {
            Some((element, k)) => {
                k == kind && self.is_attached(element) && self.contains(element, target)
            }
            None => false,
        }
    }

    pub fn pending_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn next_transition_deadline(&self) -> Option<Instant> {
        self.transitions.next_deadline()
    }

    /// Remove and return transitions due at `now` whose element is still
    /// attached.
    pub fn take_due_transitions(&mut self, now: Instant) -> Vec<ElementId> {
        let due = self.transitions.take_due(now);
        due.into_iter().filter(|id| self.is_attached(*id)).collect()
    }

    /// Remove and return every pending transition regardless of deadline.
    pub fn take_all_transitions(&mut self) -> Vec<ElementId> {
        let all = self.transitions.take_all();
        all.into_iter().filter(|id| self.is_attached(*id)).collect()
    }

    fn class_changed(&mut self, id: ElementId, class: &str) {
        let duration = self
            .get(id)
            .and_then(|e| self.stylesheet.transition_for(e, class));
        if let Some(duration) = duration {
            self.transitions.schedule(id, Instant::now() + duration);
        }
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

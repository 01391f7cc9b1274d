//! Open/close lifecycle shared by every focus-trapping overlay.
//!
//! An [`Overlay`] owns one container element and the triggers that point at
//! it through `aria-controls`. Opening adds the visibility class the
//! stylesheet keys on, moves focus inside and starts listening for keydown
//! and click; closing reverses all of that and hands focus back to the
//! trigger. Collaborators learn about state changes through
//! [`OverlayNotice`] subscriptions and may open the overlay from elsewhere
//! with an [`OpenRequester`].

use crate::focus::{FocusBounds, FocusScope};
use crate::key::Binding;
use drape_core::{
    request_channel, Behavior, Document, Element, ElementId, Error, Event, ListenerId,
    ListenerKind, Notifier, RequestQueue, Requester, Result, Subscriber,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Widget};

/// Lifecycle state. `Closed` is initial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// Where focus goes when the overlay opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitialFocus {
    /// The first tabbable descendant.
    #[default]
    First,
    /// The container itself, made focusable with `tabindex="-1"` for as
    /// long as the overlay is open.
    Container,
}

/// Behaviour knobs for an [`Overlay`].
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// Class added to the container while open.
    pub visible_class: String,
    /// Clicks inside an element with this class (within the container) close.
    pub close_class: String,
    /// Whether a click on the container itself (the backdrop) closes.
    pub backdrop_closes: bool,
    /// Whether a trigger click closes an open overlay instead of reopening it.
    pub toggle_on_trigger: bool,
    pub initial_focus: InitialFocus,
    pub close_key: Binding,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            visible_class: "overlay--is-visible".into(),
            close_class: "js-overlay__close".into(),
            backdrop_closes: false,
            toggle_on_trigger: false,
            initial_focus: InitialFocus::First,
            close_key: Binding::close(),
        }
    }
}

/// Outbound notification. `trigger` is the element focus returns to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayNotice {
    Opened { trigger: Option<ElementId> },
    Closed { trigger: Option<ElementId> },
}

/// Inbound request to open an overlay programmatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenRequest {
    /// Element to refocus on close. `None` leaves focus alone on close.
    pub trigger: Option<ElementId>,
}

pub type OpenRequester = Requester<OpenRequest>;

/// Controller for one overlay container.
pub struct Overlay {
    container: ElementId,
    triggers: Vec<ElementId>,
    trigger_listeners: Vec<ListenerId>,
    current_trigger: Option<ElementId>,
    state: OverlayState,
    bounds: FocusBounds,
    options: OverlayOptions,
    /// Keydown and click listeners, alive only while open.
    listeners: Vec<ListenerId>,
    /// One-shot refocus after the open transition.
    transition_listener: Option<ListenerId>,
    container_tabindex: bool,
    notices: Notifier<OverlayNotice>,
    requester: OpenRequester,
    requests: RequestQueue<OpenRequest>,
}

impl Overlay {
    /// Attach to `container`. Every element whose `aria-controls` equals the
    /// container's `id` becomes a trigger.
    pub fn new(doc: &mut Document, container: ElementId, options: OverlayOptions) -> Self {
        let triggers = doc
            .get(container)
            .and_then(Element::id)
            .map(|id| doc.controllers_of(id))
            .unwrap_or_default();
        let trigger_listeners = triggers
            .iter()
            .map(|t| doc.add_listener(*t, ListenerKind::Click))
            .collect();
        let (requester, requests) = request_channel();
        log::debug!(
            "overlay {container:?} attached with {} trigger(s)",
            triggers.len()
        );
        Self {
            container,
            triggers,
            trigger_listeners,
            current_trigger: None,
            state: OverlayState::Closed,
            bounds: FocusBounds::default(),
            options,
            listeners: Vec::new(),
            transition_listener: None,
            container_tabindex: false,
            notices: Notifier::new(),
            requester,
            requests,
        }
    }

    /// Attach to the element whose `id` attribute is `id`.
    pub fn attach(doc: &mut Document, id: &str, options: OverlayOptions) -> Result<Self> {
        let container = doc
            .find_by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        Ok(Self::new(doc, container, options))
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn triggers(&self) -> &[ElementId] {
        &self.triggers
    }

    /// The element focus returns to on close.
    pub fn current_trigger(&self) -> Option<ElementId> {
        self.current_trigger
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    /// Focus bounds computed by the last open. Empty while closed.
    pub fn bounds(&self) -> FocusBounds {
        self.bounds
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// Receive [`OverlayNotice`]s from now on.
    pub fn subscribe(&mut self) -> Subscriber<OverlayNotice> {
        self.notices.subscribe()
    }

    /// Handle for opening this overlay from elsewhere, possibly another
    /// thread. Requests are applied on the next dispatch.
    pub fn requester(&self) -> OpenRequester {
        self.requester.clone()
    }

    /// Show the overlay and move focus inside.
    ///
    /// On a closed overlay `trigger` becomes the focus-return target. On an
    /// open one the bounds are recomputed and focus moved again; `trigger`
    /// replaces the stored one only when given, and no listener is added
    /// twice nor a second `Opened` sent.
    pub fn open(&mut self, doc: &mut Document, trigger: Option<ElementId>) {
        let reopening = self.is_open();
        if !reopening || trigger.is_some() {
            self.current_trigger = trigger;
        }
        self.state = OverlayState::Open;
        doc.add_class(self.container, &self.options.visible_class);
        self.bounds = FocusScope::compute_bounds(doc, self.container);
        self.focus_initial(doc);

        if let Some(previous) = self.transition_listener.take() {
            doc.remove_listener(previous);
        }
        self.transition_listener = Some(doc.add_listener(self.container, ListenerKind::TransitionEnd));

        if reopening {
            log::debug!("overlay {:?} reopened", self.container);
            return;
        }
        self.listeners
            .push(doc.add_listener(self.container, ListenerKind::Keydown));
        self.listeners
            .push(doc.add_listener(self.container, ListenerKind::Click));
        log::debug!(
            "overlay {:?} opened (trigger {:?}, bounds {:?})",
            self.container,
            self.current_trigger,
            self.bounds
        );
        self.notices.notify(OverlayNotice::Opened {
            trigger: self.current_trigger,
        });
    }

    /// Hide the overlay, return focus to the trigger and stop listening.
    /// Does nothing when already closed.
    pub fn close(&mut self, doc: &mut Document) {
        if !self.is_open() {
            return;
        }
        self.state = OverlayState::Closed;
        doc.remove_class(self.container, &self.options.visible_class);
        self.bounds = FocusBounds::default();

        let refocused = self
            .current_trigger
            .is_some_and(|t| doc.is_attached(t) && doc.focus(t));
        if !refocused
            && doc
                .active_element()
                .is_some_and(|a| doc.contains(self.container, a) && !doc.is_rendered(a))
        {
            doc.blur();
        }
        if std::mem::take(&mut self.container_tabindex) {
            doc.remove_attr(self.container, "tabindex");
        }

        for id in self.listeners.drain(..) {
            doc.remove_listener(id);
        }
        if let Some(id) = self.transition_listener.take() {
            doc.remove_listener(id);
        }
        log::debug!(
            "overlay {:?} closed (trigger {:?})",
            self.container,
            self.current_trigger
        );
        self.notices.notify(OverlayNotice::Closed {
            trigger: self.current_trigger,
        });
    }

    /// Escape (the close binding) closes; Tab and Shift+Tab go through the
    /// focus trap.
    pub fn handle_keydown(&mut self, doc: &mut Document, event: &mut Event) {
        let Some(key) = event.key() else {
            return;
        };
        if self.options.close_key.matches(key) {
            event.prevent_default();
            self.close(doc);
            return;
        }
        if event.navigation().is_some() {
            if !self.bounds.is_current(doc) {
                log::debug!("overlay {:?} bounds went stale", self.container);
                self.bounds = FocusScope::compute_bounds(doc, self.container);
            }
            FocusScope::trap(doc, &self.bounds, event);
        }
    }

    /// Close when `event` hits a close control inside the container, or the
    /// container itself when the backdrop closes.
    pub fn handle_click(&mut self, doc: &mut Document, event: &mut Event) {
        let target = event.target();
        let on_close_control = doc
            .closest(target, |e| e.has_class(&self.options.close_class))
            .is_some_and(|control| doc.contains(self.container, control));
        let on_backdrop = self.options.backdrop_closes && target == self.container;
        if on_close_control || on_backdrop {
            event.prevent_default();
            self.close(doc);
        }
    }

    /// Route `event` to the handler whose listener hears it.
    pub fn handle_event(&mut self, doc: &mut Document, event: &mut Event) {
        let target = event.target();
        match event.kind().listener_kind() {
            ListenerKind::Click => {
                if let Some(trigger) = self.trigger_hit(doc, target) {
                    self.activate_trigger(doc, trigger, event);
                } else if self.hears(doc, ListenerKind::Click, target) {
                    self.handle_click(doc, event);
                }
            }
            ListenerKind::Keydown => {
                if self.hears(doc, ListenerKind::Keydown, target) {
                    self.handle_keydown(doc, event);
                }
            }
            ListenerKind::TransitionEnd => {
                let fired = self
                    .transition_listener
                    .filter(|id| doc.listener_hears(*id, ListenerKind::TransitionEnd, target));
                if let Some(id) = fired {
                    doc.remove_listener(id);
                    self.transition_listener = None;
                    log::trace!("overlay {:?} transition ended, refocusing", self.container);
                    self.focus_initial(doc);
                }
            }
            ListenerKind::Resize => {}
        }
    }

    /// Remove and return queued open requests without applying them.
    pub fn take_requests(&mut self) -> Vec<OpenRequest> {
        self.requests.drain()
    }

    /// Apply queued open requests. Returns whether there were any.
    pub fn poll(&mut self, doc: &mut Document) -> bool {
        let requests = self.take_requests();
        for request in &requests {
            log::debug!("overlay {:?} open requested", self.container);
            self.open(doc, request.trigger);
        }
        !requests.is_empty()
    }

    fn activate_trigger(&mut self, doc: &mut Document, trigger: ElementId, event: &mut Event) {
        event.prevent_default();
        if self.is_open() && self.options.toggle_on_trigger {
            self.current_trigger = Some(trigger);
            self.close(doc);
        } else {
            self.open(doc, Some(trigger));
        }
    }

    /// The trigger containing `target`, if a trigger listener hears it.
    fn trigger_hit(&self, doc: &Document, target: ElementId) -> Option<ElementId> {
        self.triggers
            .iter()
            .zip(&self.trigger_listeners)
            .find(|(_, id)| doc.listener_hears(**id, ListenerKind::Click, target))
            .map(|(trigger, _)| *trigger)
    }

    fn hears(&self, doc: &Document, kind: ListenerKind, target: ElementId) -> bool {
        self.listeners
            .iter()
            .any(|id| doc.listener_hears(*id, kind, target))
    }

    fn focus_initial(&mut self, doc: &mut Document) {
        match self.options.initial_focus {
            InitialFocus::First => {
                if let Some(first) = self.bounds.first {
                    doc.focus(first);
                }
            }
            InitialFocus::Container => {
                let had_tabindex = doc.get(self.container).is_some_and(|e| e.tabindex().is_some());
                if doc.move_focus(self.container) && !had_tabindex {
                    self.container_tabindex = true;
                }
            }
        }
    }
}

impl Behavior for Overlay {
    fn handle_event(&mut self, doc: &mut Document, event: &mut Event) {
        Overlay::handle_event(self, doc, event);
    }

    fn poll(&mut self, doc: &mut Document) -> bool {
        Overlay::poll(self, doc)
    }
}

/// Colours for overlay panels.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub border: Style,
    pub title: Style,
    /// Style for the panel's text content.
    pub body: Style,
    pub focused: Style,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::Cyan),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            body: Style::default(),
            focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        }
    }
}

/// Draw `container` as a bordered panel over whatever is already in `buf`.
///
/// Nothing is drawn while the container is not rendered. The border sits on
/// the container's box and takes its title from `aria-label`; descendants
/// are clipped to the inside. With `clear`, the box is blanked first so the
/// page underneath does not show through.
pub fn render_panel(
    doc: &Document,
    container: ElementId,
    style: &OverlayStyle,
    clear: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let Some(element) = doc.get(container) else {
        return;
    };
    if !doc.is_rendered(container) {
        return;
    }
    let panel = element.layout().intersection(area);
    if panel.is_empty() {
        return;
    }
    if clear {
        Clear.render(panel, buf);
    }
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(style.border);
    if let Some(title) = element.attr("aria-label") {
        block = block.title(title.to_string()).title_style(style.title);
    }
    let inner = block.inner(panel);
    block.render(panel, buf);
    drape_core::DocumentView::new(doc)
        .root(container)
        .style(style.body)
        .focus_style(style.focused)
        .render(inner, buf);
}

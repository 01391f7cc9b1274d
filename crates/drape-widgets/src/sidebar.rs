//! Responsive sidebar: pinned in place on wide terminals, a focus-trapping
//! drawer on narrow ones.
//!
//! The sidebar re-evaluates its layout on every resize. At or above the
//! breakpoint it is *static*: the `sidebar--static` class (plus any classes
//! listed in the container's `data-static-class` attribute) keeps it shown,
//! `role` is dropped and overlay behaviour is off. Below the breakpoint it
//! is *mobile*: hidden until a trigger opens it, `role="alertdialog"`, and
//! the full [`Overlay`] lifecycle applies. Clicking the container itself
//! (the background layer around the panel content) closes it.

use crate::overlay::{
    render_panel, OpenRequester, Overlay, OverlayNotice, OverlayOptions, OverlayStyle,
};
use drape_core::{
    Behavior, Document, ElementId, Error, Event, EventKind, ListenerId, ListenerKind, Result,
    Subscriber, VisibilityRule,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Class marking sidebar containers.
pub const CONTAINER_CLASS: &str = "js-sidebar";
/// Class present while the mobile drawer is shown.
pub const VISIBLE_CLASS: &str = "sidebar--is-visible";
/// Class present in static layout.
pub const STATIC_CLASS: &str = "sidebar--static";
/// Class marking controls that close the drawer.
pub const CLOSE_CLASS: &str = "js-sidebar__close-btn";
/// Class added once the sidebar is attached.
pub const READY_CLASS: &str = "sidebar--loaded";
/// Attribute listing extra classes for the static layout.
pub const STATIC_CLASS_ATTR: &str = "data-static-class";

/// Layout the sidebar is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarLayout {
    /// Part of the page, always shown.
    Static,
    /// A drawer over the page.
    Mobile,
}

#[derive(Debug, Clone)]
pub struct SidebarOptions {
    /// Viewport width (in columns) from which the layout is static.
    pub breakpoint: u16,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self { breakpoint: 100 }
    }
}

pub struct Sidebar {
    overlay: Overlay,
    options: SidebarOptions,
    layout: Option<SidebarLayout>,
    static_classes: Vec<String>,
    resize_listener: ListenerId,
    style: OverlayStyle,
}

impl Sidebar {
    /// Overlay options every sidebar uses.
    pub fn overlay_options() -> OverlayOptions {
        OverlayOptions {
            visible_class: VISIBLE_CLASS.into(),
            close_class: CLOSE_CLASS.into(),
            backdrop_closes: true,
            toggle_on_trigger: true,
            ..OverlayOptions::default()
        }
    }

    /// Turn `container` into a sidebar.
    ///
    /// When the body already has a laid-out width the layout is evaluated
    /// right away; otherwise on the first resize.
    pub fn new(doc: &mut Document, container: ElementId, options: SidebarOptions) -> Self {
        if !doc.stylesheet().has_rule(CONTAINER_CLASS) {
            doc.stylesheet_mut().insert(
                VisibilityRule::new(CONTAINER_CLASS, VISIBLE_CLASS).with_visible_class(STATIC_CLASS),
            );
        }
        doc.add_class(container, CONTAINER_CLASS);

        let mut static_classes = vec![STATIC_CLASS.to_string()];
        if let Some(extra) = doc.get(container).and_then(|e| e.attr(STATIC_CLASS_ATTR)) {
            static_classes.extend(extra.split_whitespace().map(str::to_string));
        }
        let body = doc.body();
        let resize_listener = doc.add_listener(body, ListenerKind::Resize);
        let overlay = Overlay::new(doc, container, Self::overlay_options());

        let mut sidebar = Self {
            overlay,
            options,
            layout: None,
            static_classes,
            resize_listener,
            style: OverlayStyle::default(),
        };
        let width = doc.get(body).map_or(0, |b| b.layout().width);
        if width > 0 {
            sidebar.update_layout(doc, width);
        }
        doc.add_class(container, READY_CLASS);
        sidebar
    }

    /// Turn the element with `id` into a sidebar.
    pub fn attach(doc: &mut Document, id: &str, options: SidebarOptions) -> Result<Self> {
        let container = doc
            .find_by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        Ok(Self::new(doc, container, options))
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    /// `None` until a viewport width is known.
    pub fn layout(&self) -> Option<SidebarLayout> {
        self.layout
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// Open the drawer. Ignored unless the layout is mobile.
    pub fn open(&mut self, doc: &mut Document, trigger: Option<ElementId>) {
        if self.is_mobile() {
            self.overlay.open(doc, trigger);
        }
    }

    pub fn close(&mut self, doc: &mut Document) {
        self.overlay.close(doc);
    }

    pub fn subscribe(&mut self) -> Subscriber<OverlayNotice> {
        self.overlay.subscribe()
    }

    pub fn requester(&self) -> OpenRequester {
        self.overlay.requester()
    }

    /// Pick the layout for a viewport `width` columns wide. Returns whether
    /// the layout changed.
    pub fn update_layout(&mut self, doc: &mut Document, width: u16) -> bool {
        let layout = if width >= self.options.breakpoint {
            SidebarLayout::Static
        } else {
            SidebarLayout::Mobile
        };
        if self.layout == Some(layout) {
            return false;
        }
        self.layout = Some(layout);
        let container = self.overlay.container();
        let is_static = layout == SidebarLayout::Static;
        for class in &self.static_classes {
            doc.toggle_class(container, class, is_static);
        }
        if is_static {
            doc.remove_attr(container, "role");
            self.overlay.close(doc);
        } else {
            doc.set_attr(container, "role", "alertdialog");
            // The drawer just hid; focus must not stay inside it.
            if doc
                .active_element()
                .is_some_and(|a| doc.contains(container, a) && !doc.is_rendered(a))
            {
                doc.blur();
            }
        }
        log::debug!("sidebar {container:?} layout {layout:?} at width {width}");
        true
    }

    fn is_mobile(&self) -> bool {
        self.layout == Some(SidebarLayout::Mobile)
    }
}

impl Behavior for Sidebar {
    fn handle_event(&mut self, doc: &mut Document, event: &mut Event) {
        if let EventKind::Resize { width, .. } = *event.kind() {
            if doc.listener_hears(self.resize_listener, ListenerKind::Resize, event.target()) {
                self.update_layout(doc, width);
            }
            return;
        }
        if self.is_mobile() {
            self.overlay.handle_event(doc, event);
        }
    }

    fn poll(&mut self, doc: &mut Document) -> bool {
        if self.is_mobile() {
            return self.overlay.poll(doc);
        }
        let dropped = self.overlay.take_requests().len();
        if dropped > 0 {
            log::debug!("sidebar not in mobile layout, dropped {dropped} open request(s)");
        }
        false
    }

    fn root(&self) -> Option<ElementId> {
        Some(self.overlay.container())
    }

    fn render(&self, doc: &Document, area: Rect, buf: &mut Buffer) {
        render_panel(doc, self.overlay.container(), &self.style, self.is_mobile(), area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{self, Dialog};
    use crate::overlay::OpenRequest;
    use drape_core::testing::{escape, render_string, tab};
    use drape_core::{Element, Page, Tag};

    struct Fixture {
        page: Page,
        sidebar: drape_core::BehaviorId,
        trigger: ElementId,
        container: ElementId,
        home: ElementId,
        close_btn: ElementId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let trigger = doc.append(
            body,
            Element::new(Tag::Button)
                .with_attr("aria-controls", "nav")
                .with_text("Menu")
                .with_layout(Rect::new(0, 0, 10, 1)),
        );
        let container = doc.append(
            body,
            Element::new(Tag::Nav)
                .with_id("nav")
                .with_attr(STATIC_CLASS_ATTR, "sidebar--pinned sidebar--wide")
                .with_attr("aria-label", "Navigation")
                .with_layout(Rect::new(0, 1, 24, 8)),
        );
        let home = doc.append(
            container,
            Element::new(Tag::A)
                .with_attr("href", "#home")
                .with_text("Home")
                .with_layout(Rect::new(1, 2, 20, 1)),
        );
        let close_btn = doc.append(
            container,
            Element::new(Tag::Button)
                .with_class(CLOSE_CLASS)
                .with_text("x")
                .with_layout(Rect::new(1, 4, 8, 1)),
        );
        let mut page = Page::new(doc);
        let sidebar = Sidebar::attach(page.document_mut(), "nav", SidebarOptions { breakpoint: 80 })
            .expect("sidebar markup");
        let sidebar = page.add(sidebar);
        Fixture {
            page,
            sidebar,
            trigger,
            container,
            home,
            close_btn,
        }
    }

    fn sidebar(f: &Fixture) -> &Sidebar {
        f.page.get::<Sidebar>(f.sidebar).expect("sidebar registered")
    }

    fn resize(f: &mut Fixture, width: u16) {
        let body = f.page.document().body();
        f.page.dispatch(Event::resize(body, width, 24));
    }

    #[test]
    fn attach_marks_ready_without_layout() {
        let f = fixture();
        assert!(f.page.document().has_class(f.container, READY_CLASS));
        assert!(f.page.document().has_class(f.container, CONTAINER_CLASS));
        assert_eq!(sidebar(&f).layout(), None);
    }

    #[test]
    fn wide_viewport_is_static() {
        let mut f = fixture();
        resize(&mut f, 120);
        let doc = f.page.document();
        assert_eq!(sidebar(&f).layout(), Some(SidebarLayout::Static));
        for class in [STATIC_CLASS, "sidebar--pinned", "sidebar--wide"] {
            assert!(doc.has_class(f.container, class), "missing {class}");
        }
        assert_eq!(doc.get(f.container).and_then(|e| e.attr("role")), None);
        assert!(doc.is_rendered(f.home));
    }

    #[test]
    fn narrow_viewport_is_mobile() {
        let mut f = fixture();
        resize(&mut f, 60);
        let doc = f.page.document();
        assert_eq!(sidebar(&f).layout(), Some(SidebarLayout::Mobile));
        assert!(!doc.has_class(f.container, STATIC_CLASS));
        assert_eq!(doc.get(f.container).and_then(|e| e.attr("role")), Some("alertdialog"));
        assert!(!doc.is_rendered(f.home));
    }

    #[test]
    fn trigger_toggles_in_mobile() {
        let mut f = fixture();
        resize(&mut f, 60);
        f.page.document_mut().focus(f.trigger);
        f.page.dispatch(Event::click(f.trigger));
        assert!(sidebar(&f).is_open());
        assert_eq!(f.page.document().active_element(), Some(f.home));

        f.page.dispatch(Event::click(f.trigger));
        assert!(!sidebar(&f).is_open());
        assert_eq!(f.page.document().active_element(), Some(f.trigger));
    }

    #[test]
    fn background_click_closes() {
        let mut f = fixture();
        resize(&mut f, 60);
        f.page.dispatch(Event::click(f.trigger));
        f.page.dispatch(Event::click(f.container));
        assert!(!sidebar(&f).is_open());
        assert_eq!(f.page.document().active_element(), Some(f.trigger));
    }

    #[test]
    fn close_button_closes() {
        let mut f = fixture();
        resize(&mut f, 60);
        f.page.dispatch(Event::click(f.trigger));
        f.page.dispatch(Event::click(f.close_btn));
        assert!(!sidebar(&f).is_open());
    }

    #[test]
    fn trap_and_escape_in_mobile() {
        let mut f = fixture();
        resize(&mut f, 60);
        f.page.dispatch(Event::click(f.trigger));
        f.page.document_mut().focus(f.close_btn);
        f.page.dispatch_terminal(tab());
        assert_eq!(f.page.document().active_element(), Some(f.home));
        f.page.dispatch_terminal(escape());
        assert!(!sidebar(&f).is_open());
    }

    #[test]
    fn becoming_static_closes_drawer() {
        let mut f = fixture();
        resize(&mut f, 60);
        f.page.dispatch(Event::click(f.trigger));
        assert!(sidebar(&f).is_open());
        resize(&mut f, 100);
        assert!(!sidebar(&f).is_open());
        assert_eq!(f.page.document().active_element(), Some(f.trigger));
        assert!(f.page.document().is_rendered(f.home));
    }

    #[test]
    fn static_layout_ignores_overlay_input() {
        let mut f = fixture();
        resize(&mut f, 100);
        f.page.dispatch(Event::click(f.trigger));
        assert!(!sidebar(&f).is_open());
        f.page.document_mut().focus(f.close_btn);
        f.page.dispatch_terminal(tab());
        // Plain sequential navigation wraps to the trigger.
        assert_eq!(f.page.document().active_element(), Some(f.trigger));
    }

    #[test]
    fn unchanged_layout_is_a_no_op() {
        let mut f = fixture();
        resize(&mut f, 60);
        let changed = f
            .page
            .with(f.sidebar, |s: &mut Sidebar, doc| s.update_layout(doc, 70))
            .expect("sidebar registered");
        assert!(!changed);
    }

    #[test]
    fn static_drops_open_requests() {
        let mut f = fixture();
        resize(&mut f, 100);
        sidebar(&f)
            .requester()
            .send(OpenRequest::default())
            .expect("sidebar alive");
        f.page.poll();
        resize(&mut f, 60);
        assert!(!sidebar(&f).is_open());
    }

    #[test]
    fn body_width_evaluates_at_attach() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.set_layout(body, Rect::new(0, 0, 50, 20));
        let nav = doc.append(body, Element::new(Tag::Nav).with_id("nav"));
        let sidebar = Sidebar::new(&mut doc, nav, SidebarOptions { breakpoint: 80 });
        assert_eq!(sidebar.layout(), Some(SidebarLayout::Mobile));
    }

    #[test]
    fn static_sidebar_renders_in_place() {
        let mut f = fixture();
        resize(&mut f, 100);
        let out = render_string(&f.page, 30, 10);
        assert!(out.contains("Navigation"));
        assert!(out.contains("Home"));

        resize(&mut f, 60);
        let out = render_string(&f.page, 30, 10);
        assert!(!out.contains("Home"));
        assert!(out.contains("[ Menu ]"));
    }

    #[test]
    fn escape_in_nested_dialog_closes_only_the_dialog() {
        let mut doc = Document::new();
        let body = doc.body();
        let menu = doc.append(
            body,
            Element::new(Tag::Button)
                .with_attr("aria-controls", "nav")
                .with_text("Menu")
                .with_layout(Rect::new(0, 0, 10, 1)),
        );
        let nav = doc.append(
            body,
            Element::new(Tag::Nav)
                .with_id("nav")
                .with_layout(Rect::new(0, 1, 24, 8)),
        );
        let settings = doc.append(
            nav,
            Element::new(Tag::Button)
                .with_attr("aria-controls", "prefs")
                .with_text("Settings")
                .with_layout(Rect::new(1, 2, 12, 1)),
        );
        let prefs = doc.append(
            body,
            Element::new(Tag::Div)
                .with_id("prefs")
                .with_class(dialog::CONTAINER_CLASS)
                .with_layout(Rect::new(30, 2, 30, 6)),
        );
        let done = doc.append(
            prefs,
            Element::new(Tag::Button)
                .with_class(dialog::CLOSE_CLASS)
                .with_text("Done")
                .with_layout(Rect::new(32, 4, 10, 1)),
        );
        let mut page = Page::new(doc);
        let sidebar = Sidebar::attach(page.document_mut(), "nav", SidebarOptions { breakpoint: 80 })
            .expect("sidebar markup");
        let sidebar = page.add(sidebar);
        let prefs_dialog = Dialog::attach(page.document_mut(), "prefs").expect("dialog markup");
        let prefs_dialog = page.add(prefs_dialog);
        let body = page.document().body();
        page.dispatch(Event::resize(body, 60, 24));

        page.dispatch(Event::click(menu));
        page.dispatch(Event::click(settings));
        assert_eq!(page.document().active_element(), Some(done));

        page.dispatch_terminal(escape());
        assert!(!page.get::<Dialog>(prefs_dialog).is_some_and(Dialog::is_open));
        assert!(page.get::<Sidebar>(sidebar).is_some_and(Sidebar::is_open));
        assert_eq!(page.document().active_element(), Some(settings));

        page.dispatch_terminal(escape());
        assert!(!page.get::<Sidebar>(sidebar).is_some_and(Sidebar::is_open));
        assert_eq!(page.document().active_element(), Some(menu));
    }
}

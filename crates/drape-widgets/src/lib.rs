//! Focus-trapping overlays for the **drape** toolkit.
//!
//! Every widget here implements [`drape_core::Behavior`], so it can be added
//! to a [`drape_core::Page`] next to any other behaviour.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dialog`] | Modal dialog drawn over the page, opened by its triggers |
//! | [`sidebar`] | Sidebar that is static on wide terminals and a drawer on narrow ones |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`overlay`] | [`Overlay`](overlay::Overlay) lifecycle shared by dialog and sidebar |
//! | [`focus`] | [`FocusScope`](focus::FocusScope) bounds computation and Tab-cycle trap |
//! | [`key`] | Key-binding helpers (the close key) |

pub mod dialog;
pub mod focus;
pub mod key;
pub mod overlay;
pub mod sidebar;

pub use dialog::Dialog;
pub use focus::{FocusBounds, FocusScope};
pub use key::{Binding, KeyCombination};
pub use overlay::{
    InitialFocus, OpenRequest, OpenRequester, Overlay, OverlayNotice, OverlayOptions,
    OverlayState, OverlayStyle,
};
pub use sidebar::{Sidebar, SidebarLayout, SidebarOptions};

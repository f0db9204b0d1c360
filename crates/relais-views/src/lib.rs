//! Relais View Management
//!
//! A view is an external site shown in a frameless window, paired with a
//! small ctrl window holding its controls. This crate owns the host-side
//! model of views, the rules for labels, zoom and transparency, and the
//! [`Desktop`]/[`Surface`] seam through which the host drives real windows.

mod address;
mod error;
mod headless;
pub mod label;
mod manager;
mod surface;
mod view;

pub use address::normalize_view_url;
pub use error::{SurfaceError, ViewError};
pub use headless::{HeadlessDesktop, HeadlessSurface, SurfaceState};
pub use manager::ViewManager;
pub use surface::{
    focus, Desktop, Position, Surface, SurfaceContent, SurfaceRequest, SurfaceResult,
    CTRL_ROUTE, CTRL_SIZE, VIEW_MIN_INNER_SIZE,
};
pub use view::{alpha_from_unit, View, OPAQUE, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

pub type Result<T> = std::result::Result<T, ViewError>;

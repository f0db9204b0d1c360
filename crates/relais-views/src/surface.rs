//! Platform seam for on-screen windows
//!
//! The host never talks to a windowing toolkit directly. It asks a
//! [`Desktop`] to open surfaces and drives them through [`Surface`]. The Tauri
//! shell implements both over webview windows; [`crate::HeadlessDesktop`]
//! implements them in memory.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SurfaceError;
use crate::label;

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Inner size of a ctrl window, excluding decorations.
pub const CTRL_SIZE: (f64, f64) = (40.0, 320.0);
/// Smallest inner size a view can be resized to.
pub const VIEW_MIN_INNER_SIZE: (f64, f64) = (400.0, 400.0);
/// App route rendered inside ctrl windows.
pub const CTRL_ROUTE: &str = "/ctrl";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceContent {
    /// A remote site
    External(Url),
    /// A route of the bundled frontend
    App(String),
}

/// Everything needed to build a window.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRequest {
    pub label: String,
    pub title: String,
    pub content: SurfaceContent,
    pub transparent: bool,
    pub decorations: bool,
    pub resizable: bool,
    pub skip_taskbar: bool,
    pub inner_size: Option<(f64, f64)>,
    pub min_inner_size: Option<(f64, f64)>,
}

impl SurfaceRequest {
    /// Frameless, transparent-capable window showing an external site.
    pub fn view(label: impl Into<String>, title: impl Into<String>, url: Url) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            content: SurfaceContent::External(url),
            transparent: true,
            decorations: false,
            resizable: true,
            skip_taskbar: false,
            inner_size: None,
            min_inner_size: Some(VIEW_MIN_INNER_SIZE),
        }
    }

    /// Companion window carrying the controls of `view_label`.
    pub fn ctrl(view_label: &str) -> Self {
        Self {
            label: label::ctrl_label(view_label),
            title: "ctrl".to_string(),
            content: SurfaceContent::App(CTRL_ROUTE.to_string()),
            transparent: true,
            decorations: false,
            resizable: false,
            skip_taskbar: cfg!(not(debug_assertions)),
            inner_size: Some(CTRL_SIZE),
            min_inner_size: None,
        }
    }
}

/// One on-screen window.
pub trait Surface: Send + Sync {
    fn label(&self) -> &str;

    fn show(&self) -> SurfaceResult<()>;

    fn hide(&self) -> SurfaceResult<()>;

    fn set_focus(&self) -> SurfaceResult<()>;

    fn minimize(&self) -> SurfaceResult<()>;

    fn close(&self) -> SurfaceResult<()>;

    /// Begin an OS-driven move of the window under the cursor.
    fn start_dragging(&self) -> SurfaceResult<()>;

    fn set_always_on_top(&self, on_top: bool) -> SurfaceResult<()>;

    /// Let pointer events fall through to whatever is below the window.
    fn set_ignore_cursor_events(&self, ignore: bool) -> SurfaceResult<()>;

    /// 255 is fully opaque.
    fn set_alpha(&self, alpha: u8) -> SurfaceResult<()>;

    /// Page zoom factor, 1.0 is 100 %.
    fn set_zoom(&self, factor: f64) -> SurfaceResult<()>;

    fn outer_position(&self) -> SurfaceResult<Position>;

    fn set_position(&self, position: Position) -> SurfaceResult<()>;
}

/// Window factory and registry of the platform.
pub trait Desktop: Send + Sync {
    fn open(&self, request: SurfaceRequest) -> SurfaceResult<Arc<dyn Surface>>;

    /// Live surface by label, `None` once it has been closed.
    fn surface(&self, label: &str) -> Option<Arc<dyn Surface>>;

    /// Terminate the application.
    fn exit(&self, code: i32);
}

/// Show a window and bring it to the front.
pub fn focus(surface: &dyn Surface) -> SurfaceResult<()> {
    surface.show()?;
    surface.set_focus()
}

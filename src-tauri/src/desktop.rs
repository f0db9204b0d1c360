//! Webview windows behind the host's `Desktop` seam

use std::sync::Arc;

use relais_views::{
    Desktop, Position, Surface, SurfaceContent, SurfaceError, SurfaceRequest, SurfaceResult,
};
use tauri::{AppHandle, Manager, PhysicalPosition, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

fn platform(e: tauri::Error) -> SurfaceError {
    SurfaceError::Platform(e.to_string())
}

/// Script fading the page of a view; webviews have no portable window alpha.
pub fn opacity_script(alpha: u8) -> String {
    format!(
        "document.documentElement.style.opacity = '{:.3}';",
        f64::from(alpha) / 255.0
    )
}

pub struct TauriSurface {
    label: String,
    window: WebviewWindow,
}

impl TauriSurface {
    pub fn new(window: WebviewWindow) -> Self {
        Self {
            label: window.label().to_string(),
            window,
        }
    }
}

impl Surface for TauriSurface {
    fn label(&self) -> &str {
        &self.label
    }

    fn show(&self) -> SurfaceResult<()> {
        self.window.unminimize().map_err(platform)?;
        self.window.show().map_err(platform)
    }

    fn hide(&self) -> SurfaceResult<()> {
        self.window.hide().map_err(platform)
    }

    fn set_focus(&self) -> SurfaceResult<()> {
        self.window.set_focus().map_err(platform)
    }

    fn minimize(&self) -> SurfaceResult<()> {
        self.window.minimize().map_err(platform)
    }

    fn close(&self) -> SurfaceResult<()> {
        self.window.close().map_err(platform)
    }

    fn start_dragging(&self) -> SurfaceResult<()> {
        self.window.start_dragging().map_err(platform)
    }

    fn set_always_on_top(&self, on_top: bool) -> SurfaceResult<()> {
        self.window.set_always_on_top(on_top).map_err(platform)
    }

    fn set_ignore_cursor_events(&self, ignore: bool) -> SurfaceResult<()> {
        self.window.set_ignore_cursor_events(ignore).map_err(platform)
    }

    fn set_alpha(&self, alpha: u8) -> SurfaceResult<()> {
        self.window.eval(&opacity_script(alpha)).map_err(platform)
    }

    fn set_zoom(&self, factor: f64) -> SurfaceResult<()> {
        self.window.set_zoom(factor).map_err(platform)
    }

    fn outer_position(&self) -> SurfaceResult<Position> {
        let position = self.window.outer_position().map_err(platform)?;
        Ok(Position::new(position.x, position.y))
    }

    fn set_position(&self, position: Position) -> SurfaceResult<()> {
        self.window
            .set_position(PhysicalPosition::new(position.x, position.y))
            .map_err(platform)
    }
}

pub struct TauriDesktop {
    app: AppHandle,
}

impl TauriDesktop {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Desktop for TauriDesktop {
    fn open(&self, request: SurfaceRequest) -> SurfaceResult<Arc<dyn Surface>> {
        if self.app.get_webview_window(&request.label).is_some() {
            return Err(SurfaceError::AlreadyExists(request.label));
        }

        let url = match request.content {
            SurfaceContent::External(url) => WebviewUrl::External(url),
            SurfaceContent::App(route) => WebviewUrl::App(route.into()),
        };

        let mut builder = WebviewWindowBuilder::new(&self.app, request.label.as_str(), url)
            .title(request.title.as_str())
            .decorations(request.decorations)
            .resizable(request.resizable)
            .skip_taskbar(request.skip_taskbar);

        #[cfg(not(target_os = "macos"))]
        {
            builder = builder.transparent(request.transparent);
        }
        if let Some((width, height)) = request.inner_size {
            builder = builder.inner_size(width, height);
        }
        if let Some((width, height)) = request.min_inner_size {
            builder = builder.min_inner_size(width, height);
        }

        let window = builder.build().map_err(platform)?;
        tracing::debug!(label = %request.label, "Opened window");

        Ok(Arc::new(TauriSurface::new(window)))
    }

    fn surface(&self, label: &str) -> Option<Arc<dyn Surface>> {
        let window = self.app.get_webview_window(label)?;
        Some(Arc::new(TauriSurface::new(window)))
    }

    fn exit(&self, code: i32) {
        self.app.exit(code);
    }
}

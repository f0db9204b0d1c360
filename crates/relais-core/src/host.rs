//! Host state container
//!
//! The host owns every piece of state the windows show. Frontends only ever
//! see snapshots: after each change the host pushes `update_windows` and
//! `update_state` on its [`EventBus`].
//!
//! Commands carry the label of the window they came from. A command from a
//! ctrl window acts on the view that ctrl window belongs to.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use url::Url;

use relais_bridge::{AppState, Event, EventEnvelope, UpdateState, UpdateWindows, WindowData};
use relais_storage::Database;
use relais_views::label::{self, MAIN_LABEL};
use relais_views::{
    alpha_from_unit, focus, normalize_view_url, Desktop, Surface, SurfaceError, SurfaceRequest,
    SurfaceResult, View, ViewError, ViewManager, OPAQUE, ZOOM_DEFAULT,
};

use crate::config::Config;
use crate::events::EventBus;
use crate::Result;

/// Settings key holding the alpha last used by `toggle_transparent`.
const TRANSPARENT_ALPHA_KEY: &str = "transparent_alpha";

pub struct Host {
    config: Arc<RwLock<Config>>,
    db: Database,
    views: ViewManager,
    desktop: Arc<dyn Desktop>,
    events: EventBus,
}

impl Host {
    /// Open the database named by `config` and build a host on it.
    pub fn new(config: Config, desktop: Arc<dyn Desktop>) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db, desktop)
    }

    pub fn with_database(mut config: Config, db: Database, desktop: Arc<dyn Desktop>) -> Result<Self> {
        config.validate()?;

        if let Some(saved) = db.get_setting(TRANSPARENT_ALPHA_KEY)? {
            match saved.parse::<f64>() {
                Ok(alpha) if (0.0..=1.0).contains(&alpha) => config.transparent_alpha = alpha,
                _ => tracing::warn!(value = %saved, "Ignoring invalid saved transparent alpha"),
            }
        }

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            views: ViewManager::new(db.clone()),
            db,
            desktop,
            events: EventBus::new(),
        })
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Reopen the views saved by the previous run. Returns how many came back.
    ///
    /// A view that cannot be reopened is dropped from storage.
    pub fn restore(&self) -> Result<usize> {
        if !self.config.read().restore_views {
            tracing::debug!("View restore disabled");
            return Ok(0);
        }

        let mut restored = 0;
        for view in self.views.load_saved()? {
            if self.views.contains(&view.label) {
                continue;
            }

            let label = view.label.clone();
            let reopened = self
                .open_surfaces(&view)
                .and_then(|_| Ok(self.views.register(view)?));
            match reopened {
                Ok(_) => restored += 1,
                Err(e) => {
                    tracing::warn!(label = %label, error = %e, "Dropping view that failed to restore");
                    self.close_surfaces(&label);
                    self.views.forget_saved(&label)?;
                }
            }
        }

        tracing::info!(count = restored, "Restored views");
        self.emit_state();

        Ok(restored)
    }

    /// Open `url` in a new view, labelled `label` or a fresh `window_<uuid>`.
    pub fn view_create(&self, url: &str, label: Option<String>) -> Result<View> {
        let label = label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(label::new_view_label);

        if self.views.contains(&label) {
            return Err(ViewError::AlreadyExists(label).into());
        }

        let url = normalize_view_url(url)?;
        let view = View::new(label, url.to_string(), String::new())?;

        self.open_surfaces(&view)?;
        let label = view.label.clone();
        let view = match self.views.register(view) {
            Ok(view) => view,
            Err(e) => {
                self.close_surfaces(&label);
                return Err(e.into());
            }
        };

        tracing::info!(label = %view.label, url = %view.url, "Created view");
        self.emit_state();

        Ok(view)
    }

    /// Close a view and its ctrl window.
    pub fn view_close(&self, label: &str) -> Result<()> {
        self.views.remove(label)?;
        self.close_surfaces(label);

        tracing::info!(label = %label, "Closed view");
        self.emit_state();

        Ok(())
    }

    /// The platform reports a window is gone. Returns whether it was a view.
    pub fn view_closed(&self, label: &str) -> Result<bool> {
        if label::is_ctrl_label(label) || !self.views.contains(label) {
            return Ok(false);
        }

        self.views.remove(label)?;
        if let Some(ctrl) = self.desktop.surface(&label::ctrl_label(label)) {
            if let Err(e) = ctrl.close() {
                tracing::warn!(label = %label, error = %e, "Failed to close ctrl window");
            }
        }

        tracing::info!(label = %label, "View window closed");
        self.emit_state();

        Ok(true)
    }

    pub fn window_focus(&self, origin: &str) -> Result<()> {
        Ok(focus(self.surface(origin)?.as_ref())?)
    }

    pub fn window_hide(&self, origin: &str) -> Result<()> {
        Ok(self.surface(origin)?.hide()?)
    }

    pub fn main_window_focus(&self) -> Result<()> {
        self.window_focus(MAIN_LABEL)
    }

    pub fn get_ignore_cursor_events(&self, origin: &str) -> Result<bool> {
        Ok(self.target(origin)?.ignore_cursor)
    }

    pub fn set_ignore_cursor_events(&self, origin: &str, value: bool) -> Result<()> {
        let (target, surface) = self.target_surface(origin)?;
        self.views.update(target, |view| {
            surface.set_ignore_cursor_events(value)?;
            view.set_ignore_cursor(value);
            Ok(())
        })?;

        tracing::debug!(label = %target, value, "Set click-through");
        self.emit_state();
        Ok(())
    }

    /// Flip click-through, returning the new value.
    pub fn toggle_ignore_cursor_events(&self, origin: &str) -> Result<bool> {
        let value = !self.get_ignore_cursor_events(origin)?;
        self.set_ignore_cursor_events(origin, value)?;
        Ok(value)
    }

    pub fn get_pin(&self, origin: &str) -> Result<bool> {
        Ok(self.target(origin)?.pin)
    }

    /// Keep a view and its ctrl window above other windows.
    pub fn set_pin(&self, origin: &str, value: bool) -> Result<()> {
        let (target, surface) = self.target_surface(origin)?;
        let ctrl = self.desktop.surface(&label::ctrl_label(target));

        self.views.update(target, |view| {
            surface.set_always_on_top(value)?;
            if let Some(ctrl) = &ctrl {
                ctrl.set_always_on_top(value)?;
            }
            view.set_pin(value);
            Ok(())
        })?;

        tracing::debug!(label = %target, value, "Set pin");
        self.emit_state();
        Ok(())
    }

    /// Flip always-on-top, returning the new value.
    pub fn toggle_pin(&self, origin: &str) -> Result<bool> {
        let value = !self.get_pin(origin)?;
        self.set_pin(origin, value)?;
        Ok(value)
    }

    pub fn get_transparent(&self, origin: &str) -> Result<bool> {
        Ok(self.target(origin)?.is_transparent())
    }

    /// Apply `alpha` in `[0.0, 1.0]` to the target view.
    pub fn set_transparent(&self, origin: &str, alpha: f64) -> Result<()> {
        let alpha = alpha_from_unit(alpha)?;
        self.apply_alpha(origin, alpha)?;
        self.emit_state();
        Ok(())
    }

    /// Go opaque when transparent, else apply `alpha`. Returns whether the
    /// view is transparent afterwards.
    ///
    /// `alpha` is remembered as the default for the next start.
    pub fn toggle_transparent(&self, origin: &str, alpha: f64) -> Result<bool> {
        let requested = alpha_from_unit(alpha)?;

        let next = if self.target(origin)?.is_transparent() {
            OPAQUE
        } else {
            requested
        };
        self.apply_alpha(origin, next)?;

        self.db.set_setting(TRANSPARENT_ALPHA_KEY, &alpha.to_string())?;
        self.config.write().transparent_alpha = alpha;

        self.emit_state();
        Ok(next < OPAQUE)
    }

    /// Fade every view to the configured alpha, or bring them all back to
    /// opaque when none is left opaque. Returns whether views are transparent
    /// afterwards.
    pub fn toggle_overlay(&self) -> Result<bool> {
        let views = self.views.list();
        if views.is_empty() {
            return Ok(false);
        }

        let alpha = if views.iter().any(|v| !v.is_transparent()) {
            alpha_from_unit(self.config.read().transparent_alpha)?
        } else {
            OPAQUE
        };

        let count = self.views.update_all(|view| {
            let surface = self
                .desktop
                .surface(&view.label)
                .ok_or_else(|| SurfaceError::NotFound(view.label.clone()))?;
            self.paint_alpha(&view.label, surface.as_ref(), alpha)?;
            view.set_alpha(alpha);
            Ok(())
        })?;

        tracing::info!(count, alpha, "Toggled overlay");
        self.emit_state();
        Ok(alpha < OPAQUE)
    }

    /// Move the target view with the pointer.
    pub fn view_drag(&self, origin: &str) -> Result<()> {
        let (_, surface) = self.target_surface(origin)?;
        Ok(surface.start_dragging()?)
    }

    pub fn view_minimize(&self, origin: &str) -> Result<()> {
        let (_, surface) = self.target_surface(origin)?;
        Ok(surface.minimize()?)
    }

    pub fn view_zoomin(&self, origin: &str) -> Result<u32> {
        self.zoom(origin, View::zoom_in)
    }

    pub fn view_zoomout(&self, origin: &str) -> Result<u32> {
        self.zoom(origin, View::zoom_out)
    }

    pub fn get_windows(&self) -> Vec<WindowData> {
        self.views.list().iter().map(window_data).collect()
    }

    pub fn get_state(&self) -> Result<AppState> {
        let config = serde_json::to_string(&self.config.read().frontend())?;
        Ok(AppState {
            config,
            windows: self.get_windows(),
        })
    }

    /// Record values logged by a frontend window.
    pub fn log(&self, origin: &str, values: &[String]) {
        tracing::info!(target: "frontend", origin = %origin, "{}", values.join(" "));
    }

    pub fn exit(&self) {
        tracing::info!("Exit requested");
        self.desktop.exit(0);
    }

    fn zoom(&self, origin: &str, step: fn(&mut View) -> u32) -> Result<u32> {
        let (target, surface) = self.target_surface(origin)?;

        let percent = self.views.update(target, |view| {
            let percent = step(view);
            surface.set_zoom(view.zoom_factor())?;
            Ok(percent)
        })?;

        tracing::debug!(label = %target, percent, "Set zoom");
        self.emit_state();
        Ok(percent)
    }

    fn apply_alpha(&self, origin: &str, alpha: u8) -> Result<()> {
        let (target, surface) = self.target_surface(origin)?;

        self.views.update(target, |view| {
            self.paint_alpha(target, surface.as_ref(), alpha)?;
            view.set_alpha(alpha);
            Ok(())
        })?;

        tracing::debug!(label = %target, alpha, "Set alpha");
        Ok(())
    }

    /// A transparent view hides its controls.
    fn paint_alpha(&self, label: &str, surface: &dyn Surface, alpha: u8) -> SurfaceResult<()> {
        surface.set_alpha(alpha)?;
        if let Some(ctrl) = self.desktop.surface(&label::ctrl_label(label)) {
            if alpha < OPAQUE {
                ctrl.hide()?;
            } else {
                ctrl.show()?;
            }
        }
        Ok(())
    }

    /// The view a command from `origin` acts on.
    fn target(&self, origin: &str) -> Result<View> {
        Ok(self.views.get(label::view_label(origin))?)
    }

    /// Label and window of the view a command from `origin` acts on.
    fn target_surface<'a>(&self, origin: &'a str) -> Result<(&'a str, Arc<dyn Surface>)> {
        let target = label::view_label(origin);
        if !self.views.contains(target) {
            return Err(ViewError::NotFound(target.to_string()).into());
        }
        Ok((target, self.surface(target)?))
    }

    fn surface(&self, label: &str) -> Result<Arc<dyn Surface>> {
        self.desktop
            .surface(label)
            .ok_or_else(|| SurfaceError::NotFound(label.to_string()).into())
    }

    /// Open the ctrl window and the view next to it, applying saved state.
    fn open_surfaces(&self, view: &View) -> Result<()> {
        let url = Url::parse(&view.url).map_err(|e| ViewError::InvalidUrl(e.to_string()))?;

        let ctrl = self.desktop.open(SurfaceRequest::ctrl(&view.label))?;
        let surface = match self
            .desktop
            .open(SurfaceRequest::view(view.label.as_str(), view.title.as_str(), url))
        {
            Ok(surface) => surface,
            Err(e) => {
                let _ = ctrl.close();
                return Err(e.into());
            }
        };

        let applied = (|| -> std::result::Result<(), SurfaceError> {
            surface.set_position(label::view_position(ctrl.outer_position()?))?;
            if view.pin {
                surface.set_always_on_top(true)?;
                ctrl.set_always_on_top(true)?;
            }
            if view.ignore_cursor {
                surface.set_ignore_cursor_events(true)?;
            }
            if view.is_transparent() {
                surface.set_alpha(view.alpha)?;
                ctrl.hide()?;
            }
            if view.zoom_percent != ZOOM_DEFAULT {
                surface.set_zoom(view.zoom_factor())?;
            }
            Ok(())
        })();

        if let Err(e) = applied {
            let _ = surface.close();
            let _ = ctrl.close();
            return Err(e.into());
        }

        Ok(())
    }

    /// Close whatever is left of a view's windows.
    fn close_surfaces(&self, label: &str) {
        for window in [label::ctrl_label(label), label.to_string()] {
            if let Some(surface) = self.desktop.surface(&window) {
                if let Err(e) = surface.close() {
                    tracing::warn!(label = %window, error = %e, "Failed to close window");
                }
            }
        }
    }

    fn emit_state(&self) {
        let windows = self.get_windows();
        self.events.emit(UpdateWindows::NAME, &windows);

        match self.get_state() {
            Ok(state) => self.events.emit(UpdateState::NAME, &state),
            Err(e) => tracing::error!(error = %e, "Failed to build state snapshot"),
        }
    }
}

impl Clone for Host {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            db: self.db.clone(),
            views: self.views.clone(),
            desktop: Arc::clone(&self.desktop),
            events: self.events.clone(),
        }
    }
}

fn window_data(view: &View) -> WindowData {
    WindowData {
        title: view.title.clone(),
        label: view.label.clone(),
        ignore: view.ignore_cursor,
        pin: view.pin,
        zoom: view.zoom_factor(),
    }
}

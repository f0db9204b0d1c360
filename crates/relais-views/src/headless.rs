//! In-memory desktop
//!
//! Records what the host asks of each window instead of drawing anything.
//! Used by the test suites and by headless host runs.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SurfaceError;
use crate::label::MAIN_LABEL;
use crate::surface::{
    Desktop, Position, Surface, SurfaceContent, SurfaceRequest, SurfaceResult,
};
use crate::view::OPAQUE;

/// Everything applied to a headless window so far.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub title: String,
    pub content: SurfaceContent,
    pub visible: bool,
    pub focused: bool,
    pub minimized: bool,
    pub closed: bool,
    pub always_on_top: bool,
    pub ignore_cursor_events: bool,
    pub alpha: u8,
    pub zoom: f64,
    pub position: Position,
    pub drag_count: u32,
}

impl SurfaceState {
    fn new(title: String, content: SurfaceContent, position: Position) -> Self {
        Self {
            title,
            content,
            visible: true,
            focused: false,
            minimized: false,
            closed: false,
            always_on_top: false,
            ignore_cursor_events: false,
            alpha: OPAQUE,
            zoom: 1.0,
            position,
            drag_count: 0,
        }
    }
}

pub struct HeadlessSurface {
    label: String,
    state: Mutex<SurfaceState>,
    broken: Mutex<bool>,
}

impl HeadlessSurface {
    fn new(label: String, state: SurfaceState) -> Self {
        Self {
            label,
            state: Mutex::new(state),
            broken: Mutex::new(false),
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state.lock().clone()
    }

    /// Make every later operation on this window fail.
    pub fn break_surface(&self) {
        *self.broken.lock() = true;
    }

    fn apply<F>(&self, f: F) -> SurfaceResult<()>
    where
        F: FnOnce(&mut SurfaceState),
    {
        if *self.broken.lock() {
            return Err(SurfaceError::Platform(format!(
                "{} is not responding",
                self.label
            )));
        }

        let mut state = self.state.lock();
        if state.closed {
            return Err(SurfaceError::NotFound(self.label.clone()));
        }
        f(&mut state);
        Ok(())
    }
}

impl Surface for HeadlessSurface {
    fn label(&self) -> &str {
        &self.label
    }

    fn show(&self) -> SurfaceResult<()> {
        self.apply(|s| {
            s.visible = true;
            s.minimized = false;
        })
    }

    fn hide(&self) -> SurfaceResult<()> {
        self.apply(|s| {
            s.visible = false;
            s.focused = false;
        })
    }

    fn set_focus(&self) -> SurfaceResult<()> {
        self.apply(|s| s.focused = true)
    }

    fn minimize(&self) -> SurfaceResult<()> {
        self.apply(|s| {
            s.minimized = true;
            s.focused = false;
        })
    }

    fn close(&self) -> SurfaceResult<()> {
        self.apply(|s| {
            s.closed = true;
            s.visible = false;
        })
    }

    fn start_dragging(&self) -> SurfaceResult<()> {
        self.apply(|s| s.drag_count += 1)
    }

    fn set_always_on_top(&self, on_top: bool) -> SurfaceResult<()> {
        self.apply(|s| s.always_on_top = on_top)
    }

    fn set_ignore_cursor_events(&self, ignore: bool) -> SurfaceResult<()> {
        self.apply(|s| s.ignore_cursor_events = ignore)
    }

    fn set_alpha(&self, alpha: u8) -> SurfaceResult<()> {
        self.apply(|s| s.alpha = alpha)
    }

    fn set_zoom(&self, factor: f64) -> SurfaceResult<()> {
        self.apply(|s| s.zoom = factor)
    }

    fn outer_position(&self) -> SurfaceResult<Position> {
        let mut position = Position::default();
        self.apply(|s| position = s.position)?;
        Ok(position)
    }

    fn set_position(&self, position: Position) -> SurfaceResult<()> {
        self.apply(|s| s.position = position)
    }
}

/// Desktop whose windows only exist in memory.
pub struct HeadlessDesktop {
    surfaces: Arc<RwLock<HashMap<String, Arc<HeadlessSurface>>>>,
    /// Labels whose next `open` fails
    refuse: Arc<Mutex<Vec<String>>>,
    exit_code: Arc<Mutex<Option<i32>>>,
}

impl HeadlessDesktop {
    /// An empty desktop with only the main window.
    pub fn new() -> Self {
        let desktop = Self {
            surfaces: Arc::new(RwLock::new(HashMap::new())),
            refuse: Arc::new(Mutex::new(Vec::new())),
            exit_code: Arc::new(Mutex::new(None)),
        };

        let main = SurfaceState::new(
            "Relais".to_string(),
            SurfaceContent::App("/".to_string()),
            Position::default(),
        );
        desktop.surfaces.write().insert(
            MAIN_LABEL.to_string(),
            Arc::new(HeadlessSurface::new(MAIN_LABEL.to_string(), main)),
        );

        desktop
    }

    /// Concrete handle for inspection, including closed windows.
    pub fn headless(&self, label: &str) -> Option<Arc<HeadlessSurface>> {
        self.surfaces.read().get(label).cloned()
    }

    /// Current state of a window, including closed ones.
    pub fn state(&self, label: &str) -> Option<SurfaceState> {
        self.headless(label).map(|s| s.state())
    }

    /// Make the next `open` for `label` fail.
    pub fn refuse_open(&self, label: &str) {
        self.refuse.lock().push(label.to_string());
    }

    /// Labels of windows that have not been closed, sorted.
    pub fn open_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .surfaces
            .read()
            .iter()
            .filter(|(_, s)| !s.state().closed)
            .map(|(label, _)| label.clone())
            .collect();
        labels.sort();
        labels
    }

    pub fn exit_code(&self) -> Option<i32> {
        *self.exit_code.lock()
    }
}

impl Default for HeadlessDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HeadlessDesktop {
    fn clone(&self) -> Self {
        Self {
            surfaces: Arc::clone(&self.surfaces),
            refuse: Arc::clone(&self.refuse),
            exit_code: Arc::clone(&self.exit_code),
        }
    }
}

impl Desktop for HeadlessDesktop {
    fn open(&self, request: SurfaceRequest) -> SurfaceResult<Arc<dyn Surface>> {
        {
            let mut refuse = self.refuse.lock();
            if let Some(idx) = refuse.iter().position(|l| *l == request.label) {
                refuse.remove(idx);
                return Err(SurfaceError::Platform(format!(
                    "failed to create window {}",
                    request.label
                )));
            }
        }

        let mut surfaces = self.surfaces.write();
        if let Some(existing) = surfaces.get(&request.label) {
            if !existing.state().closed {
                return Err(SurfaceError::AlreadyExists(request.label));
            }
        }

        // Cascade new windows so they do not stack exactly
        let offset = 20 * surfaces.len() as i32;
        let state = SurfaceState::new(
            request.title,
            request.content,
            Position::new(offset, offset),
        );
        let surface = Arc::new(HeadlessSurface::new(request.label.clone(), state));
        surfaces.insert(request.label, Arc::clone(&surface));

        Ok(surface)
    }

    fn surface(&self, label: &str) -> Option<Arc<dyn Surface>> {
        let surface = self.surfaces.read().get(label).cloned()?;
        if surface.state().closed {
            return None;
        }
        Some(surface)
    }

    fn exit(&self, code: i32) {
        tracing::info!(code, "Headless desktop exit requested");
        *self.exit_code.lock() = Some(code);
    }
}

//! Application state management
use std::sync::Arc;

use relais_core::{Config, Host, Result};

use crate::desktop::TauriDesktop;

/// Managed by Tauri and shared by every command.
pub struct AppState {
    host: Arc<Host>,
}

impl AppState {
    pub fn new(desktop: TauriDesktop) -> Result<Self> {
        let path = Config::default_path();
        let config = Config::load_or_create(&path)?;
        tracing::info!(path = %path.display(), "Loaded config");

        let host = Host::new(config, Arc::new(desktop))?;

        Ok(Self {
            host: Arc::new(host),
        })
    }

    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }
}

//! Platform opener over `tauri-plugin-opener`

use async_trait::async_trait;
use relais_bridge::{OpenError, Opener};
use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;

/// Whether `path` should go to the browser rather than the file manager.
pub fn is_url(path: &str) -> bool {
    path.contains("://") || path.starts_with("mailto:")
}

pub struct PlatformOpener {
    app: AppHandle,
}

impl PlatformOpener {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl Opener for PlatformOpener {
    async fn open(&self, path: &str) -> Result<(), OpenError> {
        let opener = self.app.opener();
        let opened = if is_url(path) {
            opener.open_url(path, None::<&str>)
        } else {
            opener.open_path(path, None::<&str>)
        };

        opened.map_err(|e| OpenError {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

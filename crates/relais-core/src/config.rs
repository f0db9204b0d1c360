//! Host configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_SHORTCUT_KEY: &str = "ctrl+alt+r";
pub const DEFAULT_TRANSPARENT_ALPHA: f64 = 0.5;
pub const CONFIG_FILE_NAME: &str = "relais.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Global shortcut that brings the main window forward
    pub shortcut_key: String,
    /// Alpha applied when a view is toggled transparent
    pub transparent_alpha: f64,
    /// Reopen the views of the previous run on start
    pub restore_views: bool,
}

/// The part of [`Config`] the frontend gets to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendConfig {
    pub shortcut_key: String,
    pub transparent_alpha: f64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("relais.db"),
            shortcut_key: DEFAULT_SHORTCUT_KEY.to_string(),
            transparent_alpha: DEFAULT_TRANSPARENT_ALPHA,
            restore_views: true,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Relais"))
            .unwrap_or_else(|| PathBuf::from(".relais"))
    }

    /// Where the config file lives by default.
    pub fn default_path() -> PathBuf {
        Self::data_dir().join(CONFIG_FILE_NAME)
    }

    /// Load `path`, writing the defaults there first when it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let config = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => Self::new(dir.to_path_buf()),
            _ => Self::default(),
        };
        config.save(path)?;

        tracing::info!(path = %path.display(), "Created default config");
        Ok(config)
    }

    /// Write the config as pretty JSON, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        let io_error = |e: std::io::Error| CoreError::Config(format!("{}: {}", path.display(), e));

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_error)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw).map_err(io_error)?;
        Ok(())
    }

    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.transparent_alpha) {
            return Err(CoreError::Config(format!(
                "transparent_alpha must be between 0 and 1, got {}",
                self.transparent_alpha
            )));
        }
        if self.shortcut_key.trim().is_empty() {
            return Err(CoreError::Config("shortcut_key cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn frontend(&self) -> FrontendConfig {
        FrontendConfig {
            shortcut_key: self.shortcut_key.clone(),
            transparent_alpha: self.transparent_alpha,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/relais"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/relais/relais.db"));
        assert_eq!(config.shortcut_key, "ctrl+alt+r");
        assert_eq!(config.transparent_alpha, 0.5);
        assert!(config.restore_views);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"restore_views": false}"#).unwrap();
        assert!(!config.restore_views);
        assert_eq!(config.shortcut_key, DEFAULT_SHORTCUT_KEY);
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        let mut config = Config::new(PathBuf::from("/tmp/relais"));
        config.transparent_alpha = 1.5;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_load_or_create_writes_defaults_then_reads_them() {
        let dir = std::env::temp_dir().join(format!("relais-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);
        let _ = std::fs::remove_dir_all(&dir);

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.database_path, dir.join("relais.db"));

        let mut edited = created.clone();
        edited.restore_views = false;
        edited.transparent_alpha = 0.25;
        edited.save(&path).unwrap();

        let loaded = Config::load_or_create(&path).unwrap();
        assert_eq!(loaded, edited);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reports_path() {
        let err = Config::load(Path::new("/nonexistent/relais.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/relais.json"));
    }
}

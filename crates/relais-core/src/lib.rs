//! Relais Core
//!
//! The host side of Relais. [`Host`] owns the views, their windows and the
//! persisted state; frontends reach it through [`Host::dispatch`], either in
//! process via [`LocalTransport`] or over a byte stream via [`serve`].

mod config;
mod dispatch;
mod error;
mod events;
mod host;
mod local;
mod server;

pub use config::{
    Config, FrontendConfig, CONFIG_FILE_NAME, DEFAULT_SHORTCUT_KEY, DEFAULT_TRANSPARENT_ALPHA,
};
pub use dispatch::{AlphaArgs, LabelArgs, LogArgs, ValueArgs, ViewCreateArgs, COMMANDS};
pub use error::CoreError;
pub use events::EventBus;
pub use host::Host;
pub use local::LocalTransport;
pub use server::serve;

// Re-export the layers the host is built on
pub use relais_bridge::{AppState, EventEnvelope, WindowData};
pub use relais_storage::{Database, StorageError};
pub use relais_views::{
    Desktop, HeadlessDesktop, Position, Surface, SurfaceContent, SurfaceError, SurfaceRequest,
    View, ViewError,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Honours `RUST_LOG`; defaults to `info`. Values logged by frontend windows
/// carry the `frontend` target.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed by an embedding shell
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

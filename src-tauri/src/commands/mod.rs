//! Tauri IPC Commands
//!
//! Thin adapters from Tauri IPC to the host. Each command passes the label of
//! the calling window along; failures reach the frontend as the error string.

pub mod app;
pub mod ctrl;
pub mod view;

pub type CommandResult<T> = Result<T, String>;

pub(crate) fn err_to_string<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}

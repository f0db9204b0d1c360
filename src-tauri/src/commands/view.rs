//! View lifecycle and movement commands
use tauri::{State, WebviewWindow};

use super::{err_to_string, CommandResult};
use crate::state::AppState;

// Windows are created off the main thread to avoid a deadlock on Windows
#[tauri::command]
pub async fn view_create(
    state: State<'_, AppState>,
    url: String,
    label: Option<String>,
) -> CommandResult<()> {
    state
        .host()
        .view_create(&url, label)
        .map(|_| ())
        .map_err(err_to_string)
}

#[tauri::command]
pub fn view_close(state: State<'_, AppState>, label: String) -> CommandResult<()> {
    state.host().view_close(&label).map_err(err_to_string)
}

#[tauri::command]
pub fn view_drag(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<()> {
    state.host().view_drag(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn view_minimize(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<()> {
    state.host().view_minimize(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn view_zoomin(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<()> {
    state
        .host()
        .view_zoomin(window.label())
        .map(|_| ())
        .map_err(err_to_string)
}

#[tauri::command]
pub fn view_zoomout(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<()> {
    state
        .host()
        .view_zoomout(window.label())
        .map(|_| ())
        .map_err(err_to_string)
}

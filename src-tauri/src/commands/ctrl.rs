//! Pin, click-through and transparency of the calling window's view
use tauri::{State, WebviewWindow};

use super::{err_to_string, CommandResult};
use crate::state::AppState;

#[tauri::command]
pub fn get_pin(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<bool> {
    state.host().get_pin(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn set_pin(window: WebviewWindow, state: State<'_, AppState>, value: bool) -> CommandResult<()> {
    state.host().set_pin(window.label(), value).map_err(err_to_string)
}

#[tauri::command]
pub fn toggle_pin(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<bool> {
    state.host().toggle_pin(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn get_ignore_cursor_events(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> CommandResult<bool> {
    state
        .host()
        .get_ignore_cursor_events(window.label())
        .map_err(err_to_string)
}

#[tauri::command]
pub fn set_ignore_cursor_events(
    window: WebviewWindow,
    state: State<'_, AppState>,
    value: bool,
) -> CommandResult<()> {
    state
        .host()
        .set_ignore_cursor_events(window.label(), value)
        .map_err(err_to_string)
}

#[tauri::command]
pub fn toggle_ignore_cursor_events(
    window: WebviewWindow,
    state: State<'_, AppState>,
) -> CommandResult<bool> {
    state
        .host()
        .toggle_ignore_cursor_events(window.label())
        .map_err(err_to_string)
}

#[tauri::command]
pub fn get_transparent(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<bool> {
    state.host().get_transparent(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn set_transparent(
    window: WebviewWindow,
    state: State<'_, AppState>,
    alpha: f64,
) -> CommandResult<()> {
    state
        .host()
        .set_transparent(window.label(), alpha)
        .map_err(err_to_string)
}

#[tauri::command]
pub fn toggle_transparent(
    window: WebviewWindow,
    state: State<'_, AppState>,
    alpha: f64,
) -> CommandResult<bool> {
    state
        .host()
        .toggle_transparent(window.label(), alpha)
        .map_err(err_to_string)
}

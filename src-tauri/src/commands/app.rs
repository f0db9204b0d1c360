//! Application-wide commands
use relais_core::{AppState as Snapshot, LogArgs, WindowData};
use serde_json::Value;
use tauri::{State, WebviewWindow};

use super::{err_to_string, CommandResult};
use crate::state::AppState;

#[tauri::command]
pub fn exit(state: State<'_, AppState>) -> CommandResult<()> {
    state.host().exit();
    Ok(())
}

#[tauri::command]
pub fn get_windows(state: State<'_, AppState>) -> Vec<WindowData> {
    state.host().get_windows()
}

#[tauri::command]
pub fn get_state(state: State<'_, AppState>) -> CommandResult<Snapshot> {
    state.host().get_state().map_err(err_to_string)
}

#[tauri::command]
pub fn main_window_focus(state: State<'_, AppState>) -> CommandResult<()> {
    state.host().main_window_focus().map_err(err_to_string)
}

#[tauri::command]
pub fn window_focus(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<()> {
    state.host().window_focus(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn window_hide(window: WebviewWindow, state: State<'_, AppState>) -> CommandResult<()> {
    state.host().window_hide(window.label()).map_err(err_to_string)
}

#[tauri::command]
pub fn log(window: WebviewWindow, state: State<'_, AppState>, values: Vec<Value>) {
    let values = LogArgs { values }.rendered();
    state.host().log(window.label(), &values);
}

//! Relais - Tauri Application
//!
//! The host lives in `relais-core`; this crate gives it real windows and
//! exposes its commands over Tauri IPC. Host pushes are re-emitted as Tauri
//! events so every window can mirror the state.

mod commands;
mod desktop;
mod opener;
mod state;

use desktop::TauriDesktop;
use opener::PlatformOpener;
use relais_bridge::Opener;
use state::AppState;
use tauri::menu::{MenuBuilder, MenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Emitter, Manager, WindowEvent};
use tokio::sync::broadcast::error::RecvError;

const MENU_SHOW: &str = "show";
const MENU_OVERLAY: &str = "overlay";
const MENU_DATA_DIR: &str = "data_dir";
const MENU_QUIT: &str = "quit";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    relais_core::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let state = AppState::new(TauriDesktop::new(app.handle().clone()))?;
            forward_events(app.handle().clone(), &state);

            match state.host().restore() {
                Ok(restored) => tracing::info!(restored, "Relais started"),
                Err(e) => tracing::warn!(error = %e, "Failed to restore saved views"),
            }
            app.manage(state);

            build_tray(app.handle())?;

            Ok(())
        })
        .on_window_event(|window, event| match event {
            WindowEvent::CloseRequested { api, .. } if window.label() == relais_views::label::MAIN_LABEL => {
                // The main window only hides; quitting goes through the tray
                api.prevent_close();
                let _ = window.hide();
            }
            WindowEvent::Destroyed => {
                if let Some(state) = window.try_state::<AppState>() {
                    if let Err(e) = state.host().view_closed(window.label()) {
                        tracing::warn!(label = %window.label(), error = %e, "Failed to drop closed view");
                    }
                }
            }
            _ => {}
        })
        .invoke_handler(tauri::generate_handler![
            // App commands
            commands::app::exit,
            commands::app::get_windows,
            commands::app::get_state,
            commands::app::main_window_focus,
            commands::app::window_focus,
            commands::app::window_hide,
            commands::app::log,
            // View commands
            commands::view::view_create,
            commands::view::view_close,
            commands::view::view_drag,
            commands::view::view_minimize,
            commands::view::view_zoomin,
            commands::view::view_zoomout,
            // Ctrl commands
            commands::ctrl::get_pin,
            commands::ctrl::set_pin,
            commands::ctrl::toggle_pin,
            commands::ctrl::get_ignore_cursor_events,
            commands::ctrl::set_ignore_cursor_events,
            commands::ctrl::toggle_ignore_cursor_events,
            commands::ctrl::get_transparent,
            commands::ctrl::set_transparent,
            commands::ctrl::toggle_transparent,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Relais");
}

/// Re-emit host pushes to every window.
fn forward_events(app: AppHandle, state: &AppState) {
    let mut events = state.host().subscribe();

    tauri::async_runtime::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    if let Err(e) = app.emit(&envelope.event, envelope.payload) {
                        tracing::warn!(event = %envelope.event, error = %e, "Failed to emit event");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event forwarding lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn build_tray(app: &AppHandle) -> tauri::Result<()> {
    let show = MenuItem::with_id(app, MENU_SHOW, "Show", true, None::<&str>)?;
    let overlay = MenuItem::with_id(app, MENU_OVERLAY, "Toggle Overlay", true, None::<&str>)?;
    let data_dir = MenuItem::with_id(app, MENU_DATA_DIR, "Open Data Folder", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, MENU_QUIT, "Quit", true, None::<&str>)?;
    let menu = MenuBuilder::new(app)
        .item(&show)
        .item(&overlay)
        .item(&data_dir)
        .separator()
        .item(&quit)
        .build()?;

    let mut tray = TrayIconBuilder::with_id("tray")
        .tooltip("Relais")
        .menu(&menu)
        .on_menu_event(|app, event| match event.id().as_ref() {
            MENU_SHOW => focus_main(app),
            MENU_OVERLAY => {
                if let Some(state) = app.try_state::<AppState>() {
                    if let Err(e) = state.host().toggle_overlay() {
                        tracing::warn!(error = %e, "Failed to toggle overlay");
                    }
                }
            }
            MENU_DATA_DIR => open_data_dir(app),
            MENU_QUIT => match app.try_state::<AppState>() {
                Some(state) => state.host().exit(),
                None => app.exit(0),
            },
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                focus_main(tray.app_handle());
            }
        });
    if let Some(icon) = app.default_window_icon().cloned() {
        tray = tray.icon(icon);
    }
    tray.build(app)?;

    Ok(())
}

fn focus_main(app: &AppHandle) {
    if let Some(state) = app.try_state::<AppState>() {
        if let Err(e) = state.host().main_window_focus() {
            tracing::warn!(error = %e, "Failed to show main window");
        }
    }
}

/// Reveal the folder holding the database and config.
fn open_data_dir(app: &AppHandle) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };
    let dir = match state.host().config().database_path.parent() {
        Some(dir) => dir.to_path_buf(),
        None => return,
    };

    let opener = PlatformOpener::new(app.clone());
    tauri::async_runtime::spawn(async move {
        let path = dir.display().to_string();
        if let Err(e) = opener.open(&path).await {
            tracing::warn!(error = %e, "Failed to open data folder");
        }
    });
}

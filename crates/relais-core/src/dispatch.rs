//! Command dispatch
//!
//! Maps a wire command name and its flat JSON argument record to a [`Host`]
//! call. Every transport goes through [`Host::dispatch`], so the command
//! surface is the same in-process, over a stream, or behind Tauri IPC.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::host::Host;
use crate::Result;

/// Every command the host answers to.
pub const COMMANDS: &[&str] = &[
    "exit",
    "get_windows",
    "get_state",
    "view_create",
    "view_close",
    "main_window_focus",
    "window_focus",
    "window_hide",
    "get_ignore_cursor_events",
    "set_ignore_cursor_events",
    "toggle_ignore_cursor_events",
    "get_pin",
    "set_pin",
    "toggle_pin",
    "get_transparent",
    "set_transparent",
    "toggle_transparent",
    "view_drag",
    "view_minimize",
    "view_zoomin",
    "view_zoomout",
    "log",
];

#[derive(Debug, Deserialize)]
pub struct ViewCreateArgs {
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LabelArgs {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ValueArgs {
    pub value: bool,
}

#[derive(Debug, Deserialize)]
pub struct AlphaArgs {
    pub alpha: f64,
}

#[derive(Debug, Deserialize)]
pub struct LogArgs {
    #[serde(default)]
    pub values: Vec<Value>,
}

impl LogArgs {
    /// Strings as-is, anything else as compact JSON.
    pub fn rendered(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

impl Host {
    /// Run `cmd` on behalf of the window labelled `origin`.
    ///
    /// Failures come back as their display string, ready for the wire.
    pub fn dispatch(&self, origin: &str, cmd: &str, args: Value) -> std::result::Result<Value, String> {
        tracing::debug!(origin = %origin, cmd = %cmd, "Dispatching command");

        self.route(origin, cmd, args).map_err(|e| {
            tracing::warn!(origin = %origin, cmd = %cmd, error = %e, "Command failed");
            e.to_string()
        })
    }

    fn route(&self, origin: &str, cmd: &str, args: Value) -> Result<Value> {
        match cmd {
            "exit" => {
                self.exit();
                reply(())
            }
            "get_windows" => reply(self.get_windows()),
            "get_state" => reply(self.get_state()?),
            "view_create" => {
                let args: ViewCreateArgs = parse(cmd, args)?;
                self.view_create(&args.url, args.label)?;
                reply(())
            }
            "view_close" => {
                let args: LabelArgs = parse(cmd, args)?;
                reply(self.view_close(&args.label)?)
            }
            "main_window_focus" => reply(self.main_window_focus()?),
            "window_focus" => reply(self.window_focus(origin)?),
            "window_hide" => reply(self.window_hide(origin)?),
            "get_ignore_cursor_events" => reply(self.get_ignore_cursor_events(origin)?),
            "set_ignore_cursor_events" => {
                let args: ValueArgs = parse(cmd, args)?;
                reply(self.set_ignore_cursor_events(origin, args.value)?)
            }
            "toggle_ignore_cursor_events" => reply(self.toggle_ignore_cursor_events(origin)?),
            "get_pin" => reply(self.get_pin(origin)?),
            "set_pin" => {
                let args: ValueArgs = parse(cmd, args)?;
                reply(self.set_pin(origin, args.value)?)
            }
            "toggle_pin" => reply(self.toggle_pin(origin)?),
            "get_transparent" => reply(self.get_transparent(origin)?),
            "set_transparent" => {
                let args: AlphaArgs = parse(cmd, args)?;
                reply(self.set_transparent(origin, args.alpha)?)
            }
            "toggle_transparent" => {
                let args: AlphaArgs = parse(cmd, args)?;
                reply(self.toggle_transparent(origin, args.alpha)?)
            }
            "view_drag" => reply(self.view_drag(origin)?),
            "view_minimize" => reply(self.view_minimize(origin)?),
            "view_zoomin" => {
                self.view_zoomin(origin)?;
                reply(())
            }
            "view_zoomout" => {
                self.view_zoomout(origin)?;
                reply(())
            }
            "log" => {
                let args: LogArgs = parse(cmd, args)?;
                self.log(origin, &args.rendered());
                reply(())
            }
            other => Err(CoreError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse<T: DeserializeOwned>(cmd: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| CoreError::InvalidArguments {
        cmd: cmd.to_string(),
        reason: e.to_string(),
    })
}

fn reply<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

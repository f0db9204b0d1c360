//! Typed host commands
//!
//! One method per host command. Wire names are snake_case, argument records
//! use the keys the host expects (`url`, `label`, `value`, `alpha`, `values`).
//! A host-side failure comes back as [`CommandResult::Error`]; only a broken
//! channel or an undecodable reply is an `Err`.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::result::CommandResult;
use crate::transport::{InvokeError, InvokeRequest, Transport, TransportError};
use crate::types::{AppState, WindowData};

type CommandResponse<T> = Result<CommandResult<T>, TransportError>;

#[derive(Clone)]
pub struct Commands<T> {
    transport: T,
    /// Label of the window these commands are issued from
    origin: String,
}

impl<T: Transport> Commands<T> {
    pub fn new(transport: T, origin: impl Into<String>) -> Self {
        Self {
            transport,
            origin: origin.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<R: DeserializeOwned>(&self, cmd: &str, args: Value) -> CommandResponse<R> {
        let request = InvokeRequest::new(cmd, args, self.origin.as_str());
        match self.transport.invoke(request).await {
            Ok(value) => Ok(CommandResult::ok(serde_json::from_value(value)?)),
            Err(InvokeError::Host(error)) => Ok(CommandResult::err(error)),
            Err(InvokeError::Transport(e)) => Err(e),
        }
    }

    pub async fn exit(&self) -> CommandResponse<()> {
        self.call("exit", Value::Null).await
    }

    /// Snapshot of every open view. Host failure is an error here, not a tag.
    pub async fn get_windows(&self) -> Result<Vec<WindowData>, InvokeError> {
        let request = InvokeRequest::new("get_windows", Value::Null, self.origin.as_str());
        let value = self.transport.invoke(request).await?;
        serde_json::from_value(value).map_err(|e| InvokeError::Transport(e.into()))
    }

    pub async fn get_state(&self) -> CommandResponse<AppState> {
        self.call("get_state", Value::Null).await
    }

    /// Open `url` in a new view. The host picks a label when none is given.
    pub async fn view_create(&self, url: &str, label: Option<&str>) -> CommandResponse<()> {
        self.call("view_create", json!({ "url": url, "label": label }))
            .await
    }

    pub async fn view_close(&self, label: &str) -> CommandResponse<()> {
        self.call("view_close", json!({ "label": label })).await
    }

    pub async fn main_window_focus(&self) -> CommandResponse<()> {
        self.call("main_window_focus", Value::Null).await
    }

    pub async fn window_focus(&self) -> CommandResponse<()> {
        self.call("window_focus", Value::Null).await
    }

    pub async fn window_hide(&self) -> CommandResponse<()> {
        self.call("window_hide", Value::Null).await
    }

    pub async fn get_ignore_cursor_events(&self) -> CommandResponse<bool> {
        self.call("get_ignore_cursor_events", Value::Null).await
    }

    pub async fn set_ignore_cursor_events(&self, value: bool) -> CommandResponse<()> {
        self.call("set_ignore_cursor_events", json!({ "value": value }))
            .await
    }

    /// Flip click-through and return the new value.
    pub async fn toggle_ignore_cursor_events(&self) -> CommandResponse<bool> {
        self.call("toggle_ignore_cursor_events", Value::Null).await
    }

    pub async fn get_pin(&self) -> CommandResponse<bool> {
        self.call("get_pin", Value::Null).await
    }

    pub async fn set_pin(&self, value: bool) -> CommandResponse<()> {
        self.call("set_pin", json!({ "value": value })).await
    }

    /// Flip always-on-top and return the new value.
    pub async fn toggle_pin(&self) -> CommandResponse<bool> {
        self.call("toggle_pin", Value::Null).await
    }

    pub async fn get_transparent(&self) -> CommandResponse<bool> {
        self.call("get_transparent", Value::Null).await
    }

    /// Apply `alpha` in `[0.0, 1.0]`.
    pub async fn set_transparent(&self, alpha: f64) -> CommandResponse<()> {
        self.call("set_transparent", json!({ "alpha": alpha })).await
    }

    /// Go opaque if transparent, else apply `alpha`. Returns whether the view
    /// is now transparent.
    pub async fn toggle_transparent(&self, alpha: f64) -> CommandResponse<bool> {
        self.call("toggle_transparent", json!({ "alpha": alpha }))
            .await
    }

    pub async fn view_drag(&self) -> CommandResponse<()> {
        self.call("view_drag", Value::Null).await
    }

    pub async fn view_minimize(&self) -> CommandResponse<()> {
        self.call("view_minimize", Value::Null).await
    }

    pub async fn view_zoomin(&self) -> CommandResponse<()> {
        self.call("view_zoomin", Value::Null).await
    }

    pub async fn view_zoomout(&self) -> CommandResponse<()> {
        self.call("view_zoomout", Value::Null).await
    }

    pub async fn log(&self, values: &[String]) -> CommandResponse<()> {
        self.call("log", json!({ "values": values })).await
    }
}

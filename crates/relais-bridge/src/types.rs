//! Shapes the host pushes to the frontend

use serde::{Deserialize, Serialize};

pub const CTRL_LABEL_PREFIX: &str = "ctrl_";
pub const WINDOW_LABEL_PREFIX: &str = "window_";

/// Frontend mirror of one open view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowData {
    pub title: String,
    pub label: String,
    /// Pointer events pass through the view
    pub ignore: bool,
    /// Always on top
    pub pin: bool,
    /// Zoom factor, 1.0 is 100 %
    pub zoom: f64,
}

/// Whole-application snapshot, replaced on every push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// JSON rendering of the frontend-visible configuration
    pub config: String,
    pub windows: Vec<WindowData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_data_wire_shape() {
        let data = WindowData {
            title: "Chat".to_string(),
            label: "window_1".to_string(),
            ignore: false,
            pin: true,
            zoom: 1.1,
        };

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"title": "Chat", "label": "window_1", "ignore": false, "pin": true, "zoom": 1.1})
        );
    }
}

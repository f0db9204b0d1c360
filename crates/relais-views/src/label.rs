//! Window label rules
//!
//! Every view window `L` has a ctrl window labelled `ctrl_L`. Commands sent
//! from a ctrl window act on its view.

use uuid::Uuid;

use crate::surface::Position;

pub const WINDOW_LABEL_PREFIX: &str = "window_";
pub const CTRL_LABEL_PREFIX: &str = "ctrl_";
pub const MAIN_LABEL: &str = "main";

/// Horizontal distance between a ctrl window and its view.
pub const CTRL_OFFSET: (i32, i32) = (40, 0);

pub fn new_view_label() -> String {
    format!("{}{}", WINDOW_LABEL_PREFIX, Uuid::new_v4())
}

pub fn ctrl_label(view_label: &str) -> String {
    format!("{}{}", CTRL_LABEL_PREFIX, view_label)
}

pub fn is_ctrl_label(label: &str) -> bool {
    label.starts_with(CTRL_LABEL_PREFIX)
}

/// Label of the view a window belongs to: the view itself, or the view behind a ctrl window.
pub fn view_label(origin: &str) -> &str {
    origin.strip_prefix(CTRL_LABEL_PREFIX).unwrap_or(origin)
}

/// Where a view sits given its ctrl window position.
pub fn view_position(ctrl: Position) -> Position {
    Position::new(ctrl.x + CTRL_OFFSET.0, ctrl.y + CTRL_OFFSET.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_label_roundtrip() {
        let ctrl = ctrl_label("v1");
        assert_eq!(ctrl, "ctrl_v1");
        assert!(is_ctrl_label(&ctrl));
        assert_eq!(view_label(&ctrl), "v1");
        assert_eq!(view_label("v1"), "v1");
    }

    #[test]
    fn test_only_leading_prefix_is_stripped() {
        assert_eq!(view_label("ctrl_ctrl_v1"), "ctrl_v1");
        assert_eq!(view_label("my_ctrl_view"), "my_ctrl_view");
    }

    #[test]
    fn test_generated_labels_are_unique() {
        let a = new_view_label();
        let b = new_view_label();
        assert!(a.starts_with(WINDOW_LABEL_PREFIX));
        assert_ne!(a, b);
    }

    #[test]
    fn test_view_sits_right_of_ctrl() {
        let view = view_position(Position::new(100, 50));
        assert_eq!(view, Position::new(140, 50));
    }
}

//! View data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::label;
use crate::Result;

/// Alpha of a fully opaque view.
pub const OPAQUE: u8 = 255;

pub const ZOOM_DEFAULT: u32 = 100;
pub const ZOOM_MIN: u32 = 20;
pub const ZOOM_MAX: u32 = 500;
pub const ZOOM_STEP: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Window label, unique among open views
    pub label: String,
    pub url: String,
    pub title: String,
    /// Always on top
    pub pin: bool,
    /// Pointer events fall through to the window below
    pub ignore_cursor: bool,
    /// Page zoom in percent
    pub zoom_percent: u32,
    /// Alpha currently applied to the window
    pub alpha: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl View {
    pub fn new(label: String, url: String, title: String) -> Result<Self> {
        // A ctrl prefix would make commands from the view target another view
        if label.trim().is_empty() || label::is_ctrl_label(&label) {
            return Err(ViewError::InvalidLabel(label));
        }

        let now = Utc::now();

        Ok(Self {
            label,
            url,
            title,
            pin: false,
            ignore_cursor: false,
            zoom_percent: ZOOM_DEFAULT,
            alpha: OPAQUE,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn zoom_factor(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    /// Step zoom up, stopping at [`ZOOM_MAX`]. Returns the new percentage.
    pub fn zoom_in(&mut self) -> u32 {
        self.set_zoom(self.zoom_percent.saturating_add(ZOOM_STEP))
    }

    /// Step zoom down, stopping at [`ZOOM_MIN`]. Returns the new percentage.
    pub fn zoom_out(&mut self) -> u32 {
        self.set_zoom(self.zoom_percent.saturating_sub(ZOOM_STEP))
    }

    fn set_zoom(&mut self, percent: u32) -> u32 {
        self.zoom_percent = percent.clamp(ZOOM_MIN, ZOOM_MAX);
        self.touch();
        self.zoom_percent
    }

    pub fn set_pin(&mut self, pin: bool) {
        self.pin = pin;
        self.touch();
    }

    pub fn set_ignore_cursor(&mut self, ignore: bool) {
        self.ignore_cursor = ignore;
        self.touch();
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
        self.touch();
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha < OPAQUE
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Convert a wire alpha in `[0.0, 1.0]` to the stored byte.
pub fn alpha_from_unit(alpha: f64) -> Result<u8> {
    if !(0.0..=1.0).contains(&alpha) {
        // NaN fails the range check as well
        return Err(ViewError::InvalidAlpha(alpha));
    }

    Ok((alpha * f64::from(OPAQUE)).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> View {
        View::new(
            "v1".to_string(),
            "https://example.com/".to_string(),
            String::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_view_defaults() {
        let view = view();
        assert!(!view.pin);
        assert!(!view.ignore_cursor);
        assert!(!view.is_transparent());
        assert_eq!(view.zoom_percent, ZOOM_DEFAULT);
        assert_eq!(view.zoom_factor(), 1.0);
    }

    #[test]
    fn test_empty_label_is_rejected() {
        let result = View::new(" ".to_string(), "https://example.com/".to_string(), String::new());
        assert!(matches!(result, Err(ViewError::InvalidLabel(_))));

        let result = View::new(
            "ctrl_v1".to_string(),
            "https://example.com/".to_string(),
            String::new(),
        );
        assert!(matches!(result, Err(ViewError::InvalidLabel(_))));
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut view = view();
        assert_eq!(view.zoom_in(), 110);
        assert_eq!(view.zoom_out(), 100);

        for _ in 0..20 {
            view.zoom_out();
        }
        assert_eq!(view.zoom_percent, ZOOM_MIN);

        for _ in 0..100 {
            view.zoom_in();
        }
        assert_eq!(view.zoom_percent, ZOOM_MAX);
        assert_eq!(view.zoom_factor(), 5.0);
    }

    #[test]
    fn test_transparency_follows_alpha() {
        let mut view = view();
        view.set_alpha(alpha_from_unit(0.5).unwrap());
        assert_eq!(view.alpha, 128);
        assert!(view.is_transparent());

        view.set_alpha(alpha_from_unit(1.0).unwrap());
        assert!(!view.is_transparent());
    }

    #[test]
    fn test_alpha_conversion_bounds() {
        assert_eq!(alpha_from_unit(0.0).unwrap(), 0);
        assert_eq!(alpha_from_unit(1.0).unwrap(), OPAQUE);
        assert!(matches!(alpha_from_unit(1.5), Err(ViewError::InvalidAlpha(_))));
        assert!(matches!(alpha_from_unit(-0.1), Err(ViewError::InvalidAlpha(_))));
        assert!(alpha_from_unit(f64::NAN).is_err());
    }
}

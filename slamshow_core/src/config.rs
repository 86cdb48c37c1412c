//! Session configuration.

use crate::display::LoopTiming;
use crate::error::ShowError;
use crate::transform::MapScale;
use crate::velocity::{VelocityGauge, SENSOR_THETA_MAX_DEG, SENSOR_V_MAX_MM};
use serde::{Deserialize, Serialize};
use slamshow_env::{FigureSize, KeyCode};
use std::path::Path;
use std::time::Duration;

/// Everything a display session needs to know up front.
///
/// Missing fields in a JSON file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Side length of the square map in pixels
    pub map_size_pixels: usize,

    /// Map resolution
    pub map_scale_mm_per_pixel: f64,

    /// Title of the raster window
    pub window_name: String,

    /// Title of the plot window
    pub plot_title: String,

    pub figure_size: FigureSize,

    pub x_label: String,
    pub y_label: String,

    /// UI yield per refresh (ms)
    pub pause_ms: u64,

    /// Key poll timeout per refresh (ms)
    pub key_poll_ms: u64,

    /// Key code that ends the display loop
    pub cancel_key: i32,

    /// Linear speed that fills a velocity bar (mm per update)
    pub linear_span_mm: f64,

    /// Angular speed that fills a velocity bar (degrees per update)
    pub angular_span_deg: f64,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            map_size_pixels: 800,
            map_scale_mm_per_pixel: 40.0,
            window_name: "SLAM".to_string(),
            plot_title: "SLAM 2D".to_string(),
            figure_size: FigureSize::default(),
            x_label: "X (mm)".to_string(),
            y_label: "Y (mm)".to_string(),
            pause_ms: 10,
            key_poll_ms: 1,
            cancel_key: KeyCode::ESC.code(),
            linear_span_mm: SENSOR_V_MAX_MM,
            angular_span_deg: SENSOR_THETA_MAX_DEG,
        }
    }
}

impl ShowConfig {
    /// Config for a map of the given size and scale, defaults elsewhere.
    pub fn new(map_size_pixels: usize, map_scale_mm_per_pixel: f64) -> Self {
        Self {
            map_size_pixels,
            map_scale_mm_per_pixel,
            ..Self::default()
        }
    }

    pub fn with_window_name(mut self, name: impl Into<String>) -> Self {
        self.window_name = name.into();
        self
    }

    /// Parses a JSON config and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ShowError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON config file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ShowError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks the values a session cannot run without.
    pub fn validate(&self) -> Result<(), ShowError> {
        let raster_bytes = self
            .map_size_pixels
            .checked_mul(self.map_size_pixels)
            .and_then(|cells| cells.checked_mul(3));
        if self.map_size_pixels == 0 || raster_bytes.is_none() {
            return Err(ShowError::InvalidMapSize(self.map_size_pixels));
        }
        MapScale::new(self.map_scale_mm_per_pixel)?;
        for span in [self.linear_span_mm, self.angular_span_deg] {
            if !span.is_finite() || span <= 0.0 {
                return Err(ShowError::InvalidSpan(span));
            }
        }
        if self.window_name.is_empty() {
            return Err(ShowError::config("window name must not be empty"));
        }
        Ok(())
    }

    pub fn map_scale(&self) -> Result<MapScale, ShowError> {
        MapScale::new(self.map_scale_mm_per_pixel)
    }

    /// Side length of the map in millimeters.
    pub fn map_extent_mm(&self) -> f64 {
        self.map_scale_mm_per_pixel * self.map_size_pixels as f64
    }

    pub fn timing(&self) -> LoopTiming {
        LoopTiming {
            pause: Duration::from_millis(self.pause_ms),
            key_poll: Duration::from_millis(self.key_poll_ms),
            cancel_key: KeyCode(self.cancel_key),
        }
    }

    pub fn velocity_gauge(&self) -> VelocityGauge {
        VelocityGauge::default().with_spans(self.linear_span_mm, self.angular_span_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ShowConfig::default();
        config.validate().unwrap();
        assert_eq!(config.map_extent_mm(), 32000.0);
        assert_eq!(config.timing().cancel_key, KeyCode::ESC);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ShowConfig::from_json_str(r#"{ "map_size_pixels": 500, "window_name": "lab" }"#).unwrap();
        assert_eq!(config.map_size_pixels, 500);
        assert_eq!(config.window_name, "lab");
        assert_eq!(config.map_scale_mm_per_pixel, 40.0);
        assert_eq!(config.plot_title, "SLAM 2D");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ShowConfig::new(0, 10.0).validate(),
            Err(ShowError::InvalidMapSize(0))
        ));
        assert!(matches!(
            ShowConfig::new(usize::MAX, 10.0).validate(),
            Err(ShowError::InvalidMapSize(usize::MAX))
        ));
        assert!(matches!(
            ShowConfig::new(100, -2.0).validate(),
            Err(ShowError::InvalidScale(_))
        ));

        let mut config = ShowConfig::default();
        config.angular_span_deg = 0.0;
        assert!(matches!(config.validate(), Err(ShowError::InvalidSpan(_))));

        assert!(ShowConfig::default().with_window_name("").validate().is_err());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ShowConfig::from_json_str("{ not json"),
            Err(ShowError::Json(_))
        ));
        assert!(ShowConfig::from_json_str(r#"{ "map_scale_mm_per_pixel": 0.0 }"#).is_err());
    }

    #[test]
    fn test_json_round_trip_file() {
        let path = std::env::temp_dir().join(format!("slamshow_config_{}.json", std::process::id()));
        let config = ShowConfig::new(256, 25.0).with_window_name("bench");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = ShowConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}

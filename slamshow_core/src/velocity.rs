//! Velocity bars: a scalar reading mapped to a signed, colored bar.
//!
//! Each bar grows right from a fixed zero line for positive values and left
//! for negative ones. Bar length is `value / span × max_bar_height` and is
//! deliberately not clamped: a reading beyond its expected span draws past
//! the nominal maximum.

use crate::error::ShowError;
use crate::types::VelocityReading;
use slamshow_env::{Color, DrawCommand, FontSpec, PixelPoint};

/// Expected linear speed span (mm per update)
pub const SENSOR_V_MAX_MM: f64 = 1000.0;
/// Expected angular speed span (degrees per update)
pub const SENSOR_THETA_MAX_DEG: f64 = 20.0;

/// Label and bar pair for one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityBar {
    pub label: DrawCommand,
    pub bar: DrawCommand,
    /// Signed bar length in pixels
    pub length: i32,
}

/// Layout and colors of the velocity display.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGauge {
    pub text_x: i32,
    pub bar_x: i32,
    pub bar_y_offset: i32,
    pub bar_width: i32,
    pub max_bar_height: i32,
    pub linear_y: i32,
    pub angular_y: i32,
    pub linear_span: f64,
    pub angular_span: f64,
    pub font: FontSpec,
    pub label_color: Color,
    pub positive_color: Color,
    pub negative_color: Color,
}

impl Default for VelocityGauge {
    fn default() -> Self {
        Self {
            text_x: 20,
            bar_x: 150,
            bar_y_offset: 3,
            bar_width: 20,
            max_bar_height: 200,
            linear_y: 30,
            angular_y: 80,
            linear_span: SENSOR_V_MAX_MM,
            angular_span: SENSOR_THETA_MAX_DEG,
            font: FontSpec::default(),
            label_color: Color::BLUE,
            positive_color: Color::GREEN,
            negative_color: Color::RED,
        }
    }
}

impl VelocityGauge {
    /// Overrides the expected spans of the two readings.
    pub fn with_spans(mut self, linear_span: f64, angular_span: f64) -> Self {
        self.linear_span = linear_span;
        self.angular_span = angular_span;
        self
    }

    /// Maps one reading to its label and bar.
    ///
    /// # Arguments
    /// * `value` - The reading
    /// * `span` - Reading that fills `max_bar_height`
    /// * `label` - Text shown left of the bar
    /// * `y` - Baseline of the label row
    pub fn map_velocity(&self, value: f64, span: f64, label: &str, y: i32) -> Result<VelocityBar, ShowError> {
        if !span.is_finite() || span <= 0.0 {
            return Err(ShowError::InvalidSpan(span));
        }

        let length = (value / span * self.max_bar_height as f64) as i32;
        let x0 = self.bar_x + self.max_bar_height;
        let color = if value < 0.0 {
            self.negative_color
        } else {
            self.positive_color
        };

        Ok(VelocityBar {
            label: DrawCommand::Text {
                text: format!("{}:", label),
                origin: PixelPoint::new(self.text_x, y),
                font: self.font,
                color: self.label_color,
            },
            bar: DrawCommand::FilledRectangle {
                corner_a: PixelPoint::new(x0, y + self.bar_y_offset),
                corner_b: PixelPoint::new(x0.saturating_add(length), y - self.bar_width + self.bar_y_offset),
                color,
            },
            length,
        })
    }

    /// The linear and angular bars for one frame.
    pub fn bars(&self, reading: &VelocityReading) -> Result<[VelocityBar; 2], ShowError> {
        Ok([
            self.map_velocity(reading.linear_mm, self.linear_span, "   dXY", self.linear_y)?,
            self.map_velocity(reading.angular_deg, self.angular_span, "dTheta", self.angular_y)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_color(bar: &VelocityBar) -> Color {
        bar.bar.color()
    }

    #[test]
    fn test_zero_is_positive() {
        let gauge = VelocityGauge::default();
        let bar = gauge.map_velocity(0.0, 1000.0, "v", 30).unwrap();
        assert_eq!(bar.length, 0);
        assert_eq!(bar_color(&bar), gauge.positive_color);
    }

    #[test]
    fn test_negative_color() {
        let gauge = VelocityGauge::default();
        let bar = gauge.map_velocity(-1.0, 1000.0, "v", 30).unwrap();
        assert_eq!(bar_color(&bar), gauge.negative_color);
        // -0.2 px truncates to zero length but keeps the negative color
        assert_eq!(bar.length, 0);
    }

    #[test]
    fn test_bar_geometry() {
        let gauge = VelocityGauge::default();
        let bar = gauge.map_velocity(500.0, 1000.0, "   dXY", 30).unwrap();
        assert_eq!(bar.length, 100);
        assert_eq!(
            bar.bar,
            DrawCommand::FilledRectangle {
                corner_a: PixelPoint::new(350, 33),
                corner_b: PixelPoint::new(450, 13),
                color: Color::GREEN,
            }
        );
        assert_eq!(
            bar.label,
            DrawCommand::Text {
                text: "   dXY:".to_string(),
                origin: PixelPoint::new(20, 30),
                font: FontSpec::default(),
                color: Color::BLUE,
            }
        );
    }

    #[test]
    fn test_bar_is_not_clamped_past_span() {
        // Readings beyond the expected span overshoot max_bar_height.
        let gauge = VelocityGauge::default();
        let bar = gauge.map_velocity(-40.0, 20.0, "dTheta", 80).unwrap();
        assert_eq!(bar.length, -400);
        assert!(bar.length.abs() > gauge.max_bar_height);
    }

    #[test]
    fn test_extreme_reading_saturates() {
        let gauge = VelocityGauge::default();

        let bar = gauge.map_velocity(f64::INFINITY, 1000.0, "   dXY", 30).unwrap();
        assert_eq!(bar.length, i32::MAX);
        match bar.bar {
            DrawCommand::FilledRectangle { corner_a, corner_b, .. } => {
                assert_eq!(corner_a.x, 350);
                assert_eq!(corner_b.x, i32::MAX);
            }
            other => panic!("expected rectangle, got {:?}", other),
        }

        let bar = gauge.map_velocity(-1.0e12, 20.0, "dTheta", 80).unwrap();
        assert_eq!(bar.length, i32::MIN);
        assert_eq!(bar_color(&bar), gauge.negative_color);
        match bar.bar {
            DrawCommand::FilledRectangle { corner_b, .. } => assert_eq!(corner_b.x, i32::MIN + 350),
            other => panic!("expected rectangle, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_span() {
        let gauge = VelocityGauge::default();
        assert!(matches!(
            gauge.map_velocity(1.0, 0.0, "v", 0),
            Err(ShowError::InvalidSpan(_))
        ));
        assert!(gauge.map_velocity(1.0, f64::NAN, "v", 0).is_err());
    }

    #[test]
    fn test_frame_bars() {
        let gauge = VelocityGauge::default().with_spans(100.0, 10.0);
        let [linear, angular] = gauge.bars(&VelocityReading::new(50.0, -5.0)).unwrap();
        assert_eq!(linear.length, 100);
        assert_eq!(angular.length, -100);
        assert_eq!(bar_color(&angular), Color::RED);

        match angular.label {
            DrawCommand::Text { text, origin, .. } => {
                assert_eq!(text, "dTheta:");
                assert_eq!(origin.y, 80);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }
}

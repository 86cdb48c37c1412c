//! Common value types shared by the surfaces and the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An integer pixel coordinate on the raster surface.
///
/// Every pixel-space position in SlamShow goes through this one type, so
/// there is never any doubt about the order or shape of a coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`, saturating at the `i32`
    /// range so far off-screen geometry stays off-screen.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the color as `[r, g, b]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// A keyboard key code as reported by the raster surface.
///
/// Printable keys report their character code; special keys use the
/// conventional ASCII control codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const ESC: KeyCode = KeyCode(27);
    pub const ENTER: KeyCode = KeyCode(13);
    /// ETX, what a terminal sends for Ctrl-C
    pub const CTRL_C: KeyCode = KeyCode(3);

    /// Key code for a printable character.
    pub fn from_char(c: char) -> Self {
        Self(c as i32)
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match char::from_u32(self.0 as u32) {
            Some(c) if c.is_ascii_graphic() => write!(f, "'{}' ({})", c, self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Font used for raster text labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Glyph scale relative to the backend's base font size
    pub scale: f32,
    /// Stroke thickness in pixels
    pub thickness: u32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            scale: 1.0,
            thickness: 1,
        }
    }
}

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width_in: f32,
    pub height_in: f32,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 10.0,
        }
    }
}

/// Identity of a plot figure.
///
/// Compared by handle equality only: two figures with identical content are
/// still different figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FigureHandle(pub Uuid);

impl FigureHandle {
    /// Creates a fresh, globally unique handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FigureHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FigureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Handle to an annotation living on a plot figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationHandle(pub Uuid);

impl AnnotationHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// An arrow annotation in plot (world millimeter) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowSpec {
    /// Tail of the arrow
    pub origin: [f64; 2],
    /// Vector from tail to tip
    pub delta: [f64; 2],
    pub head_width: f64,
    pub head_length: f64,
    pub color: Color,
}

/// Result of a cooperative pause on the plot surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The pause ran to completion
    Completed,
    /// The pause was cut short (user interrupt, event loop torn down)
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_point_offset() {
        let p = PixelPoint::new(3, -4).offset(10, 10);
        assert_eq!(p, PixelPoint::new(13, 6));
        assert_eq!(PixelPoint::from((1, 2)), PixelPoint::new(1, 2));
    }

    #[test]
    fn test_pixel_point_offset_saturates() {
        let p = PixelPoint::new(i32::MAX, i32::MIN).offset(8, -5);
        assert_eq!(p, PixelPoint::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_figure_handles_are_unique() {
        assert_ne!(FigureHandle::new(), FigureHandle::new());
        let h = FigureHandle::new();
        assert_eq!(h, h);
    }

    #[test]
    fn test_key_code_display() {
        assert_eq!(KeyCode::from_char('q').to_string(), "'q' (113)");
        assert_eq!(KeyCode::ESC.to_string(), "27");
    }
}

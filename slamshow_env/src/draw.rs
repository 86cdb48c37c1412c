//! Pixel-space drawing commands.

use crate::error::SurfaceError;
use crate::raster::RasterSurface;
use crate::types::{Color, FontSpec, PixelPoint};
use serde::{Deserialize, Serialize};

/// A single overlay primitive, ready to be replayed onto a raster surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Polyline {
        points: Vec<PixelPoint>,
        closed: bool,
        color: Color,
        thickness: u32,
    },
    Circle {
        center: PixelPoint,
        radius: u32,
        color: Color,
    },
    Line {
        from: PixelPoint,
        to: PixelPoint,
        color: Color,
    },
    Text {
        text: String,
        origin: PixelPoint,
        font: FontSpec,
        color: Color,
    },
    FilledRectangle {
        corner_a: PixelPoint,
        corner_b: PixelPoint,
        color: Color,
    },
}

impl DrawCommand {
    /// Issues this command on `surface`.
    pub fn apply<R: RasterSurface + ?Sized>(&self, surface: &mut R) -> Result<(), SurfaceError> {
        match self {
            DrawCommand::Polyline { points, closed, color, thickness } => {
                surface.draw_polyline(points, *closed, *color, *thickness)
            }
            DrawCommand::Circle { center, radius, color } => surface.draw_circle(*center, *radius, *color),
            DrawCommand::Line { from, to, color } => surface.draw_line(*from, *to, *color),
            DrawCommand::Text { text, origin, font, color } => surface.draw_text(text, *origin, *font, *color),
            DrawCommand::FilledRectangle { corner_a, corner_b, color } => {
                surface.draw_filled_rectangle(*corner_a, *corner_b, *color)
            }
        }
    }

    /// Returns the color the command draws with.
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::Polyline { color, .. }
            | DrawCommand::Circle { color, .. }
            | DrawCommand::Line { color, .. }
            | DrawCommand::Text { color, .. }
            | DrawCommand::FilledRectangle { color, .. } => *color,
        }
    }
}

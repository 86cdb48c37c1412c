//! Raster surface abstraction.

use crate::error::SurfaceError;
use crate::types::{Color, FontSpec, KeyCode, PixelPoint};
use std::time::Duration;

/// A bitmap window that shows pixel buffers with simple vector overlays.
///
/// # Implementations
///
/// - **Headless**: `HeadlessRaster` - records every call in memory
/// - **Viewer**: `RerunRaster` - logs images and 2D primitives to Rerun
///
/// # Frame Order
///
/// ```text
/// push_raster(buffer)          base image, replaces everything
///   draw_*(...)                overlays, in the order issued
/// poll_key(timeout)            finishes the frame
/// ```
pub trait RasterSurface {
    /// Opens (or re-titles) the window.
    fn create_window(&mut self, name: &str) -> Result<(), SurfaceError>;

    /// Replaces the displayed image with a 3-channel interleaved buffer.
    ///
    /// # Arguments
    /// * `buffer` - `row_stride * rows` bytes, three bytes per pixel
    /// * `row_stride` - Bytes per image row
    fn push_raster(&mut self, buffer: &[u8], row_stride: usize) -> Result<(), SurfaceError>;

    /// Draws a polyline through `points`, joining the last point back to the
    /// first when `closed` is set.
    fn draw_polyline(
        &mut self,
        points: &[PixelPoint],
        closed: bool,
        color: Color,
        thickness: u32,
    ) -> Result<(), SurfaceError>;

    /// Draws a filled circle.
    fn draw_circle(&mut self, center: PixelPoint, radius: u32, color: Color) -> Result<(), SurfaceError>;

    /// Draws a one-pixel line segment.
    fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) -> Result<(), SurfaceError>;

    /// Draws a text label with its baseline starting at `origin`.
    fn draw_text(
        &mut self,
        text: &str,
        origin: PixelPoint,
        font: FontSpec,
        color: Color,
    ) -> Result<(), SurfaceError>;

    /// Draws a filled axis-aligned rectangle between two opposite corners.
    ///
    /// The corners may be given in any order.
    fn draw_filled_rectangle(
        &mut self,
        corner_a: PixelPoint,
        corner_b: PixelPoint,
        color: Color,
    ) -> Result<(), SurfaceError>;

    /// Polls for a key press, waiting at most `timeout`.
    ///
    /// # Returns
    /// * `Some(key)` - A key was pressed
    /// * `None` - No key within the timeout
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCode>, SurfaceError>;
}

//! In-memory surface implementations.
//!
//! These are the "no window" backends: every call is recorded so tests and
//! headless runs can inspect exactly what the engine asked the display to do.
//! They also let a caller script the outside world (key presses, the user
//! closing the plot window, an interrupted pause).

use crate::draw::DrawCommand;
use crate::error::SurfaceError;
use crate::plot::PlotSurface;
use crate::raster::RasterSurface;
use crate::types::{
    AnnotationHandle, ArrowSpec, Color, FigureHandle, FigureSize, FontSpec, KeyCode, PauseOutcome,
    PixelPoint,
};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tracing::trace;

/// Recording raster surface.
///
/// Draw calls issued after a `push_raster` are kept as the current frame's
/// overlays; the next push starts a fresh frame.
#[derive(Debug, Default)]
pub struct HeadlessRaster {
    window: Option<String>,
    closed: bool,
    raster: Vec<u8>,
    row_stride: usize,
    overlays: Vec<DrawCommand>,
    frames: usize,
    polls: usize,
    keys: VecDeque<Option<KeyCode>>,
}

impl HeadlessRaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the results of upcoming `poll_key` calls, one entry per call.
    ///
    /// Once the script runs out, polls report no key.
    pub fn script_keys<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = Option<KeyCode>>,
    {
        self.keys.extend(keys);
    }

    /// Simulates the window being destroyed; later calls fail.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Title of the window, if one was created.
    pub fn window_name(&self) -> Option<&str> {
        self.window.as_deref()
    }

    /// The most recently pushed image buffer.
    pub fn raster(&self) -> &[u8] {
        &self.raster
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Overlays drawn since the last `push_raster`.
    pub fn overlays(&self) -> &[DrawCommand] {
        &self.overlays
    }

    /// Number of images pushed so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of `poll_key` calls so far.
    pub fn polls(&self) -> usize {
        self.polls
    }

    fn ensure_open(&self) -> Result<(), SurfaceError> {
        if self.closed {
            return Err(SurfaceError::unavailable("raster window was closed"));
        }
        if self.window.is_none() {
            return Err(SurfaceError::unavailable("raster window was never created"));
        }
        Ok(())
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), SurfaceError> {
        self.ensure_open()?;
        self.overlays.push(command);
        Ok(())
    }
}

impl RasterSurface for HeadlessRaster {
    fn create_window(&mut self, name: &str) -> Result<(), SurfaceError> {
        if self.closed {
            return Err(SurfaceError::unavailable("raster window was closed"));
        }
        self.window = Some(name.to_string());
        Ok(())
    }

    fn push_raster(&mut self, buffer: &[u8], row_stride: usize) -> Result<(), SurfaceError> {
        self.ensure_open()?;
        if row_stride == 0 || buffer.len() % row_stride != 0 {
            return Err(SurfaceError::backend(format!(
                "buffer of {} bytes is not a whole number of {}-byte rows",
                buffer.len(),
                row_stride
            )));
        }
        self.raster.clear();
        self.raster.extend_from_slice(buffer);
        self.row_stride = row_stride;
        self.overlays.clear();
        self.frames += 1;
        trace!(frame = self.frames, bytes = buffer.len(), "raster pushed");
        Ok(())
    }

    fn draw_polyline(
        &mut self,
        points: &[PixelPoint],
        closed: bool,
        color: Color,
        thickness: u32,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Polyline {
            points: points.to_vec(),
            closed,
            color,
            thickness,
        })
    }

    fn draw_circle(&mut self, center: PixelPoint, radius: u32, color: Color) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Circle { center, radius, color })
    }

    fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Line { from, to, color })
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: PixelPoint,
        font: FontSpec,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font,
            color,
        })
    }

    fn draw_filled_rectangle(
        &mut self,
        corner_a: PixelPoint,
        corner_b: PixelPoint,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.record(DrawCommand::FilledRectangle { corner_a, corner_b, color })
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<KeyCode>, SurfaceError> {
        self.ensure_open()?;
        self.polls += 1;
        Ok(self.keys.pop_front().flatten())
    }
}

/// Recording plot surface.
#[derive(Debug, Default)]
pub struct HeadlessPlot {
    current: Option<FigureHandle>,
    size: Option<FigureSize>,
    title: Option<String>,
    x_limits: Option<(f64, f64)>,
    y_limits: Option<(f64, f64)>,
    labels: Option<(String, String)>,
    annotations: HashMap<AnnotationHandle, ArrowSpec>,
    redraws: usize,
    pauses: usize,
    interrupt_pending: bool,
}

impl HeadlessPlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user closing the figure window.
    ///
    /// The backend moves on to a brand-new figure, so `current_figure()`
    /// no longer matches the handle the engine was given.
    pub fn close_externally(&mut self) {
        self.current = Some(FigureHandle::new());
        self.annotations.clear();
    }

    /// Makes the next `pause_yield` report an interruption.
    pub fn interrupt_next_pause(&mut self) {
        self.interrupt_pending = true;
    }

    /// Live annotations on the figure.
    pub fn annotations(&self) -> impl Iterator<Item = (&AnnotationHandle, &ArrowSpec)> {
        self.annotations.iter()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn figure_size(&self) -> Option<FigureSize> {
        self.size
    }

    pub fn axis_limits(&self) -> Option<((f64, f64), (f64, f64))> {
        self.x_limits.zip(self.y_limits)
    }

    pub fn axis_labels(&self) -> Option<(&str, &str)> {
        self.labels.as_ref().map(|(x, y)| (x.as_str(), y.as_str()))
    }

    /// Number of redraw requests so far.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Number of `pause_yield` calls so far.
    pub fn pauses(&self) -> usize {
        self.pauses
    }

    fn ensure_figure(&self) -> Result<FigureHandle, SurfaceError> {
        self.current
            .ok_or_else(|| SurfaceError::unavailable("no figure has been created"))
    }
}

impl PlotSurface for HeadlessPlot {
    fn create_figure(&mut self, size: FigureSize) -> Result<FigureHandle, SurfaceError> {
        let handle = FigureHandle::new();
        self.current = Some(handle);
        self.size = Some(size);
        self.annotations.clear();
        Ok(handle)
    }

    fn current_figure(&self) -> FigureHandle {
        // Asking for the current figure with none open creates one, the way
        // pyplot-style backends do; it never matches a previously issued handle.
        self.current.unwrap_or_default()
    }

    fn set_window_title(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.title = Some(title.to_string());
        Ok(())
    }

    fn set_axis_limits(&mut self, x: (f64, f64), y: (f64, f64)) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.x_limits = Some(x);
        self.y_limits = Some(y);
        Ok(())
    }

    fn set_axis_labels(&mut self, x: &str, y: &str) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.labels = Some((x.to_string(), y.to_string()));
        Ok(())
    }

    fn add_arrow(&mut self, arrow: ArrowSpec) -> Result<AnnotationHandle, SurfaceError> {
        self.ensure_figure()?;
        let handle = AnnotationHandle::new();
        self.annotations.insert(handle, arrow);
        Ok(handle)
    }

    fn remove_annotation(&mut self, handle: AnnotationHandle) -> Result<(), SurfaceError> {
        self.annotations
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| SurfaceError::backend("annotation is not on the current figure"))
    }

    fn request_redraw(&mut self) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.redraws += 1;
        Ok(())
    }

    fn pause_yield(&mut self, _duration: Duration) -> PauseOutcome {
        self.pauses += 1;
        if std::mem::take(&mut self.interrupt_pending) {
            PauseOutcome::Interrupted
        } else {
            PauseOutcome::Completed
        }
    }
}

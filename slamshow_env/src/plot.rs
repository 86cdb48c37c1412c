//! Plot surface abstraction.

use crate::error::SurfaceError;
use crate::types::{AnnotationHandle, ArrowSpec, FigureHandle, FigureSize, PauseOutcome};
use std::time::Duration;

/// A vector-plot window with axes, annotations, and a cooperative event loop.
///
/// # Figure Identity
///
/// `current_figure()` reports whichever figure the backend considers active.
/// If the user closes the window behind the engine's back, the backend hands
/// out a different handle, which is how the display loop notices.
///
/// ```text
/// create_figure() -> A      current_figure() == A   running
///        (user closes window)
///                           current_figure() == B   closed externally
/// ```
pub trait PlotSurface {
    /// Creates a new figure and makes it current.
    fn create_figure(&mut self, size: FigureSize) -> Result<FigureHandle, SurfaceError>;

    /// Returns the handle of the currently active figure.
    fn current_figure(&self) -> FigureHandle;

    /// Sets the window title of the current figure.
    fn set_window_title(&mut self, title: &str) -> Result<(), SurfaceError>;

    /// Sets the visible axis ranges as `(min, max)` pairs.
    fn set_axis_limits(&mut self, x: (f64, f64), y: (f64, f64)) -> Result<(), SurfaceError>;

    /// Sets the axis labels.
    fn set_axis_labels(&mut self, x: &str, y: &str) -> Result<(), SurfaceError>;

    /// Adds an arrow annotation and returns its handle.
    fn add_arrow(&mut self, arrow: ArrowSpec) -> Result<AnnotationHandle, SurfaceError>;

    /// Removes a previously added annotation.
    ///
    /// # Returns
    /// * `Err(SurfaceError::Backend)` - The handle is unknown to this figure
    fn remove_annotation(&mut self, handle: AnnotationHandle) -> Result<(), SurfaceError>;

    /// Schedules a redraw without blocking.
    fn request_redraw(&mut self) -> Result<(), SurfaceError>;

    /// Yields to the UI event loop for at most `duration`.
    ///
    /// This is not a frame-rate throttle; it only gives the backend a
    /// chance to process window events.
    fn pause_yield(&mut self, duration: Duration) -> PauseOutcome;
}

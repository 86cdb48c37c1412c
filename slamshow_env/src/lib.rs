//! SlamShow Display Surface Abstraction Layer
//!
//! This crate provides the narrow contracts through which the SlamShow
//! engine talks to the outside world:
//! - A **raster surface**: a bitmap window that accepts pixel buffers,
//!   simple vector draw commands, and keyboard polling
//! - A **plot surface**: a vector-plot figure with axes, arrow annotations,
//!   and a cooperative redraw/yield loop
//!
//! # Core Concept: Surfaces as Capabilities
//!
//! The engine never touches a GUI toolkit directly. Everything it needs from
//! a window is expressed as a trait method, so the same session can drive a
//! live viewer or an in-memory recorder:
//!
//! ```text
//!  DisplaySession ──► RasterSurface ──► HeadlessRaster | RerunRaster
//!        │
//!        └──────────► PlotSurface   ──► HeadlessPlot   | RerunPlot
//! ```
//!
//! # Example
//!
//! ```
//! use slamshow_env::{HeadlessRaster, KeyCode, RasterSurface};
//! use std::time::Duration;
//!
//! let mut raster = HeadlessRaster::new();
//! raster.script_keys([None, Some(KeyCode::ESC)]);
//! raster.create_window("map").unwrap();
//!
//! assert_eq!(raster.poll_key(Duration::from_millis(1)).unwrap(), None);
//! assert_eq!(raster.poll_key(Duration::from_millis(1)).unwrap(), Some(KeyCode::ESC));
//! ```

mod draw;
mod error;
mod headless;
mod plot;
mod raster;
mod types;

pub use draw::DrawCommand;
pub use error::SurfaceError;
pub use headless::{HeadlessPlot, HeadlessRaster};
pub use plot::PlotSurface;
pub use raster::RasterSurface;
pub use types::{
    AnnotationHandle, ArrowSpec, Color, FigureHandle, FigureSize, FontSpec, KeyCode,
    PauseOutcome, PixelPoint,
};

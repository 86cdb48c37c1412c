//! The non-blocking refresh loop and its cancellation protocol.
//!
//! ```text
//!            refresh() == true
//!              ┌──────┐
//!              ▼      │
//!          RUNNING ───┘
//!              │  figure changed | pause interrupted |
//!              │  cancel key     | surface failure
//!              ▼
//!          STOPPED   refresh() == false forever, no surface calls
//! ```
//!
//! Every stop cause collapses to the same `false`; the reason is kept only
//! for logging and diagnostics.

use serde::{Deserialize, Serialize};
use slamshow_env::{DrawCommand, FigureHandle, KeyCode, PauseOutcome, PlotSurface, RasterSurface, SurfaceError};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Loop state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The plot figure is no longer the one the session created
    WindowClosed,
    /// The UI yield was interrupted
    Interrupted,
    /// The cancellation key was pressed
    CancelKey,
    /// A surface call failed mid-refresh
    SurfaceFailed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StopReason::WindowClosed => "window closed",
            StopReason::Interrupted => "interrupted",
            StopReason::CancelKey => "cancel key",
            StopReason::SurfaceFailed => "surface failure",
        };
        f.write_str(s)
    }
}

/// Timing and key settings of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// UI yield per refresh
    pub pause: Duration,
    /// Key poll timeout per refresh (and per `wait_key` attempt)
    pub key_poll: Duration,
    pub cancel_key: KeyCode,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(10),
            key_poll: Duration::from_millis(1),
            cancel_key: KeyCode::ESC,
        }
    }
}

/// Drives one refresh per caller frame and decides when to stop.
#[derive(Debug)]
pub struct DisplayLoopController {
    figure: FigureHandle,
    timing: LoopTiming,
    state: LoopState,
    stop_reason: Option<StopReason>,
    frames: u64,
}

impl DisplayLoopController {
    /// Creates a running controller bound to the session's figure.
    pub fn new(figure: FigureHandle, timing: LoopTiming) -> Self {
        Self {
            figure,
            timing,
            state: LoopState::Running,
            stop_reason: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn timing(&self) -> LoopTiming {
        self.timing
    }

    /// Frames successfully shown so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one refresh cycle.
    ///
    /// # Arguments
    /// * `raster` / `plot` - The session's surfaces
    /// * `image` - Color raster bytes, `row_stride` bytes per row
    /// * `overlays` - Draw commands replayed after the image, in order
    ///
    /// # Returns
    /// `true` while the caller should keep driving frames.
    pub fn refresh<R, P>(
        &mut self,
        raster: &mut R,
        plot: &mut P,
        image: &[u8],
        row_stride: usize,
        overlays: &[DrawCommand],
    ) -> bool
    where
        R: RasterSurface + ?Sized,
        P: PlotSurface + ?Sized,
    {
        if self.state == LoopState::Stopped {
            return false;
        }

        match self.cycle(raster, plot, image, row_stride, overlays) {
            Ok(None) => {
                self.frames += 1;
                trace!(frame = self.frames, overlays = overlays.len(), "frame shown");
                true
            }
            Ok(Some(reason)) => self.stop(reason),
            Err(e) => {
                warn!("Display surface failed during refresh: {}", e);
                self.stop(StopReason::SurfaceFailed)
            }
        }
    }

    fn cycle<R, P>(
        &mut self,
        raster: &mut R,
        plot: &mut P,
        image: &[u8],
        row_stride: usize,
        overlays: &[DrawCommand],
    ) -> Result<Option<StopReason>, SurfaceError>
    where
        R: RasterSurface + ?Sized,
        P: PlotSurface + ?Sized,
    {
        if plot.current_figure() != self.figure {
            return Ok(Some(StopReason::WindowClosed));
        }

        plot.request_redraw()?;
        match plot.pause_yield(self.timing.pause) {
            PauseOutcome::Completed => {}
            PauseOutcome::Interrupted => return Ok(Some(StopReason::Interrupted)),
        }

        raster.push_raster(image, row_stride)?;
        for command in overlays {
            command.apply(raster)?;
        }

        match raster.poll_key(self.timing.key_poll)? {
            Some(key) if key == self.timing.cancel_key => Ok(Some(StopReason::CancelKey)),
            Some(key) => {
                debug!("Ignoring key {}", key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn stop(&mut self, reason: StopReason) -> bool {
        info!("Display loop stopped after {} frames: {}", self.frames, reason);
        self.state = LoopState::Stopped;
        self.stop_reason = Some(reason);
        false
    }

    /// Blocks until any key is pressed and returns it.
    ///
    /// Meant for modal "press any key" moments outside the frame loop; there
    /// is no overall timeout.
    /// A terminal-backed raster reports Ctrl-C as [`KeyCode::CTRL_C`], so it
    /// ends the wait like any other key.
    pub fn wait_key<R>(&self, raster: &mut R, action: &str) -> Result<KeyCode, SurfaceError>
    where
        R: RasterSurface + ?Sized,
    {
        info!("Hit any key to {} ...", action);
        loop {
            if let Some(key) = raster.poll_key(self.timing.key_poll)? {
                return Ok(key);
            }
        }
    }
}

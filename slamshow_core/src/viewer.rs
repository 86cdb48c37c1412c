//! Live viewer backend using Rerun.io and the terminal.
//!
//! The raster window becomes a 2D space in the Rerun viewer:
//! - `map/image` - the color raster
//! - `map/overlays/*` - polylines, lines, scan points, labels and bars
//!
//! The plot figure becomes the `plot/*` space with the map bounds and the
//! pose arrow. Keyboard input (including Ctrl-C, which raw mode turns into a
//! key event) is read from the controlling terminal.
//!
//! Enable with the `visualization` feature flag.

use crate::error::ShowError;
use crossterm::event::{self, Event, KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use rerun::{RecordingStream, RecordingStreamBuilder};
use slamshow_env::{
    AnnotationHandle, ArrowSpec, Color, FigureHandle, FigureSize, FontSpec, KeyCode, PauseOutcome,
    PixelPoint, PlotSurface, RasterSurface, SurfaceError,
};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Spawns a Rerun viewer and returns the two surfaces bound to it.
pub fn spawn_viewer(app_id: &str) -> Result<(RerunRaster, RerunPlot), ShowError> {
    let rec = RecordingStreamBuilder::new(app_id)
        .spawn()
        .map_err(SurfaceError::backend)?;
    let keys = Rc::new(RefCell::new(TerminalKeys::new()?));

    info!("Rerun viewer spawned for '{}' - press ESC in this terminal to stop", app_id);
    Ok((
        RerunRaster::new(rec.clone(), Rc::clone(&keys)),
        RerunPlot::new(rec, keys),
    ))
}

fn rgb(color: Color) -> rerun::Color {
    rerun::Color::from_rgb(color.r, color.g, color.b)
}

fn xy(p: PixelPoint) -> [f32; 2] {
    [p.x as f32, p.y as f32]
}

// =============================================================================
// TERMINAL KEYS
// =============================================================================

/// Key presses read from the terminal.
///
/// Every press is queued for the raster's `poll_key`. Ctrl-C is queued as
/// [`KeyCode::CTRL_C`] and also flagged as an interruption for the plot's
/// `pause_yield`, so it stops the frame loop and still answers `wait_key`.
#[derive(Debug, Default)]
struct KeyQueue {
    pending: VecDeque<KeyCode>,
    interrupted: bool,
}

impl KeyQueue {
    fn accept(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == TermKey::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.interrupted = true;
            self.pending.push_back(KeyCode::CTRL_C);
        } else if let Some(code) = map_key(key.code) {
            self.pending.push_back(code);
        }
    }
}

/// Raw-mode terminal reader shared by both surfaces.
struct TerminalKeys {
    queue: KeyQueue,
}

impl TerminalKeys {
    fn new() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self {
            queue: KeyQueue::default(),
        })
    }

    /// Reads terminal events for at most `timeout`.
    fn pump(&mut self, timeout: Duration) -> std::io::Result<()> {
        let deadline = Instant::now() + timeout;
        let mut wait = timeout;
        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                self.queue.accept(key);
            }
            wait = deadline.saturating_duration_since(Instant::now());
            if wait.is_zero() {
                break;
            }
        }
        Ok(())
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

fn map_key(code: TermKey) -> Option<KeyCode> {
    match code {
        TermKey::Esc => Some(KeyCode::ESC),
        TermKey::Enter => Some(KeyCode::ENTER),
        TermKey::Backspace => Some(KeyCode(8)),
        TermKey::Tab => Some(KeyCode(9)),
        TermKey::Char(c) => Some(KeyCode::from_char(c)),
        _ => None,
    }
}

// =============================================================================
// RASTER SURFACE
// =============================================================================

/// Overlays collected during one frame.
#[derive(Default)]
struct FrameOverlays {
    strips: Vec<(Vec<[f32; 2]>, Color, u32)>,
    points: Vec<([f32; 2], u32, Color)>,
    labels: Vec<([f32; 2], String, Color)>,
    boxes: Vec<([f32; 2], [f32; 2], Color)>,
}

/// Raster surface that logs to a Rerun recording.
///
/// Draw calls are batched and logged together when the frame ends with
/// `poll_key`, so each overlay kind is a single entity per frame.
pub struct RerunRaster {
    rec: RecordingStream,
    keys: Rc<RefCell<TerminalKeys>>,
    window: Option<String>,
    frame: FrameOverlays,
}

impl RerunRaster {
    fn new(rec: RecordingStream, keys: Rc<RefCell<TerminalKeys>>) -> Self {
        Self {
            rec,
            keys,
            window: None,
            frame: FrameOverlays::default(),
        }
    }

    fn ensure_window(&self) -> Result<(), SurfaceError> {
        if self.window.is_none() {
            return Err(SurfaceError::unavailable("raster window was never created"));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        let frame = std::mem::take(&mut self.frame);

        if frame.strips.is_empty() {
            self.rec.log("map/overlays/strips", &rerun::Clear::flat())
        } else {
            self.rec.log(
                "map/overlays/strips",
                &rerun::LineStrips2D::new(frame.strips.iter().map(|(pts, _, _)| pts.clone()))
                    .with_colors(frame.strips.iter().map(|(_, c, _)| rgb(*c)))
                    .with_radii(
                        frame
                            .strips
                            .iter()
                            .map(|(_, _, t)| rerun::Radius::new_ui_points(*t as f32 * 0.5)),
                    ),
            )
        }
        .map_err(SurfaceError::backend)?;

        if frame.points.is_empty() {
            self.rec.log("map/overlays/points", &rerun::Clear::flat())
        } else {
            self.rec.log(
                "map/overlays/points",
                &rerun::Points2D::new(frame.points.iter().map(|(p, _, _)| *p))
                    .with_radii(frame.points.iter().map(|(_, r, _)| *r as f32))
                    .with_colors(frame.points.iter().map(|(_, _, c)| rgb(*c))),
            )
        }
        .map_err(SurfaceError::backend)?;

        if frame.labels.is_empty() {
            self.rec.log("map/overlays/labels", &rerun::Clear::flat())
        } else {
            self.rec.log(
                "map/overlays/labels",
                &rerun::Points2D::new(frame.labels.iter().map(|(p, _, _)| *p))
                    .with_labels(frame.labels.iter().map(|(_, t, _)| t.clone()))
                    .with_colors(frame.labels.iter().map(|(_, _, c)| rgb(*c))),
            )
        }
        .map_err(SurfaceError::backend)?;

        if frame.boxes.is_empty() {
            self.rec.log("map/overlays/bars", &rerun::Clear::flat())
        } else {
            self.rec.log(
                "map/overlays/bars",
                &rerun::Boxes2D::from_mins_and_sizes(
                    frame.boxes.iter().map(|(min, _, _)| *min),
                    frame.boxes.iter().map(|(_, size, _)| *size),
                )
                .with_colors(frame.boxes.iter().map(|(_, _, c)| rgb(*c))),
            )
        }
        .map_err(SurfaceError::backend)
    }
}

impl RasterSurface for RerunRaster {
    fn create_window(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.rec
            .log_static("map/title", &rerun::TextLog::new(name))
            .map_err(SurfaceError::backend)?;
        self.window = Some(name.to_string());
        Ok(())
    }

    fn push_raster(&mut self, buffer: &[u8], row_stride: usize) -> Result<(), SurfaceError> {
        self.ensure_window()?;
        if row_stride == 0 || row_stride % 3 != 0 || buffer.len() % row_stride != 0 {
            return Err(SurfaceError::backend("buffer is not a whole number of RGB rows"));
        }
        let width = (row_stride / 3) as u32;
        let height = (buffer.len() / row_stride) as u32;

        self.frame = FrameOverlays::default();
        self.rec
            .log("map/image", &rerun::Image::from_rgb24(buffer.to_vec(), [width, height]))
            .map_err(SurfaceError::backend)
    }

    fn draw_polyline(
        &mut self,
        points: &[PixelPoint],
        closed: bool,
        color: Color,
        thickness: u32,
    ) -> Result<(), SurfaceError> {
        self.ensure_window()?;
        let mut strip: Vec<[f32; 2]> = points.iter().map(|&p| xy(p)).collect();
        if closed {
            if let Some(&first) = strip.first() {
                strip.push(first);
            }
        }
        self.frame.strips.push((strip, color, thickness));
        Ok(())
    }

    fn draw_circle(&mut self, center: PixelPoint, radius: u32, color: Color) -> Result<(), SurfaceError> {
        self.ensure_window()?;
        self.frame.points.push((xy(center), radius, color));
        Ok(())
    }

    fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) -> Result<(), SurfaceError> {
        self.ensure_window()?;
        self.frame.strips.push((vec![xy(from), xy(to)], color, 1));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: PixelPoint,
        _font: FontSpec,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.ensure_window()?;
        self.frame.labels.push((xy(origin), text.to_string(), color));
        Ok(())
    }

    fn draw_filled_rectangle(
        &mut self,
        corner_a: PixelPoint,
        corner_b: PixelPoint,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.ensure_window()?;
        let min = [corner_a.x.min(corner_b.x) as f32, corner_a.y.min(corner_b.y) as f32];
        let size = [
            (corner_a.x - corner_b.x).abs() as f32,
            (corner_a.y - corner_b.y).abs() as f32,
        ];
        self.frame.boxes.push((min, size, color));
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCode>, SurfaceError> {
        self.ensure_window()?;
        self.flush()?;
        let mut keys = self.keys.borrow_mut();
        keys.pump(timeout)?;
        Ok(keys.queue.pending.pop_front())
    }
}

// =============================================================================
// PLOT SURFACE
// =============================================================================

/// Plot surface that logs to a Rerun recording.
///
/// A recording stream that has been disabled (viewer gone, sink closed)
/// reports a fresh figure handle, which the display loop reads as the
/// window having been closed.
pub struct RerunPlot {
    rec: RecordingStream,
    keys: Rc<RefCell<TerminalKeys>>,
    figure: Option<FigureHandle>,
    arrows: HashSet<AnnotationHandle>,
    frame: i64,
}

impl RerunPlot {
    fn new(rec: RecordingStream, keys: Rc<RefCell<TerminalKeys>>) -> Self {
        Self {
            rec,
            keys,
            figure: None,
            arrows: HashSet::new(),
            frame: 0,
        }
    }

    fn ensure_figure(&self) -> Result<(), SurfaceError> {
        if self.figure.is_none() {
            return Err(SurfaceError::unavailable("no figure has been created"));
        }
        Ok(())
    }
}

impl PlotSurface for RerunPlot {
    fn create_figure(&mut self, size: FigureSize) -> Result<FigureHandle, SurfaceError> {
        let handle = FigureHandle::new();
        self.rec
            .log_static(
                "plot/info",
                &rerun::TextLog::new(format!(
                    "figure {} ({}x{} in)",
                    handle, size.width_in, size.height_in
                )),
            )
            .map_err(SurfaceError::backend)?;
        self.figure = Some(handle);
        self.arrows.clear();
        Ok(handle)
    }

    fn current_figure(&self) -> FigureHandle {
        match self.figure {
            Some(handle) if self.rec.is_enabled() => handle,
            _ => FigureHandle::new(),
        }
    }

    fn set_window_title(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.rec
            .log_static("plot/title", &rerun::TextLog::new(title))
            .map_err(SurfaceError::backend)
    }

    fn set_axis_limits(&mut self, x: (f64, f64), y: (f64, f64)) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        let (x0, x1, y0, y1) = (x.0 as f32, x.1 as f32, y.0 as f32, y.1 as f32);
        self.rec
            .log_static(
                "plot/bounds",
                &rerun::LineStrips2D::new([[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])
                    .with_colors([rerun::Color::from_rgb(90, 90, 90)]),
            )
            .map_err(SurfaceError::backend)
    }

    fn set_axis_labels(&mut self, x: &str, y: &str) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.rec
            .log_static("plot/axes", &rerun::TextLog::new(format!("x: {} | y: {}", x, y)))
            .map_err(SurfaceError::backend)
    }

    fn add_arrow(&mut self, arrow: ArrowSpec) -> Result<AnnotationHandle, SurfaceError> {
        self.ensure_figure()?;
        let handle = AnnotationHandle::new();

        // Rerun has no arrow-head sizing; stretch the arrow to the head length
        // so the heading stays readable at map scale.
        let norm = arrow.delta[0].hypot(arrow.delta[1]);
        let stretch = if norm > 0.0 { arrow.head_length / norm } else { 0.0 };
        self.rec
            .log(
                format!("plot/pose/{}", handle.0),
                &rerun::Arrows2D::from_vectors([[
                    (arrow.delta[0] * stretch) as f32,
                    (arrow.delta[1] * stretch) as f32,
                ]])
                .with_origins([[arrow.origin[0] as f32, arrow.origin[1] as f32]])
                .with_radii([(arrow.head_width / 2.0) as f32])
                .with_colors([rgb(arrow.color)]),
            )
            .map_err(SurfaceError::backend)?;

        self.arrows.insert(handle);
        Ok(handle)
    }

    fn remove_annotation(&mut self, handle: AnnotationHandle) -> Result<(), SurfaceError> {
        if !self.arrows.remove(&handle) {
            return Err(SurfaceError::backend("annotation is not on the current figure"));
        }
        self.rec
            .log(format!("plot/pose/{}", handle.0), &rerun::Clear::flat())
            .map_err(SurfaceError::backend)
    }

    fn request_redraw(&mut self) -> Result<(), SurfaceError> {
        self.ensure_figure()?;
        self.frame += 1;
        self.rec.set_time_sequence("frame", self.frame);
        Ok(())
    }

    fn pause_yield(&mut self, duration: Duration) -> PauseOutcome {
        let mut keys = self.keys.borrow_mut();
        if let Err(e) = keys.pump(duration) {
            warn!("Terminal input failed during pause: {}", e);
            return PauseOutcome::Interrupted;
        }
        if std::mem::take(&mut keys.queue.interrupted) {
            PauseOutcome::Interrupted
        } else {
            PauseOutcome::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(TermKey::Esc), Some(KeyCode::ESC));
        assert_eq!(map_key(TermKey::Char('a')), Some(KeyCode(97)));
        assert_eq!(map_key(TermKey::F(1)), None);
    }

    #[test]
    fn test_ctrl_c_interrupts_and_is_queued() {
        let mut queue = KeyQueue::default();
        queue.accept(KeyEvent::new(TermKey::Char('c'), KeyModifiers::CONTROL));
        queue.accept(KeyEvent::new(TermKey::Char('q'), KeyModifiers::NONE));

        assert!(queue.interrupted);
        assert_eq!(queue.pending.pop_front(), Some(KeyCode::CTRL_C));
        assert_eq!(queue.pending.pop_front(), Some(KeyCode::from_char('q')));
        assert_eq!(queue.pending.pop_front(), None);
    }

    #[test]
    fn test_plain_c_is_just_a_key() {
        let mut queue = KeyQueue::default();
        queue.accept(KeyEvent::new(TermKey::Char('c'), KeyModifiers::NONE));
        assert!(!queue.interrupted);
        assert_eq!(queue.pending.pop_front(), Some(KeyCode::from_char('c')));
    }

    #[test]
    #[ignore] // Requires Rerun viewer and a terminal
    fn test_viewer_creation() {
        let viewer = spawn_viewer("slamshow_test");
        assert!(viewer.is_ok());
    }
}

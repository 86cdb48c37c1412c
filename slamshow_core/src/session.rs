//! DisplaySession - one raster window plus one plot figure.
//!
//! # Frame Protocol
//!
//! ```text
//! display_map(bytes)        composite map, drop last frame's overlays
//! display_scan(..)          ┐
//! display_trajectory(..)    │ queue overlays (any order, drawn in order)
//! display_robot(..)         │
//! display_velocities(..)    ┘
//! set_pose(..)              replace the plot arrow
//! refresh() -> bool         show everything; false means stop
//! ```
//!
//! Overlays queued without a new map stay on screen and accumulate, the way
//! drawing onto an unchanged image would.

use crate::compositor::ColorRaster;
use crate::config::ShowConfig;
use crate::display::{DisplayLoopController, LoopState, StopReason};
use crate::error::ShowError;
use crate::overlay::{OverlayBuilder, RobotStyle, SCANPOINT_COLOR};
use crate::pose_overlay::PoseOverlayState;
use crate::transform::MapScale;
use crate::types::{Pose, ScanPoint, VelocityReading, WorldPoint};
use crate::velocity::VelocityGauge;
use nalgebra::Vector2;
use slamshow_env::{Color, DrawCommand, KeyCode, PlotSurface, RasterSurface};
use tracing::{debug, info};

/// A live visualization session owning both display surfaces.
pub struct DisplaySession<R: RasterSurface, P: PlotSurface> {
    raster: R,
    plot: P,
    config: ShowConfig,
    scale: MapScale,
    image: ColorRaster,
    overlays: Vec<DrawCommand>,
    builder: OverlayBuilder,
    gauge: VelocityGauge,
    pose: PoseOverlayState,
    controller: DisplayLoopController,
}

impl<R: RasterSurface, P: PlotSurface> DisplaySession<R, P> {
    /// Opens both surfaces and seeds a centered pose.
    ///
    /// The raster window starts with an empty (black) image; the plot figure
    /// gets its title, axis limits `[0, extent]` and axis labels.
    pub fn new(config: ShowConfig, mut raster: R, mut plot: P) -> Result<Self, ShowError> {
        config.validate()?;
        let scale = config.map_scale()?;
        let image = ColorRaster::blank(config.map_size_pixels);

        raster.create_window(&config.window_name)?;
        raster.push_raster(image.as_bytes(), image.row_stride())?;

        let figure = plot.create_figure(config.figure_size)?;
        plot.set_window_title(&config.plot_title)?;
        let extent = config.map_extent_mm();
        plot.set_axis_limits((0.0, extent), (0.0, extent))?;
        plot.set_axis_labels(&config.x_label, &config.y_label)?;

        let mut pose = PoseOverlayState::new();
        pose.set_pose(&mut plot, &Pose::centered(extent))?;

        info!(
            "Display session '{}' opened: {}x{} px at {} mm/px (figure {})",
            config.window_name, config.map_size_pixels, config.map_size_pixels, config.map_scale_mm_per_pixel, figure
        );

        Ok(Self {
            controller: DisplayLoopController::new(figure, config.timing()),
            gauge: config.velocity_gauge(),
            builder: OverlayBuilder::new(scale),
            raster,
            plot,
            config,
            scale,
            image,
            overlays: Vec::new(),
            pose,
        })
    }

    /// Replaces the base map. Overlays queued so far are discarded.
    pub fn display_map(&mut self, map_bytes: &[u8]) -> Result<(), ShowError> {
        self.image.composite(map_bytes)?;
        self.overlays.clear();
        Ok(())
    }

    /// Queues the robot icon in the default style.
    pub fn display_robot(&mut self, pose: &Pose) {
        self.display_robot_with(pose, &RobotStyle::default());
    }

    pub fn display_robot_with(&mut self, pose: &Pose, style: &RobotStyle) {
        self.overlays.push(self.builder.robot(pose, style));
    }

    /// Queues scan points with no offset in the default color.
    pub fn display_scan(&mut self, scan: &[ScanPoint]) {
        self.display_scan_with(scan, Vector2::zeros(), SCANPOINT_COLOR);
    }

    pub fn display_scan_with(&mut self, scan: &[ScanPoint], offset_mm: Vector2<f64>, color: Color) {
        self.overlays.extend(self.builder.scan(scan, offset_mm, color));
    }

    pub fn display_trajectory(&mut self, trajectory: &[WorldPoint]) {
        self.overlays.extend(self.builder.trajectory(trajectory));
    }

    /// Queues the linear and angular velocity bars.
    pub fn display_velocities(&mut self, reading: &VelocityReading) -> Result<(), ShowError> {
        for bar in self.gauge.bars(reading)? {
            self.overlays.push(bar.label);
            self.overlays.push(bar.bar);
        }
        Ok(())
    }

    /// Moves the pose arrow on the plot figure.
    pub fn set_pose(&mut self, pose: &Pose) -> Result<(), ShowError> {
        self.pose.set_pose(&mut self.plot, pose)?;
        Ok(())
    }

    /// Shows the current frame.
    ///
    /// Returns `false` once the window was closed, the yield was interrupted,
    /// the cancellation key was pressed, or a surface failed; the caller
    /// should stop driving frames. Later calls keep returning `false`.
    pub fn refresh(&mut self) -> bool {
        self.controller.refresh(
            &mut self.raster,
            &mut self.plot,
            self.image.as_bytes(),
            self.image.row_stride(),
            &self.overlays,
        )
    }

    /// Blocks until any key is pressed.
    pub fn wait_key(&mut self, action: &str) -> Result<KeyCode, ShowError> {
        let key = self.controller.wait_key(&mut self.raster, action)?;
        debug!("Key {} pressed", key);
        Ok(key)
    }

    /// Tears the session down, removing the pose arrow, and hands the
    /// surfaces back.
    pub fn close(mut self) -> (R, P) {
        self.pose.release(&mut self.plot);
        info!(
            "Display session '{}' closed after {} frames",
            self.config.window_name,
            self.controller.frames()
        );
        (self.raster, self.plot)
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn scale(&self) -> MapScale {
        self.scale
    }

    pub fn color_raster(&self) -> &ColorRaster {
        &self.image
    }

    /// Overlays queued for the current map.
    pub fn overlays(&self) -> &[DrawCommand] {
        &self.overlays
    }

    /// Pose shown by the plot arrow.
    pub fn current_pose(&self) -> Option<Pose> {
        self.pose.pose()
    }

    pub fn state(&self) -> LoopState {
        self.controller.state()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.controller.stop_reason()
    }

    /// Frames shown so far.
    pub fn frames(&self) -> u64 {
        self.controller.frames()
    }

    pub fn raster(&self) -> &R {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut R {
        &mut self.raster
    }

    pub fn plot(&self) -> &P {
        &self.plot
    }

    pub fn plot_mut(&mut self) -> &mut P {
        &mut self.plot
    }
}

//! Demo runner - feeds simulated frames into a display session.

use crate::error::SimError;
use crate::robot::SimRobot;
use crate::room::SimRoom;

use nalgebra::Vector2;
use serde::Serialize;
use slamshow_core::{DisplaySession, Pose, StopReason, WorldPoint};
use slamshow_env::{Color, PlotSurface, RasterSurface};
use tracing::{debug, info};

/// Parameters for a demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Seed for the range noise
    pub seed: u64,

    /// Frame budget
    pub frames: u64,

    /// Beams per scan
    pub scan_beams: usize,

    /// Range noise standard deviation (mm)
    pub scan_noise_mm: f64,

    /// Orbit radius as a fraction of the map extent
    pub orbit_fraction: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frames: 500,
            scan_beams: 180,
            scan_noise_mm: 20.0,
            orbit_fraction: 0.25,
        }
    }
}

/// Outcome of a demo run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub frames_requested: u64,
    pub frames_shown: u64,
    /// Why the display loop stopped, if it did
    pub stopped_by: Option<StopReason>,
    /// True when the whole frame budget was shown
    pub completed: bool,
    pub trajectory_points: usize,
    pub final_pose: Pose,
    /// Fraction of map cells revealed by the scans
    pub explored: f64,
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the synthetic robot against a display session.
pub struct DemoRunner {
    config: DemoConfig,
}

impl DemoRunner {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Shows frames until the budget runs out or the display loop stops.
    pub fn run<R, P>(&self, session: &mut DisplaySession<R, P>) -> Result<RunSummary, SimError>
    where
        R: RasterSurface,
        P: PlotSurface,
    {
        if self.config.scan_beams == 0 {
            return Err(SimError::invalid("scan needs at least one beam"));
        }
        if !(self.config.orbit_fraction > 0.0 && self.config.orbit_fraction < 0.4) {
            return Err(SimError::invalid(format!(
                "orbit fraction {} must be in (0, 0.4)",
                self.config.orbit_fraction
            )));
        }

        let size = session.config().map_size_pixels;
        let extent = session.config().map_extent_mm();
        let mut room = SimRoom::new(size, session.scale(), self.config.seed, self.config.scan_noise_mm)?;
        let mut robot = SimRobot::new(room.center(), extent * self.config.orbit_fraction)?;

        info!(
            "Starting demo: {} frames, {} beams, seed={}",
            self.config.frames, self.config.scan_beams, self.config.seed
        );

        let mut pose = robot.pose();
        let mut frames_shown = 0;
        for frame in 0..self.config.frames {
            let (next, reading) = robot.step();
            pose = next;

            let scan = room.scan(&pose, self.config.scan_beams);
            room.observe(WorldPoint::from(&pose), &scan);

            session.display_map(&room.map_bytes())?;
            session.display_scan_with(&scan, Vector2::new(pose.x_mm, pose.y_mm), Color::GREEN);
            session.display_trajectory(robot.trajectory());
            session.display_robot(&pose);
            session.display_velocities(&reading)?;
            session.set_pose(&pose)?;

            if !session.refresh() {
                break;
            }
            frames_shown += 1;

            if frame % 50 == 0 {
                debug!(
                    "  frame={} | pose=({:.0}, {:.0}, {:.1}°) | explored={:.1}%",
                    frame,
                    pose.x_mm,
                    pose.y_mm,
                    pose.theta_deg,
                    room.explored() * 100.0
                );
            }
        }

        Ok(RunSummary {
            seed: self.config.seed,
            frames_requested: self.config.frames,
            frames_shown,
            stopped_by: session.stop_reason(),
            completed: frames_shown == self.config.frames,
            trajectory_points: robot.trajectory().len(),
            final_pose: pose,
            explored: room.explored(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slamshow_core::ShowConfig;
    use slamshow_env::{HeadlessPlot, HeadlessRaster, KeyCode};

    fn session() -> DisplaySession<HeadlessRaster, HeadlessPlot> {
        DisplaySession::new(ShowConfig::new(100, 50.0), HeadlessRaster::new(), HeadlessPlot::new()).unwrap()
    }

    fn demo(frames: u64) -> DemoRunner {
        DemoRunner::new(DemoConfig {
            frames,
            scan_beams: 36,
            ..Default::default()
        })
    }

    #[test]
    fn test_full_budget() {
        let mut session = session();
        let summary = demo(10).run(&mut session).unwrap();

        assert!(summary.completed);
        assert_eq!(summary.frames_shown, 10);
        assert_eq!(summary.stopped_by, None);
        assert_eq!(summary.trajectory_points, 11);
        assert!(summary.explored > 0.0);

        assert_eq!(session.frames(), 10);
        assert_eq!(session.raster().frames(), 11);
        assert_eq!(session.plot().annotation_count(), 1);
        assert_eq!(session.current_pose(), Some(summary.final_pose));
    }

    #[test]
    fn test_cancel_key_stops_early() {
        let mut session = session();
        session
            .raster_mut()
            .script_keys([None, None, None, Some(KeyCode::ESC)]);

        let summary = demo(10).run(&mut session).unwrap();
        assert!(!summary.completed);
        assert_eq!(summary.frames_shown, 3);
        assert_eq!(summary.stopped_by, Some(StopReason::CancelKey));
    }

    #[test]
    fn test_closed_window_shows_nothing() {
        let mut session = session();
        session.plot_mut().close_externally();

        let summary = demo(10).run(&mut session).unwrap();
        assert_eq!(summary.frames_shown, 0);
        assert_eq!(summary.stopped_by, Some(StopReason::WindowClosed));
        assert_eq!(summary.trajectory_points, 2);
    }

    #[test]
    fn test_overlays_are_drawn_each_frame() {
        let mut session = session();
        demo(1).run(&mut session).unwrap();

        // 36 scan points + 1 trajectory segment + robot + 2 labels + 2 bars
        assert_eq!(session.raster().overlays().len(), 36 + 1 + 1 + 4);
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut session = session();
        let zero_beams = DemoRunner::new(DemoConfig {
            scan_beams: 0,
            ..Default::default()
        });
        assert!(matches!(zero_beams.run(&mut session), Err(SimError::InvalidParameter(_))));

        let wide_orbit = DemoRunner::new(DemoConfig {
            orbit_fraction: 0.5,
            ..Default::default()
        });
        assert!(wide_orbit.run(&mut session).is_err());
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = demo(20).run(&mut session()).unwrap();
        let b = demo(20).run(&mut session()).unwrap();
        assert_eq!(a.final_pose, b.final_pose);
        assert_eq!(a.explored, b.explored);
    }

    #[test]
    fn test_summary_json() {
        let summary = demo(2).run(&mut session()).unwrap();
        let json = summary.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["frames_shown"], 2);
        assert_eq!(value["completed"], true);
        assert!(value["stopped_by"].is_null());
    }
}

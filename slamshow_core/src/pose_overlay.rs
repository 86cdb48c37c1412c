//! The single live pose arrow on the plot figure.

use crate::transform::heading_offset;
use crate::types::Pose;
use slamshow_env::{AnnotationHandle, ArrowSpec, Color, PlotSurface, SurfaceError};
use tracing::{debug, warn};

/// Arrow head width, in world millimeters
pub const ROBOT_WIDTH_MM: f64 = 300.0;
/// Arrow head length, in world millimeters
pub const ROBOT_HEIGHT_MM: f64 = 500.0;
/// Shaft length; just enough to orient the head
pub const ARROW_SHAFT_MM: f64 = 0.1;
pub const POSE_ARROW_COLOR: Color = Color::RED;

/// An arrow annotation currently shown on the plot.
#[derive(Debug)]
struct PoseArrow {
    handle: AnnotationHandle,
    pose: Pose,
}

/// Owns the pose arrow and replaces it on every update.
///
/// At most one arrow is live: the previous one is always removed from the
/// plot before its replacement is added.
#[derive(Debug, Default)]
pub struct PoseOverlayState {
    live: Option<PoseArrow>,
}

impl PoseOverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrow geometry for a pose.
    pub fn arrow_for(pose: &Pose) -> ArrowSpec {
        let delta = heading_offset(ARROW_SHAFT_MM, pose.theta_deg);
        ArrowSpec {
            origin: [pose.x_mm, pose.y_mm],
            delta: [delta.x, delta.y],
            head_width: ROBOT_WIDTH_MM,
            head_length: ROBOT_HEIGHT_MM,
            color: POSE_ARROW_COLOR,
        }
    }

    /// Replaces the live arrow with one for `pose`.
    pub fn set_pose<P>(&mut self, plot: &mut P, pose: &Pose) -> Result<AnnotationHandle, SurfaceError>
    where
        P: PlotSurface + ?Sized,
    {
        self.release(plot);

        let handle = plot.add_arrow(Self::arrow_for(pose))?;
        debug!(x_mm = pose.x_mm, y_mm = pose.y_mm, theta_deg = pose.theta_deg, "pose arrow placed");
        self.live = Some(PoseArrow { handle, pose: *pose });
        Ok(handle)
    }

    /// Removes the live arrow, if any.
    ///
    /// The arrow is forgotten even if the plot no longer knows it (a figure
    /// closed behind our back takes its annotations with it).
    pub fn release<P>(&mut self, plot: &mut P)
    where
        P: PlotSurface + ?Sized,
    {
        if let Some(old) = self.live.take() {
            if let Err(e) = plot.remove_annotation(old.handle) {
                warn!("Failed to remove previous pose arrow: {}", e);
            }
        }
    }

    /// Handle of the live arrow.
    pub fn live_handle(&self) -> Option<AnnotationHandle> {
        self.live.as_ref().map(|a| a.handle)
    }

    /// Pose the live arrow was drawn for.
    pub fn pose(&self) -> Option<Pose> {
        self.live.as_ref().map(|a| a.pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slamshow_env::{FigureSize, HeadlessPlot};

    fn plot() -> HeadlessPlot {
        let mut plot = HeadlessPlot::new();
        plot.create_figure(FigureSize::default()).unwrap();
        plot
    }

    #[test]
    fn test_arrow_geometry() {
        let arrow = PoseOverlayState::arrow_for(&Pose::new(100.0, 200.0, 90.0));
        assert_eq!(arrow.origin, [100.0, 200.0]);
        assert_relative_eq!(arrow.delta[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(arrow.delta[1], ARROW_SHAFT_MM, epsilon = 1e-12);
        assert_eq!(arrow.head_width, ROBOT_WIDTH_MM);
        assert_eq!(arrow.head_length, ROBOT_HEIGHT_MM);
    }

    #[test]
    fn test_replace_keeps_single_arrow() {
        let mut plot = plot();
        let mut state = PoseOverlayState::new();

        let first = state.set_pose(&mut plot, &Pose::new(0.0, 0.0, 0.0)).unwrap();
        for i in 1..5 {
            state.set_pose(&mut plot, &Pose::new(i as f64 * 10.0, 0.0, 0.0)).unwrap();
            assert_eq!(plot.annotation_count(), 1);
        }

        assert_ne!(state.live_handle(), Some(first));
        assert_eq!(state.pose(), Some(Pose::new(40.0, 0.0, 0.0)));
        let (handle, spec) = plot.annotations().next().unwrap();
        assert_eq!(Some(*handle), state.live_handle());
        assert_eq!(spec.origin, [40.0, 0.0]);
    }

    #[test]
    fn test_replace_after_external_close() {
        let mut plot = plot();
        let mut state = PoseOverlayState::new();
        state.set_pose(&mut plot, &Pose::default()).unwrap();

        plot.close_externally();
        state.set_pose(&mut plot, &Pose::new(5.0, 5.0, 45.0)).unwrap();
        assert_eq!(plot.annotation_count(), 1);
    }

    #[test]
    fn test_release() {
        let mut plot = plot();
        let mut state = PoseOverlayState::new();
        state.release(&mut plot);

        state.set_pose(&mut plot, &Pose::default()).unwrap();
        state.release(&mut plot);
        assert_eq!(plot.annotation_count(), 0);
        assert!(state.live_handle().is_none());
    }
}

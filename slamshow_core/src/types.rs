//! World-space data supplied by the mapping process each frame.

use serde::{Deserialize, Serialize};

/// Robot position and heading.
///
/// Heading is in degrees, counter-clockwise from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x_mm: f64,
    pub y_mm: f64,
    pub theta_deg: f64,
}

impl Pose {
    pub fn new(x_mm: f64, y_mm: f64, theta_deg: f64) -> Self {
        Self { x_mm, y_mm, theta_deg }
    }

    /// Pose at the middle of a square map extent, facing +x.
    pub fn centered(extent_mm: f64) -> Self {
        Self::new(extent_mm / 2.0, extent_mm / 2.0, 0.0)
    }
}

/// A point in world millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x_mm: f64,
    pub y_mm: f64,
}

impl WorldPoint {
    pub fn new(x_mm: f64, y_mm: f64) -> Self {
        Self { x_mm, y_mm }
    }
}

impl From<(f64, f64)> for WorldPoint {
    fn from((x_mm, y_mm): (f64, f64)) -> Self {
        Self::new(x_mm, y_mm)
    }
}

impl From<&Pose> for WorldPoint {
    fn from(pose: &Pose) -> Self {
        Self::new(pose.x_mm, pose.y_mm)
    }
}

/// A single range-sensor return, relative to the offset it is drawn with.
pub type ScanPoint = WorldPoint;

/// Instantaneous odometry velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityReading {
    /// Linear speed (mm per update)
    pub linear_mm: f64,
    /// Angular speed (degrees per update)
    pub angular_deg: f64,
}

impl VelocityReading {
    pub fn new(linear_mm: f64, angular_deg: f64) -> Self {
        Self { linear_mm, angular_deg }
    }
}

//! Robot that orbits the room center, reporting odometry each tick.

use crate::error::SimError;
use slamshow_core::{Pose, VelocityReading, WorldPoint};

/// Mean angular step along the orbit, degrees per tick
const BASE_STEP_DEG: f64 = 2.0;
/// Relative amplitude of the speed variation
const SPEED_SWING: f64 = 0.5;
/// How fast the speed variation cycles, radians per tick
const SWING_RATE: f64 = 0.05;

/// Simulated robot on a circular path.
#[derive(Debug, Clone)]
pub struct SimRobot {
    center: WorldPoint,
    radius_mm: f64,
    angle_deg: f64,
    tick: u64,
    trajectory: Vec<WorldPoint>,
}

impl SimRobot {
    pub fn new(center: WorldPoint, radius_mm: f64) -> Result<Self, SimError> {
        if !radius_mm.is_finite() || radius_mm <= 0.0 {
            return Err(SimError::invalid(format!("orbit radius {} mm", radius_mm)));
        }
        let mut robot = Self {
            center,
            radius_mm,
            angle_deg: 0.0,
            tick: 0,
            trajectory: Vec::new(),
        };
        robot.trajectory.push(WorldPoint::from(&robot.pose()));
        Ok(robot)
    }

    /// Current pose. Heading is tangent to the orbit (counter-clockwise).
    pub fn pose(&self) -> Pose {
        let a = self.angle_deg.to_radians();
        Pose::new(
            self.center.x_mm + self.radius_mm * a.cos(),
            self.center.y_mm + self.radius_mm * a.sin(),
            (self.angle_deg + 90.0).rem_euclid(360.0),
        )
    }

    /// Advances one tick and returns the new pose with the odometry
    /// that produced it.
    pub fn step(&mut self) -> (Pose, VelocityReading) {
        let swing = 1.0 + SPEED_SWING * (self.tick as f64 * SWING_RATE).sin();
        let step_deg = BASE_STEP_DEG * swing;

        self.angle_deg = (self.angle_deg + step_deg).rem_euclid(360.0);
        self.tick += 1;

        let pose = self.pose();
        self.trajectory.push(WorldPoint::from(&pose));

        let reading = VelocityReading::new(self.radius_mm * step_deg.to_radians(), step_deg);
        (pose, reading)
    }

    /// Every position visited so far, starting with the initial one.
    pub fn trajectory(&self) -> &[WorldPoint] {
        &self.trajectory
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn radius_mm(&self) -> f64 {
        self.radius_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_east_of_center_facing_north() {
        let robot = SimRobot::new(WorldPoint::new(1000.0, 1000.0), 200.0).unwrap();
        let pose = robot.pose();
        assert!((pose.x_mm - 1200.0).abs() < 1e-9);
        assert!((pose.y_mm - 1000.0).abs() < 1e-9);
        assert!((pose.theta_deg - 90.0).abs() < 1e-9);
        assert_eq!(robot.trajectory().len(), 1);
    }

    #[test]
    fn test_rejects_bad_radius() {
        let c = WorldPoint::new(0.0, 0.0);
        assert!(SimRobot::new(c, 0.0).is_err());
        assert!(SimRobot::new(c, -5.0).is_err());
        assert!(SimRobot::new(c, f64::NAN).is_err());
    }

    #[test]
    fn test_first_step_reports_base_speed() {
        let mut robot = SimRobot::new(WorldPoint::new(0.0, 0.0), 1000.0).unwrap();
        let (pose, reading) = robot.step();

        // sin(0) = 0 so the first step is exactly the base step
        assert!((reading.angular_deg - BASE_STEP_DEG).abs() < 1e-9);
        assert!((reading.linear_mm - 1000.0 * BASE_STEP_DEG.to_radians()).abs() < 1e-9);
        assert!((pose.theta_deg - (90.0 + BASE_STEP_DEG)).abs() < 1e-9);
        assert_eq!(robot.ticks(), 1);
        assert_eq!(robot.trajectory().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_stays_on_orbit(ticks in 0usize..400, radius in 10.0f64..10_000.0) {
            let center = WorldPoint::new(5000.0, 5000.0);
            let mut robot = SimRobot::new(center, radius).unwrap();
            for _ in 0..ticks {
                let (_, reading) = robot.step();
                prop_assert!(reading.linear_mm > 0.0);
            }
            let pose = robot.pose();
            let r = ((pose.x_mm - center.x_mm).powi(2) + (pose.y_mm - center.y_mm).powi(2)).sqrt();
            prop_assert!((r - radius).abs() < 1e-6 * radius.max(1.0));
            prop_assert!((0.0..360.0).contains(&pose.theta_deg));
            prop_assert_eq!(robot.trajectory().len(), ticks + 1);
        }
    }
}

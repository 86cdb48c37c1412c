//! Pixel-space overlay geometry: robot icon, scan points, trajectory.

use crate::transform::{rotate, MapScale};
use crate::types::{Pose, ScanPoint, WorldPoint};
use nalgebra::{Point2, Vector2};
use slamshow_env::{Color, DrawCommand};

/// Robot icon length along its heading, in pixels at scale 1
pub const ROBOT_HEIGHT: f64 = 16.0;
/// Robot icon width across its heading, in pixels at scale 1
pub const ROBOT_WIDTH: f64 = 10.0;
pub const ROBOT_COLOR: Color = Color::RED;

pub const SCANPOINT_RADIUS: u32 = 1;
pub const SCANPOINT_COLOR: Color = Color::GREEN;

pub const TRAJECTORY_COLOR: Color = Color::BLUE;

/// How the robot icon is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotStyle {
    pub color: Color,
    pub scale: f64,
    pub line_thickness: u32,
}

impl Default for RobotStyle {
    fn default() -> Self {
        Self {
            color: ROBOT_COLOR,
            scale: 1.0,
            line_thickness: 1,
        }
    }
}

/// Isosceles triangle pointing along +x, centered at the origin.
///
/// Vertices are left-bottom, right tip, left-top.
pub fn robot_polyline(scale: f64) -> [Point2<f64>; 3] {
    let x_left = -ROBOT_HEIGHT / 2.0 * scale;
    let x_right = ROBOT_HEIGHT / 2.0 * scale;
    let y_half = ROBOT_WIDTH / 2.0 * scale;
    [
        Point2::new(x_left, y_half),
        Point2::new(x_right, 0.0),
        Point2::new(x_left, -y_half),
    ]
}

/// Builds draw commands for world-space overlays at a fixed map scale.
#[derive(Debug, Clone, Copy)]
pub struct OverlayBuilder {
    scale: MapScale,
}

impl OverlayBuilder {
    pub fn new(scale: MapScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> MapScale {
        self.scale
    }

    /// Robot icon rotated to the pose heading and moved to its pixel.
    pub fn robot(&self, pose: &Pose, style: &RobotStyle) -> DrawCommand {
        let center = self.scale.to_pixel(WorldPoint::from(pose));
        let points = robot_polyline(style.scale)
            .iter()
            .map(|&vertex| rotate(vertex, pose.theta_deg).offset(center.x, center.y))
            .collect();

        DrawCommand::Polyline {
            points,
            closed: true,
            color: style.color,
            thickness: style.line_thickness,
        }
    }

    /// One small filled circle per scan point, in input order.
    pub fn scan(&self, points: &[ScanPoint], offset_mm: Vector2<f64>, color: Color) -> Vec<DrawCommand> {
        points
            .iter()
            .map(|p| DrawCommand::Circle {
                center: self
                    .scale
                    .to_pixel(WorldPoint::new(p.x_mm + offset_mm.x, p.y_mm + offset_mm.y)),
                radius: SCANPOINT_RADIUS,
                color,
            })
            .collect()
    }

    /// Line segments joining consecutive trajectory points.
    pub fn trajectory(&self, points: &[WorldPoint]) -> Vec<DrawCommand> {
        points
            .windows(2)
            .map(|pair| DrawCommand::Line {
                from: self.scale.to_pixel(pair[0]),
                to: self.scale.to_pixel(pair[1]),
                color: TRAJECTORY_COLOR,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slamshow_env::PixelPoint;

    fn builder(mm_per_pixel: f64) -> OverlayBuilder {
        OverlayBuilder::new(MapScale::new(mm_per_pixel).unwrap())
    }

    fn polyline_points(cmd: &DrawCommand) -> &[PixelPoint] {
        match cmd {
            DrawCommand::Polyline { points, .. } => points,
            other => panic!("expected polyline, got {:?}", other),
        }
    }

    #[test]
    fn test_robot_polyline_shape() {
        let pts = robot_polyline(1.0);
        assert_eq!(pts.len(), 3);

        let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        let x_extent = xs.iter().cloned().fold(f64::MIN, f64::max) - xs.iter().cloned().fold(f64::MAX, f64::min);
        let y_extent = ys.iter().cloned().fold(f64::MIN, f64::max) - ys.iter().cloned().fold(f64::MAX, f64::min);
        assert_eq!(x_extent, ROBOT_HEIGHT);
        assert_eq!(y_extent, ROBOT_WIDTH);

        // Symmetric about the x-axis, tip on the axis
        assert_eq!(pts[0].x, pts[2].x);
        assert_eq!(pts[0].y, -pts[2].y);
        assert_eq!(pts[1].y, 0.0);
        assert!(pts[1].x > 0.0);
    }

    #[test]
    fn test_robot_polyline_scales() {
        let pts = robot_polyline(2.0);
        assert_eq!(pts[1], Point2::new(16.0, 0.0));
        assert_eq!(pts[0], Point2::new(-16.0, 10.0));
    }

    #[test]
    fn test_robot_overlay_translated() {
        let cmd = builder(10.0).robot(&Pose::new(1000.0, 2000.0, 0.0), &RobotStyle::default());
        assert_eq!(
            polyline_points(&cmd),
            &[
                PixelPoint::new(92, 205),
                PixelPoint::new(108, 200),
                PixelPoint::new(92, 195),
            ]
        );
        match cmd {
            DrawCommand::Polyline { closed, color, thickness, .. } => {
                assert!(closed);
                assert_eq!(color, ROBOT_COLOR);
                assert_eq!(thickness, 1);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_robot_overlay_rotated() {
        let cmd = builder(10.0).robot(&Pose::new(0.0, 0.0, 90.0), &RobotStyle::default());
        // Tip now points along +y
        assert_eq!(polyline_points(&cmd)[1], PixelPoint::new(0, 8));
    }

    #[test]
    fn test_scan_overlay_uses_offset_and_order() {
        let scan = [ScanPoint::new(100.0, 0.0), ScanPoint::new(-100.0, 50.0)];
        let cmds = builder(10.0).scan(&scan, Vector2::new(1000.0, 1000.0), SCANPOINT_COLOR);

        assert_eq!(
            cmds,
            vec![
                DrawCommand::Circle {
                    center: PixelPoint::new(110, 100),
                    radius: SCANPOINT_RADIUS,
                    color: SCANPOINT_COLOR,
                },
                DrawCommand::Circle {
                    center: PixelPoint::new(90, 105),
                    radius: SCANPOINT_RADIUS,
                    color: SCANPOINT_COLOR,
                },
            ]
        );
    }

    #[test]
    fn test_scan_overlay_empty() {
        assert!(builder(10.0).scan(&[], Vector2::zeros(), SCANPOINT_COLOR).is_empty());
    }

    #[test]
    fn test_trajectory_segments() {
        let b = builder(10.0);
        assert!(b.trajectory(&[]).is_empty());
        assert!(b.trajectory(&[WorldPoint::new(10.0, 10.0)]).is_empty());

        let path = [
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(100.0, 0.0),
            WorldPoint::new(100.0, 100.0),
        ];
        let cmds = b.trajectory(&path);
        assert_eq!(
            cmds,
            vec![
                DrawCommand::Line {
                    from: PixelPoint::new(0, 0),
                    to: PixelPoint::new(10, 0),
                    color: TRAJECTORY_COLOR,
                },
                DrawCommand::Line {
                    from: PixelPoint::new(10, 0),
                    to: PixelPoint::new(10, 10),
                    color: TRAJECTORY_COLOR,
                },
            ]
        );
    }
}

//! A square room with a pillar: ground-truth map, range scans, and the
//! partially explored occupancy map the display shows.

use crate::error::SimError;
use nalgebra::Vector2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use slamshow_core::transform::heading_offset;
use slamshow_core::{MapScale, Pose, ScanPoint, WorldPoint};

/// Occupancy byte for free space
pub const FREE: u8 = 255;
/// Occupancy byte for walls and obstacles
pub const OCCUPIED: u8 = 0;
/// Occupancy byte for cells not yet observed
pub const UNKNOWN: u8 = 127;

/// Wall thickness in pixels
const WALL_PIXELS: f64 = 2.0;

/// Axis-aligned square in world millimeters.
#[derive(Debug, Clone, Copy)]
struct Square {
    min: f64,
    max: f64,
}

impl Square {
    fn contains(&self, p: WorldPoint) -> bool {
        p.x_mm >= self.min && p.x_mm <= self.max && p.y_mm >= self.min && p.y_mm <= self.max
    }

    /// Distance to where a ray leaves the square, starting inside it.
    fn exit_distance(&self, origin: WorldPoint, dir: Vector2<f64>) -> f64 {
        let axis = |o: f64, d: f64| {
            if d > 0.0 {
                (self.max - o) / d
            } else if d < 0.0 {
                (self.min - o) / d
            } else {
                f64::INFINITY
            }
        };
        axis(origin.x_mm, dir.x).min(axis(origin.y_mm, dir.y)).max(0.0)
    }

    /// Distance to where a ray enters the square (slab method).
    fn entry_distance(&self, origin: WorldPoint, dir: Vector2<f64>) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for (o, d) in [(origin.x_mm, dir.x), (origin.y_mm, dir.y)] {
            if d == 0.0 {
                if o < self.min || o > self.max {
                    return None;
                }
            } else {
                let t1 = (self.min - o) / d;
                let t2 = (self.max - o) / d;
                t_min = t_min.max(t1.min(t2));
                t_max = t_max.min(t1.max(t2));
            }
        }
        if t_max < t_min.max(0.0) {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

/// The simulated environment.
pub struct SimRoom {
    size: usize,
    scale: MapScale,
    interior: Square,
    pillar: Square,
    max_range_mm: f64,
    truth: Vec<u8>,
    known: Vec<bool>,
    rng: ChaCha8Rng,
    noise: Normal<f64>,
}

impl SimRoom {
    /// Builds a room filling the map with a 10% unknown margin and a pillar
    /// in the middle.
    ///
    /// # Arguments
    /// * `size` - Map side length in pixels
    /// * `scale` - Map resolution
    /// * `seed` - Seed for the range noise
    /// * `noise_std_mm` - Standard deviation of the range noise
    pub fn new(size: usize, scale: MapScale, seed: u64, noise_std_mm: f64) -> Result<Self, SimError> {
        if size < 10 {
            return Err(SimError::invalid(format!("map of {} pixels is too small for a room", size)));
        }
        let noise = Normal::new(0.0, noise_std_mm)
            .map_err(|e| SimError::invalid(format!("range noise {}: {}", noise_std_mm, e)))?;

        let extent = scale.extent_mm(size);
        let margin = extent * 0.1;
        let center = extent / 2.0;
        let pillar_half = extent * 0.04;

        let mut room = Self {
            size,
            scale,
            interior: Square {
                min: margin,
                max: extent - margin,
            },
            pillar: Square {
                min: center - pillar_half,
                max: center + pillar_half,
            },
            max_range_mm: extent,
            truth: Vec::new(),
            known: vec![false; size * size],
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise,
        };
        room.truth = room.build_truth();
        Ok(room)
    }

    fn build_truth(&self) -> Vec<u8> {
        let mm = self.scale.mm_per_pixel();
        let wall = Square {
            min: self.interior.min - WALL_PIXELS * mm,
            max: self.interior.max + WALL_PIXELS * mm,
        };

        let mut bytes = Vec::with_capacity(self.size * self.size);
        for row in 0..self.size {
            for col in 0..self.size {
                let p = WorldPoint::new((col as f64 + 0.5) * mm, (row as f64 + 0.5) * mm);
                let cell = if self.pillar.contains(p) {
                    OCCUPIED
                } else if self.interior.contains(p) {
                    FREE
                } else if wall.contains(p) {
                    OCCUPIED
                } else {
                    UNKNOWN
                };
                bytes.push(cell);
            }
        }
        bytes
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Center of the map in world millimeters.
    pub fn center(&self) -> WorldPoint {
        let c = self.scale.extent_mm(self.size) / 2.0;
        WorldPoint::new(c, c)
    }

    /// Interior bounds `(min, max)` on both axes.
    pub fn interior(&self) -> (f64, f64) {
        (self.interior.min, self.interior.max)
    }

    /// Half side length of the central pillar.
    pub fn pillar_half_width(&self) -> f64 {
        (self.pillar.max - self.pillar.min) / 2.0
    }

    /// The fully known map.
    pub fn truth(&self) -> &[u8] {
        &self.truth
    }

    /// The map as explored so far; unobserved cells read as unknown.
    pub fn map_bytes(&self) -> Vec<u8> {
        self.truth
            .iter()
            .zip(&self.known)
            .map(|(&cell, &known)| if known { cell } else { UNKNOWN })
            .collect()
    }

    /// Fraction of cells observed so far.
    pub fn explored(&self) -> f64 {
        self.known.iter().filter(|&&k| k).count() as f64 / self.known.len() as f64
    }

    /// Noise-free range along a bearing (degrees, world frame).
    pub fn range(&self, origin: WorldPoint, bearing_deg: f64) -> f64 {
        let dir = heading_offset(1.0, bearing_deg);
        let wall = self.interior.exit_distance(origin, dir);
        let pillar = self.pillar.entry_distance(origin, dir).unwrap_or(f64::INFINITY);
        wall.min(pillar).min(self.max_range_mm)
    }

    /// A noisy 360° scan with `beams` evenly spaced returns.
    ///
    /// Points are relative to the robot position (world-aligned, not
    /// rotated into the robot frame), so they are drawn with the robot
    /// position as offset.
    pub fn scan(&mut self, pose: &Pose, beams: usize) -> Vec<ScanPoint> {
        let origin = WorldPoint::from(pose);
        let step = 360.0 / beams.max(1) as f64;
        (0..beams)
            .map(|i| {
                let bearing = pose.theta_deg + i as f64 * step;
                let range = (self.range(origin, bearing) + self.noise.sample(&mut self.rng)).max(0.0);
                let v = heading_offset(range, bearing);
                ScanPoint::new(v.x, v.y)
            })
            .collect()
    }

    /// Marks every cell along each scan ray as observed.
    pub fn observe(&mut self, origin: WorldPoint, scan: &[ScanPoint]) {
        let step_mm = self.scale.mm_per_pixel() / 2.0;
        for point in scan {
            let ray = Vector2::new(point.x_mm, point.y_mm);
            let steps = (ray.norm() / step_mm).ceil() as usize;
            for k in 0..=steps {
                let t = if steps == 0 { 1.0 } else { k as f64 / steps as f64 };
                self.mark(WorldPoint::new(origin.x_mm + ray.x * t, origin.y_mm + ray.y * t));
            }
        }
    }

    fn mark(&mut self, p: WorldPoint) {
        let px = self.scale.to_pixel(p);
        if px.x < 0 || px.y < 0 {
            return;
        }
        let (col, row) = (px.x as usize, px.y as usize);
        if col < self.size && row < self.size {
            self.known[row * self.size + col] = true;
        }
    }
}

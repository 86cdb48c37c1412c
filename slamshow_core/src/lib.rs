//! SlamShow Core - Live Overlay Engine for 2D SLAM
//!
//! Turns the output of a localization-and-mapping process into pixels:
//! 1. **Map**: grayscale occupancy bytes expanded into a 3-channel raster
//! 2. **Overlays**: robot icon, scan points, trajectory, velocity bars
//! 3. **Pose arrow**: a single live annotation on the plot figure
//! 4. **Loop**: a non-blocking refresh cycle that stops on window close,
//!    interrupt, or the cancellation key
//!
//! The display surfaces themselves live behind the traits in
//! [`slamshow_env`]; this crate only computes geometry and drives them.

pub mod compositor;
pub mod config;
pub mod display;
pub mod error;
pub mod overlay;
pub mod pose_overlay;
pub mod session;
pub mod transform;
pub mod types;
pub mod velocity;

#[cfg(feature = "visualization")]
pub mod viewer;

// Re-export key types for convenience
pub use compositor::ColorRaster;
pub use config::ShowConfig;
pub use display::{DisplayLoopController, LoopState, LoopTiming, StopReason};
pub use error::ShowError;
pub use overlay::{OverlayBuilder, RobotStyle};
pub use pose_overlay::PoseOverlayState;
pub use session::DisplaySession;
pub use transform::MapScale;
pub use types::{Pose, ScanPoint, VelocityReading, WorldPoint};
pub use velocity::{VelocityBar, VelocityGauge};

//! SlamShow Synthetic Robot Harness
//!
//! Stands in for a real localization-and-mapping process so the overlay
//! engine can be exercised end to end without hardware:
//!
//! ```text
//! ┌────────────┐  pose, velocity   ┌──────────────┐
//! │  SimRobot  │──────────────────►│              │
//! └────────────┘                   │  DemoRunner  │──► DisplaySession
//! ┌────────────┐  map bytes, scan  │              │
//! │  SimRoom   │──────────────────►│              │
//! └────────────┘                   └──────────────┘
//! ```
//!
//! All noise comes from a single seed, so a run is reproducible.
//!
//! # Usage
//!
//! ```
//! use slamshow_core::{DisplaySession, ShowConfig};
//! use slamshow_env::{HeadlessPlot, HeadlessRaster};
//! use slamshow_sim::{DemoConfig, DemoRunner};
//!
//! let config = ShowConfig::new(200, 50.0);
//! let mut session = DisplaySession::new(config, HeadlessRaster::new(), HeadlessPlot::new()).unwrap();
//!
//! let summary = DemoRunner::new(DemoConfig { frames: 5, ..Default::default() })
//!     .run(&mut session)
//!     .unwrap();
//! assert_eq!(summary.frames_shown, 5);
//! ```

mod error;
mod robot;
mod room;
mod runner;

pub use error::SimError;
pub use robot::SimRobot;
pub use room::SimRoom;
pub use runner::{DemoConfig, DemoRunner, RunSummary};

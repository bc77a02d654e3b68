//! Orientation calibration core for full-body IMU tracking.
//!
//! Raw IMU trackers are wrapped in a [`tracker::ReferenceAdjustedTracker`],
//! which removes strap roll, power-on heading and mounting offset estimated
//! from one reference pose, then aligns heading to the reference (HMD).

pub mod config;
pub mod error;
pub mod live_status;
pub mod sensors;
pub mod skeleton;
pub mod tracker;
pub mod types;

pub use error::{TrackerError, TrackerResult};
pub use tracker::{ReferenceAdjustedTracker, Tracker};
pub use types::{Orientation, Position};

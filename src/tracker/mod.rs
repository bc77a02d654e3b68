//! Tracker capability contract
//!
//! Every orientation/position source implements [`Tracker`], raw or wrapped.
//! Queries return `None` instead of failing when a source has no valid value
//! yet; a stale reading is still a value.
//!
//! ```ignore
//! use body_tracker_rs::tracker::{ImuTracker, ReferenceAdjustedTracker, Tracker};
//!
//! let mut adjusted = ReferenceAdjustedTracker::new(ImuTracker::new(0, "imu/0", None));
//! adjusted.reset_full(&hmd_rotation);
//! let corrected = adjusted.rotation();
//! ```

pub mod computed;
pub mod device;
pub mod imu;
pub mod reference_adjusted;
pub mod status;
pub mod tracker_config;

pub use computed::ComputedTracker;
pub use device::Device;
pub use imu::ImuTracker;
pub use reference_adjusted::{CalibrationState, ReferenceAdjustedTracker};
pub use status::{TrackerPosition, TrackerStatus};
pub use tracker_config::{StoredRotation, TrackerConfig};

use crate::types::{Orientation, Position};

pub trait Tracker {
    /// Current rotation, `None` if the source has no valid rotation yet
    fn rotation(&self) -> Option<Orientation>;

    /// Current position, `None` for sources without position capability
    fn position(&self) -> Option<Position>;

    /// Full calibration against `reference`
    fn reset_full(&mut self, reference: &Orientation);

    /// Heading-only calibration against `reference`
    fn reset_yaw(&mut self, reference: &Orientation);

    /// Advance internal state once per processing cycle
    fn tick(&mut self);

    fn name(&self) -> String;
    fn display_name(&self) -> String;
    fn custom_name(&self) -> Option<String>;

    fn status(&self) -> TrackerStatus;
    fn confidence_level(&self) -> f64;

    fn body_position(&self) -> Option<TrackerPosition>;
    fn set_body_position(&mut self, position: Option<TrackerPosition>);

    fn tracker_id(&self) -> u32;
    fn tracker_num(&self) -> u32;
    fn device(&self) -> Option<&Device>;

    fn has_rotation(&self) -> bool;
    fn has_position(&self) -> bool;
    fn is_computed(&self) -> bool;
    fn user_editable(&self) -> bool;

    fn load_config(&mut self, config: &TrackerConfig);
    fn save_config(&self, config: &mut TrackerConfig);

    /// Innermost source behind any wrappers
    fn inner(&self) -> &dyn Tracker;
}

impl<T: Tracker + ?Sized> Tracker for Box<T> {
    fn rotation(&self) -> Option<Orientation> {
        (**self).rotation()
    }

    fn position(&self) -> Option<Position> {
        (**self).position()
    }

    fn reset_full(&mut self, reference: &Orientation) {
        (**self).reset_full(reference)
    }

    fn reset_yaw(&mut self, reference: &Orientation) {
        (**self).reset_yaw(reference)
    }

    fn tick(&mut self) {
        (**self).tick()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn display_name(&self) -> String {
        (**self).display_name()
    }

    fn custom_name(&self) -> Option<String> {
        (**self).custom_name()
    }

    fn status(&self) -> TrackerStatus {
        (**self).status()
    }

    fn confidence_level(&self) -> f64 {
        (**self).confidence_level()
    }

    fn body_position(&self) -> Option<TrackerPosition> {
        (**self).body_position()
    }

    fn set_body_position(&mut self, position: Option<TrackerPosition>) {
        (**self).set_body_position(position)
    }

    fn tracker_id(&self) -> u32 {
        (**self).tracker_id()
    }

    fn tracker_num(&self) -> u32 {
        (**self).tracker_num()
    }

    fn device(&self) -> Option<&Device> {
        (**self).device()
    }

    fn has_rotation(&self) -> bool {
        (**self).has_rotation()
    }

    fn has_position(&self) -> bool {
        (**self).has_position()
    }

    fn is_computed(&self) -> bool {
        (**self).is_computed()
    }

    fn user_editable(&self) -> bool {
        (**self).user_editable()
    }

    fn load_config(&mut self, config: &TrackerConfig) {
        (**self).load_config(config)
    }

    fn save_config(&self, config: &mut TrackerConfig) {
        (**self).save_config(config)
    }

    fn inner(&self) -> &dyn Tracker {
        (**self).inner()
    }
}

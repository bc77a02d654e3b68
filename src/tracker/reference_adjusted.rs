//! Reference-adjusted tracker
//!
//! Wraps any [`Tracker`] and corrects its raw rotation `S` for three
//! device-specific misalignments estimated from a single reference pose:
//!
//! ```text
//! corrected = yaw_fix * gyro_fix * AXES_OFFSET * roll_fix * S * attachment_fix
//! ```
//!
//! - `roll_fix`: strap roll relative to the body segment
//! - `gyro_fix`: device heading at power-on
//! - `attachment_fix`: mounting orientation left after roll and heading
//! - `yaw_fix`: aligns the corrected heading to the reference (HMD) heading
//!
//! A full reset recomputes all four; a yaw reset recomputes only `yaw_fix`.
//! Composition order is part of the contract. Each fix is derived from a fresh
//! copy of the raw rotation and the fixes already committed before it.

use super::{Device, Tracker, TrackerConfig, TrackerPosition, TrackerStatus};
use crate::types::{roll_only, sanitize_reference, to_angles, yaw_only, Orientation, Position, AXES_OFFSET};

/// Whether a full reset has established the roll, gyro and attachment fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    #[default]
    Uncalibrated,
    Calibrated,
}

pub struct ReferenceAdjustedTracker<T: Tracker> {
    tracker: T,
    yaw_fix: Orientation,
    gyro_fix: Orientation,
    attachment_fix: Orientation,
    roll_fix: Orientation,
    confidence_multiplier: f64,
    calibration: CalibrationState,
}

impl<T: Tracker> ReferenceAdjustedTracker<T> {
    pub fn new(tracker: T) -> Self {
        ReferenceAdjustedTracker {
            tracker,
            yaw_fix: Orientation::identity(),
            gyro_fix: Orientation::identity(),
            attachment_fix: Orientation::identity(),
            roll_fix: Orientation::identity(),
            confidence_multiplier: 1.0,
            calibration: CalibrationState::Uncalibrated,
        }
    }

    /// Wrapped tracker
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    pub fn into_inner(self) -> T {
        self.tracker
    }

    pub fn confidence_multiplier(&self) -> f64 {
        self.confidence_multiplier
    }

    /// Scale applied to the wrapped confidence. Not clamped.
    pub fn set_confidence_multiplier(&mut self, multiplier: f64) {
        self.confidence_multiplier = multiplier;
    }

    pub fn calibration_state(&self) -> CalibrationState {
        self.calibration
    }

    pub fn roll_fix(&self) -> Orientation {
        self.roll_fix
    }

    pub fn gyro_fix(&self) -> Orientation {
        self.gyro_fix
    }

    pub fn attachment_fix(&self) -> Orientation {
        self.attachment_fix
    }

    pub fn yaw_fix(&self) -> Orientation {
        self.yaw_fix
    }

    /// Raw rotation of the wrapped tracker, identity when it has none
    fn sensor_rotation(&self) -> Orientation {
        self.tracker.rotation().unwrap_or_else(Orientation::identity)
    }

    /// `AXES_OFFSET * S^-1`, reduced to its roll
    fn compute_roll_fix(sensor: Orientation) -> Orientation {
        roll_only(&(*AXES_OFFSET * sensor.inverse()))
    }

    /// Inverse heading of `AXES_OFFSET * roll_fix * S`
    fn compute_gyro_fix(&self, sensor: Orientation) -> Orientation {
        let rotation = *AXES_OFFSET * (self.roll_fix * sensor);
        yaw_only(&rotation).inverse()
    }

    /// Inverse of `gyro_fix * AXES_OFFSET * roll_fix * S`
    fn compute_attachment_fix(&self, sensor: Orientation) -> Orientation {
        let rotation = self.gyro_fix * (*AXES_OFFSET * (self.roll_fix * sensor));
        rotation.inverse()
    }

    /// Heading that rotates the corrected-but-unaligned yaw onto `reference`'s yaw
    fn compute_yaw_fix(&self, reference: &Orientation) -> Orientation {
        let target = yaw_only(reference);

        let sensor = self.sensor_rotation();
        let rotation =
            self.gyro_fix * (*AXES_OFFSET * (self.roll_fix * sensor)) * self.attachment_fix;

        yaw_only(&rotation).inverse() * target
    }

    /// Apply the stored correction chain to a raw rotation
    fn adjust(&self, sensor: Orientation) -> Orientation {
        let rotation =
            self.gyro_fix * (*AXES_OFFSET * (self.roll_fix * sensor)) * self.attachment_fix;
        self.yaw_fix * rotation
    }

    fn log_fixes(&self, kind: &str) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let fmt = |q: &Orientation| {
            let (p, y, r) = to_angles(q).to_degrees();
            format!("({:.1}, {:.1}, {:.1})", p, y, r)
        };
        log::debug!(
            "[{}] {} reset: roll_fix={} gyro_fix={} attachment_fix={} yaw_fix={}",
            self.name(),
            kind,
            fmt(&self.roll_fix),
            fmt(&self.gyro_fix),
            fmt(&self.attachment_fix),
            fmt(&self.yaw_fix),
        );
    }
}

impl<T: Tracker> Tracker for ReferenceAdjustedTracker<T> {
    fn rotation(&self) -> Option<Orientation> {
        self.tracker.rotation().map(|sensor| self.adjust(sensor))
    }

    fn position(&self) -> Option<Position> {
        self.tracker.position()
    }

    /// Count the current rotation as (0, reference yaw, 0), so the tracker
    /// can be strapped to the body at any pitch and roll.
    fn reset_full(&mut self, reference: &Orientation) {
        let reference = sanitize_reference(reference);
        self.tracker.reset_full(&reference);

        let sensor = self.sensor_rotation();

        self.roll_fix = Self::compute_roll_fix(sensor);
        self.gyro_fix = self.compute_gyro_fix(sensor);
        self.attachment_fix = self.compute_attachment_fix(sensor);
        self.yaw_fix = self.compute_yaw_fix(&reference);

        self.calibration = CalibrationState::Calibrated;
        self.log_fixes("full");
    }

    /// Count the current heading as the reference heading. Roll, gyro and
    /// attachment fixes are kept as established by the last full reset.
    fn reset_yaw(&mut self, reference: &Orientation) {
        let reference = sanitize_reference(reference);
        self.tracker.reset_yaw(&reference);

        if self.calibration == CalibrationState::Uncalibrated {
            log::warn!(
                "[{}] yaw reset before any full reset, aligning heading with identity mounting fixes",
                self.name()
            );
        }

        self.yaw_fix = self.compute_yaw_fix(&reference);
        self.log_fixes("yaw");
    }

    fn tick(&mut self) {
        self.tracker.tick()
    }

    fn name(&self) -> String {
        format!("{}/adj", self.tracker.name())
    }

    fn display_name(&self) -> String {
        self.tracker.display_name()
    }

    fn custom_name(&self) -> Option<String> {
        self.tracker.custom_name()
    }

    fn status(&self) -> TrackerStatus {
        self.tracker.status()
    }

    fn confidence_level(&self) -> f64 {
        self.tracker.confidence_level() * self.confidence_multiplier
    }

    fn body_position(&self) -> Option<TrackerPosition> {
        self.tracker.body_position()
    }

    fn set_body_position(&mut self, position: Option<TrackerPosition>) {
        self.tracker.set_body_position(position)
    }

    fn tracker_id(&self) -> u32 {
        self.tracker.tracker_id()
    }

    fn tracker_num(&self) -> u32 {
        self.tracker.tracker_num()
    }

    fn device(&self) -> Option<&Device> {
        self.tracker.device()
    }

    fn has_rotation(&self) -> bool {
        self.tracker.has_rotation()
    }

    fn has_position(&self) -> bool {
        self.tracker.has_position()
    }

    fn is_computed(&self) -> bool {
        self.tracker.is_computed()
    }

    fn user_editable(&self) -> bool {
        self.tracker.user_editable()
    }

    fn load_config(&mut self, config: &TrackerConfig) {
        self.tracker.load_config(config)
    }

    fn save_config(&self, config: &mut TrackerConfig) {
        self.tracker.save_config(config)
    }

    fn inner(&self) -> &dyn Tracker {
        self.tracker.inner()
    }
}

use super::imu::next_tracker_id;
use super::{Device, Tracker, TrackerConfig, TrackerPosition, TrackerStatus};
use crate::types::{Orientation, Position};

/// Tracker whose pose is written by another component, e.g. the HMD driver
/// or the skeleton solver's outputs.
pub struct ComputedTracker {
    tracker_id: u32,
    name: String,
    custom_name: Option<String>,
    status: TrackerStatus,
    body_position: Option<TrackerPosition>,
    hidden: bool,
    has_rotation: bool,
    has_position: bool,
    rotation: Option<Orientation>,
    position: Option<Position>,
}

impl ComputedTracker {
    pub fn new(name: &str, has_rotation: bool, has_position: bool) -> Self {
        ComputedTracker {
            tracker_id: next_tracker_id(),
            name: name.to_string(),
            custom_name: None,
            status: TrackerStatus::Disconnected,
            body_position: None,
            hidden: false,
            has_rotation,
            has_position,
            rotation: None,
            position: None,
        }
    }

    pub fn set_rotation(&mut self, rotation: Orientation) {
        if self.has_rotation {
            self.rotation = Some(rotation);
        }
    }

    pub fn set_position(&mut self, position: Position) {
        if self.has_position {
            self.position = Some(position);
        }
    }

    pub fn set_status(&mut self, status: TrackerStatus) {
        self.status = status;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Tracker for ComputedTracker {
    fn rotation(&self) -> Option<Orientation> {
        self.rotation
    }

    fn position(&self) -> Option<Position> {
        self.position
    }

    fn reset_full(&mut self, _reference: &Orientation) {}

    fn reset_yaw(&mut self, _reference: &Orientation) {}

    fn tick(&mut self) {}

    fn name(&self) -> String {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn custom_name(&self) -> Option<String> {
        self.custom_name.clone()
    }

    fn status(&self) -> TrackerStatus {
        self.status
    }

    fn confidence_level(&self) -> f64 {
        if self.status.sends_data() {
            1.0
        } else {
            0.0
        }
    }

    fn body_position(&self) -> Option<TrackerPosition> {
        self.body_position
    }

    fn set_body_position(&mut self, position: Option<TrackerPosition>) {
        self.body_position = position;
    }

    fn tracker_id(&self) -> u32 {
        self.tracker_id
    }

    fn tracker_num(&self) -> u32 {
        0
    }

    fn device(&self) -> Option<&Device> {
        None
    }

    fn has_rotation(&self) -> bool {
        self.has_rotation
    }

    fn has_position(&self) -> bool {
        self.has_position
    }

    fn is_computed(&self) -> bool {
        true
    }

    fn user_editable(&self) -> bool {
        false
    }

    fn load_config(&mut self, config: &TrackerConfig) {
        self.custom_name = config.custom_name.clone();
        self.hidden = config.hide;
        match config.body_position() {
            Ok(position) => self.body_position = position,
            Err(e) => log::warn!("[{}] ignoring body position: {}", self.name, e),
        }
    }

    fn save_config(&self, config: &mut TrackerConfig) {
        config.tracker_name = self.name.clone();
        config.custom_name = self.custom_name.clone();
        config.hide = self.hidden;
        config.set_body_position(self.body_position);
    }

    fn inner(&self) -> &dyn Tracker {
        self
    }
}

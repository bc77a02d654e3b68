use std::sync::atomic::{AtomicU32, Ordering};

use super::{Device, Tracker, TrackerConfig, TrackerPosition, TrackerStatus};
use crate::types::{Orientation, OrientationSample, Position};

static NEXT_TRACKER_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique id for locally created trackers
pub fn next_tracker_id() -> u32 {
    NEXT_TRACKER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Raw tracker backed by one IMU on a device.
///
/// Packets land in a one-slot buffer via [`ImuTracker::data_received`] and only
/// become visible to [`Tracker::rotation`] after the next [`Tracker::tick`].
pub struct ImuTracker {
    tracker_id: u32,
    tracker_num: u32,
    name: String,
    custom_name: Option<String>,
    device: Option<Device>,
    status: TrackerStatus,
    body_position: Option<TrackerPosition>,
    hidden: bool,

    pending: Option<OrientationSample>,
    rotation: Option<Orientation>,
    confidence: f64,
    last_sample_time: Option<f64>,
    samples_received: u64,

    // Mounting adjustment restored from config, right-multiplied
    adjustment: Orientation,
}

impl ImuTracker {
    pub fn new(tracker_num: u32, name: &str, device: Option<Device>) -> Self {
        ImuTracker {
            tracker_id: next_tracker_id(),
            tracker_num,
            name: name.to_string(),
            custom_name: None,
            device,
            status: TrackerStatus::Disconnected,
            body_position: None,
            hidden: false,
            pending: None,
            rotation: None,
            confidence: 0.0,
            last_sample_time: None,
            samples_received: 0,
            adjustment: Orientation::identity(),
        }
    }

    /// Buffer a packet from the device; the newest packet wins
    pub fn data_received(&mut self, sample: OrientationSample) {
        if sample.orientation().is_none() {
            log::debug!("[{}] dropping packet with degenerate quaternion", self.name);
            return;
        }

        if self.status == TrackerStatus::Disconnected {
            log::info!("[{}] connected", self.name);
            self.status = TrackerStatus::Ok;
        }

        self.samples_received += 1;
        self.pending = Some(sample);
    }

    pub fn disconnect(&mut self) {
        if self.status != TrackerStatus::Disconnected {
            log::info!(
                "[{}] disconnected after {} samples",
                self.name,
                self.samples_received
            );
        }
        self.status = TrackerStatus::Disconnected;
        self.pending = None;
        self.confidence = 0.0;
    }

    pub fn set_status(&mut self, status: TrackerStatus) {
        self.status = status;
    }

    pub fn set_custom_name(&mut self, custom_name: Option<String>) {
        self.custom_name = custom_name;
    }

    /// Hidden trackers are kept out of user-facing listings
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn last_sample_time(&self) -> Option<f64> {
        self.last_sample_time
    }

    pub fn samples_received(&self) -> u64 {
        self.samples_received
    }
}

impl Tracker for ImuTracker {
    fn rotation(&self) -> Option<Orientation> {
        self.rotation.map(|q| q * self.adjustment)
    }

    fn position(&self) -> Option<Position> {
        None
    }

    fn reset_full(&mut self, _reference: &Orientation) {
        log::debug!("[{}] full reset, raw IMU keeps its own state", self.name);
    }

    fn reset_yaw(&mut self, _reference: &Orientation) {
        log::debug!("[{}] yaw reset, raw IMU keeps its own state", self.name);
    }

    fn tick(&mut self) {
        if let Some(sample) = self.pending.take() {
            self.rotation = sample.orientation();
            self.confidence = sample.confidence;
            self.last_sample_time = Some(sample.timestamp);
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        match &self.device {
            Some(device) => format!("{}/{}", device.name, self.tracker_num),
            None => self.name.clone(),
        }
    }

    fn custom_name(&self) -> Option<String> {
        self.custom_name.clone()
    }

    fn status(&self) -> TrackerStatus {
        self.status
    }

    fn confidence_level(&self) -> f64 {
        self.confidence
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
        self.tracker_num
    }

    fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    fn has_rotation(&self) -> bool {
        true
    }

    fn has_position(&self) -> bool {
        false
    }

    fn is_computed(&self) -> bool {
        false
    }

    fn user_editable(&self) -> bool {
        true
    }

    fn load_config(&mut self, config: &TrackerConfig) {
        self.custom_name = config.custom_name.clone();
        self.hidden = config.hide;

        match config.body_position() {
            Ok(position) => self.body_position = position,
            Err(e) => log::warn!("[{}] ignoring body position: {}", self.name, e),
        }

        match config.adjustment() {
            Ok(adjustment) => self.adjustment = adjustment.unwrap_or_else(Orientation::identity),
            Err(e) => log::warn!("[{}] ignoring mounting adjustment: {}", self.name, e),
        }
    }

    fn save_config(&self, config: &mut TrackerConfig) {
        config.tracker_name = self.name.clone();
        config.custom_name = self.custom_name.clone();
        config.hide = self.hidden;
        config.set_body_position(self.body_position);
        if self.adjustment == Orientation::identity() {
            config.set_adjustment(None);
        } else {
            config.set_adjustment(Some(&self.adjustment));
        }
    }

    fn inner(&self) -> &dyn Tracker {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::from_angles;

    fn sample(t: f64, q: &Orientation) -> OrientationSample {
        OrientationSample::from_orientation(t, q, 0.9)
    }

    #[test]
    fn test_rotation_visible_after_tick() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        assert!(imu.rotation().is_none());
        assert_eq!(imu.status(), TrackerStatus::Disconnected);

        let q = from_angles(0.0, 0.4, 0.0);
        imu.data_received(sample(1.0, &q));
        assert_eq!(imu.status(), TrackerStatus::Ok);
        assert!(imu.rotation().is_none());

        imu.tick();
        assert!(imu.rotation().unwrap().angle_to(&q) < 1e-12);
        assert_eq!(imu.confidence_level(), 0.9);
        assert_eq!(imu.last_sample_time(), Some(1.0));
    }

    #[test]
    fn test_newest_packet_wins() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        imu.data_received(sample(1.0, &from_angles(0.0, 0.1, 0.0)));
        let newest = from_angles(0.0, 0.2, 0.0);
        imu.data_received(sample(2.0, &newest));
        imu.tick();
        assert!(imu.rotation().unwrap().angle_to(&newest) < 1e-12);
        assert_eq!(imu.samples_received(), 2);
    }

    #[test]
    fn test_tick_without_packet_keeps_rotation() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        let q = from_angles(0.3, 0.0, 0.0);
        imu.data_received(sample(1.0, &q));
        imu.tick();
        imu.tick();
        assert!(imu.rotation().unwrap().angle_to(&q) < 1e-12);
    }

    #[test]
    fn test_disconnect() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        imu.data_received(sample(1.0, &Orientation::identity()));
        imu.disconnect();
        assert_eq!(imu.status(), TrackerStatus::Disconnected);
        imu.tick();
        assert!(imu.rotation().is_none());
    }

    #[test]
    fn test_disconnect_drops_confidence() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        imu.data_received(sample(1.0, &Orientation::identity()));
        imu.tick();
        assert_eq!(imu.confidence_level(), 0.9);

        imu.disconnect();
        assert_eq!(imu.confidence_level(), 0.0);

        // Reconnecting restores the reported confidence on the next tick
        imu.data_received(sample(2.0, &Orientation::identity()));
        imu.tick();
        assert_eq!(imu.status(), TrackerStatus::Ok);
        assert_eq!(imu.confidence_level(), 0.9);
    }

    #[test]
    fn test_hidden_flag_persists() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        let mut config = TrackerConfig::new("imu/0");
        config.hide = true;
        imu.load_config(&config);
        assert!(imu.is_hidden());

        imu.set_hidden(false);
        imu.save_config(&mut config);
        assert!(!config.hide);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut imu = ImuTracker::new(2, "imu/2", Some(Device::new(7, "ankle-band")));
        let mut config = TrackerConfig::new("imu/2");
        config.custom_name = Some("Left ankle".to_string());
        config.set_body_position(Some(TrackerPosition::LeftAnkle));
        config.set_adjustment(Some(&from_angles(0.0, 0.5, 0.0)));
        imu.load_config(&config);

        assert_eq!(imu.custom_name().as_deref(), Some("Left ankle"));
        assert_eq!(imu.body_position(), Some(TrackerPosition::LeftAnkle));
        assert_eq!(imu.display_name(), "ankle-band/2");

        let mut saved = TrackerConfig::default();
        imu.save_config(&mut saved);
        assert_eq!(saved.tracker_name, "imu/2");
        assert_eq!(saved.designation.as_deref(), Some("body:left_ankle"));
        let adjustment = saved.adjustment().unwrap().unwrap();
        assert!((adjustment.angle() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_applied_to_rotation() {
        let mut imu = ImuTracker::new(0, "imu/0", None);
        let mut config = TrackerConfig::new("imu/0");
        config.set_adjustment(Some(&from_angles(0.0, 0.25, 0.0)));
        imu.load_config(&config);

        imu.data_received(sample(1.0, &from_angles(0.0, 0.5, 0.0)));
        imu.tick();
        let yaw = crate::types::yaw(&imu.rotation().unwrap());
        assert!((yaw - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ImuTracker::new(0, "a", None);
        let b = ImuTracker::new(0, "b", None);
        assert_ne!(a.tracker_id(), b.tracker_id());
    }
}

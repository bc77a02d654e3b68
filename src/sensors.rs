use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tokio::sync::mpsc::Sender;
use tokio::time::{interval, Duration};

use crate::types::{from_angles, Orientation, OrientationSample};

/// One packet addressed to a tracker slot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerPacket {
    pub tracker_num: u32,
    pub sample: OrientationSample,
}

/// Mock IMU strapped to a body segment.
///
/// The device reports heading about its native +Z axis. Its power-on heading
/// and strap mounting are arbitrary and its heading drifts at a fixed rate.
#[derive(Clone, Debug)]
pub struct SimulatedImu {
    pub tracker_num: u32,
    pub power_on_heading_deg: f64,
    pub drift_deg_per_sec: f64,
    pub strap: Orientation,
}

impl SimulatedImu {
    pub fn new(tracker_num: u32, drift_deg_per_sec: f64) -> Self {
        let n = tracker_num as f64;
        SimulatedImu {
            tracker_num,
            power_on_heading_deg: 37.0 * (n + 1.0),
            drift_deg_per_sec,
            strap: from_angles(0.15 * (n + 1.0).sin(), 0.0, 0.3 * (n * 0.7).cos()),
        }
    }

    /// Raw device rotation `t` seconds into the session
    pub fn rotation_at(&self, t: f64) -> Orientation {
        // ±2° body sway with a 4 s period, shared with the HMD
        let sway = (t * 0.5 * PI).sin() * 2.0;
        let heading = self.power_on_heading_deg + self.drift_deg_per_sec * t + sway;
        Orientation::from_axis_angle(&Vector3::z_axis(), heading.to_radians()) * self.strap
    }
}

pub const MIN_TICK_RATE_HZ: f64 = 1.0;
pub const MAX_TICK_RATE_HZ: f64 = 10_000.0;

/// Interval period for a processing or sampling rate, clamped to the supported range
pub fn tick_period(rate_hz: f64) -> Duration {
    let rate_hz = if rate_hz.is_finite() {
        rate_hz.clamp(MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ)
    } else {
        MIN_TICK_RATE_HZ
    };
    Duration::from_secs_f64(1.0 / rate_hz)
}

/// Simulated HMD heading in the Y-up frame
pub fn hmd_rotation_at(t: f64) -> Orientation {
    from_angles(0.0, ((t * 0.5 * PI).sin() * 2.0).to_radians(), 0.0)
}

pub async fn orientation_loop(tx: Sender<TrackerPacket>, imu: SimulatedImu, rate_hz: f64) {
    let mut interval = interval(tick_period(rate_hz));
    let start = current_timestamp();
    let mut sample_count = 0u64;

    loop {
        interval.tick().await;

        // Device time since power-on drives heading drift and sway
        let now = current_timestamp();
        let rotation = imu.rotation_at(now - start);
        let packet = TrackerPacket {
            tracker_num: imu.tracker_num,
            sample: OrientationSample::from_orientation(now, &rotation, 1.0),
        };

        match tx.try_send(packet) {
            Ok(_) => {
                sample_count += 1;
                // Trace every 1000th sample
                if sample_count % 1000 == 0 {
                    log::trace!("[imu {}] {} samples", imu.tracker_num, sample_count);
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                // Receiver dropped, the session is over
                log::debug!(
                    "[imu {}] channel closed after {} samples",
                    imu.tracker_num,
                    sample_count
                );
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Channel full, drop this sample
            }
        }
    }
}

pub fn current_timestamp() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{ImuTracker, ReferenceAdjustedTracker, Tracker};
    use crate::types::{wrap_angle, yaw};

    #[test]
    fn test_drift_accumulates_as_heading() {
        let imu = SimulatedImu::new(1, 0.5);
        let mut tracker = ReferenceAdjustedTracker::new(ImuTracker::new(1, "sim/1", None));

        tracker
            .tracker_mut()
            .data_received(OrientationSample::from_orientation(0.0, &imu.rotation_at(0.0), 1.0));
        tracker.tick();
        tracker.reset_full(&hmd_rotation_at(0.0));

        // t = 20s: sway term is zero again, drift is 10°
        tracker
            .tracker_mut()
            .data_received(OrientationSample::from_orientation(20.0, &imu.rotation_at(20.0), 1.0));
        tracker.tick();
        let drift = wrap_angle(yaw(&tracker.rotation().unwrap()));
        assert!((drift.abs() - 10f64.to_radians()).abs() < 1e-6);

        tracker.reset_yaw(&hmd_rotation_at(20.0));
        assert!(yaw(&tracker.rotation().unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_tick_period_is_never_zero() {
        assert_eq!(tick_period(100.0), Duration::from_millis(10));
        assert_eq!(tick_period(1e12), tick_period(MAX_TICK_RATE_HZ));
        assert!(tick_period(1e12) >= Duration::from_micros(99));
        assert_eq!(tick_period(0.0), Duration::from_secs(1));
        assert_eq!(tick_period(f64::NAN), Duration::from_secs(1));
        assert!(tick_period(f64::INFINITY) > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_orientation_loop_stops_when_receiver_dropped() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        let handle = tokio::spawn(orientation_loop(tx, SimulatedImu::new(0, 0.0), 200.0));

        let packet = rx.recv().await.unwrap();
        assert_eq!(packet.tracker_num, 0);
        assert!(packet.sample.orientation().is_some());

        drop(rx);
        handle.await.unwrap();
    }
}

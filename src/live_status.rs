use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TrackerResult;
use crate::sensors::current_timestamp;
use crate::tracker::{CalibrationState, ReferenceAdjustedTracker, Tracker, TrackerStatus};
use crate::types::to_angles;

/// Corrected pose of one tracker at snapshot time
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackerSnapshot {
    pub name: String,
    pub designation: Option<String>,
    pub status: TrackerStatus,
    pub confidence: f64,
    pub calibrated: bool,
    /// Corrected (pitch, yaw, roll) in degrees, absent without a rotation
    pub angles_deg: Option<(f64, f64, f64)>,
}

impl TrackerSnapshot {
    pub fn capture<T: Tracker>(tracker: &ReferenceAdjustedTracker<T>) -> Self {
        TrackerSnapshot {
            name: tracker.name(),
            designation: tracker.body_position().map(|p| p.designation().to_string()),
            status: tracker.status(),
            confidence: tracker.confidence_level(),
            calibrated: tracker.calibration_state() == CalibrationState::Calibrated,
            angles_deg: tracker.rotation().map(|q| to_angles(&q).to_degrees()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LiveStatus {
    pub timestamp: f64,
    pub uptime_seconds: u64,
    pub ticks: u64,
    pub full_resets: u32,
    pub yaw_resets: u32,
    pub trackers: Vec<TrackerSnapshot>,
}

impl LiveStatus {
    pub fn new() -> Self {
        Self {
            timestamp: current_timestamp(),
            uptime_seconds: 0,
            ticks: 0,
            full_resets: 0,
            yaw_resets: 0,
            trackers: Vec::new(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TrackerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for LiveStatus {
    fn default() -> Self {
        Self::new()
    }
}

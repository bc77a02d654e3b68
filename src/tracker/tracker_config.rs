use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

use super::status::TrackerPosition;
use crate::error::{TrackerError, TrackerResult};
use crate::types::Orientation;

/// Quaternion as persisted on disk (w, x, y, z)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRotation {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Persisted per-tracker settings, keyed by tracker name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub tracker_name: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub hide: bool,
    #[serde(default)]
    pub adjustment: Option<StoredRotation>,
}

impl TrackerConfig {
    pub fn new(tracker_name: &str) -> Self {
        TrackerConfig {
            tracker_name: tracker_name.to_string(),
            ..Default::default()
        }
    }

    pub fn body_position(&self) -> TrackerResult<Option<TrackerPosition>> {
        self.designation
            .as_deref()
            .map(TrackerPosition::from_designation)
            .transpose()
    }

    pub fn set_body_position(&mut self, position: Option<TrackerPosition>) {
        self.designation = position.map(|p| p.designation().to_string());
    }

    /// Stored mounting adjustment, normalized
    pub fn adjustment(&self) -> TrackerResult<Option<Orientation>> {
        let Some(stored) = self.adjustment else {
            return Ok(None);
        };

        let q = Quaternion::new(stored.w, stored.x, stored.y, stored.z);
        let norm = q.norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return Err(TrackerError::InvalidRotation(format!(
                "({}, {}, {}, {})",
                stored.w, stored.x, stored.y, stored.z
            )));
        }
        Ok(Some(UnitQuaternion::new_normalize(q)))
    }

    pub fn set_adjustment(&mut self, adjustment: Option<&Orientation>) {
        self.adjustment = adjustment.map(|q| StoredRotation {
            w: q.w,
            x: q.i,
            y: q.j,
            z: q.k,
        });
    }
}

pub mod angles;

pub use angles::*;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Unit quaternion rotation in the Y-up tracking frame
pub type Orientation = UnitQuaternion<f64>;

/// Position in meters
pub type Position = Vector3<f64>;

/// One orientation packet as reported by an IMU device
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrientationSample {
    pub timestamp: f64,
    /// Quaternion components (w, x, y, z)
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Device-reported confidence in [0, 1]
    pub confidence: f64,
}

impl OrientationSample {
    pub fn from_orientation(timestamp: f64, q: &Orientation, confidence: f64) -> Self {
        OrientationSample {
            timestamp,
            w: q.w,
            x: q.i,
            y: q.j,
            z: q.k,
            confidence,
        }
    }

    /// Normalized rotation, or `None` when the packet carries no usable quaternion
    pub fn orientation(&self) -> Option<Orientation> {
        let q = nalgebra::Quaternion::new(self.w, self.x, self.y, self.z);
        let norm = q.norm();
        if !norm.is_finite() || norm < f64::EPSILON {
            return None;
        }
        Some(UnitQuaternion::new_normalize(q))
    }
}

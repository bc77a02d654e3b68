//! Euler decomposition for the Y-up tracking frame
//!
//! Trackers report orientation in the OpenGL/SteamVR convention:
//! - X: right, pitch axis
//! - Y: up, yaw axis
//! - Z: toward the viewer, roll axis
//!
//! Raw IMU rotations are Z-up; `AXES_OFFSET` carries the native +Z axis onto +Y.
//!
//! Angles compose as `q = Ry(yaw) * Rz(roll) * Rx(pitch)`. `to_angles` is the
//! exact inverse of `from_angles` away from the roll = ±90° singularity.

use lazy_static::lazy_static;
use nalgebra::{Quaternion, Rotation3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

use super::Orientation;

/// |sin(roll)| above which the decomposition is treated as gimbal-locked
const GIMBAL_THRESHOLD: f64 = 0.999_999;

lazy_static! {
    /// Changes between IMU axes and OpenGL/SteamVR axes
    pub static ref AXES_OFFSET: Orientation =
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
}

/// Euler angles in radians
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl EulerAngles {
    pub fn to_degrees(self) -> (f64, f64, f64) {
        (
            self.pitch.to_degrees(),
            self.yaw.to_degrees(),
            self.roll.to_degrees(),
        )
    }
}

/// Build an orientation from pitch (X), yaw (Y) and roll (Z) in radians
pub fn from_angles(pitch: f64, yaw: f64, roll: f64) -> Orientation {
    let qy = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw);
    let qz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll);
    let qx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch);
    qy * qz * qx
}

/// Decompose an orientation into pitch, yaw and roll
pub fn to_angles(q: &Orientation) -> EulerAngles {
    let m: Rotation3<f64> = q.to_rotation_matrix();
    let sin_roll = m[(1, 0)].clamp(-1.0, 1.0);

    if sin_roll.abs() > GIMBAL_THRESHOLD {
        // Pitch and yaw share an axis here; fold everything into yaw
        return EulerAngles {
            pitch: 0.0,
            yaw: m[(0, 2)].atan2(m[(2, 2)]),
            roll: FRAC_PI_2.copysign(sin_roll),
        };
    }

    EulerAngles {
        pitch: (-m[(1, 2)]).atan2(m[(1, 1)]),
        yaw: (-m[(2, 0)]).atan2(m[(0, 0)]),
        roll: sin_roll.asin(),
    }
}

pub fn yaw(q: &Orientation) -> f64 {
    to_angles(q).yaw
}

pub fn roll(q: &Orientation) -> f64 {
    to_angles(q).roll
}

/// Keep only the heading of `q`
pub fn yaw_only(q: &Orientation) -> Orientation {
    from_angles(0.0, yaw(q), 0.0)
}

/// Keep only the roll of `q`
pub fn roll_only(q: &Orientation) -> Orientation {
    from_angles(0.0, 0.0, roll(q))
}

/// Normalize a caller-supplied reference orientation.
///
/// A reference with zero or non-finite norm cannot describe a rotation and is
/// replaced by identity.
pub fn sanitize_reference(reference: &Orientation) -> Orientation {
    let raw: &Quaternion<f64> = reference.quaternion();
    let norm = raw.norm();

    if !norm.is_finite() || norm < f64::EPSILON {
        log::warn!("Reference orientation {:?} is degenerate, using identity", raw.coords);
        return Orientation::identity();
    }

    if (norm - 1.0).abs() > 1e-6 {
        log::warn!("Reference orientation not normalized (norm {:.6}), renormalizing", norm);
    }

    UnitQuaternion::new_normalize(*raw)
}

/// Wrap an angle to (-π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU)
        - std::f64::consts::PI;
    if wrapped <= -std::f64::consts::PI {
        wrapped + std::f64::consts::TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_angles_roundtrip_away_from_gimbal() {
        let q = from_angles(0.3, -1.2, 0.4);
        let angles = to_angles(&q);
        assert_abs_diff_eq!(angles.pitch, 0.3, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.yaw, -1.2, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.roll, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_pure_yaw_is_about_up_axis() {
        let q = from_angles(0.0, FRAC_PI_2, 0.0);
        let forward = q * Vector3::new(0.0, 0.0, -1.0);
        // Turning left by 90° about +Y points -Z at -X
        assert_abs_diff_eq!(forward.x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(forward.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(yaw(&q), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_gimbal_lock_reconstructs_rotation() {
        let q = from_angles(0.7, 0.2, FRAC_PI_2);
        let angles = to_angles(&q);
        assert_abs_diff_eq!(angles.roll, FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(angles.pitch, 0.0);

        let rebuilt = from_angles(angles.pitch, angles.yaw, angles.roll);
        assert_abs_diff_eq!(rebuilt.angle_to(&q), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_only_and_roll_only() {
        let q = from_angles(0.25, 1.0, -0.5);
        let y = yaw_only(&q);
        let r = roll_only(&q);

        let ya = to_angles(&y);
        assert_abs_diff_eq!(ya.yaw, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ya.pitch, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ya.roll, 0.0, epsilon = 1e-9);

        let ra = to_angles(&r);
        assert_abs_diff_eq!(ra.roll, -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(ra.yaw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_axes_offset_is_quarter_turn_about_x() {
        let (axis, angle) = AXES_OFFSET.axis_angle().unwrap();
        assert_abs_diff_eq!(angle, FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(axis.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sanitize_reference() {
        let skewed = UnitQuaternion::new_unchecked(Quaternion::new(2.0, 0.0, 0.0, 0.0));
        let fixed = sanitize_reference(&skewed);
        assert_abs_diff_eq!(fixed.quaternion().norm(), 1.0, epsilon = 1e-12);

        let zero = UnitQuaternion::new_unchecked(Quaternion::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(sanitize_reference(&zero), Orientation::identity());

        let nan = UnitQuaternion::new_unchecked(Quaternion::new(f64::NAN, 0.0, 0.0, 0.0));
        assert_eq!(sanitize_reference(&nan), Orientation::identity());
    }

    #[test]
    fn test_wrap_angle() {
        assert_abs_diff_eq!(wrap_angle(3.0 * std::f64::consts::PI), std::f64::consts::PI, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap_angle(-0.5), -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(std::f64::consts::TAU + 0.1), 0.1, epsilon = 1e-9);
    }
}

//! Yaw/pitch rotations and look vectors.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A view rotation in degrees.
///
/// Yaw 0 looks along +Z and grows clockwise when seen from above (yaw 90 looks
/// along -X). Positive pitch looks down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Horizontal rotation in degrees.
    pub yaw: f64,
    /// Vertical rotation in degrees.
    pub pitch: f64,
}

impl Rotation {
    /// Creates a rotation from yaw and pitch in degrees.
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// The unit look vector for this rotation.
    #[must_use]
    pub fn direction(self) -> DVec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let horizontal = pitch.cos();
        DVec3::new(-horizontal * yaw.sin(), -pitch.sin(), horizontal * yaw.cos())
    }

    /// Signed yaw change towards `other`, wrapped into `[-180, 180)`.
    #[must_use]
    pub fn yaw_difference(self, other: Self) -> f64 {
        let difference = (other.yaw - self.yaw).rem_euclid(360.0);
        if difference >= 180.0 {
            difference - 360.0
        } else {
            difference
        }
    }

    /// Linear blend towards `other`, turning the short way round.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            yaw: self.yaw + self.yaw_difference(other) * t,
            pitch: self.pitch + (other.pitch - self.pitch) * t,
        }
    }

    /// Magnitude of the yaw/pitch change between the two rotations.
    #[must_use]
    pub fn delta(self, other: Self) -> f64 {
        self.yaw_difference(other).hypot(other.pitch - self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn cardinal_directions() {
        assert_close(Rotation::new(0.0, 0.0).direction(), DVec3::Z);
        assert_close(Rotation::new(90.0, 0.0).direction(), DVec3::NEG_X);
        assert_close(Rotation::new(180.0, 0.0).direction(), DVec3::NEG_Z);
        assert_close(Rotation::new(0.0, 90.0).direction(), DVec3::NEG_Y);
    }

    #[test]
    fn lerp_is_linear() {
        let mid = Rotation::new(0.0, -10.0).lerp(Rotation::new(40.0, 10.0), 0.5);
        assert_eq!(mid, Rotation::new(20.0, 0.0));
    }

    #[test]
    fn turning_across_the_seam_takes_the_short_way() {
        let from = Rotation::new(179.0, 0.0);
        let to = Rotation::new(-179.0, 0.0);
        assert!((from.yaw_difference(to) - 2.0).abs() < 1e-9);
        assert!((from.delta(to) - 2.0).abs() < 1e-9);
        assert!((to.delta(from) - 2.0).abs() < 1e-9);

        let mid = from.lerp(to, 0.5);
        assert!((mid.yaw.abs() - 180.0).abs() < 1e-9, "{}", mid.yaw);
        assert_close(mid.direction(), DVec3::NEG_Z);
    }

    #[test]
    fn half_turn_wraps_to_negative() {
        let from = Rotation::new(0.0, 0.0);
        assert!((from.yaw_difference(Rotation::new(180.0, 0.0)) + 180.0).abs() < 1e-9);
        assert!((from.delta(Rotation::new(180.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!(from.delta(Rotation::new(360.0, 0.0)).abs() < 1e-9);
    }
}

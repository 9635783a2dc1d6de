//! Axis-aligned bounding boxes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// The minimum corner.
    pub min: DVec3,
    /// The maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Creates a box from two corners.
    #[must_use]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates an entity-shaped box: centred on the origin horizontally, with its base at `y = 0`.
    #[must_use]
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self {
            min: DVec3::new(-half, 0.0, -half),
            max: DVec3::new(half, height, half),
        }
    }

    /// Returns the box moved by `offset`.
    #[must_use]
    pub fn translate(self, offset: DVec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns the box expanded by `amount` on every side.
    #[must_use]
    pub fn grow(self, amount: f64) -> Self {
        self.grow_vec(DVec3::splat(amount))
    }

    /// Returns the box expanded per axis.
    #[must_use]
    pub fn grow_vec(self, amount: DVec3) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// The centre point of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether the two boxes overlap with a non-zero volume.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// The point on or inside the box closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: DVec3) -> DVec3 {
        point.max(self.min).min(self.max)
    }

    /// Euclidean distance from `point` to the box. Zero when the point is inside.
    #[must_use]
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        self.closest_point(point).distance(point)
    }

    /// Finds where the segment `start -> end` first enters the box.
    ///
    /// A segment starting inside the box hits at `start`. Returns `None` when the
    /// segment never touches the box.
    #[must_use]
    pub fn intercept(&self, start: DVec3, end: DVec3) -> Option<DVec3> {
        let dir = end - start;
        let mut t_near = 0.0_f64;
        let mut t_far = 1.0_f64;

        for axis in 0..3 {
            let origin = start[axis];
            let delta = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if delta.abs() < f64::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / delta;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(start + dir * t_near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(DVec3::ZERO, DVec3::ONE)
    }

    #[test]
    fn entity_box_is_centred_horizontally() {
        let bb = Aabb::from_dimensions(0.6, 1.8);
        assert_eq!(bb.min, DVec3::new(-0.3, 0.0, -0.3));
        assert_eq!(bb.max, DVec3::new(0.3, 1.8, 0.3));
    }

    #[test]
    fn distance_is_zero_inside() {
        assert!(unit_box().distance_to_point(DVec3::splat(0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_to_face_and_corner() {
        let bb = unit_box();
        assert!((bb.distance_to_point(DVec3::new(3.0, 0.5, 0.5)) - 2.0).abs() < 1e-12);
        let corner = bb.distance_to_point(DVec3::new(2.0, 2.0, 2.0));
        assert!((corner - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn intercept_hits_front_face() {
        let hit = unit_box()
            .intercept(DVec3::new(0.5, 0.5, -2.0), DVec3::new(0.5, 0.5, 5.0))
            .expect("segment crosses the box");
        assert!((hit - DVec3::new(0.5, 0.5, 0.0)).length() < 1e-12);
    }

    #[test]
    fn intercept_misses_parallel_segment() {
        assert!(
            unit_box()
                .intercept(DVec3::new(2.0, 0.5, -2.0), DVec3::new(2.0, 0.5, 5.0))
                .is_none()
        );
    }

    #[test]
    fn intercept_respects_segment_length() {
        assert!(
            unit_box()
                .intercept(DVec3::new(0.5, 0.5, -5.0), DVec3::new(0.5, 0.5, -1.0))
                .is_none()
        );
    }

    #[test]
    fn intercept_from_inside_hits_at_start() {
        let start = DVec3::splat(0.5);
        let hit = unit_box()
            .intercept(start, DVec3::new(0.5, 0.5, 4.0))
            .expect("start is inside");
        assert_eq!(hit, start);
    }

    #[test]
    fn grow_and_intersect() {
        let a = unit_box();
        let b = unit_box().translate(DVec3::new(1.05, 0.0, 0.0));
        assert!(!a.intersects(&b));
        assert!(a.grow(0.1).intersects(&b));
    }
}

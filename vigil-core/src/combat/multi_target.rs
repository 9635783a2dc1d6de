//! Distance between entities attacked within the same tick.

use super::TARGET_BOX_GROWTH;
use crate::entity::TrackedEntity;

/// Smallest distance from any target's grown box to any other target's position.
///
/// Both the box and the point use the entity's position at the start of the
/// tick. Returns `None` for fewer than two targets.
#[must_use]
pub fn min_pairwise_distance(targets: &[&TrackedEntity]) -> Option<f64> {
    let mut min: Option<f64> = None;
    for (i, a) in targets.iter().enumerate() {
        let bounds = a.aabb_at(a.prev_position).grow(TARGET_BOX_GROWTH);
        for (j, b) in targets.iter().enumerate() {
            if i == j {
                continue;
            }
            let distance = bounds.distance_to_point(b.prev_position);
            min = Some(min.map_or(distance, |current| current.min(distance)));
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use vigil_utils::Aabb;

    use super::*;

    fn entity(id: u64, x: f64) -> TrackedEntity {
        TrackedEntity::new(id, DVec3::new(x, 0.0, 0.0), Aabb::from_dimensions(0.6, 1.8), true)
    }

    #[test]
    fn two_targets_five_apart() {
        let a = entity(1, 0.0);
        let b = entity(2, 5.4);
        let distance = min_pairwise_distance(&[&a, &b]).expect("two targets");
        assert!((distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn picks_the_closest_pair() {
        let a = entity(1, 0.0);
        let b = entity(2, 5.4);
        let c = entity(3, 1.0);
        let distance = min_pairwise_distance(&[&a, &b, &c]).expect("three targets");
        assert!((distance - 0.6).abs() < 1e-9);
    }

    #[test]
    fn single_target_has_no_distance() {
        let a = entity(1, 0.0);
        assert!(min_pairwise_distance(&[&a]).is_none());
        assert!(min_pairwise_distance(&[]).is_none());
    }
}

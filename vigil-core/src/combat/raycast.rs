use glam::DVec3;
use smallvec::SmallVec;
use vigil_utils::Rotation;

use super::{AttackAttempt, RAY_LENGTH, TARGET_BOX_GROWTH};
use crate::entity::TrackedEntity;

/// Distances gathered while replaying one attack.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatMeasurement {
    /// The attacked entity.
    pub target_runtime_id: u64,
    /// Smallest undirected distance from a sampled eye to the sampled target box.
    pub raw_distance: f64,
    /// Distance to the hit point of every sample whose look ray hit the target.
    pub hits: SmallVec<[f64; 16]>,
    /// Number of samples taken.
    pub samples: usize,
    /// The attacker turned too far for the look rays to be cast.
    pub rotation_snap: bool,
}

impl CombatMeasurement {
    /// Mean hit distance, if anything was hit.
    #[must_use]
    pub fn average_hit(&self) -> Option<f64> {
        if self.hits.is_empty() {
            return None;
        }
        Some(self.hits.iter().sum::<f64>() / self.hits.len() as f64)
    }

    /// Closest hit distance, if anything was hit.
    #[must_use]
    pub fn closest_hit(&self) -> Option<f64> {
        self.hits.iter().copied().reduce(f64::min)
    }
}

/// Replays an attack over `samples` evenly spaced points of the tick.
///
/// Sample `i` sits at `t = i / (samples - 1)`: the attacker's eye and rotation
/// are blended from the attempt towards `end_eye` and `end_rotation`, and the
/// target from its previous towards its current position.
#[must_use]
pub fn measure(
    attempt: &AttackAttempt,
    target: &TrackedEntity,
    end_eye: DVec3,
    end_rotation: Rotation,
    samples: usize,
    raycast: bool,
) -> CombatMeasurement {
    let samples = samples.max(2);
    let last = (samples - 1) as f64;
    let mut raw_distance = f64::MAX;
    let mut hits = SmallVec::new();

    for i in 0..samples {
        let t = i as f64 / last;
        let eye = attempt.start_eye.lerp(end_eye, t);
        let target_box = target
            .aabb_at(target.lerp_position(t))
            .grow(TARGET_BOX_GROWTH);

        raw_distance = raw_distance.min(target_box.distance_to_point(eye));

        if raycast {
            let direction = attempt.start_rotation.lerp(end_rotation, t).direction();
            if let Some(hit) = target_box.intercept(eye, eye + direction * RAY_LENGTH) {
                hits.push(eye.distance(hit));
            }
        }
    }

    CombatMeasurement {
        target_runtime_id: target.runtime_id,
        raw_distance,
        hits,
        samples,
        rotation_snap: false,
    }
}

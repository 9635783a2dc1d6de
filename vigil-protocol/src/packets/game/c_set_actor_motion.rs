use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sets an entity's velocity. Sent for the player itself when it takes knockback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CSetActorMotion {
    /// The entity receiving the motion.
    pub runtime_id: u64,
    /// The new velocity.
    pub velocity: Vec3,
}

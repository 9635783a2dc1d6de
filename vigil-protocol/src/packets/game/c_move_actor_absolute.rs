//! Clientbound move actor absolute - moves an entity to an absolute position.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Moves an entity on the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CMoveActorAbsolute {
    /// The moved entity.
    pub runtime_id: u64,
    /// New position.
    pub position: Vec3,
    /// Vertical look angle.
    #[serde(default)]
    pub pitch: f32,
    /// Body yaw.
    #[serde(default)]
    pub yaw: f32,
    /// Whether the move is a teleport (no client interpolation).
    #[serde(default)]
    pub teleport: bool,
    /// Whether the entity is on the ground.
    #[serde(default)]
    pub on_ground: bool,
}

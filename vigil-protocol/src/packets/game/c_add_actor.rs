//! Clientbound add actor - an entity enters the player's view.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier the server uses for player entities.
pub const PLAYER_ENTITY_TYPE: &str = "minecraft:player";

/// Spawns an entity on the client.
///
/// `width` and `height` are taken from the entity's metadata by the decoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CAddActor {
    /// Runtime ID the entity is referred to by for the rest of the session.
    pub runtime_id: u64,
    /// Namespaced entity type, e.g. `minecraft:player`.
    pub entity_type: String,
    /// Spawn position.
    pub position: Vec3,
    /// Initial velocity.
    #[serde(default)]
    pub velocity: Vec3,
    /// Vertical look angle.
    #[serde(default)]
    pub pitch: f32,
    /// Body yaw.
    #[serde(default)]
    pub yaw: f32,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
}

impl CAddActor {
    /// Whether the spawned entity is another player.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.entity_type == PLAYER_ENTITY_TYPE
    }
}

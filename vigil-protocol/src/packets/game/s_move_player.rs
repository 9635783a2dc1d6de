//! Serverbound move player - the legacy movement packet superseded by auth input.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::MoveMode;

/// Legacy client-authoritative movement. Modern clients only send it in rare edge cases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SMovePlayer {
    /// Runtime ID of the moving player.
    pub runtime_id: u64,
    /// New position.
    pub position: Vec3,
    /// Vertical look angle.
    pub pitch: f32,
    /// Body yaw.
    pub yaw: f32,
    /// Head yaw.
    pub head_yaw: f32,
    /// How the move should be applied.
    pub mode: MoveMode,
    /// Whether the client claims to be on the ground.
    pub on_ground: bool,
    /// Client tick the move belongs to.
    #[serde(default)]
    pub tick: u64,
}

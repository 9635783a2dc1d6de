//! Clientbound move player - the server repositioning the player.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a move player packet should be applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveMode {
    /// Regular movement.
    #[default]
    Normal = 0,
    /// Position reset (rubber band).
    Reset = 1,
    /// Teleport.
    Teleport = 2,
    /// Only the rotation changes.
    Rotation = 3,
}

/// Moves the player on its own client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CMovePlayer {
    /// Runtime ID of the moved player.
    pub runtime_id: u64,
    /// Target feet position.
    pub position: Vec3,
    /// Vertical look angle.
    #[serde(default)]
    pub pitch: f32,
    /// Body yaw.
    #[serde(default)]
    pub yaw: f32,
    /// How the move is applied.
    #[serde(default)]
    pub mode: MoveMode,
}

impl CMovePlayer {
    /// Whether the client will snap to the new position.
    #[must_use]
    pub const fn is_teleport(&self) -> bool {
        matches!(self.mode, MoveMode::Teleport | MoveMode::Reset)
    }
}

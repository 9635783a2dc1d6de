//! Movement tracking state: where the client says it is, where it was a tick
//! ago, and the knockback it is expected to take.

use glam::DVec3;
use vigil_protocol::packets::game::{InputFlags, SPlayerAuthInput};
use vigil_utils::Rotation;

/// Eye height of a standing player.
pub const EYE_HEIGHT: f64 = 1.62;
/// Eye height of a sneaking player.
pub const SNEAKING_EYE_HEIGHT: f64 = 1.54;

/// Movement tracking state, updated from every auth input.
#[derive(Clone, Debug)]
pub struct MovementState {
    /// Feet position reported by the latest input.
    pub position: DVec3,
    /// Feet position reported by the input before it.
    pub prev_position: DVec3,
    /// Rotation reported by the latest input.
    pub rotation: Rotation,
    /// Rotation reported by the input before it.
    pub prev_rotation: Rotation,
    /// The client's movement this tick.
    pub delta: DVec3,
    /// Whether the player is sneaking.
    pub sneaking: bool,
    /// Whether the player is sprinting.
    pub sprinting: bool,
    /// Whether the player is standing on the ground.
    pub on_ground: bool,
    /// Knockback the client acknowledged and should apply on its next input.
    pub pending_knockback: Option<DVec3>,
    /// Knockback the client is expected to have applied this tick.
    pub knockback: Option<DVec3>,
}

impl MovementState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: DVec3::ZERO,
            prev_position: DVec3::ZERO,
            rotation: Rotation::new(0.0, 0.0),
            prev_rotation: Rotation::new(0.0, 0.0),
            delta: DVec3::ZERO,
            sneaking: false,
            sprinting: false,
            on_ground: true,
            pending_knockback: None,
            knockback: None,
        }
    }

    /// Applies one auth input: shifts the current state into the previous one.
    pub fn apply_input(&mut self, input: &SPlayerAuthInput) {
        self.prev_position = self.position;
        self.prev_rotation = self.rotation;
        self.position = input.position.as_dvec3();
        self.rotation = Rotation::new(f64::from(input.yaw), f64::from(input.pitch));
        self.delta = input.delta.as_dvec3();
        self.knockback = self.pending_knockback.take();

        if input.has_flag(InputFlags::START_SNEAKING) {
            self.sneaking = true;
        } else if input.has_flag(InputFlags::STOP_SNEAKING) {
            self.sneaking = false;
        } else {
            self.sneaking = input.has_flag(InputFlags::SNEAKING);
        }
        if input.has_flag(InputFlags::START_SPRINTING) {
            self.sprinting = true;
        } else if input.has_flag(InputFlags::STOP_SPRINTING) {
            self.sprinting = false;
        }

        // No collision model: vertical rest counts as ground.
        self.on_ground = self.delta.y.abs() < 1e-4;
    }

    /// Snaps to a server-forced position.
    pub fn teleport(&mut self, position: DVec3, rotation: Rotation) {
        self.position = position;
        self.prev_position = position;
        self.rotation = rotation;
        self.prev_rotation = rotation;
        self.delta = DVec3::ZERO;
    }

    /// Current eye height.
    #[must_use]
    pub const fn eye_height(&self) -> f64 {
        if self.sneaking {
            SNEAKING_EYE_HEIGHT
        } else {
            EYE_HEIGHT
        }
    }

    /// Eye position at the latest input.
    #[must_use]
    pub fn eye_position(&self) -> DVec3 {
        self.position + DVec3::new(0.0, self.eye_height(), 0.0)
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::new()
    }
}

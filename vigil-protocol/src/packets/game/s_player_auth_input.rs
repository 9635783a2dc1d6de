//! Serverbound player auth input - sent once per client tick with the client's movement.

use bitflags::bitflags;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Input flags reported with every auth input. Bit positions match the wire format.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct InputFlags: u64 {
        /// The jump key is held.
        const JUMP_DOWN = 1 << 3;
        /// The sprint key is held.
        const SPRINT_DOWN = 1 << 4;
        /// The player is jumping.
        const JUMPING = 1 << 6;
        /// The player is sneaking.
        const SNEAKING = 1 << 8;
        /// The sneak key is held.
        const SNEAK_DOWN = 1 << 9;
        /// The player is sprinting.
        const SPRINTING = 1 << 20;
        /// Sprinting started this tick.
        const START_SPRINTING = 1 << 25;
        /// Sprinting stopped this tick.
        const STOP_SPRINTING = 1 << 26;
        /// Sneaking started this tick.
        const START_SNEAKING = 1 << 27;
        /// Sneaking stopped this tick.
        const STOP_SNEAKING = 1 << 28;
        /// The client finished handling a server teleport this tick.
        const HANDLED_TELEPORT = 1 << 37;
        /// The client swung at nothing this tick.
        const MISSED_SWING = 1 << 39;
    }
}

/// How the client is providing input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum InputMode {
    /// Keyboard and mouse.
    #[default]
    Mouse = 1,
    /// Touch screen. Touch players can hit entities without looking at them.
    Touch = 2,
    /// Game pad.
    GamePad = 3,
    /// VR motion controller.
    MotionController = 4,
}

/// Sent by the client every tick while it is simulating movement.
///
/// `position` is the player's feet position; the decoder strips the eye offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SPlayerAuthInput {
    /// Vertical look angle in degrees.
    pub pitch: f32,
    /// Body yaw in degrees.
    pub yaw: f32,
    /// Head yaw in degrees.
    pub head_yaw: f32,
    /// Feet position after this tick's movement.
    pub position: Vec3,
    /// Analogue movement input.
    #[serde(default)]
    pub move_vector: Vec2,
    /// Input flags for this tick.
    #[serde(default)]
    pub input_data: InputFlags,
    /// Input device currently in use.
    #[serde(default)]
    pub input_mode: InputMode,
    /// The client's own tick counter.
    pub tick: u64,
    /// The client's movement delta for this tick.
    #[serde(default)]
    pub delta: Vec3,
}

impl SPlayerAuthInput {
    /// Whether `flag` is set on this input.
    #[must_use]
    pub const fn has_flag(&self, flag: InputFlags) -> bool {
        self.input_data.contains(flag)
    }
}

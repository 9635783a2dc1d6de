use serde::{Deserialize, Serialize};

/// Animation the client is playing on its own player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum AnimateAction {
    /// Arm swing.
    SwingArm = 1,
    /// Leaving a bed.
    StopSleep = 3,
    /// Critical hit particles.
    CriticalHit = 4,
    /// Enchanted critical hit particles.
    MagicCriticalHit = 5,
}

/// Sent when the client animates its own player, most importantly for arm swings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SAnimate {
    /// The animation played.
    pub action: AnimateAction,
    /// Runtime ID of the animated entity (the player itself).
    pub runtime_id: u64,
}

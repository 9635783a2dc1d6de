//! Teleport state tracking.
//!
//! A server teleport is only real for the client once it acknowledges the
//! `MovePlayer` that carried it. Until then the player keeps simulating from its
//! old position, so combat validation waits for a grace period after the
//! acknowledged teleport.

use glam::DVec3;

/// Tracks server-initiated teleports of the player.
#[derive(Clone, Debug)]
pub struct TeleportState {
    /// Teleports sent but not yet acknowledged.
    pub awaiting: u32,
    /// Position of the last acknowledged teleport.
    pub position: DVec3,
    /// Ticks since the last acknowledged teleport.
    pub ticks_since_teleport: u64,
}

impl TeleportState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            awaiting: 0,
            position: DVec3::ZERO,
            ticks_since_teleport: 0,
        }
    }

    /// Returns true if a teleport is still waiting for acknowledgement.
    #[must_use]
    pub const fn is_awaiting(&self) -> bool {
        self.awaiting > 0
    }

    /// Records that a teleport was sent to the client.
    pub const fn sent(&mut self) {
        self.awaiting = self.awaiting.saturating_add(1);
    }

    /// Records that the client acknowledged a teleport to `position`.
    pub const fn accept(&mut self, position: DVec3) {
        self.awaiting = self.awaiting.saturating_sub(1);
        self.position = position;
        self.ticks_since_teleport = 0;
    }

    /// Whether the last teleport happened within `grace` ticks.
    #[must_use]
    pub const fn is_recent(&self, grace: u64) -> bool {
        self.ticks_since_teleport <= grace
    }

    /// Advances one tick.
    pub const fn tick(&mut self) {
        self.ticks_since_teleport = self.ticks_since_teleport.saturating_add(1);
    }
}

impl Default for TeleportState {
    fn default() -> Self {
        Self::new()
    }
}

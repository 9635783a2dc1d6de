//! Checks and the context they run in.
//!
//! Every check is a small state machine that watches decoded client packets,
//! owns a [`ViolationTracker`] and reports flags through a [`CheckContext`].
//! The set of checks is closed, so they are dispatched through [`CheckKind`]
//! rather than trait objects.

mod bad_packet_b;
mod kill_aura_a;
mod kill_aura_b;
mod params;
mod reach_a;
mod reach_b;
mod timer_a;
pub mod tracker;
mod velocity_b;

use std::fmt;
use std::time::Instant;

use enum_dispatch::enum_dispatch;
use serde::Serialize;
use smallvec::SmallVec;
use vigil_protocol::ServerboundPacket;

use crate::config::VigilConfig;
use crate::entity::EntityRegistry;
use crate::player::WorldState;
use crate::player::state::PlayerState;

pub use bad_packet_b::BadPacketB;
pub use kill_aura_a::KillAuraA;
pub use kill_aura_b::KillAuraB;
pub use params::{FlagParams, ParamValue};
pub use reach_a::ReachA;
pub use reach_b::ReachB;
pub use timer_a::TimerA;
pub use tracker::ViolationTracker;
pub use velocity_b::VelocityB;

/// Name and variant of a check, e.g. `Reach` + `A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CheckId {
    /// The family of the check.
    pub name: &'static str,
    /// The variant within the family.
    pub variant: &'static str,
}

impl CheckId {
    /// Creates a check identifier.
    #[must_use]
    pub const fn new(name: &'static str, variant: &'static str) -> Self {
        Self { name, variant }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.variant)
    }
}

/// A flag raised by a check while processing one packet.
#[derive(Clone, Debug)]
pub struct PendingFlag {
    /// Amount added to the violation score.
    pub severity: f64,
    /// Parameters describing the detection.
    pub params: FlagParams,
}

/// What a check sees while processing a packet: a read view of the player and
/// their world, plus the decisions it has made so far.
pub struct CheckContext<'a> {
    world: &'a WorldState,
    now: Instant,
    flags: SmallVec<[PendingFlag; 2]>,
    cancelled: bool,
}

impl<'a> CheckContext<'a> {
    /// Creates a context over `world` for a packet received at `now`.
    #[must_use]
    pub fn new(world: &'a WorldState, now: Instant) -> Self {
        Self {
            world,
            now,
            flags: SmallVec::new(),
            cancelled: false,
        }
    }

    /// The player the packet came from.
    #[must_use]
    pub const fn player(&self) -> &'a PlayerState {
        &self.world.player
    }

    /// The entities visible to the player.
    #[must_use]
    pub const fn entities(&self) -> &'a EntityRegistry {
        &self.world.entities
    }

    /// When the packet was received.
    #[must_use]
    pub const fn now(&self) -> Instant {
        self.now
    }

    /// Raises a flag. Non-positive severities are dropped.
    pub fn flag(&mut self, severity: f64, params: FlagParams) {
        if severity > 0.0 {
            self.flags.push(PendingFlag { severity, params });
        }
    }

    /// Requests that the packet is not forwarded to the server.
    pub const fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the packet was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn into_decisions(self) -> (SmallVec<[PendingFlag; 2]>, bool) {
        (self.flags, self.cancelled)
    }
}

/// Behaviour shared by every check.
#[enum_dispatch]
pub trait Check {
    /// Name and variant.
    fn id(&self) -> CheckId;

    /// What the check detects.
    fn description(&self) -> &'static str;

    /// The check's scores.
    fn tracker(&self) -> &ViolationTracker;

    /// The check's scores, mutably.
    fn tracker_mut(&mut self) -> &mut ViolationTracker;

    /// Processes one client packet.
    fn process(&mut self, ctx: &mut CheckContext<'_>, pk: &ServerboundPacket);
}

/// Every check the engine knows about.
#[enum_dispatch(Check)]
pub enum CheckKind {
    /// Interpolated raycast reach.
    ReachA,
    /// Raw reach for touch input.
    ReachB,
    /// Attacks without swinging.
    KillAuraA,
    /// Several distant targets in one tick.
    KillAuraB,
    /// Ignored knockback.
    VelocityB,
    /// Simulating ahead of the server.
    TimerA,
    /// Legacy movement packets instead of auth input.
    BadPacketB,
}

/// Builds the per-player check list in registration order, skipping disabled checks.
#[must_use]
pub fn default_checks(config: &VigilConfig) -> Vec<CheckKind> {
    let samples = config.combat.samples();
    let all: [CheckKind; 7] = [
        ReachA::new(samples).into(),
        ReachB::new().into(),
        KillAuraA::new().into(),
        KillAuraB::new().into(),
        VelocityB::new().into(),
        TimerA::new().into(),
        BadPacketB::new().into(),
    ];
    all.into_iter()
        .filter(|check| config.is_enabled(&check.id().to_string()))
        .collect()
}

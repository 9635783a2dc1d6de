//! Combat validation.
//!
//! An attack transaction only tells us which entity the client claims to have
//! hit. The swing itself happened somewhere between the client's previous and
//! next movement input, against a target the client was rendering somewhere
//! between its previous and current position. The validator records the attack
//! ([`CombatPhase::AttackPending`]) and resolves it once the next input arrives
//! by replaying that interval in evenly spaced samples.

pub mod multi_target;
mod raycast;

use glam::DVec3;
use vigil_utils::Rotation;

use crate::entity::EntityRegistry;

pub use raycast::{CombatMeasurement, measure};

/// Amount every target box is grown by before distances are taken.
pub const TARGET_BOX_GROWTH: f64 = 0.1;
/// Length of the look ray cast from each sampled eye position.
pub const RAY_LENGTH: f64 = 7.0;
/// Undirected distance above which an attack is impossible.
pub const RAW_DISTANCE_LIMIT: f64 = 3.15;
/// Average hit distance at or below which an attack is legitimate.
pub const HIT_DISTANCE_LIMIT: f64 = 3.0001;
/// Ticks after a teleport during which attacks are not validated.
pub const TELEPORT_GRACE_TICKS: u64 = 20;
/// Rotation change within one tick past which the samples are meaningless.
pub const MAX_ROTATION_DELTA: f64 = 180.0;

/// An attack waiting for the input that completes it.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackAttempt {
    /// Runtime ID of the attacked entity.
    pub target_runtime_id: u64,
    /// Attacker eye position at the start of the tick.
    pub start_eye: DVec3,
    /// Attacker rotation at the start of the tick.
    pub start_rotation: Rotation,
}

/// Where the validator is in its cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombatPhase {
    /// Nothing to validate.
    #[default]
    Idle,
    /// An attack was recorded and waits for the next input.
    AttackPending,
    /// The pending attack was resolved this tick.
    Resolved,
}

/// Why a resolution produced no measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inconclusive {
    /// No attack was pending.
    NothingPending,
    /// The target disappeared before the attack could be resolved.
    TargetMissing,
}

/// Result of resolving a pending attack.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// The attack could not be judged.
    Inconclusive(Inconclusive),
    /// Distances measured over the interpolated tick.
    Measured(CombatMeasurement),
}

/// Holds at most one pending attack per player and resolves it.
#[derive(Clone, Debug)]
pub struct CombatValidator {
    samples: usize,
    phase: CombatPhase,
    pending: Option<AttackAttempt>,
}

impl CombatValidator {
    /// Creates a validator taking `samples` interpolation samples per resolution.
    #[must_use]
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(2),
            phase: CombatPhase::Idle,
            pending: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CombatPhase {
        self.phase
    }

    /// The attack waiting to be resolved.
    #[must_use]
    pub const fn pending(&self) -> Option<&AttackAttempt> {
        self.pending.as_ref()
    }

    /// Number of interpolation samples per resolution.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Records an attack. A pending attack is discarded and returned.
    pub fn begin(&mut self, attempt: AttackAttempt) -> Option<AttackAttempt> {
        self.phase = CombatPhase::AttackPending;
        self.pending.replace(attempt)
    }

    /// Resolves the pending attack against the attacker's end-of-tick eye position and rotation.
    ///
    /// `raycast` disables the directional samples, e.g. for touch input where
    /// players don't have to look at what they hit. They are also skipped when
    /// the attacker turned [`MAX_ROTATION_DELTA`] or more within the tick; the
    /// raw distance is always measured.
    pub fn resolve(
        &mut self,
        entities: &EntityRegistry,
        end_eye: DVec3,
        end_rotation: Rotation,
        raycast: bool,
    ) -> Resolution {
        let Some(attempt) = self.pending.take() else {
            return Resolution::Inconclusive(Inconclusive::NothingPending);
        };
        self.phase = CombatPhase::Resolved;

        let Some(target) = entities.find(attempt.target_runtime_id) else {
            return Resolution::Inconclusive(Inconclusive::TargetMissing);
        };
        let rotation_snap = attempt.start_rotation.delta(end_rotation) >= MAX_ROTATION_DELTA;

        let mut measurement = measure(
            &attempt,
            target,
            end_eye,
            end_rotation,
            self.samples,
            raycast && !rotation_snap,
        );
        measurement.rotation_snap = rotation_snap;
        Resolution::Measured(measurement)
    }

    /// Returns to idle after a resolution.
    pub fn settle(&mut self) {
        if self.phase == CombatPhase::Resolved {
            self.phase = CombatPhase::Idle;
        }
    }

    /// Drops any pending attack.
    pub fn reset(&mut self) {
        self.pending = None;
        self.phase = CombatPhase::Idle;
    }
}

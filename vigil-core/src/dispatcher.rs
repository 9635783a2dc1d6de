//! Per-player packet pipeline.
//!
//! Every decoded client packet is handed to every registered check, in
//! registration order. A cancel from any check drops the packet, but every
//! check still runs and keeps its side effects. Flags are applied to the
//! raising check's tracker as they come in and are independent of cancellation.

use std::time::Instant;

use serde::Serialize;
use smallvec::SmallVec;
use vigil_protocol::ServerboundPacket;

use crate::check::{Check, CheckContext, CheckId, CheckKind, FlagParams, default_checks};
use crate::config::VigilConfig;
use crate::player::WorldState;

/// A flag after it was applied to its check.
#[derive(Clone, Debug, Serialize)]
pub struct FlagEvent {
    /// The check that flagged.
    pub check: CheckId,
    /// Amount added to the violation score.
    pub severity: f64,
    /// Violation score after the flag.
    pub violations: f64,
    /// Score at which the check punishes.
    pub max_violations: f64,
    /// Detection details.
    pub params: FlagParams,
}

/// Aggregated decisions of all checks for one packet.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Whether any check cancelled the packet.
    pub cancelled: bool,
    /// Flags raised while processing the packet.
    pub flags: SmallVec<[FlagEvent; 1]>,
    /// The check that crossed its punishment threshold, at most once per player.
    pub punishment: Option<CheckId>,
}

/// Runs the check list of one player.
pub struct Dispatcher {
    checks: Vec<CheckKind>,
    punished: bool,
}

impl Dispatcher {
    /// Creates a dispatcher over `checks`, run in the given order.
    #[must_use]
    pub const fn new(checks: Vec<CheckKind>) -> Self {
        Self {
            checks,
            punished: false,
        }
    }

    /// Creates a dispatcher with every check enabled in `config`.
    #[must_use]
    pub fn from_config(config: &VigilConfig) -> Self {
        Self::new(default_checks(config))
    }

    /// The registered checks.
    #[must_use]
    pub fn checks(&self) -> &[CheckKind] {
        &self.checks
    }

    /// Looks up a check by its `NameVariant` identifier.
    #[must_use]
    pub fn check(&self, id: &str) -> Option<&CheckKind> {
        self.checks
            .iter()
            .find(|check| check.id().to_string() == id)
    }

    /// Whether a punishment was already issued.
    #[must_use]
    pub const fn has_punished(&self) -> bool {
        self.punished
    }

    /// Runs every check on `pk`.
    #[tracing::instrument(level = "trace", skip_all, fields(packet = pk.name()))]
    pub fn dispatch(
        &mut self,
        world: &WorldState,
        now: Instant,
        pk: &ServerboundPacket,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for check in &mut self.checks {
            let mut ctx = CheckContext::new(world, now);
            check.process(&mut ctx, pk);
            let (flags, cancelled) = ctx.into_decisions();
            outcome.cancelled |= cancelled;

            if flags.is_empty() {
                continue;
            }
            let id = check.id();
            let tracker = check.tracker_mut();
            for flag in flags {
                tracker.flag(flag.severity);
                outcome.flags.push(FlagEvent {
                    check: id,
                    severity: flag.severity,
                    violations: tracker.violations(),
                    max_violations: tracker.max_violations(),
                    params: flag.params,
                });
                if !self.punished && tracker.should_punish() {
                    self.punished = true;
                    outcome.punishment = Some(id);
                }
            }
        }

        outcome
    }

    /// Per-tick violation decay for every check.
    pub fn decay(&mut self, step: f64) {
        for check in &mut self.checks {
            check.tracker_mut().tick_decay(step);
        }
    }
}

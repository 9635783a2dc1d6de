use vigil_protocol::ServerboundPacket;
use vigil_protocol::packets::game::InputMode;
use vigil_utils::math::round;

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};
use crate::combat::RAW_DISTANCE_LIMIT;

/// Touch players may hit without aiming, so only the raw distance from the
/// claimed attack position to the target box is checked for them.
pub struct ReachB {
    tracker: ViolationTracker,
}

const BUFFER_CAP: f64 = 10.0;
const BUFFER_THRESHOLD: f64 = 5.0;
const SEVERITY_WINDOW: u64 = 600;
const MIN_TARGET_AGE: u64 = 40;
/// Sneaking lowers the claimed origin this much.
const SNEAK_OFFSET: f64 = 0.08;

impl ReachB {
    /// Creates the check.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tracker: ViolationTracker::new(15.0),
        }
    }
}

impl Default for ReachB {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ReachB {
    fn id(&self) -> CheckId {
        CheckId::new("Reach", "B")
    }

    fn description(&self) -> &'static str {
        "Checks the raw attack distance of touch players."
    }

    fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    fn tracker_mut(&mut self) -> &mut ViolationTracker {
        &mut self.tracker
    }

    fn process(&mut self, ctx: &mut CheckContext<'_>, pk: &ServerboundPacket) {
        let ServerboundPacket::InventoryTransaction(transaction) = pk else {
            return;
        };
        let Some(attack) = transaction.attack() else {
            return;
        };

        let player = ctx.player();
        if player.input_mode != InputMode::Touch || !player.game_mode.has_survival_reach() {
            return;
        }
        let Some(target) = ctx.entities().find(attack.target_runtime_id) else {
            return;
        };
        if target.ticks_since_teleport < MIN_TARGET_AGE {
            return;
        }

        let mut origin = attack.position.as_dvec3();
        if player.movement.sneaking {
            origin.y -= SNEAK_OFFSET;
        }
        let distance = target.aabb().distance_to_point(origin);

        if distance > RAW_DISTANCE_LIMIT {
            if self.tracker.buff(1.0, BUFFER_CAP) >= BUFFER_THRESHOLD {
                let severity = self
                    .tracker
                    .severity_after_ticks(player.client_tick, SEVERITY_WINDOW);
                ctx.flag(
                    severity,
                    FlagParams::new()
                        .with("Distance", round(distance, 4))
                        .with("Type", "Raw"),
                );
            }
        } else {
            self.tracker.buff(-0.05, BUFFER_CAP);
            self.tracker.reduce(0.01);
        }
    }
}

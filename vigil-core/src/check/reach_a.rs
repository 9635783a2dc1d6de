use vigil_protocol::ServerboundPacket;
use vigil_protocol::packets::game::InputMode;
use vigil_utils::math::round;

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};
use crate::combat::{
    AttackAttempt, CombatValidator, HIT_DISTANCE_LIMIT, RAW_DISTANCE_LIMIT, Resolution,
    TELEPORT_GRACE_TICKS,
};

const MISS_BUFFER_CAP: f64 = 5.0;
const MISS_BUFFER_THRESHOLD: f64 = 4.5;
const MISS_BUFFER_DECAY: f64 = 0.025;
const SECONDARY_BUFFER_CAP: f64 = 5.0;
const SECONDARY_BUFFER_THRESHOLD: f64 = 1.0;
const SECONDARY_BUFFER_DECAY: f64 = 0.0075;
const LEGITIMATE_VIOLATION_DECAY: f64 = 0.001;

/// Replays every attack over the interpolated tick and checks the target was
/// both within reach and under the crosshair.
///
/// A failed resolution can't stop the attack it judged, which the server has
/// already seen, so it cancels the player's next attack instead.
pub struct ReachA {
    tracker: ViolationTracker,
    validator: CombatValidator,
    secondary_buffer: f64,
    cancel_next: bool,
}

impl ReachA {
    /// Creates the check with `samples` interpolation samples per attack.
    #[must_use]
    pub fn new(samples: usize) -> Self {
        Self {
            tracker: ViolationTracker::new(15.0),
            validator: CombatValidator::new(samples),
            secondary_buffer: 0.0,
            cancel_next: false,
        }
    }

    /// The combat validator driving this check.
    #[must_use]
    pub const fn validator(&self) -> &CombatValidator {
        &self.validator
    }

    /// Whether the next attack will be dropped.
    #[must_use]
    pub const fn cancels_next_attack(&self) -> bool {
        self.cancel_next
    }

    fn record_attack(&mut self, ctx: &mut CheckContext<'_>, target_runtime_id: u64) {
        if self.cancel_next {
            self.cancel_next = false;
            ctx.cancel();
            return;
        }

        let player = ctx.player();
        if !player.game_mode.has_survival_reach() || player.teleport.is_recent(TELEPORT_GRACE_TICKS) {
            return;
        }
        let Some(target) = ctx.entities().find(target_runtime_id) else {
            return;
        };
        if !target.is_player || target.ticks_since_teleport <= TELEPORT_GRACE_TICKS {
            return;
        }

        let replaced = self.validator.begin(AttackAttempt {
            target_runtime_id,
            start_eye: player.movement.eye_position(),
            start_rotation: player.movement.rotation,
        });
        if let Some(replaced) = replaced {
            log::debug!(
                "{} attacked {} before attack on {} was resolved",
                player.name,
                target_runtime_id,
                replaced.target_runtime_id
            );
        }
    }

    fn judge(&mut self, ctx: &mut CheckContext<'_>, resolution: Resolution, input_mode: InputMode) {
        let Resolution::Measured(measurement) = resolution else {
            return;
        };

        if measurement.raw_distance > RAW_DISTANCE_LIMIT {
            ctx.flag(
                1.0,
                FlagParams::new()
                    .with("dist", round(measurement.raw_distance, 4))
                    .with("type", "bb-dist"),
            );
            self.cancel_next = true;
            return;
        }
        self.tracker.reduce(LEGITIMATE_VIOLATION_DECAY);

        if input_mode == InputMode::Touch || measurement.rotation_snap {
            return;
        }

        let Some(average) = measurement.average_hit() else {
            if self.tracker.buff(1.0, MISS_BUFFER_CAP) >= MISS_BUFFER_THRESHOLD {
                ctx.flag(1.0, FlagParams::new().with("type", "hitbox"));
                self.cancel_next = true;
            }
            return;
        };
        self.tracker.buff(-MISS_BUFFER_DECAY, MISS_BUFFER_CAP);

        if average <= HIT_DISTANCE_LIMIT {
            self.secondary_buffer = (self.secondary_buffer - SECONDARY_BUFFER_DECAY).max(0.0);
            self.tracker.reduce(LEGITIMATE_VIOLATION_DECAY);
            return;
        }

        self.secondary_buffer = (self.secondary_buffer + 1.0).min(SECONDARY_BUFFER_CAP);
        if self.secondary_buffer > SECONDARY_BUFFER_THRESHOLD {
            ctx.flag(
                1.0,
                FlagParams::new()
                    .with("dist", round(average, 4))
                    .with("type", "raycast"),
            );
        }
        self.cancel_next = true;
    }
}

impl Check for ReachA {
    fn id(&self) -> CheckId {
        CheckId::new("Reach", "A")
    }

    fn description(&self) -> &'static str {
        "Checks if a player's combat range is invalid."
    }

    fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    fn tracker_mut(&mut self) -> &mut ViolationTracker {
        &mut self.tracker
    }

    fn process(&mut self, ctx: &mut CheckContext<'_>, pk: &ServerboundPacket) {
        match pk {
            ServerboundPacket::InventoryTransaction(transaction) => {
                if let Some(attack) = transaction.attack() {
                    self.record_attack(ctx, attack.target_runtime_id);
                }
            }
            ServerboundPacket::PlayerAuthInput(input) => {
                self.validator.settle();
                let player = ctx.player();
                let resolution = self.validator.resolve(
                    ctx.entities(),
                    player.movement.eye_position(),
                    player.movement.rotation,
                    input.input_mode != InputMode::Touch,
                );
                self.judge(ctx, resolution, input.input_mode);
            }
            _ => {}
        }
    }
}

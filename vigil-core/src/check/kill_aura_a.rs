use vigil_protocol::ServerboundPacket;
use vigil_protocol::packets::game::{AnimateAction, InputFlags};

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};

/// Client ticks an attack may trail the last arm swing by.
const MAX_SWING_TICK_DIFF: u64 = 10;

/// Detects attacks without a recent arm swing.
pub struct KillAuraA {
    tracker: ViolationTracker,
    last_swing_tick: u64,
}

impl KillAuraA {
    /// Creates the check.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tracker: ViolationTracker::new(1.0).with_fail_buffer(1.0, 1.0),
            last_swing_tick: 0,
        }
    }
}

impl Default for KillAuraA {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for KillAuraA {
    fn id(&self) -> CheckId {
        CheckId::new("KillAura", "A")
    }

    fn description(&self) -> &'static str {
        "Detects if a player is attacking without swinging their arm."
    }

    fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    fn tracker_mut(&mut self) -> &mut ViolationTracker {
        &mut self.tracker
    }

    fn process(&mut self, ctx: &mut CheckContext<'_>, pk: &ServerboundPacket) {
        let player = ctx.player();
        match pk {
            ServerboundPacket::Animate(animate) if animate.action == AnimateAction::SwingArm => {
                self.last_swing_tick = player.client_tick;
            }
            ServerboundPacket::PlayerAuthInput(input)
                if player.protocol.reports_missed_swings()
                    && input.has_flag(InputFlags::MISSED_SWING) =>
            {
                self.last_swing_tick = player.client_tick;
            }
            ServerboundPacket::InventoryTransaction(transaction) if transaction.attack().is_some() => {
                let current_tick = player.client_tick;
                let tick_diff = current_tick.saturating_sub(self.last_swing_tick);
                if tick_diff <= MAX_SWING_TICK_DIFF {
                    return;
                }
                if self.tracker.fail() {
                    ctx.flag(
                        1.0,
                        FlagParams::new()
                            .with("tick_diff", tick_diff)
                            .with("current_tick", current_tick)
                            .with("last_tick", self.last_swing_tick),
                    );
                }
                ctx.cancel();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use glam::Vec3;
    use vigil_protocol::packets::game::{
        SAnimate, SInventoryTransaction, TransactionData, UseItemOnEntityAction,
        UseItemOnEntityData,
    };

    use super::*;
    use crate::player::WorldState;

    fn attack() -> ServerboundPacket {
        ServerboundPacket::InventoryTransaction(SInventoryTransaction {
            transaction: TransactionData::UseItemOnEntity(UseItemOnEntityData {
                target_runtime_id: 2,
                action_type: UseItemOnEntityAction::Attack,
                hotbar_slot: 0,
                position: Vec3::ZERO,
                click_position: Vec3::ZERO,
            }),
        })
    }

    fn swing() -> ServerboundPacket {
        ServerboundPacket::Animate(SAnimate {
            action: AnimateAction::SwingArm,
            runtime_id: 1,
        })
    }

    fn run(check: &mut KillAuraA, world: &WorldState, pk: &ServerboundPacket) -> (usize, bool) {
        let mut ctx = CheckContext::new(world, Instant::now());
        check.process(&mut ctx, pk);
        let (flags, cancelled) = ctx.into_decisions();
        (flags.len(), cancelled)
    }

    #[test]
    fn swing_then_attack_passes() {
        let mut world = WorldState::default();
        world.player.client_tick = 500;
        let mut check = KillAuraA::new();
        run(&mut check, &world, &swing());
        world.player.client_tick = 505;
        assert_eq!(run(&mut check, &world, &attack()), (0, false));
    }

    #[test]
    fn attack_without_swing_fails_and_cancels() {
        let mut world = WorldState::default();
        world.player.client_tick = 500;
        let mut check = KillAuraA::new();
        run(&mut check, &world, &swing());
        world.player.client_tick = 511;
        assert_eq!(run(&mut check, &world, &attack()), (1, true));
    }
}

use smallvec::SmallVec;
use vigil_protocol::ServerboundPacket;
use vigil_utils::math::round;

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};
use crate::combat::multi_target::min_pairwise_distance;
use crate::entity::TrackedEntity;

/// Targets further apart than this can't all be hit within one tick.
const MAX_TARGET_SPREAD: f64 = 1.5;
const SEVERITY_WINDOW: u64 = 40;

/// Detects attacks on several distant entities within one tick.
pub struct KillAuraB {
    tracker: ViolationTracker,
    targets: SmallVec<[u64; 4]>,
}

impl KillAuraB {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracker: ViolationTracker::new(15.0),
            targets: SmallVec::new(),
        }
    }
}

impl Default for KillAuraB {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for KillAuraB {
    fn id(&self) -> CheckId {
        CheckId::new("KillAura", "B")
    }

    fn description(&self) -> &'static str {
        "Checks if a player is attacking more than one entity at once."
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
                if let Some(attack) = transaction.attack()
                    && ctx.entities().find(attack.target_runtime_id).is_some()
                    && !self.targets.contains(&attack.target_runtime_id)
                {
                    self.targets.push(attack.target_runtime_id);
                }
            }
            ServerboundPacket::PlayerAuthInput(_) => {
                let targets = std::mem::take(&mut self.targets);
                if targets.len() < 2 {
                    return;
                }

                let entities: SmallVec<[&TrackedEntity; 4]> = targets
                    .iter()
                    .filter_map(|id| ctx.entities().find(*id))
                    .collect();
                let Some(min_distance) = min_pairwise_distance(&entities) else {
                    return;
                };
                if min_distance <= MAX_TARGET_SPREAD {
                    return;
                }

                let severity = self
                    .tracker
                    .severity_after_ticks(ctx.player().client_tick, SEVERITY_WINDOW);
                ctx.flag(
                    severity,
                    FlagParams::new()
                        .with("Minimum Distance", round(min_distance, 2))
                        .with("Entities", entities.len()),
                );
                ctx.cancel();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use glam::{DVec3, Vec2, Vec3};
    use vigil_protocol::packets::game::{
        InputFlags, InputMode, SInventoryTransaction, SPlayerAuthInput, TransactionData,
        UseItemOnEntityAction, UseItemOnEntityData,
    };
    use vigil_utils::Aabb;

    use super::*;
    use crate::check::ParamValue;
    use crate::player::WorldState;

    fn attack(target: u64) -> ServerboundPacket {
        ServerboundPacket::InventoryTransaction(SInventoryTransaction {
            transaction: TransactionData::UseItemOnEntity(UseItemOnEntityData {
                target_runtime_id: target,
                action_type: UseItemOnEntityAction::Attack,
                hotbar_slot: 0,
                position: Vec3::ZERO,
                click_position: Vec3::ZERO,
            }),
        })
    }

    fn input() -> ServerboundPacket {
        ServerboundPacket::PlayerAuthInput(SPlayerAuthInput {
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            position: Vec3::ZERO,
            move_vector: Vec2::ZERO,
            input_data: InputFlags::empty(),
            input_mode: InputMode::Mouse,
            tick: 100,
            delta: Vec3::ZERO,
        })
    }

    fn world_with(positions: &[(u64, f64)]) -> WorldState {
        let mut world = WorldState::default();
        for &(id, x) in positions {
            world.entities.add(TrackedEntity::new(
                id,
                DVec3::new(x, 0.0, 0.0),
                Aabb::from_dimensions(0.6, 1.8),
                true,
            ));
        }
        world
    }

    #[test]
    fn two_targets_five_apart_flag() {
        let world = world_with(&[(1, 0.0), (2, 5.4)]);
        let mut check = KillAuraB::new();
        for pk in [attack(1), attack(2)] {
            let mut ctx = CheckContext::new(&world, Instant::now());
            check.process(&mut ctx, &pk);
            assert!(!ctx.is_cancelled());
        }

        let mut ctx = CheckContext::new(&world, Instant::now());
        check.process(&mut ctx, &input());
        let (flags, cancelled) = ctx.into_decisions();
        assert!(cancelled);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].params.get("Entities"), Some(&ParamValue::Int(2)));
        let Some(ParamValue::Float(distance)) = flags[0].params.get("Minimum Distance") else {
            panic!("distance parameter missing");
        };
        assert!((distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_hits_on_one_target_pass() {
        let world = world_with(&[(1, 0.0)]);
        let mut check = KillAuraB::new();
        for pk in [attack(1), attack(1), attack(1), input()] {
            let mut ctx = CheckContext::new(&world, Instant::now());
            check.process(&mut ctx, &pk);
            assert!(ctx.into_decisions().0.is_empty());
        }
    }

    #[test]
    fn close_targets_pass_and_window_resets() {
        let world = world_with(&[(1, 0.0), (2, 1.0), (3, 5.4)]);
        let mut check = KillAuraB::new();
        for pk in [attack(1), attack(2), input(), attack(3), input()] {
            let mut ctx = CheckContext::new(&world, Instant::now());
            check.process(&mut ctx, &pk);
            assert!(ctx.into_decisions().0.is_empty());
        }
    }
}

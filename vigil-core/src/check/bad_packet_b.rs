use vigil_protocol::ServerboundPacket;

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};

/// Inputs that must separate two legacy movement packets.
const MIN_INPUTS_BETWEEN: u64 = 2;

/// Detects clients that send legacy `MovePlayer` packets alongside auth input.
pub struct BadPacketB {
    tracker: ViolationTracker,
    inputs: u64,
    last_move: u64,
}

impl BadPacketB {
    /// Creates the check.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tracker: ViolationTracker::new(1.0).with_fail_buffer(0.0, 1.0),
            inputs: 0,
            last_move: 0,
        }
    }
}

impl Default for BadPacketB {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for BadPacketB {
    fn id(&self) -> CheckId {
        CheckId::new("BadPacket", "B")
    }

    fn description(&self) -> &'static str {
        "Checks if a player is sending MovePlayer packets rather than PlayerAuthInput packets."
    }

    fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    fn tracker_mut(&mut self) -> &mut ViolationTracker {
        &mut self.tracker
    }

    fn process(&mut self, ctx: &mut CheckContext<'_>, pk: &ServerboundPacket) {
        match pk {
            ServerboundPacket::PlayerAuthInput(_) => self.inputs += 1,
            ServerboundPacket::MovePlayer(_) => {
                let speed = self.inputs - self.last_move;
                self.last_move = self.inputs;
                if speed >= MIN_INPUTS_BETWEEN || !ctx.player().client_predictions {
                    return;
                }
                if self.tracker.fail() {
                    ctx.flag(1.0, FlagParams::new().with("speed", speed));
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

    use glam::{Vec2, Vec3};
    use vigil_protocol::packets::game::{
        InputFlags, InputMode, MoveMode, SMovePlayer, SPlayerAuthInput,
    };

    use super::*;
    use crate::player::WorldState;

    fn input() -> ServerboundPacket {
        ServerboundPacket::PlayerAuthInput(SPlayerAuthInput {
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            position: Vec3::ZERO,
            move_vector: Vec2::ZERO,
            input_data: InputFlags::empty(),
            input_mode: InputMode::Mouse,
            tick: 1,
            delta: Vec3::ZERO,
        })
    }

    fn move_player() -> ServerboundPacket {
        ServerboundPacket::MovePlayer(SMovePlayer {
            runtime_id: 1,
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            mode: MoveMode::Normal,
            on_ground: true,
            tick: 1,
        })
    }

    fn run(check: &mut BadPacketB, world: &WorldState, pk: &ServerboundPacket) -> (usize, bool) {
        let mut ctx = CheckContext::new(world, Instant::now());
        check.process(&mut ctx, pk);
        let (flags, cancelled) = ctx.into_decisions();
        (flags.len(), cancelled)
    }

    #[test]
    fn spaced_move_packets_pass() {
        let world = WorldState::default();
        let mut check = BadPacketB::new();
        for _ in 0..3 {
            run(&mut check, &world, &input());
            run(&mut check, &world, &input());
            assert_eq!(run(&mut check, &world, &move_player()), (0, false));
        }
    }

    #[test]
    fn back_to_back_move_packets_fail() {
        let world = WorldState::default();
        let mut check = BadPacketB::new();
        run(&mut check, &world, &input());
        run(&mut check, &world, &input());
        assert_eq!(run(&mut check, &world, &move_player()), (0, false));
        run(&mut check, &world, &input());
        assert_eq!(run(&mut check, &world, &move_player()), (1, true));
    }

    #[test]
    fn ignored_without_client_predictions() {
        let mut world = WorldState::default();
        world.player.client_predictions = false;
        let mut check = BadPacketB::new();
        assert_eq!(run(&mut check, &world, &move_player()), (0, false));
    }
}

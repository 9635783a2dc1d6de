use vigil_protocol::ServerboundPacket;
use vigil_utils::math::round;

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};

const AIR_THRESHOLD: f64 = 1e-4;
const GROUND_THRESHOLD: f64 = 6e-3;
const SEVERITY_WINDOW: u64 = 200;
const PASS_DECAY: f64 = 0.2;
/// Knockback smaller than this horizontally is not worth comparing against.
const MIN_KNOCKBACK: f64 = 1e-3;

/// Compares the client's horizontal movement on the tick it applied knockback
/// with the knockback the server sent.
///
/// Without a physics model the comparison is approximate, so this check only
/// informs and never disconnects.
pub struct VelocityB {
    tracker: ViolationTracker,
}

impl VelocityB {
    /// Creates the check.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tracker: ViolationTracker::informational(15.0),
        }
    }
}

impl Default for VelocityB {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for VelocityB {
    fn id(&self) -> CheckId {
        CheckId::new("Velocity", "B")
    }

    fn description(&self) -> &'static str {
        "Checks if the user is taking abnormal horizontal velocity."
    }

    fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    fn tracker_mut(&mut self) -> &mut ViolationTracker {
        &mut self.tracker
    }

    fn process(&mut self, ctx: &mut CheckContext<'_>, pk: &ServerboundPacket) {
        if !matches!(pk, ServerboundPacket::PlayerAuthInput(_)) {
            return;
        }
        let player = ctx.player();
        let Some(knockback) = player.movement.knockback else {
            return;
        };
        let expected = knockback.x.hypot(knockback.z);
        if expected < MIN_KNOCKBACK {
            return;
        }

        let movement = player.movement.delta;
        let x_diff = (knockback.x - movement.x).abs();
        let z_diff = (knockback.z - movement.z).abs();
        let threshold = if player.movement.on_ground {
            GROUND_THRESHOLD
        } else {
            AIR_THRESHOLD
        };

        if x_diff <= threshold && z_diff <= threshold {
            self.tracker.reduce(PASS_DECAY);
            return;
        }

        let pct = movement.x.hypot(movement.z) / expected * 100.0;
        let severity = self
            .tracker
            .severity_after_ticks(player.client_tick, SEVERITY_WINDOW);
        ctx.flag(
            severity,
            FlagParams::new()
                .with("pct", format!("{}%", round(pct, 4)))
                .with("xDiff", round(x_diff, 4))
                .with("zDiff", round(z_diff, 4)),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use glam::{DVec3, Vec2, Vec3};
    use vigil_protocol::packets::game::{InputFlags, InputMode, SPlayerAuthInput};

    use super::*;
    use crate::check::ParamValue;
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

    fn world(knockback: DVec3, delta: DVec3) -> WorldState {
        let mut world = WorldState::default();
        world.player.movement.knockback = Some(knockback);
        world.player.movement.delta = delta;
        world.player.movement.on_ground = false;
        world
    }

    #[test]
    fn matching_knockback_passes() {
        let kb = DVec3::new(0.4, 0.36, -0.2);
        let world = world(kb, kb);
        let mut check = VelocityB::new();
        check.tracker_mut().flag(1.0);
        let mut ctx = CheckContext::new(&world, Instant::now());
        check.process(&mut ctx, &input());
        assert!(ctx.into_decisions().0.is_empty());
        assert!((check.tracker().violations() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn ignored_knockback_flags() {
        let world = world(DVec3::new(0.4, 0.36, 0.0), DVec3::ZERO);
        let mut check = VelocityB::new();
        let mut ctx = CheckContext::new(&world, Instant::now());
        check.process(&mut ctx, &input());
        let (flags, cancelled) = ctx.into_decisions();
        assert!(!cancelled);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].params.get("pct"), Some(&ParamValue::from("0%".to_owned())));
        assert_eq!(flags[0].params.get("xDiff"), Some(&ParamValue::Float(0.4)));
        assert!(!check.tracker().punishable());
    }

    #[test]
    fn no_knockback_no_check() {
        let mut world = world(DVec3::ZERO, DVec3::ONE);
        world.player.movement.knockback = None;
        let mut check = VelocityB::new();
        let mut ctx = CheckContext::new(&world, Instant::now());
        check.process(&mut ctx, &input());
        assert!(ctx.into_decisions().0.is_empty());
    }
}

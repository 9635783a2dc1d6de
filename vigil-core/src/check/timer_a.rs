use std::time::Instant;

use vigil_protocol::ServerboundPacket;
use vigil_utils::math::round;

use super::{Check, CheckContext, CheckId, FlagParams, ViolationTracker};

/// Milliseconds a client tick should take.
const TICK_MILLIS: f64 = 50.0;
/// Balance (in milliseconds ahead of real time) at which the client fails.
const FAIL_BALANCE: f64 = -150.0;
/// Balance past which a client that is also ahead on ticks is reset.
const BALANCE_CEILING: f64 = 500.0;
/// Early ticks are skipped while the client settles after joining.
const WARMUP_TICKS: u64 = 20;

/// Detects clients that simulate faster than real time by comparing the wall
/// clock between auth inputs with the expected 50ms.
pub struct TimerA {
    tracker: ViolationTracker,
    balance: f64,
    last_input: Option<Instant>,
}

impl TimerA {
    /// Creates the check.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tracker: ViolationTracker::new(15.0).with_fail_buffer(0.0, 1.0),
            balance: 0.0,
            last_input: None,
        }
    }

    /// Milliseconds the client is behind (positive) or ahead (negative) of real time.
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }
}

impl Default for TimerA {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for TimerA {
    fn id(&self) -> CheckId {
        CheckId::new("Timer", "A")
    }

    fn description(&self) -> &'static str {
        "Detects if a player is simulating ahead of the server."
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
        if player.client_tick < WARMUP_TICKS {
            return;
        }

        let now = ctx.now();
        let Some(last) = self.last_input.replace(now) else {
            return;
        };
        if !player.ready {
            self.balance = 0.0;
            return;
        }

        let elapsed = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
        self.balance += elapsed - TICK_MILLIS;

        if self.balance <= FAIL_BALANCE {
            if self.tracker.fail() {
                ctx.flag(1.0, FlagParams::new().with("balance", round(self.balance, 2)));
            }
            self.balance = 0.0;
            ctx.cancel();
            return;
        }

        // Slowing down to bank balance and then speeding up.
        if self.balance > BALANCE_CEILING && player.client_tick > player.server_tick + 1 {
            self.balance = 0.0;
        }
    }
}

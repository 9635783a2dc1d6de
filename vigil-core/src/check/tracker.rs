//! The scoring state machine embedded in every check.
//!
//! A tracker holds two non-negative scores:
//! - `violations`, the long-lived score that escalates to a punishment once it
//!   reaches `max_violations`;
//! - `buffer`, a short-lived debounce counter checks use to require several
//!   suspicious ticks before a single violation is counted.

/// Violation and buffer scores for one check of one player.
#[derive(Clone, Debug)]
pub struct ViolationTracker {
    violations: f64,
    buffer: f64,
    max_violations: f64,
    punishable: bool,
    fail_buffer: f64,
    max_buffer: f64,
    last_flag_tick: Option<u64>,
    flagged_since_decay: bool,
}

impl ViolationTracker {
    /// Creates an empty tracker that punishes once `max_violations` is reached.
    #[must_use]
    pub const fn new(max_violations: f64) -> Self {
        Self {
            violations: 0.0,
            buffer: 0.0,
            max_violations,
            punishable: true,
            fail_buffer: 0.0,
            max_buffer: 1.0,
            last_flag_tick: None,
            flagged_since_decay: false,
        }
    }

    /// Creates a tracker whose flags are informational only.
    #[must_use]
    pub const fn informational(max_violations: f64) -> Self {
        let mut tracker = Self::new(max_violations);
        tracker.punishable = false;
        tracker
    }

    /// Sets how many consecutive [`fail`](Self::fail) calls are needed before one counts.
    #[must_use]
    pub const fn with_fail_buffer(mut self, fail_buffer: f64, max_buffer: f64) -> Self {
        self.fail_buffer = fail_buffer;
        self.max_buffer = max_buffer;
        self
    }

    /// Current violation score.
    #[must_use]
    pub const fn violations(&self) -> f64 {
        self.violations
    }

    /// Current buffer score.
    #[must_use]
    pub const fn buffer(&self) -> f64 {
        self.buffer
    }

    /// Violation score at which the check escalates.
    #[must_use]
    pub const fn max_violations(&self) -> f64 {
        self.max_violations
    }

    /// Whether reaching `max_violations` leads to a disconnect.
    #[must_use]
    pub const fn punishable(&self) -> bool {
        self.punishable
    }

    /// Adds `delta` to the buffer, clamps it into `[0, cap]` and returns the new value.
    pub fn buff(&mut self, delta: f64, cap: f64) -> f64 {
        let cap = cap.max(0.0);
        self.buffer = (self.buffer + delta).clamp(0.0, cap);
        self.buffer
    }

    /// Records a failed detection. Returns whether the buffer has reached the fail threshold.
    pub fn fail(&mut self) -> bool {
        self.buff(1.0, self.max_buffer) >= self.fail_buffer
    }

    /// Adds `severity` to the violation score. Non-positive severities are ignored.
    pub fn flag(&mut self, severity: f64) {
        if severity <= 0.0 || severity.is_nan() {
            return;
        }
        self.violations += severity;
        self.flagged_since_decay = true;
    }

    /// Lowers the violation score by `amount`, never below zero.
    pub fn reduce(&mut self, amount: f64) {
        self.violations = (self.violations - amount.abs()).max(0.0);
    }

    /// Severity for a flag raised at `current_tick`, weighted by the time since the last one.
    ///
    /// A check that keeps flagging every tick yields `1 / window` per flag, while a
    /// check that has been quiet for `window` ticks or more (or never flagged) yields
    /// a full violation. Records `current_tick` as the new last flag tick.
    pub fn severity_after_ticks(&mut self, current_tick: u64, window: u64) -> f64 {
        let window = window.max(1);
        let elapsed = self
            .last_flag_tick
            .map_or(window, |last| current_tick.saturating_sub(last).max(1));
        self.last_flag_tick = Some(current_tick);
        elapsed.min(window) as f64 / window as f64
    }

    /// Per-tick decay. Skipped once after any tick that raised a flag.
    pub fn tick_decay(&mut self, step: f64) {
        if self.flagged_since_decay {
            self.flagged_since_decay = false;
            return;
        }
        self.reduce(step);
    }

    /// Whether the tracker has crossed its punishment threshold.
    #[must_use]
    pub fn should_punish(&self) -> bool {
        self.punishable && self.violations >= self.max_violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buff_stays_within_cap() {
        let mut tracker = ViolationTracker::new(15.0);
        for delta in [3.0, 100.0, -0.5, -1000.0, 2.5, f64::MAX, -f64::MAX] {
            let value = tracker.buff(delta, 5.0);
            assert!((0.0..=5.0).contains(&value), "{value} escaped the cap");
        }
    }

    #[test]
    fn negative_cap_pins_buffer_to_zero() {
        let mut tracker = ViolationTracker::new(15.0);
        assert!(tracker.buff(4.0, -3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decay_never_increases_or_goes_negative() {
        let mut tracker = ViolationTracker::new(15.0);
        tracker.flag(1.3);
        tracker.tick_decay(0.4);
        let mut previous = tracker.violations();
        for _ in 0..20 {
            tracker.tick_decay(0.4);
            let now = tracker.violations();
            assert!(now <= previous);
            assert!(now >= 0.0);
            previous = now;
        }
        assert!(tracker.violations().abs() < f64::EPSILON);
    }

    #[test]
    fn decay_skips_the_tick_after_a_flag() {
        let mut tracker = ViolationTracker::new(15.0);
        tracker.flag(1.0);
        tracker.tick_decay(0.5);
        assert!((tracker.violations() - 1.0).abs() < f64::EPSILON);
        tracker.tick_decay(0.5);
        assert!((tracker.violations() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn severity_grows_with_time_since_last_flag() {
        let mut tracker = ViolationTracker::new(15.0);
        assert!((tracker.severity_after_ticks(100, 40) - 1.0).abs() < f64::EPSILON);
        let spam = tracker.severity_after_ticks(101, 40);
        assert!((spam - 1.0 / 40.0).abs() < f64::EPSILON);
        let later = tracker.severity_after_ticks(121, 40);
        assert!(later > spam);
        assert!((tracker.severity_after_ticks(1000, 40) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn punishes_only_when_punishable() {
        let mut punishable = ViolationTracker::new(2.0);
        let mut informational = ViolationTracker::informational(2.0);
        for tracker in [&mut punishable, &mut informational] {
            tracker.flag(1.0);
            tracker.flag(1.0);
        }
        assert!(punishable.should_punish());
        assert!(!informational.should_punish());
    }

    #[test]
    fn fail_respects_buffer_threshold() {
        let mut tracker = ViolationTracker::new(1.0).with_fail_buffer(2.0, 3.0);
        assert!(!tracker.fail());
        assert!(tracker.fail());
        assert!(tracker.fail());
        assert!((tracker.buffer() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ignores_non_positive_severity() {
        let mut tracker = ViolationTracker::new(2.0);
        tracker.flag(0.0);
        tracker.flag(-3.0);
        assert!(tracker.violations().abs() < f64::EPSILON);
    }
}

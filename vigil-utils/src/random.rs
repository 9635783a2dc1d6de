//! Sources of acknowledgement timestamps.
//!
//! Live sessions draw from the thread RNG. Tests and replays inject a
//! [`ScriptedTimestamps`] so every probe value is reproducible.

use std::collections::VecDeque;

/// Produces raw 32-bit values that become acknowledgement timestamps.
pub trait TimestampSource: Send {
    /// Returns the next candidate value.
    fn next_u32(&mut self) -> u32;
}

/// Draws from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl TimestampSource for ThreadRandom {
    fn next_u32(&mut self) -> u32 {
        rand::random()
    }
}

/// Replays a fixed list of values, then counts upwards from the last one.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTimestamps {
    script: VecDeque<u32>,
    next: u32,
}

impl ScriptedTimestamps {
    /// Creates a source that yields `values` in order before falling back to counting.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
            next: 1,
        }
    }

    /// Creates a source that counts upwards from `start`.
    #[must_use]
    pub fn counting_from(start: u32) -> Self {
        Self {
            script: VecDeque::new(),
            next: start,
        }
    }
}

impl TimestampSource for ScriptedTimestamps {
    fn next_u32(&mut self) -> u32 {
        let value = self.script.pop_front().unwrap_or(self.next);
        self.next = value.wrapping_add(1);
        value
    }
}

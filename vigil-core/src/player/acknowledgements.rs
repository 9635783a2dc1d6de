//! Round-trip acknowledgement probes.
//!
//! Changes the server sends to the client only become part of the player's view
//! once the client has processed them. Every such change registers a callback in
//! the current bucket. Once per tick the bucket is sent as a `NetworkStackLatency`
//! probe with a random timestamp, and the callbacks run when the client echoes
//! that timestamp back.

use rustc_hash::FxHashMap;
use vigil_protocol::DeviceOs;
use vigil_protocol::packets::game::CNetworkStackLatency;
use vigil_utils::random::{ThreadRandom, TimestampSource};

/// A deferred update applied to `C` once the client acknowledges it.
pub type AckCallback<C> = Box<dyn FnOnce(&mut C) + Send>;

/// Legacy clients round echoed timestamps to whole thousands.
const LEGACY_SCALE: i64 = 1000;

/// Outcome of the per-tick liveness validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    /// The client is answering probes, or there is nothing to answer.
    Responsive,
    /// The client kept sending input without answering any probe.
    Unresponsive,
}

/// Correlates probes with their echoes and runs the matching callbacks.
pub struct AcknowledgementCorrelator<C> {
    source: Box<dyn TimestampSource>,
    current_timestamp: i64,
    current: Vec<AckCallback<C>>,
    pending: FxHashMap<i64, Vec<AckCallback<C>>>,
    legacy: bool,
    device_os: DeviceOs,
    ticked: bool,
    awaiting_ticks: u32,
    unresponsive_after: u32,
    max_pending: usize,
}

impl<C> AcknowledgementCorrelator<C> {
    /// Creates a correlator drawing timestamps from the thread RNG.
    #[must_use]
    pub fn new(unresponsive_after: u32, max_pending: usize) -> Self {
        Self::with_source(Box::new(ThreadRandom), unresponsive_after, max_pending)
    }

    /// Creates a correlator drawing timestamps from `source`.
    #[must_use]
    pub fn with_source(
        source: Box<dyn TimestampSource>,
        unresponsive_after: u32,
        max_pending: usize,
    ) -> Self {
        let mut correlator = Self {
            source,
            current_timestamp: 0,
            current: Vec::new(),
            pending: FxHashMap::default(),
            legacy: false,
            device_os: DeviceOs::Unknown,
            ticked: false,
            awaiting_ticks: 0,
            unresponsive_after: unresponsive_after.max(1),
            max_pending: max_pending.max(1),
        };
        correlator.refresh();
        correlator
    }

    /// Sets how this client encodes echoed timestamps.
    pub fn set_client(&mut self, legacy: bool, device_os: DeviceOs) {
        self.legacy = legacy;
        self.device_os = device_os;
        self.refresh();
    }

    /// Draws a new timestamp for the current bucket that no pending bucket uses.
    pub fn refresh(&mut self) {
        loop {
            let raw = i64::from(self.source.next_u32());
            let timestamp = if self.legacy { raw * LEGACY_SCALE } else { raw };
            if !self.pending.contains_key(&timestamp) {
                self.current_timestamp = timestamp;
                return;
            }
        }
    }

    /// Timestamp of the bucket callbacks are currently added to.
    #[must_use]
    pub const fn current_timestamp(&self) -> i64 {
        self.current_timestamp
    }

    /// Number of buckets sent and not yet answered.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether a bucket with `timestamp` is waiting for its echo.
    #[must_use]
    pub fn is_pending(&self, timestamp: i64) -> bool {
        self.pending.contains_key(&timestamp)
    }

    /// Appends a callback to the current bucket.
    pub fn add_callback(&mut self, callback: impl FnOnce(&mut C) + Send + 'static) {
        self.current.push(Box::new(callback));
    }

    /// Seals the current bucket and returns the probe to send, then starts a new bucket.
    ///
    /// Returns `None` if nothing was added since the last flush, or if the
    /// pending map is full (the callbacks then wait for the next flush). An
    /// empty bucket still moves to a fresh timestamp.
    pub fn flush(&mut self) -> Option<CNetworkStackLatency> {
        if self.current.is_empty() {
            self.refresh();
            return None;
        }
        if self.pending.len() >= self.max_pending {
            log::debug!(
                "{} acknowledgement buckets pending, holding {} callbacks",
                self.pending.len(),
                self.current.len()
            );
            return None;
        }

        let timestamp = self.current_timestamp;
        let bucket = std::mem::take(&mut self.current);
        self.pending.insert(timestamp, bucket);
        self.refresh();

        let sent = if self.legacy && self.device_os.is_playstation() {
            timestamp / LEGACY_SCALE
        } else {
            timestamp
        };
        Some(CNetworkStackLatency {
            timestamp: sent,
            needs_response: true,
        })
    }

    /// Decodes an echoed timestamp back into the key it was sent under.
    #[must_use]
    pub fn decode(&self, echoed: i64) -> i64 {
        if self.legacy {
            return echoed;
        }
        let timestamp = echoed / 1000;
        if self.device_os.is_playstation() {
            timestamp
        } else {
            timestamp / 1000
        }
    }

    /// Handles an echo from the client. Runs the matching bucket's callbacks in
    /// insertion order and returns `true`, or returns `false` if nothing matches.
    pub fn handle_response(&mut self, echoed: i64, context: &mut C) -> bool {
        let timestamp = self.decode(echoed);
        let Some(callbacks) = self.pending.remove(&timestamp) else {
            return false;
        };
        for callback in callbacks {
            callback(context);
        }
        self.awaiting_ticks = 0;
        true
    }

    /// Records that the client simulated a tick since the last validation.
    pub const fn mark_ticked(&mut self) {
        self.ticked = true;
    }

    /// Per-tick liveness check.
    ///
    /// Only ticks on which the client also sent input count towards the limit,
    /// and only while some probe is still unanswered.
    pub fn validate(&mut self) -> Liveness {
        if !self.ticked {
            return Liveness::Responsive;
        }
        self.ticked = false;

        if self.pending.is_empty() {
            self.awaiting_ticks = 0;
            return Liveness::Responsive;
        }

        self.awaiting_ticks += 1;
        if self.awaiting_ticks < self.unresponsive_after {
            Liveness::Responsive
        } else {
            Liveness::Unresponsive
        }
    }

    /// Drops every bucket without running its callbacks.
    pub fn invalidate_all(&mut self) {
        self.pending.clear();
        self.current.clear();
        self.awaiting_ticks = 0;
        self.ticked = false;
        self.refresh();
    }
}

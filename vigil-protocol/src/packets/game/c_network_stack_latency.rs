//! Clientbound network stack latency - the acknowledgement probe.

use serde::{Deserialize, Serialize};

/// A round-trip probe. The client echoes it once it has processed every packet sent before it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CNetworkStackLatency {
    /// Opaque timestamp the client echoes back.
    pub timestamp: i64,
    /// Must be true for the client to answer.
    pub needs_response: bool,
}

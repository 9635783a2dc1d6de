//! Serverbound network stack latency - the client's echo of an acknowledgement probe.

use serde::{Deserialize, Serialize};

/// Echo of a [`CNetworkStackLatency`](super::CNetworkStackLatency) probe.
///
/// The client scales the timestamp before echoing it; see the acknowledgement
/// correlator for how each client family is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SNetworkStackLatency {
    /// The scaled timestamp.
    pub timestamp: i64,
    /// Always false on the echo.
    #[serde(default)]
    pub needs_response: bool,
}

use serde::{Deserialize, Serialize};

/// Sent once by the client shortly after spawning to synchronise tick counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct STickSync {
    /// Client time when the request was sent.
    pub client_request_timestamp: i64,
    /// Server time when the request was received.
    pub server_reception_timestamp: i64,
}

use serde::{Deserialize, Serialize};

/// Removes an entity from the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRemoveActor {
    /// Runtime ID of the removed entity.
    pub runtime_id: u64,
}

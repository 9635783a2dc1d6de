use serde::{Deserialize, Serialize};

/// Kicks the client with a message shown on the disconnect screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CDisconnect {
    /// Hide the disconnect screen entirely.
    #[serde(default)]
    pub hide_disconnection_screen: bool,
    /// The message to show.
    pub message: String,
}

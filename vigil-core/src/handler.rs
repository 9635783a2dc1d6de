//! Hooks through which the embedding proxy observes detections and talks to the client.

use vigil_protocol::ClientboundPacket;

use crate::check::CheckId;
use crate::dispatcher::FlagEvent;

/// Receives detection events for a session.
///
/// All methods run while the player's lock is held and must not block.
pub trait DetectionHandler: Send + Sync {
    /// Called for every flag after it was applied.
    fn handle_flag(&self, _player: &str, _flag: &FlagEvent) {}

    /// Called before a player is disconnected for `check`. The message may be
    /// rewritten; returning `false` keeps the player connected.
    fn handle_punishment(&self, _player: &str, _check: CheckId, _message: &mut String) -> bool {
        true
    }

    /// Called before a player that stopped answering probes is disconnected.
    /// Returning `false` keeps the player connected.
    fn handle_unresponsive(&self, _player: &str, _message: &mut String) -> bool {
        true
    }
}

/// A handler that accepts every default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopHandler;

impl DetectionHandler for NopHandler {}

/// The client side of one proxied connection.
pub trait ClientConnection: Send + Sync {
    /// Queues a packet for the client.
    fn write_packet(&self, pk: ClientboundPacket);

    /// Disconnects the client with `message`.
    fn disconnect(&self, message: &str);
}

//! A proxied client connection: one player behind a lock, plus the hooks it reports to.
//!
//! The lock is the player's serialization boundary. Packet handling in both
//! directions and the server tick all take it, so a player's checks and
//! acknowledgement state never see concurrent mutation.

pub mod registry;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::MutexGuard;
use uuid::Uuid;
use vigil_protocol::{ClientboundPacket, ServerboundPacket};
use vigil_utils::locks::SyncMutex;

use crate::config::VigilConfig;
use crate::handler::{ClientConnection, DetectionHandler};
use crate::player::state::PlayerState;
use crate::player::{Player, Punishment};

pub use registry::{SessionError, SessionRegistry};

/// One connected player.
pub struct Session {
    id: Uuid,
    player: SyncMutex<Player>,
    handler: Arc<dyn DetectionHandler>,
    connection: Arc<dyn ClientConnection>,
    config: Arc<VigilConfig>,
}

impl Session {
    /// Creates a session for a freshly connected player.
    #[must_use]
    pub fn new(
        state: PlayerState,
        config: Arc<VigilConfig>,
        handler: Arc<dyn DetectionHandler>,
        connection: Arc<dyn ClientConnection>,
    ) -> Self {
        let player = Player::new(state, config.clone());
        Self::from_player(player, config, handler, connection)
    }

    /// Wraps an already built player.
    #[must_use]
    pub fn from_player(
        player: Player,
        config: Arc<VigilConfig>,
        handler: Arc<dyn DetectionHandler>,
        connection: Arc<dyn ClientConnection>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player: SyncMutex::new(player),
            handler,
            connection,
            config,
        }
    }

    /// Unique identifier of this session.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Locks the player.
    pub fn player(&self) -> MutexGuard<'_, Player> {
        self.player.lock()
    }

    /// Whether the player was disconnected.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.player.lock().is_closed()
    }

    /// Processes a client packet. Returns whether it should be forwarded to the server.
    pub fn handle_client_packet(&self, pk: &ServerboundPacket, now: Instant) -> bool {
        let mut player = self.player.lock();
        let decision = player.handle_client_packet(pk, now);
        for flag in &decision.flags {
            self.handler.handle_flag(player.name(), flag);
        }
        if let Some(punishment) = decision.punishment {
            self.punish(&mut player, punishment);
        }
        decision.forward
    }

    /// Processes a server packet. Returns whether it should be forwarded to the client.
    pub fn handle_server_packet(&self, pk: &ClientboundPacket) -> bool {
        self.player.lock().handle_server_packet(pk)
    }

    /// Runs one server tick for the player, sending the acknowledgement probe if any.
    pub fn tick(&self) {
        let mut player = self.player.lock();
        let outcome = player.tick();

        if let Some(probe) = outcome.probe {
            self.connection
                .write_packet(ClientboundPacket::NetworkStackLatency(probe));
        }

        if outcome.unresponsive && self.config.acknowledgements.disconnect_unresponsive {
            let mut message = self.config.punishments.unresponsive_message.clone();
            if self.handler.handle_unresponsive(player.name(), &mut message) {
                player.close();
                self.connection.disconnect(&message);
            }
        }
    }

    /// Resets the player's world view after a transfer to another backend.
    pub fn transfer(&self) {
        self.player.lock().transfer();
    }

    /// Marks the session as closed. Outstanding acknowledgements are dropped.
    pub fn close(&self) {
        self.player.lock().close();
    }

    fn punish(&self, player: &mut Player, punishment: Punishment) {
        if !self.config.punishments.enabled {
            log::debug!(
                "{} reached the threshold of {}, punishments are disabled",
                player.name(),
                punishment.check
            );
            return;
        }

        let mut message = punishment.message;
        if !self
            .handler
            .handle_punishment(player.name(), punishment.check, &mut message)
        {
            return;
        }

        log::info!(
            "{} was detected and punished for using {}.",
            player.name(),
            punishment.check
        );
        player.close();
        self.connection.disconnect(&message);
    }
}

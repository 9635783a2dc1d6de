//! This module contains the `Player` struct: one connected client, its view of
//! the world and the checks watching it.
//!
//! Server packets that change what the client sees (entity movement, removals,
//! knockback, teleports) are not applied when they pass through the proxy but
//! when the client acknowledges them, so checks always judge the client against
//! the world it actually had on screen.

pub mod acknowledgements;
pub mod movement_state;
pub mod state;
pub mod teleport_state;

use std::sync::Arc;
use std::time::Instant;

use smallvec::SmallVec;
use vigil_protocol::packets::game::CNetworkStackLatency;
use vigil_protocol::{ClientboundPacket, ServerboundPacket};
use vigil_utils::Rotation;
use vigil_utils::random::{ThreadRandom, TimestampSource};

use crate::check::CheckId;
use crate::config::VigilConfig;
use crate::dispatcher::{Dispatcher, FlagEvent};
use crate::entity::{EntityRegistry, TrackedEntity};
use acknowledgements::{AcknowledgementCorrelator, Liveness};
use state::PlayerState;

/// The player together with the entities it can see. Acknowledgement callbacks run against this.
#[derive(Debug, Default)]
pub struct WorldState {
    /// The player.
    pub player: PlayerState,
    /// Entities visible to the player.
    pub entities: EntityRegistry,
}

/// A disconnect requested by a check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Punishment {
    /// The check that reached its threshold.
    pub check: CheckId,
    /// Disconnect message shown to the player.
    pub message: String,
}

/// What to do with one client packet.
#[derive(Debug)]
pub struct PacketDecision {
    /// Whether the packet continues to the server.
    pub forward: bool,
    /// Flags raised while processing it.
    pub flags: SmallVec<[FlagEvent; 1]>,
    /// A punishment triggered by it.
    pub punishment: Option<Punishment>,
}

impl PacketDecision {
    fn dropped() -> Self {
        Self {
            forward: false,
            flags: SmallVec::new(),
            punishment: None,
        }
    }
}

/// What happened during one server tick.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Probe to send to the client.
    pub probe: Option<CNetworkStackLatency>,
    /// Whether the client has stopped answering probes.
    pub unresponsive: bool,
}

/// A connected client.
pub struct Player {
    world: WorldState,
    acknowledgements: AcknowledgementCorrelator<WorldState>,
    dispatcher: Dispatcher,
    config: Arc<VigilConfig>,
    closed: bool,
}

impl Player {
    /// Creates a player with every check enabled in `config`.
    #[must_use]
    pub fn new(state: PlayerState, config: Arc<VigilConfig>) -> Self {
        Self::with_timestamps(state, config, Box::new(ThreadRandom))
    }

    /// Creates a player whose acknowledgement timestamps come from `source`.
    #[must_use]
    pub fn with_timestamps(
        state: PlayerState,
        config: Arc<VigilConfig>,
        source: Box<dyn TimestampSource>,
    ) -> Self {
        let mut acknowledgements = AcknowledgementCorrelator::with_source(
            source,
            config.acknowledgements.unresponsive_ticks,
            config.acknowledgements.max_pending,
        );
        acknowledgements.set_client(state.protocol.is_legacy_acknowledgement(), state.device_os);

        Self {
            world: WorldState {
                player: state,
                entities: EntityRegistry::new(),
            },
            acknowledgements,
            dispatcher: Dispatcher::from_config(&config),
            config,
            closed: false,
        }
    }

    /// The player's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.world.player.name
    }

    /// The player and the entities it sees.
    #[must_use]
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// Mutable access to the player's state, e.g. for game mode changes.
    pub const fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// The player's check pipeline.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The player's acknowledgement correlator.
    #[must_use]
    pub const fn acknowledgements(&self) -> &AcknowledgementCorrelator<WorldState> {
        &self.acknowledgements
    }

    /// Whether the player was disconnected.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Processes a packet from the client.
    #[tracing::instrument(level = "trace", skip_all, fields(player = %self.world.player.name, packet = pk.name()))]
    pub fn handle_client_packet(&mut self, pk: &ServerboundPacket, now: Instant) -> PacketDecision {
        if self.closed {
            return PacketDecision::dropped();
        }

        let mut forward = true;
        match pk {
            ServerboundPacket::PlayerAuthInput(input) => {
                let player = &mut self.world.player;
                player.client_tick = input.tick;
                player.input_mode = input.input_mode;
                player.inputs_received += 1;
                player.movement.apply_input(input);
                self.acknowledgements.mark_ticked();
            }
            ServerboundPacket::NetworkStackLatency(response) => {
                // Echoes of our own probes never reach the server.
                if self
                    .acknowledgements
                    .handle_response(response.timestamp, &mut self.world)
                {
                    forward = false;
                }
            }
            ServerboundPacket::TickSync(_) => {
                // Device data is final by now; re-derive the probe encoding.
                let player = &self.world.player;
                self.acknowledgements
                    .set_client(player.protocol.is_legacy_acknowledgement(), player.device_os);
            }
            _ => {}
        }

        let outcome = self.dispatcher.dispatch(&self.world, now, pk);
        if matches!(pk, ServerboundPacket::PlayerAuthInput(_)) {
            self.world.player.ready = true;
        }

        for flag in &outcome.flags {
            log::info!(
                "{} was flagged for {}: {}",
                self.world.player.name,
                flag.check,
                flag.params
            );
        }

        PacketDecision {
            forward: forward && !outcome.cancelled,
            flags: outcome.flags,
            punishment: outcome.punishment.map(|check| Punishment {
                check,
                message: self.config.punishments.render(&check.to_string()),
            }),
        }
    }

    /// Processes a packet from the server. Returns whether it should reach the client.
    pub fn handle_server_packet(&mut self, pk: &ClientboundPacket) -> bool {
        if self.closed {
            return false;
        }
        let own_id = self.world.player.runtime_id;

        match pk {
            ClientboundPacket::AddActor(add) if add.runtime_id != own_id => {
                self.world.entities.add(TrackedEntity::from_add_actor(add));
            }
            ClientboundPacket::MoveActorAbsolute(pk) if pk.runtime_id != own_id => {
                let (id, position, teleport) = (pk.runtime_id, pk.position.as_dvec3(), pk.teleport);
                let rotation = Rotation::new(f64::from(pk.yaw), f64::from(pk.pitch));
                self.acknowledgements.add_callback(move |world: &mut WorldState| {
                    if let Some(entity) = world.entities.find_mut(id) {
                        entity.move_to(position, rotation, teleport);
                    }
                });
            }
            ClientboundPacket::SetActorMotion(pk) => {
                let (id, velocity) = (pk.runtime_id, pk.velocity.as_dvec3());
                if id == own_id {
                    self.acknowledgements.add_callback(move |world: &mut WorldState| {
                        world.player.movement.pending_knockback = Some(velocity);
                    });
                } else {
                    self.acknowledgements.add_callback(move |world: &mut WorldState| {
                        if let Some(entity) = world.entities.find_mut(id) {
                            entity.velocity = velocity;
                        }
                    });
                }
            }
            ClientboundPacket::RemoveActor(pk) => {
                let id = pk.runtime_id;
                self.acknowledgements.add_callback(move |world: &mut WorldState| {
                    world.entities.remove(id);
                });
            }
            ClientboundPacket::MovePlayer(pk) => {
                let (id, position) = (pk.runtime_id, pk.position.as_dvec3());
                let rotation = Rotation::new(f64::from(pk.yaw), f64::from(pk.pitch));
                let teleport = pk.is_teleport();
                if id == own_id {
                    if teleport {
                        self.world.player.teleport.sent();
                        self.acknowledgements.add_callback(move |world: &mut WorldState| {
                            world.player.teleport.accept(position);
                            world.player.movement.teleport(position, rotation);
                        });
                    }
                } else {
                    self.acknowledgements.add_callback(move |world: &mut WorldState| {
                        if let Some(entity) = world.entities.find_mut(id) {
                            entity.move_to(position, rotation, teleport);
                        }
                    });
                }
            }
            ClientboundPacket::Disconnect(_) => {
                self.close();
                return true;
            }
            _ => {}
        }
        true
    }

    /// Advances the player by one server tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.closed {
            return TickOutcome::default();
        }

        self.world.player.server_tick += 1;
        self.world.player.teleport.tick();
        self.world.entities.tick();
        self.dispatcher.decay(self.config.violations.decay_per_tick);

        let probe = self.acknowledgements.flush();
        let unresponsive = self.acknowledgements.validate() == Liveness::Unresponsive;
        if unresponsive {
            log::warn!(
                "{} has not answered acknowledgements for {} ticks",
                self.world.player.name,
                self.config.acknowledgements.unresponsive_ticks
            );
        }

        TickOutcome {
            probe,
            unresponsive,
        }
    }

    /// Resets the world view when the player moves to another backend server.
    /// Outstanding acknowledgements are dropped without running.
    pub fn transfer(&mut self) {
        self.acknowledgements.invalidate_all();
        self.world.entities.clear();
        self.world.player.ready = false;
        log::debug!("{} transferred, world state reset", self.world.player.name);
    }

    /// Marks the player as disconnected and drops outstanding acknowledgements.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.acknowledgements.invalidate_all();
    }
}

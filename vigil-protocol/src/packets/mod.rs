//! Packet records grouped by direction.

pub mod game;

use serde::{Deserialize, Serialize};

use game::{
    CAddActor, CDisconnect, CMoveActorAbsolute, CMovePlayer, CNetworkStackLatency, CRemoveActor,
    CSetActorMotion, SAnimate, SInventoryTransaction, SMovePlayer, SNetworkStackLatency,
    SPlayerAuthInput, STickSync,
};

/// A decoded packet sent by the client towards the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "packet")]
pub enum ServerboundPacket {
    /// Per-tick movement and input.
    PlayerAuthInput(SPlayerAuthInput),
    /// Item use, including entity attacks.
    InventoryTransaction(SInventoryTransaction),
    /// Arm swings and other self animations.
    Animate(SAnimate),
    /// Echo of an acknowledgement probe.
    NetworkStackLatency(SNetworkStackLatency),
    /// Legacy movement.
    MovePlayer(SMovePlayer),
    /// Tick synchronisation request.
    TickSync(STickSync),
}

impl ServerboundPacket {
    /// Name of the packet type, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlayerAuthInput(_) => "PlayerAuthInput",
            Self::InventoryTransaction(_) => "InventoryTransaction",
            Self::Animate(_) => "Animate",
            Self::NetworkStackLatency(_) => "NetworkStackLatency",
            Self::MovePlayer(_) => "MovePlayer",
            Self::TickSync(_) => "TickSync",
        }
    }
}

/// A decoded packet sent by the server towards the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "packet")]
pub enum ClientboundPacket {
    /// Entity spawn.
    AddActor(CAddActor),
    /// Entity movement.
    MoveActorAbsolute(CMoveActorAbsolute),
    /// Entity velocity.
    SetActorMotion(CSetActorMotion),
    /// Entity removal.
    RemoveActor(CRemoveActor),
    /// Server-driven player movement.
    MovePlayer(CMovePlayer),
    /// Acknowledgement probe.
    NetworkStackLatency(CNetworkStackLatency),
    /// Kick.
    Disconnect(CDisconnect),
}

impl ClientboundPacket {
    /// Name of the packet type, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddActor(_) => "AddActor",
            Self::MoveActorAbsolute(_) => "MoveActorAbsolute",
            Self::SetActorMotion(_) => "SetActorMotion",
            Self::RemoveActor(_) => "RemoveActor",
            Self::MovePlayer(_) => "MovePlayer",
            Self::NetworkStackLatency(_) => "NetworkStackLatency",
            Self::Disconnect(_) => "Disconnect",
        }
    }
}

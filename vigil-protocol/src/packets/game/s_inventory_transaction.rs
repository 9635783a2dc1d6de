//! Serverbound inventory transaction - carries item use, including attacks on entities.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What the player did to the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum UseItemOnEntityAction {
    /// Right-click interaction.
    Interact = 0,
    /// Left-click attack.
    Attack = 1,
}

/// Payload of an item used on an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UseItemOnEntityData {
    /// Runtime ID of the entity the player targeted.
    pub target_runtime_id: u64,
    /// Whether this was an attack or an interaction.
    pub action_type: UseItemOnEntityAction,
    /// The hotbar slot the held item is in.
    #[serde(default)]
    pub hotbar_slot: i32,
    /// Where the client claims it was when it attacked.
    pub position: Vec3,
    /// The point on the target that was clicked.
    #[serde(default)]
    pub click_position: Vec3,
}

/// The kind of transaction and its payload. Only entity use is decoded in detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransactionData {
    /// Plain inventory moves.
    Normal,
    /// Client reported an inventory desync.
    Mismatch,
    /// Item used on a block or in the air.
    UseItem,
    /// Item used on an entity.
    UseItemOnEntity(UseItemOnEntityData),
    /// Item released (bow, trident).
    ReleaseItem,
}

/// Sent when the player performs an inventory action or uses an item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SInventoryTransaction {
    /// The transaction payload.
    pub transaction: TransactionData,
}

impl SInventoryTransaction {
    /// Returns the entity data when this transaction is an attack.
    #[must_use]
    pub fn attack(&self) -> Option<&UseItemOnEntityData> {
        match &self.transaction {
            TransactionData::UseItemOnEntity(data)
                if data.action_type == UseItemOnEntityAction::Attack =>
            {
                Some(data)
            }
            _ => None,
        }
    }
}

//! Game-phase packet records.

mod c_add_actor;
mod c_disconnect;
mod c_move_actor_absolute;
mod c_move_player;
mod c_network_stack_latency;
mod c_remove_actor;
mod c_set_actor_motion;
mod s_animate;
mod s_inventory_transaction;
mod s_move_player;
mod s_network_stack_latency;
mod s_player_auth_input;
mod s_tick_sync;

pub use c_add_actor::{CAddActor, PLAYER_ENTITY_TYPE};
pub use c_disconnect::CDisconnect;
pub use c_move_actor_absolute::CMoveActorAbsolute;
pub use c_move_player::{CMovePlayer, MoveMode};
pub use c_network_stack_latency::CNetworkStackLatency;
pub use c_remove_actor::CRemoveActor;
pub use c_set_actor_motion::CSetActorMotion;
pub use s_animate::{AnimateAction, SAnimate};
pub use s_inventory_transaction::{
    SInventoryTransaction, TransactionData, UseItemOnEntityAction, UseItemOnEntityData,
};
pub use s_move_player::SMovePlayer;
pub use s_network_stack_latency::SNetworkStackLatency;
pub use s_player_auth_input::{InputFlags, InputMode, SPlayerAuthInput};
pub use s_tick_sync::STickSync;

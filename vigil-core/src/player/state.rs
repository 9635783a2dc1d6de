//! Per-player state checks read from.

use vigil_protocol::packets::game::InputMode;
use vigil_protocol::{DeviceOs, GameMode, ProtocolVersion};

use super::movement_state::MovementState;
use super::teleport_state::TeleportState;

/// Everything known about the connected player.
#[derive(Clone, Debug)]
pub struct PlayerState {
    /// Display name for logs.
    pub name: String,
    /// The player's own runtime ID.
    pub runtime_id: u64,
    /// Protocol version the client connected with.
    pub protocol: ProtocolVersion,
    /// Platform the client runs on.
    pub device_os: DeviceOs,
    /// Current game mode.
    pub game_mode: GameMode,
    /// Input device reported by the latest auth input.
    pub input_mode: InputMode,
    /// Tick counter reported by the client.
    pub client_tick: u64,
    /// Ticks the proxy has run for this player.
    pub server_tick: u64,
    /// Number of auth inputs received.
    pub inputs_received: u64,
    /// Whether the player has spawned and sent movement since joining or transferring.
    pub ready: bool,
    /// Whether the client predicts its own movement (auth input based movement).
    pub client_predictions: bool,
    /// Movement tracking.
    pub movement: MovementState,
    /// Teleport tracking.
    pub teleport: TeleportState,
}

impl PlayerState {
    /// Creates the state for a freshly connected player.
    #[must_use]
    pub fn new(name: impl Into<String>, runtime_id: u64, protocol: ProtocolVersion) -> Self {
        Self {
            name: name.into(),
            runtime_id,
            protocol,
            device_os: DeviceOs::Unknown,
            game_mode: GameMode::Survival,
            input_mode: InputMode::Mouse,
            client_tick: 0,
            server_tick: 0,
            inputs_received: 0,
            ready: false,
            client_predictions: true,
            movement: MovementState::new(),
            teleport: TeleportState::new(),
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new("player", 1, ProtocolVersion(vigil_protocol::version::GAME_VERSION_1_20_10))
    }
}

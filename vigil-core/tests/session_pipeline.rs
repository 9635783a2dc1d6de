//! Drives whole sessions through the packet pipeline: server entity stream,
//! acknowledgement round trips, client inputs and attacks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use vigil_core::check::CheckId;
use vigil_core::player::Player;
use vigil_core::player::state::PlayerState;
use vigil_core::{ClientConnection, DetectionHandler, FlagEvent, Session, VigilConfig};
use vigil_protocol::packets::game::{
    AnimateAction, CAddActor, CMoveActorAbsolute, InputFlags, InputMode, MoveMode, PLAYER_ENTITY_TYPE,
    SAnimate, SInventoryTransaction, SMovePlayer, SNetworkStackLatency, SPlayerAuthInput,
    TransactionData, UseItemOnEntityAction, UseItemOnEntityData,
};
use vigil_protocol::{ClientboundPacket, ProtocolVersion, ServerboundPacket};
use vigil_utils::random::ScriptedTimestamps;

const TARGET: u64 = 2;

#[derive(Default)]
struct RecordingConnection {
    packets: Mutex<Vec<ClientboundPacket>>,
    disconnects: Mutex<Vec<String>>,
}

impl ClientConnection for RecordingConnection {
    fn write_packet(&self, pk: ClientboundPacket) {
        self.packets.lock().push(pk);
    }

    fn disconnect(&self, message: &str) {
        self.disconnects.lock().push(message.to_owned());
    }
}

#[derive(Default)]
struct RecordingHandler {
    flags: Mutex<Vec<String>>,
    punishments: Mutex<Vec<CheckId>>,
    veto: bool,
}

impl DetectionHandler for RecordingHandler {
    fn handle_flag(&self, _player: &str, flag: &FlagEvent) {
        self.flags
            .lock()
            .push(format!("{} {}", flag.check, flag.params));
    }

    fn handle_punishment(&self, _player: &str, check: CheckId, message: &mut String) -> bool {
        self.punishments.lock().push(check);
        message.push_str(" [logged]");
        !self.veto
    }
}

/// A client that answers every probe and sends one input per server tick.
struct Client {
    session: Session,
    connection: Arc<RecordingConnection>,
    handler: Arc<RecordingHandler>,
    clock: Instant,
    tick: u64,
}

impl Client {
    fn new(handler: RecordingHandler) -> Self {
        let config = Arc::new(VigilConfig::default());
        let player = Player::with_timestamps(
            PlayerState::new("Alex", 1, ProtocolVersion(700)),
            config.clone(),
            Box::new(ScriptedTimestamps::counting_from(100)),
        );
        let connection = Arc::new(RecordingConnection::default());
        let handler = Arc::new(handler);
        let session = Session::from_player(player, config, handler.clone(), connection.clone());
        Self {
            session,
            connection,
            handler,
            clock: Instant::now(),
            tick: 0,
        }
    }

    fn send(&self, pk: ServerboundPacket) -> bool {
        self.session.handle_client_packet(&pk, self.clock)
    }

    /// Sends one input, runs the server tick and echoes whatever probe it produced.
    fn step(&mut self) -> bool {
        self.tick += 1;
        self.clock += Duration::from_millis(50);
        let forwarded = self.send(ServerboundPacket::PlayerAuthInput(SPlayerAuthInput {
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            position: Vec3::ZERO,
            move_vector: Vec2::ZERO,
            input_data: InputFlags::empty(),
            input_mode: InputMode::Mouse,
            tick: self.tick,
            delta: Vec3::ZERO,
        }));
        self.session.tick();

        let probes: Vec<_> = self.connection.packets.lock().drain(..).collect();
        for probe in probes {
            if let ClientboundPacket::NetworkStackLatency(probe) = probe {
                let echoed = self.send(ServerboundPacket::NetworkStackLatency(
                    SNetworkStackLatency {
                        timestamp: probe.timestamp * 1_000_000,
                        needs_response: true,
                    },
                ));
                assert!(!echoed, "probe echoes stay on the proxy");
            }
        }
        forwarded
    }

    fn spawn_target(&self, distance: f32) {
        self.session
            .handle_server_packet(&ClientboundPacket::AddActor(CAddActor {
                runtime_id: TARGET,
                entity_type: PLAYER_ENTITY_TYPE.to_owned(),
                position: Vec3::new(0.0, 0.0, distance),
                velocity: Vec3::ZERO,
                pitch: 0.0,
                yaw: 0.0,
                width: 0.6,
                height: 1.8,
            }));
    }

    fn swing_and_attack(&self) -> bool {
        self.send(ServerboundPacket::Animate(SAnimate {
            action: AnimateAction::SwingArm,
            runtime_id: 1,
        }));
        self.send(ServerboundPacket::InventoryTransaction(SInventoryTransaction {
            transaction: TransactionData::UseItemOnEntity(UseItemOnEntityData {
                target_runtime_id: TARGET,
                action_type: UseItemOnEntityAction::Attack,
                hotbar_slot: 0,
                position: Vec3::new(0.0, 1.62, 0.0),
                click_position: Vec3::ZERO,
            }),
        }))
    }
}

#[test]
fn close_attacks_are_clean() {
    let mut client = Client::new(RecordingHandler::default());
    client.spawn_target(2.0);
    for _ in 0..30 {
        assert!(client.step());
    }

    for _ in 0..5 {
        assert!(client.swing_and_attack());
        assert!(client.step());
    }
    assert!(client.handler.flags.lock().is_empty());
    assert!(client.connection.disconnects.lock().is_empty());
}

#[test]
fn out_of_range_attack_flags_and_cancels_the_next_one() {
    let mut client = Client::new(RecordingHandler::default());
    client.spawn_target(10.0);
    for _ in 0..30 {
        client.step();
    }

    assert!(client.swing_and_attack());
    client.step();
    {
        let flags = client.handler.flags.lock();
        assert_eq!(flags.len(), 1);
        assert!(flags[0].starts_with("ReachA [dist=9.6"), "{}", flags[0]);
    }

    assert!(!client.swing_and_attack());
    client.step();
    assert_eq!(client.handler.flags.lock().len(), 1);
}

#[test]
fn target_positions_follow_acknowledgements() {
    let mut client = Client::new(RecordingHandler::default());
    client.spawn_target(2.0);
    for _ in 0..30 {
        client.step();
    }

    // The server moves the target out of reach; the client sees it after the next probe.
    client
        .session
        .handle_server_packet(&ClientboundPacket::MoveActorAbsolute(CMoveActorAbsolute {
            runtime_id: TARGET,
            position: Vec3::new(0.0, 0.0, 12.0),
            pitch: 0.0,
            yaw: 0.0,
            teleport: true,
            on_ground: true,
        }));
    let position = |client: &Client| {
        client
            .session
            .player()
            .world()
            .entities
            .find(TARGET)
            .map(|target| target.position.z)
    };
    assert_eq!(position(&client), Some(2.0));
    client.step();
    assert_eq!(position(&client), Some(12.0));
}

#[test]
fn legacy_movement_spam_punishes_once() {
    let mut client = Client::new(RecordingHandler::default());
    client.step();
    let move_player = || {
        ServerboundPacket::MovePlayer(SMovePlayer {
            runtime_id: 1,
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            mode: MoveMode::Normal,
            on_ground: true,
            tick: 1,
        })
    };
    assert!(!client.send(move_player()));

    assert_eq!(*client.handler.punishments.lock(), [CheckId::new("BadPacket", "B")]);
    let disconnects = client.connection.disconnects.lock().clone();
    assert_eq!(disconnects.len(), 1);
    assert!(disconnects[0].contains("BadPacketB"));
    assert!(disconnects[0].ends_with("[logged]"));
    assert!(client.session.is_closed());
    assert!(!client.send(move_player()));
}

#[test]
fn vetoed_punishment_keeps_the_player_connected() {
    let mut client = Client::new(RecordingHandler {
        veto: true,
        ..RecordingHandler::default()
    });
    client.step();
    client.send(ServerboundPacket::MovePlayer(SMovePlayer {
        runtime_id: 1,
        position: Vec3::ZERO,
        pitch: 0.0,
        yaw: 0.0,
        head_yaw: 0.0,
        mode: MoveMode::Normal,
        on_ground: true,
        tick: 1,
    }));
    assert_eq!(client.handler.punishments.lock().len(), 1);
    assert!(client.connection.disconnects.lock().is_empty());
    assert!(!client.session.is_closed());
}

#[test]
fn silent_client_is_disconnected_as_unresponsive() {
    let config = Arc::new(VigilConfig::default());
    let connection = Arc::new(RecordingConnection::default());
    let session = Session::new(
        PlayerState::default(),
        config,
        Arc::new(RecordingHandler::default()),
        connection.clone(),
    );
    session.handle_server_packet(&ClientboundPacket::AddActor(CAddActor {
        runtime_id: TARGET,
        entity_type: "minecraft:cow".to_owned(),
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        pitch: 0.0,
        yaw: 0.0,
        width: 0.9,
        height: 1.4,
    }));
    session.handle_server_packet(&ClientboundPacket::MoveActorAbsolute(CMoveActorAbsolute {
        runtime_id: TARGET,
        position: Vec3::ONE,
        pitch: 0.0,
        yaw: 0.0,
        teleport: false,
        on_ground: true,
    }));

    let now = Instant::now();
    for tick in 1..=200 {
        session.handle_client_packet(
            &ServerboundPacket::PlayerAuthInput(SPlayerAuthInput {
                pitch: 0.0,
                yaw: 0.0,
                head_yaw: 0.0,
                position: Vec3::ZERO,
                move_vector: Vec2::ZERO,
                input_data: InputFlags::empty(),
                input_mode: InputMode::Mouse,
                tick,
                delta: Vec3::ZERO,
            }),
            now + Duration::from_millis(50 * tick),
        );
        session.tick();
    }

    let probes = connection
        .packets
        .lock()
        .iter()
        .filter(|pk| matches!(pk, ClientboundPacket::NetworkStackLatency(_)))
        .count();
    assert_eq!(probes, 1);
    assert_eq!(connection.disconnects.lock().len(), 1);
    assert!(session.is_closed());
}

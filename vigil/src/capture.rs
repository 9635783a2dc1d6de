//! Replays recorded packet captures through a single session.
//!
//! A capture is a JSON lines file. Every line is one record:
//!
//! ```text
//! {"kind":"server","packet":{"packet":"AddActor", ...}}
//! {"kind":"client","at_ms":50,"packet":{"packet":"PlayerAuthInput", ...}}
//! {"kind":"tick"}
//! ```
//!
//! `client` records are timestamped relative to the start of the capture; without
//! `at_ms` the replay assumes 50ms per elapsed tick.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use vigil_core::player::state::PlayerState;
use vigil_core::{ClientConnection, DetectionHandler, FlagEvent, Session, VigilConfig};
use vigil_protocol::packets::game::{CNetworkStackLatency, SNetworkStackLatency};
use vigil_protocol::{ClientboundPacket, ServerboundPacket};
use vigil_utils::locks::SyncMutex;

const TICK_MILLIS: u64 = 50;

/// Errors from reading a capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The file couldn't be read.
    #[error("failed to read capture: {0}")]
    Io(#[from] io::Error),
    /// A line is not a valid record.
    #[error("invalid record on line {line}: {source}")]
    Record {
        /// One-based line number.
        line: usize,
        /// The decode error.
        source: serde_json::Error,
    },
}

/// One line of a capture.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureRecord {
    /// A packet sent by the client.
    Client {
        /// Milliseconds since the start of the capture.
        #[serde(default)]
        at_ms: Option<u64>,
        /// The packet.
        packet: ServerboundPacket,
    },
    /// A packet sent by the server.
    Server {
        /// The packet.
        packet: ClientboundPacket,
    },
    /// A server tick.
    Tick,
}

/// Collects probes and the disconnect instead of writing to a socket.
#[derive(Default)]
struct ReplayConnection {
    probes: SyncMutex<Vec<CNetworkStackLatency>>,
    disconnect: SyncMutex<Option<String>>,
}

impl ClientConnection for ReplayConnection {
    fn write_packet(&self, pk: ClientboundPacket) {
        match pk {
            ClientboundPacket::NetworkStackLatency(probe) => self.probes.lock().push(probe),
            other => log::debug!("-> {}", other.name()),
        }
    }

    fn disconnect(&self, message: &str) {
        log::info!("Disconnected: {message}");
        *self.disconnect.lock() = Some(message.to_owned());
    }
}

#[derive(Default)]
struct FlagCollector {
    flags: SyncMutex<Vec<FlagEvent>>,
}

impl DetectionHandler for FlagCollector {
    fn handle_flag(&self, _player: &str, flag: &FlagEvent) {
        self.flags.lock().push(flag.clone());
    }
}

/// Totals of a finished replay.
#[derive(Debug)]
pub struct ReplaySummary {
    /// Records applied.
    pub records: usize,
    /// Client packets replayed.
    pub client_packets: usize,
    /// Client packets that would have reached the server.
    pub forwarded: usize,
    /// Ticks replayed.
    pub ticks: u64,
    /// Every flag raised, in order.
    pub flags: Vec<FlagEvent>,
    /// Disconnect message, if the player was kicked.
    pub disconnect: Option<String>,
}

/// Feeds capture records into one session.
pub struct Replay {
    session: Session,
    connection: Arc<ReplayConnection>,
    handler: Arc<FlagCollector>,
    auto_acknowledge: bool,
    legacy: bool,
    start: Instant,
    records: usize,
    client_packets: usize,
    forwarded: usize,
    ticks: u64,
}

impl Replay {
    /// Creates a replay for `state`.
    ///
    /// With `auto_acknowledge` every probe is answered right after the tick
    /// that sent it, as a well-behaved client would.
    #[must_use]
    pub fn new(state: PlayerState, config: Arc<VigilConfig>, auto_acknowledge: bool) -> Self {
        let legacy = state.protocol.is_legacy_acknowledgement();
        let connection = Arc::new(ReplayConnection::default());
        let handler = Arc::new(FlagCollector::default());
        let session = Session::new(state, config, handler.clone(), connection.clone());
        Self {
            session,
            connection,
            handler,
            auto_acknowledge,
            legacy,
            start: Instant::now(),
            records: 0,
            client_packets: 0,
            forwarded: 0,
            ticks: 0,
        }
    }

    /// Applies one record.
    pub fn apply(&mut self, record: CaptureRecord) {
        self.records += 1;
        match record {
            CaptureRecord::Client { at_ms, packet } => {
                let elapsed = at_ms.unwrap_or(self.ticks * TICK_MILLIS);
                let now = self.start + Duration::from_millis(elapsed);
                self.client_packets += 1;
                if self.session.handle_client_packet(&packet, now) {
                    self.forwarded += 1;
                }
            }
            CaptureRecord::Server { packet } => {
                self.session.handle_server_packet(&packet);
            }
            CaptureRecord::Tick => {
                self.session.tick();
                self.ticks += 1;
                self.acknowledge();
            }
        }
    }

    fn acknowledge(&self) {
        let probes = std::mem::take(&mut *self.connection.probes.lock());
        if !self.auto_acknowledge {
            return;
        }
        let now = self.start + Duration::from_millis(self.ticks * TICK_MILLIS);
        for probe in probes {
            let echo = ServerboundPacket::NetworkStackLatency(SNetworkStackLatency {
                timestamp: echo_timestamp(probe.timestamp, self.legacy),
                needs_response: false,
            });
            self.session.handle_client_packet(&echo, now);
        }
    }

    /// Finishes the replay.
    #[must_use]
    pub fn finish(self) -> ReplaySummary {
        self.session.close();
        ReplaySummary {
            records: self.records,
            client_packets: self.client_packets,
            forwarded: self.forwarded,
            ticks: self.ticks,
            flags: std::mem::take(&mut *self.handler.flags.lock()),
            disconnect: self.connection.disconnect.lock().take(),
        }
    }
}

/// How a client echoes a probe timestamp back.
const fn echo_timestamp(sent: i64, legacy: bool) -> i64 {
    if legacy { sent } else { sent * 1_000_000 }
}

/// Reads the capture at `path` into `replay`, line by line. Blank lines are skipped.
pub async fn replay_file(path: &Path, replay: &mut Replay) -> Result<(), CaptureError> {
    let mut lines = BufReader::new(File::open(path).await?).lines();
    let mut line_number = 0;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| CaptureError::Record {
            line: line_number,
            source,
        })?;
        replay.apply(record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use vigil_protocol::ProtocolVersion;

    use super::*;

    fn parse(lines: &str) -> Vec<CaptureRecord> {
        lines
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid record"))
            .collect()
    }

    #[test]
    fn legacy_movement_in_capture_gets_the_player_kicked() {
        let records = parse(concat!(
            r#"{"kind":"client","packet":{"packet":"PlayerAuthInput","pitch":0,"yaw":0,"head_yaw":0,"position":[0,0,0],"tick":1}}"#,
            "\n",
            r#"{"kind":"tick"}"#,
            "\n",
            r#"{"kind":"client","packet":{"packet":"MovePlayer","runtime_id":1,"position":[0,0,0],"pitch":0,"yaw":0,"head_yaw":0,"mode":"Normal","on_ground":true}}"#,
        ));
        let mut replay = Replay::new(
            PlayerState::new("capture", 1, ProtocolVersion(700)),
            Arc::new(VigilConfig::default()),
            true,
        );
        for record in records {
            replay.apply(record);
        }

        let summary = replay.finish();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.client_packets, 2);
        assert_eq!(summary.forwarded, 1);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.flags.len(), 1);
        assert_eq!(summary.flags[0].check.to_string(), "BadPacketB");
        assert!(summary.disconnect.is_some());
    }

    #[test]
    fn server_moves_are_acknowledged_automatically() {
        let records = parse(concat!(
            r#"{"kind":"server","packet":{"packet":"AddActor","runtime_id":9,"entity_type":"minecraft:pig","position":[0,0,0],"width":0.9,"height":0.9}}"#,
            "\n",
            r#"{"kind":"server","packet":{"packet":"MoveActorAbsolute","runtime_id":9,"position":[4,0,0]}}"#,
            "\n",
            r#"{"kind":"tick"}"#,
        ));
        let mut replay = Replay::new(PlayerState::default(), Arc::new(VigilConfig::default()), true);
        for record in records {
            replay.apply(record);
        }
        let x = replay
            .session
            .player()
            .world()
            .entities
            .find(9)
            .map(|pig| pig.position.x);
        assert_eq!(x, Some(4.0));
    }

    #[test]
    fn record_errors_carry_the_line() {
        let error = serde_json::from_str::<CaptureRecord>(r#"{"kind":"teleport"}"#)
            .map_err(|source| CaptureError::Record { line: 3, source })
            .expect_err("unknown kind");
        assert!(error.to_string().starts_with("invalid record on line 3"));
    }
}

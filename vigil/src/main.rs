//! The vigil binary.
//!
//! Without arguments it loads the configuration and runs the session tick loop
//! until interrupted. With `--replay` it feeds a recorded capture through one
//! session instead and reports what the checks made of it.

mod capture;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use vigil_core::VigilConfig;
use vigil_core::player::state::PlayerState;
use vigil_core::server::Server;
use vigil_protocol::ProtocolVersion;
use vigil_protocol::version::GAME_VERSION_1_20_10;

use capture::{Replay, replay_file};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Packet-level anticheat for proxied game sessions")]
struct Args {
    /// Configuration file, created with defaults if missing.
    #[arg(short, long, default_value = "config/vigil.json5")]
    config: PathBuf,

    /// Replay a JSON lines capture instead of running the tick loop.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Player name used for the replayed session.
    #[arg(long, default_value = "replay")]
    player: String,

    /// Runtime ID of the replayed player.
    #[arg(long, default_value_t = 1)]
    runtime_id: u64,

    /// Protocol version of the replayed client.
    #[arg(long, default_value_t = GAME_VERSION_1_20_10)]
    protocol: i32,

    /// Don't answer acknowledgement probes during a replay.
    #[arg(long)]
    no_auto_ack: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;
    let args = Args::parse();

    let config = Arc::new(VigilConfig::load_or_create(&args.config).await?);

    if let Some(path) = &args.replay {
        let state = PlayerState::new(
            args.player.clone(),
            args.runtime_id,
            ProtocolVersion(args.protocol),
        );
        let mut replay = Replay::new(state, config, !args.no_auto_ack);
        replay_file(path, &mut replay).await?;

        let summary = replay.finish();
        for flag in &summary.flags {
            log::info!("{}", serde_json::to_string(flag)?);
        }
        log::info!(
            "Replayed {} records over {} ticks: {} flags, {}/{} client packets forwarded",
            summary.records,
            summary.ticks,
            summary.flags.len(),
            summary.forwarded,
            summary.client_packets
        );
        if let Some(message) = summary.disconnect {
            log::info!("Session ended with disconnect: {message}");
        }
        return Ok(());
    }

    let cancel_token = CancellationToken::new();
    let server = Arc::new(Server::new(config, cancel_token.clone()));
    log::info!(
        "Vigil running at {} ticks per second",
        server.config().tick_rate
    );

    let tick_loop = tokio::spawn(server.clone().run());
    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    cancel_token.cancel();
    tick_loop.await?;

    Ok(())
}

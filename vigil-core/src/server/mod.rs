//! This module contains the `Server` struct, which drives the fixed-rate tick of every session.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tokio::{task::spawn_blocking, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::config::VigilConfig;
use crate::session::SessionRegistry;

/// Ticks slower than this are logged.
const SLOW_TICK: Duration = Duration::from_millis(30);

/// The tick driver.
pub struct Server {
    /// The cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
    /// Every active session.
    pub sessions: SessionRegistry,
    config: Arc<VigilConfig>,
}

impl Server {
    /// Creates a server with no sessions.
    #[must_use]
    pub fn new(config: Arc<VigilConfig>, cancel_token: CancellationToken) -> Self {
        Self {
            cancel_token,
            sessions: SessionRegistry::new(),
            config,
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Arc<VigilConfig> {
        &self.config
    }

    /// Runs the tick loop until the cancellation token fires.
    pub async fn run(self: Arc<Self>) {
        let nanoseconds_per_tick = 1_000_000_000 / u64::from(self.config.tick_rate.max(1));
        let mut next_tick_time = Instant::now();
        let mut tick_count: u64 = 0;

        loop {
            if self.cancel_token.is_cancelled() {
                break;
            }

            let now = Instant::now();
            if now < next_tick_time {
                tokio::select! {
                    () = self.cancel_token.cancelled() => break,
                    () = sleep(next_tick_time - now) => {}
                }
            }
            next_tick_time += Duration::from_nanos(nanoseconds_per_tick);

            if self.cancel_token.is_cancelled() {
                break;
            }

            tick_count += 1;
            self.tick_sessions(tick_count).await;
        }

        log::info!("Tick loop stopped after {tick_count} ticks");
    }

    #[tracing::instrument(level = "trace", skip(self), name = "tick_sessions")]
    async fn tick_sessions(&self, tick_count: u64) {
        let sessions = self.sessions.snapshot();
        if sessions.is_empty() {
            return;
        }
        let session_count = sessions.len();

        let start = Instant::now();
        let task = spawn_blocking(move || {
            sessions.par_iter().for_each(|session| session.tick());
            sessions
                .iter()
                .filter(|session| session.is_closed())
                .map(|session| session.id())
                .collect::<Vec<_>>()
        });

        match task.await {
            Ok(closed) => {
                for id in closed {
                    if self.sessions.remove(id).is_ok() {
                        log::debug!("Removed closed session {id}");
                    }
                }
            }
            Err(e) => log::error!("Session tick task failed: {e}"),
        }

        let elapsed = start.elapsed();
        if elapsed >= SLOW_TICK {
            tracing::warn!(?elapsed, tick_count, sessions = session_count, "Sessions tick slow");
        }
    }
}

#[cfg(test)]
mod tests {
    use vigil_protocol::ClientboundPacket;

    use super::*;
    use crate::handler::{ClientConnection, NopHandler};
    use crate::player::state::PlayerState;
    use crate::session::Session;

    struct Discard;

    impl ClientConnection for Discard {
        fn write_packet(&self, _pk: ClientboundPacket) {}
        fn disconnect(&self, _message: &str) {}
    }

    fn session(config: &Arc<VigilConfig>) -> Arc<Session> {
        Arc::new(Session::new(
            PlayerState::default(),
            config.clone(),
            Arc::new(NopHandler),
            Arc::new(Discard),
        ))
    }

    #[tokio::test]
    async fn ticks_sessions_until_cancelled() {
        let config = Arc::new(VigilConfig {
            tick_rate: 100,
            ..VigilConfig::default()
        });
        let server = Arc::new(Server::new(config.clone(), CancellationToken::new()));
        let live = session(&config);
        let closed = session(&config);
        closed.close();
        server.sessions.insert(live.clone()).expect("new session");
        server.sessions.insert(closed.clone()).expect("new session");

        let tick_loop = tokio::spawn(server.clone().run());
        sleep(Duration::from_millis(200)).await;
        server.cancel_token.cancel();
        tick_loop.await.expect("tick loop");

        assert!(live.player().world().player.server_tick > 0);
        assert!(server.sessions.get(live.id()).is_some());
        assert!(server.sessions.get(closed.id()).is_none());
    }
}

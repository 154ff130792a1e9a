//! TCP match server.
//!
//! The server accepts a fixed number of participants, runs the lobby, then
//! hands the connections to a [`NetTransport`] and runs the coordinator on a
//! blocking thread. Each connection gets a reader task and a writer task that
//! bridge the socket to bounded channels.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::lobby::{negotiate, Connection};
use super::protocol::{decode, encode, ClientMessage, ServerMessage};
use crate::config::{INBOUND_CHANNEL_CAPACITY, OUTBOUND_CHANNEL_CAPACITY};
use crate::core::config::check_player_count;
use crate::core::{PlayerId, PlayerMap, MAX_LOBBY_PLAYERS};
use crate::error::{GameError, TransportError};
use crate::session::{ActionView, Game, MatchReport, Received, SessionEvent, Transport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    pub port: u16,
    pub players: usize,
    /// `None` waits forever for each action.
    pub action_timeout: Option<Duration>,
}

/// Bind on all interfaces and serve one match.
pub async fn serve(settings: ServerSettings) -> Result<MatchReport, GameError> {
    check_player_count(settings.players, MAX_LOBBY_PLAYERS)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(addr).await.map_err(TransportError::from)?;
    tracing::info!(%addr, players = settings.players, "listening");
    serve_on(listener, settings).await
}

/// Serve one match on an already bound listener.
pub async fn serve_on(
    listener: TcpListener,
    settings: ServerSettings,
) -> Result<MatchReport, GameError> {
    check_player_count(settings.players, MAX_LOBBY_PLAYERS)?;

    let mut conns = Vec::with_capacity(settings.players);
    for id in PlayerId::all(settings.players) {
        let (stream, addr) = listener.accept().await.map_err(TransportError::from)?;
        tracing::info!(%addr, player = %id, "participant connected");
        let (reader, writer) = stream.into_split();
        conns.push(Connection::new(id, BufReader::new(reader), writer));
    }

    let config = negotiate(&mut conns).await?;
    tracing::info!(roster = ?config.seats(), "lobby complete");

    let (transport, tasks) = NetTransport::spawn(conns, settings.action_timeout);
    let outcome = tokio::task::spawn_blocking(move || Game::new(&config, transport).run())
        .await
        .map_err(|e| GameError::Invariant(format!("coordinator task failed: {e}")));
    tasks.finish().await;

    match outcome? {
        Ok(report) => Ok(report),
        Err(err) => {
            tracing::error!(error = %err, "match aborted");
            Err(err)
        }
    }
}

/// Socket tasks behind a [`NetTransport`].
pub struct ConnectionTasks {
    readers: Vec<JoinHandle<()>>,
    writers: Vec<JoinHandle<()>>,
}

impl ConnectionTasks {
    /// Let writers flush what is queued, then stop the readers.
    ///
    /// Call once the transport has been dropped.
    pub async fn finish(self) {
        for writer in self.writers {
            let _ = writer.await;
        }
        for reader in self.readers {
            reader.abort();
        }
    }
}

/// Channel-backed transport used by the coordinator thread.
///
/// Must not be driven from inside the runtime: every call blocks on it.
pub struct NetTransport {
    inbound: PlayerMap<mpsc::Receiver<ClientMessage>>,
    outbound: PlayerMap<mpsc::Sender<ServerMessage>>,
    timeout: Option<Duration>,
    runtime: Handle,
}

impl NetTransport {
    /// Start reader and writer tasks for every connection.
    ///
    /// Must be called from within the runtime.
    pub fn spawn<R, W>(
        conns: Vec<Connection<R, W>>,
        timeout: Option<Duration>,
    ) -> (Self, ConnectionTasks)
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut inbound = Vec::with_capacity(conns.len());
        let mut outbound = Vec::with_capacity(conns.len());
        let mut tasks = ConnectionTasks {
            readers: Vec::with_capacity(conns.len()),
            writers: Vec::with_capacity(conns.len()),
        };

        for conn in conns {
            let (id, mut lines, mut writer) = conn.into_parts();
            let (in_tx, in_rx) = mpsc::channel::<ClientMessage>(INBOUND_CHANNEL_CAPACITY);
            let (out_tx, mut out_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CHANNEL_CAPACITY);

            tasks.readers.push(tokio::spawn(async move {
                loop {
                    let line = match lines.next_line().await {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(err) => {
                            tracing::warn!(player = %id, error = %err, "read failed");
                            break;
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match decode::<ClientMessage>(&line) {
                        Ok(msg) => {
                            if in_tx.send(msg).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            tracing::warn!(player = %id, error = %err, "bad client message");
                        }
                    }
                }
                tracing::info!(player = %id, "participant disconnected");
            }));

            tasks.writers.push(tokio::spawn(async move {
                while let Some(msg) = out_rx.recv().await {
                    let line = match encode(&msg) {
                        Ok(line) => line,
                        Err(err) => {
                            tracing::error!(player = %id, error = %err, "encode failed");
                            continue;
                        }
                    };
                    if let Err(err) = writer.write_all(line.as_bytes()).await {
                        tracing::warn!(player = %id, error = %err, "write failed");
                        break;
                    }
                }
                let _ = writer.shutdown().await;
            }));

            inbound.push(in_rx);
            outbound.push(out_tx);
        }

        let transport = Self {
            inbound: PlayerMap::from_vec(inbound),
            outbound: PlayerMap::from_vec(outbound),
            timeout,
            runtime: Handle::current(),
        };
        (transport, tasks)
    }

    fn deliver(&self, participant: PlayerId, msg: ServerMessage) -> Result<(), TransportError> {
        self.outbound
            .get(participant)
            .ok_or(TransportError::Closed(participant))?
            .blocking_send(msg)
            .map_err(|_| TransportError::Closed(participant))
    }
}

impl Transport for NetTransport {
    fn receive_action(
        &mut self,
        participant: PlayerId,
        view: &ActionView<'_>,
    ) -> Result<Received, TransportError> {
        // Lines sent out of turn are not answers to this prompt.
        if let Some(rx) = self.inbound.get_mut(participant) {
            while let Ok(stale) = rx.try_recv() {
                tracing::debug!(player = %participant, ?stale, "discarded message sent out of turn");
            }
        }

        self.deliver(participant, ServerMessage::InputAction { menu: view.menu() })?;

        let rx = self
            .inbound
            .get_mut(participant)
            .ok_or(TransportError::Closed(participant))?;
        loop {
            let next = match self.timeout {
                Some(wait) => match self.runtime.block_on(tokio::time::timeout(wait, rx.recv())) {
                    Ok(next) => next,
                    Err(_) => return Ok(Received::TimedOut),
                },
                None => self.runtime.block_on(rx.recv()),
            };
            match next {
                Some(ClientMessage::Action { line }) => return Ok(Received::Action(line)),
                Some(other) => {
                    tracing::warn!(player = %participant, ?other, "expected an action");
                }
                None => return Err(TransportError::Closed(participant)),
            }
        }
    }

    fn send(&mut self, participant: PlayerId, event: &SessionEvent) -> Result<(), TransportError> {
        self.deliver(participant, ServerMessage::from(event))
    }

    fn broadcast(&mut self, event: &SessionEvent) -> Result<(), TransportError> {
        let msg = ServerMessage::from(event);
        for id in self.outbound.player_ids() {
            self.deliver(id, msg.clone())?;
        }
        Ok(())
    }
}

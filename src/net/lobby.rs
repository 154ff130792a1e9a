//! Connection framing and the pre-match lobby.
//!
//! The lobby runs on the async side before the coordinator starts. It asks
//! every participant for a creature, then for a team number, and repeats
//! the team round until the numbers form a playable roster.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use super::protocol::{decode, encode, ClientMessage, ServerMessage};
use crate::core::config::check_team_numbers;
use crate::core::{CreatureType, MatchConfig, PlayerId, Seat, TeamId};
use crate::error::{GameError, TransportError};

/// One participant's line-framed connection.
pub struct Connection<R, W> {
    id: PlayerId,
    lines: Lines<R>,
    writer: W,
}

impl<R, W> Connection<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(id: PlayerId, reader: R, writer: W) -> Self {
        Self {
            id,
            lines: reader.lines(),
            writer,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub async fn send(&mut self, msg: &ServerMessage) -> Result<(), TransportError> {
        let line = encode(msg)?;
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next message from the participant. End of stream is [`TransportError::Closed`].
    pub async fn recv(&mut self) -> Result<ClientMessage, TransportError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await?
                .ok_or(TransportError::Closed(self.id))?;
            if line.trim().is_empty() {
                continue;
            }
            return Ok(decode(&line)?);
        }
    }

    pub fn into_parts(self) -> (PlayerId, Lines<R>, W) {
        (self.id, self.lines, self.writer)
    }
}

/// Negotiate creatures and teams with every connection.
pub async fn negotiate<R, W>(conns: &mut [Connection<R, W>]) -> Result<MatchConfig, GameError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let players = conns.len();
    for conn in conns.iter_mut() {
        let welcome = ServerMessage::Welcome {
            player: conn.id(),
            players,
        };
        conn.send(&welcome).await?;
    }

    let mut creatures = Vec::with_capacity(players);
    for conn in conns.iter_mut() {
        creatures.push(ask_creature(conn).await?);
    }

    let teams = loop {
        let mut teams = Vec::with_capacity(players);
        for conn in conns.iter_mut() {
            teams.push(ask_team(conn, players as u32).await?);
        }
        match check_team_numbers(&teams) {
            Ok(count) => {
                tracing::info!(teams = count, "teams formed");
                break teams;
            }
            Err(err) => {
                tracing::warn!(?teams, error = %err, "team numbers rejected");
                let reason = err.to_string();
                for conn in conns.iter_mut() {
                    conn.send(&ServerMessage::LobbyRejected {
                        reason: reason.clone(),
                    })
                    .await?;
                }
            }
        }
    };

    let seats = creatures
        .iter()
        .zip(&teams)
        .map(|(&creature, &team)| Seat::new(creature, team))
        .collect();
    let config = MatchConfig::new(seats)?;

    for (conn, seat) in conns.iter_mut().zip(config.seats()) {
        let ready = ServerMessage::Ready {
            team: TeamId::new(seat.team as u8),
            creature: seat.creature,
        };
        conn.send(&ready).await?;
    }
    Ok(config)
}

async fn ask_creature<R, W>(conn: &mut Connection<R, W>) -> Result<CreatureType, TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        conn.send(&ServerMessage::ChooseCreature {
            options: CreatureType::ALL.to_vec(),
        })
        .await?;
        let reason = match conn.recv().await? {
            ClientMessage::Creature { name } => match name.parse::<CreatureType>() {
                Ok(creature) => {
                    tracing::info!(player = %conn.id(), %creature, "creature chosen");
                    return Ok(creature);
                }
                Err(err) => err.to_string(),
            },
            other => format!("expected a creature, got {other:?}"),
        };
        conn.send(&ServerMessage::LobbyRejected { reason }).await?;
    }
}

async fn ask_team<R, W>(conn: &mut Connection<R, W>, teams: u32) -> Result<u32, TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        conn.send(&ServerMessage::ChooseTeam { teams }).await?;
        let reason = match conn.recv().await? {
            ClientMessage::Team { number } if (1..=teams).contains(&number) => return Ok(number),
            ClientMessage::Team { number } => format!("team must be between 1 and {teams}, got {number}"),
            other => format!("expected a team number, got {other:?}"),
        };
        conn.send(&ServerMessage::LobbyRejected { reason }).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, BufReader, DuplexStream, ReadHalf, WriteHalf};

    type ServerSide = Connection<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>>;

    struct Remote {
        lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
        writer: WriteHalf<DuplexStream>,
    }

    impl Remote {
        async fn expect(&mut self) -> ServerMessage {
            let line = self.lines.next_line().await.unwrap().unwrap();
            decode(&line).unwrap()
        }

        async fn reply(&mut self, msg: ClientMessage) {
            self.writer
                .write_all(encode(&msg).unwrap().as_bytes())
                .await
                .unwrap();
        }
    }

    fn pair(id: u8) -> (ServerSide, Remote) {
        let (server, client) = duplex(4096);
        let (sr, sw) = tokio::io::split(server);
        let (cr, cw) = tokio::io::split(client);
        (
            Connection::new(PlayerId::new(id), BufReader::new(sr), sw),
            Remote {
                lines: BufReader::new(cr).lines(),
                writer: cw,
            },
        )
    }

    fn creature(name: &str) -> ClientMessage {
        ClientMessage::Creature {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_lobby_reasks_until_roster_is_valid() {
        let (s1, mut c1) = pair(0);
        let (s2, mut c2) = pair(1);
        let mut conns = vec![s1, s2];
        let lobby = tokio::spawn(async move { negotiate(&mut conns).await });

        assert_eq!(
            c1.expect().await,
            ServerMessage::Welcome {
                player: PlayerId::new(0),
                players: 2
            }
        );
        assert!(matches!(c2.expect().await, ServerMessage::Welcome { .. }));

        assert!(matches!(c1.expect().await, ServerMessage::ChooseCreature { .. }));
        c1.reply(creature("goblin")).await;
        assert!(matches!(c1.expect().await, ServerMessage::LobbyRejected { .. }));
        assert!(matches!(c1.expect().await, ServerMessage::ChooseCreature { .. }));
        c1.reply(creature("human")).await;

        assert!(matches!(c2.expect().await, ServerMessage::ChooseCreature { .. }));
        c2.reply(creature("doggo")).await;

        // Both on team 1: rejected, everyone asked again.
        assert_eq!(c1.expect().await, ServerMessage::ChooseTeam { teams: 2 });
        c1.reply(ClientMessage::Team { number: 1 }).await;
        assert_eq!(c2.expect().await, ServerMessage::ChooseTeam { teams: 2 });
        c2.reply(ClientMessage::Team { number: 3 }).await;
        assert!(matches!(c2.expect().await, ServerMessage::LobbyRejected { .. }));
        assert_eq!(c2.expect().await, ServerMessage::ChooseTeam { teams: 2 });
        c2.reply(ClientMessage::Team { number: 1 }).await;
        assert!(matches!(c1.expect().await, ServerMessage::LobbyRejected { .. }));
        assert!(matches!(c2.expect().await, ServerMessage::LobbyRejected { .. }));

        assert_eq!(c1.expect().await, ServerMessage::ChooseTeam { teams: 2 });
        c1.reply(ClientMessage::Team { number: 2 }).await;
        assert_eq!(c2.expect().await, ServerMessage::ChooseTeam { teams: 2 });
        c2.reply(ClientMessage::Team { number: 1 }).await;

        assert_eq!(
            c1.expect().await,
            ServerMessage::Ready {
                team: TeamId::new(2),
                creature: CreatureType::Human
            }
        );
        assert_eq!(
            c2.expect().await,
            ServerMessage::Ready {
                team: TeamId::new(1),
                creature: CreatureType::Dog
            }
        );

        let config = lobby.await.unwrap().unwrap();
        assert_eq!(config.team_count(), 2);
        assert_eq!(config.seats()[1], Seat::new(CreatureType::Dog, 1));
    }

    #[tokio::test]
    async fn test_disconnect_in_lobby_is_closed() {
        let (s1, c1) = pair(0);
        drop(c1);
        let mut conns = vec![s1];
        let err = negotiate(&mut conns).await.unwrap_err();
        assert!(matches!(err, GameError::Transport(_)));
    }
}

//! Terminal client.
//!
//! Renders every server message as text and answers prompts with lines read
//! from the user. Generic over its streams so it can be driven from tests.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines,
};
use tokio::net::TcpStream;

use super::protocol::{decode, encode, ClientMessage, ServerMessage};
use crate::core::{PlayerId, TeamId};
use crate::error::TransportError;
use crate::session::SessionEvent;

/// How the match ended for this client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientOutcome {
    pub player: Option<PlayerId>,
    pub team: Option<TeamId>,
    /// `None` after a stalemate.
    pub winner: Option<TeamId>,
}

impl ClientOutcome {
    #[must_use]
    pub fn won(&self) -> bool {
        self.winner.is_some() && self.winner == self.team
    }
}

/// Connect to `host:port` and play from stdin/stdout.
pub async fn join(host: &str, port: u16) -> Result<ClientOutcome, TransportError> {
    let stream = TcpStream::connect((host, port)).await?;
    tracing::info!(%host, port, "connected");
    let (reader, writer) = stream.into_split();
    run_client(
        BufReader::new(reader),
        writer,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

struct Client<W, I, O> {
    server: W,
    input: Lines<I>,
    output: O,
    outcome: ClientOutcome,
}

impl<W, I, O> Client<W, I, O>
where
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    async fn say(&mut self, text: impl AsRef<str>) -> Result<(), TransportError> {
        self.output.write_all(text.as_ref().as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> Result<String, TransportError> {
        self.say(prompt).await?;
        loop {
            let line = self
                .input
                .next_line()
                .await?
                .ok_or_else(|| TransportError::Protocol("input closed".to_string()))?;
            let line = line.trim();
            if !line.is_empty() {
                return Ok(line.to_string());
            }
        }
    }

    async fn reply(&mut self, msg: &ClientMessage) -> Result<(), TransportError> {
        let line = encode(msg)?;
        self.server.write_all(line.as_bytes()).await?;
        self.server.flush().await?;
        Ok(())
    }

    /// Handle one message. Returns `true` once the match is over.
    async fn handle(&mut self, msg: ServerMessage) -> Result<bool, TransportError> {
        match msg {
            ServerMessage::Welcome { player, players } => {
                self.outcome.player = Some(player);
                self.say(format!("Your player number is: {} of {players}", player.order()))
                    .await?;
                self.say("Waiting for other players").await?;
            }
            ServerMessage::ChooseCreature { options } => {
                let names: Vec<String> = options.iter().map(ToString::to_string).collect();
                let prompt = format!("Pick a player type: {}", names.join(", "));
                let name = self.ask(&prompt).await?;
                self.reply(&ClientMessage::Creature { name }).await?;
            }
            ServerMessage::ChooseTeam { teams } => {
                let prompt = format!("Input your team number from 1-{teams}");
                let number = loop {
                    match self.ask(&prompt).await?.parse::<u32>() {
                        Ok(number) => break number,
                        Err(_) => self.say("Not a number").await?,
                    }
                };
                self.reply(&ClientMessage::Team { number }).await?;
            }
            ServerMessage::LobbyRejected { reason } => self.say(reason).await?,
            ServerMessage::Ready { team, creature } => {
                self.outcome.team = Some(team);
                self.say(format!("Ready: {creature} on {team}")).await?;
            }
            ServerMessage::InputAction { menu } => {
                self.say(menu).await?;
                let line = self.ask("Enter your valid action").await?;
                self.reply(&ClientMessage::Action { line }).await?;
            }
            ServerMessage::GameOver { winner } => {
                self.outcome.winner = winner;
                let text = match winner {
                    Some(team) if self.outcome.team == Some(team) => {
                        format!("Congratulations: Team {} wins!", team.number())
                    }
                    Some(team) => format!("You Lose; Team {} wins!", team.number()),
                    None => SessionEvent::GameOver { winner: None }.to_string(),
                };
                self.say(text).await?;
                return Ok(true);
            }
            ServerMessage::Status(report) => self.say(report.to_string()).await?,
            ServerMessage::TurnStarted {
                player,
                team,
                actions,
            } => {
                let event = SessionEvent::TurnStarted {
                    player,
                    team,
                    actions,
                };
                self.say(event.to_string()).await?;
            }
            ServerMessage::PlayersSkipped { players } => {
                self.say(SessionEvent::PlayersSkipped { players }.to_string())
                    .await?;
            }
            ServerMessage::TeamsSkipped { teams } => {
                self.say(SessionEvent::TeamsSkipped { teams }.to_string())
                    .await?;
            }
            ServerMessage::Rejected { reason } => {
                self.say(SessionEvent::Rejected { reason }.to_string())
                    .await?;
            }
            ServerMessage::Forfeited { player, reason } => {
                self.say(SessionEvent::Forfeited { player, reason }.to_string())
                    .await?;
            }
            ServerMessage::Standby { player } => {
                self.say(SessionEvent::Standby { player }.to_string())
                    .await?;
            }
            ServerMessage::Acknowledged => self.say("Turn over").await?,
        }
        Ok(false)
    }
}

/// Play one match over the given streams.
pub async fn run_client<R, W, I, O>(
    server_reader: R,
    server_writer: W,
    input: I,
    output: O,
) -> Result<ClientOutcome, TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut from_server = server_reader.lines();
    let mut client = Client {
        server: server_writer,
        input: input.lines(),
        output,
        outcome: ClientOutcome {
            player: None,
            team: None,
            winner: None,
        },
    };

    while let Some(line) = from_server.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let msg: ServerMessage = decode(&line)?;
        tracing::debug!(?msg, "server message");
        if client.handle(msg).await? {
            return Ok(client.outcome);
        }
    }
    Err(TransportError::Protocol(
        "server closed the connection".to_string(),
    ))
}

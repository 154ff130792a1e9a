//! Wire protocol: one JSON object per line.
//!
//! Messages are tagged `{"type": ..., "data": ...}`. Action lines travel as
//! plain strings so the coordinator can reject them with a reason.

use serde::{Deserialize, Serialize};

use crate::core::{CreatureType, PlayerId, TeamId};
use crate::session::{ForfeitReason, SessionEvent, StatusReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    Welcome { player: PlayerId, players: usize },
    ChooseCreature { options: Vec<CreatureType> },
    ChooseTeam { teams: u32 },
    LobbyRejected { reason: String },
    Ready { team: TeamId, creature: CreatureType },
    Status(StatusReport),
    TurnStarted { player: PlayerId, team: TeamId, actions: u32 },
    PlayersSkipped { players: Vec<PlayerId> },
    TeamsSkipped { teams: Vec<TeamId> },
    InputAction { menu: String },
    Rejected { reason: String },
    Forfeited { player: PlayerId, reason: ForfeitReason },
    Standby { player: PlayerId },
    Acknowledged,
    GameOver { winner: Option<TeamId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Creature { name: String },
    Team { number: u32 },
    Action { line: String },
}

impl From<&SessionEvent> for ServerMessage {
    fn from(event: &SessionEvent) -> Self {
        match event.clone() {
            SessionEvent::Status(report) => ServerMessage::Status(report),
            SessionEvent::TurnStarted {
                player,
                team,
                actions,
            } => ServerMessage::TurnStarted {
                player,
                team,
                actions,
            },
            SessionEvent::PlayersSkipped { players } => ServerMessage::PlayersSkipped { players },
            SessionEvent::TeamsSkipped { teams } => ServerMessage::TeamsSkipped { teams },
            SessionEvent::Rejected { reason } => ServerMessage::Rejected { reason },
            SessionEvent::Forfeited { player, reason } => {
                ServerMessage::Forfeited { player, reason }
            }
            SessionEvent::Standby { player } => ServerMessage::Standby { player },
            SessionEvent::Acknowledged => ServerMessage::Acknowledged,
            SessionEvent::GameOver { winner } => ServerMessage::GameOver { winner },
        }
    }
}

/// Encode a message as one line, newline included.
pub fn encode<T: Serialize>(msg: &T) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}

pub fn decode<'a, T: Deserialize<'a>>(line: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(line.trim_end())
}

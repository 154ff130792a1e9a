//! The boundary between the coordinator and its participants.
//!
//! The coordinator never touches sockets. It asks a [`Transport`] for one
//! action line at a time and hands it [`SessionEvent`]s to relay. A TCP
//! server, a set of bots and a test script all sit behind the same trait.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Player, PlayerId, PlayerMap, Team, TeamId};
use crate::error::TransportError;
use crate::rules;

/// Reply to an action request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Received {
    /// A raw action line, not yet parsed.
    Action(String),
    /// The participant did not answer within the allowed wait.
    TimedOut,
}

/// Why a participant lost the rest of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForfeitReason {
    TimedOut,
    NoLegalAction,
}

impl std::fmt::Display for ForfeitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForfeitReason::TimedOut => f.write_str("timed out"),
            ForfeitReason::NoLegalAction => f.write_str("no legal action"),
        }
    }
}

/// Rendered match status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// One line per team, e.g. `Team 1: >>P1h (11:11) | P3z (1:)`.
    pub teams: Vec<String>,
    /// Player whose turn it is, once one has been scheduled.
    pub current: Option<PlayerId>,
    pub current_team: Option<TeamId>,
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.teams {
            writeln!(f, "{line}")?;
        }
        if let (Some(player), Some(team)) = (self.current, self.current_team) {
            write!(f, "Player {} of Team {}'s turn", player.order(), team.number())?;
        }
        Ok(())
    }
}

/// Everything the coordinator tells participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Status(StatusReport),
    TurnStarted {
        player: PlayerId,
        team: TeamId,
        actions: u32,
    },
    PlayersSkipped {
        players: Vec<PlayerId>,
    },
    TeamsSkipped {
        teams: Vec<TeamId>,
    },
    Rejected {
        reason: String,
    },
    Forfeited {
        player: PlayerId,
        reason: ForfeitReason,
    },
    /// Another participant finished its turn.
    Standby {
        player: PlayerId,
    },
    /// Your turn is over.
    Acknowledged,
    /// `winner` is `None` after a stalemate.
    GameOver {
        winner: Option<TeamId>,
    },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |orders: Vec<u32>| {
            orders
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        };
        match self {
            SessionEvent::Status(report) => write!(f, "{report}"),
            SessionEvent::TurnStarted {
                player, actions, ..
            } => write!(f, "{player}'s turn ({actions} action(s))"),
            SessionEvent::PlayersSkipped { players } => write!(
                f,
                "Player {} has skipped",
                join(players.iter().map(|p| p.order()).collect())
            ),
            SessionEvent::TeamsSkipped { teams } => write!(
                f,
                "Team {} has skipped",
                join(teams.iter().map(|t| t.number()).collect())
            ),
            SessionEvent::Rejected { reason } => write!(f, "Invalid action: {reason}"),
            SessionEvent::Forfeited { player, reason } => {
                write!(f, "{player} forfeits the rest of the turn ({reason})")
            }
            SessionEvent::Standby { player } => write!(f, "{player} has finished"),
            SessionEvent::Acknowledged => f.write_str("Turn over"),
            SessionEvent::GameOver { winner: Some(team) } => write!(f, "{team} wins!"),
            SessionEvent::GameOver { winner: None } => f.write_str("Stalemate: nobody can move"),
        }
    }
}

/// Read-only view of the match offered with each action request.
#[derive(Clone, Copy, Debug)]
pub struct ActionView<'a> {
    pub actor: PlayerId,
    pub players: &'a PlayerMap<Player>,
    pub teams: &'a [Team],
}

impl ActionView<'_> {
    /// Menu text for a human participant.
    #[must_use]
    pub fn menu(&self) -> String {
        rules::action_menu(self.players, self.teams, self.actor)
    }

    /// Every action that would be accepted right now.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        rules::legal_actions(self.players, self.actor)
    }
}

/// Participant I/O as seen by the coordinator.
///
/// Calls block until they complete. An implementation that supports a
/// bounded wait reports expiry as [`Received::TimedOut`].
pub trait Transport {
    /// Ask `participant` for its next action line.
    fn receive_action(
        &mut self,
        participant: PlayerId,
        view: &ActionView<'_>,
    ) -> Result<Received, TransportError>;

    /// Deliver an event to one participant.
    fn send(&mut self, participant: PlayerId, event: &SessionEvent) -> Result<(), TransportError>;

    /// Deliver an event to every participant.
    fn broadcast(&mut self, event: &SessionEvent) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_report_display() {
        let report = StatusReport {
            teams: vec![
                "Team 1: >>P1h (11:11)".to_string(),
                "Team 2: >>P2d (:1111)".to_string(),
            ],
            current: Some(PlayerId::new(0)),
            current_team: Some(TeamId::new(1)),
        };
        assert_eq!(
            report.to_string(),
            "Team 1: >>P1h (11:11)\nTeam 2: >>P2d (:1111)\nPlayer 1 of Team 1's turn"
        );
    }

    #[test]
    fn test_skip_messages() {
        let event = SessionEvent::PlayersSkipped {
            players: vec![PlayerId::new(0), PlayerId::new(2)],
        };
        assert_eq!(event.to_string(), "Player 1 3 has skipped");

        let event = SessionEvent::TeamsSkipped {
            teams: vec![TeamId::new(2)],
        };
        assert_eq!(event.to_string(), "Team 2 has skipped");
    }

    #[test]
    fn test_event_serde() {
        let event = SessionEvent::Forfeited {
            player: PlayerId::new(1),
            reason: ForfeitReason::TimedOut,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"forfeited\""));
        assert!(json.contains("\"reason\":\"timed_out\""));
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

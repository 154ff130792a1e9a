//! Error types.
//!
//! [`ActionError`] is recoverable: the coordinator sends it back to the
//! participant and asks again. Everything else ends a match or stops setup.

use thiserror::Error;

use crate::core::{LimbCode, ParseLimbCodeError, PlayerId};

/// A submitted action that is malformed or not legal right now.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("empty action")]
    Empty,

    #[error("unknown command `{0}` (expected tap or disthands)")]
    UnknownCommand(String),

    #[error("malformed action: {0}")]
    Malformed(String),

    #[error(transparent)]
    BadLimbCode(#[from] ParseLimbCodeError),

    #[error("there is no player {0}")]
    NoSuchPlayer(u32),

    #[error("{0} is on your team")]
    SameTeam(PlayerId),

    #[error("{0} is already dead")]
    TargetDead(PlayerId),

    #[error("{player} has no limb {code}")]
    NoSuchLimb { player: PlayerId, code: LimbCode },

    #[error("limb {code} of {player} is dead")]
    DeadLimb { player: PlayerId, code: LimbCode },

    #[error("limb {0} holds 0 and cannot tap")]
    ZeroTap(LimbCode),

    #[error("need at least two living hands to distribute")]
    NothingToDistribute,

    #[error("value {value} does not fit a hand of capacity {capacity}")]
    ValueTooLarge { value: u32, capacity: u32 },

    #[error("expected {expected} values, one per living hand, got {got}")]
    WrongValueCount { expected: usize, got: usize },

    #[error("values must add up to {expected}, got {got}")]
    SumMismatch { expected: u32, got: u32 },

    #[error("distribution leaves every hand unchanged")]
    Unchanged,
}

/// Invalid match settings or roster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a match needs between {min} and {max} players, got {got}")]
    PlayerCount { min: usize, max: usize, got: usize },

    #[error("a match needs at least two teams")]
    TooFewTeams,

    #[error("team {0} has no players (teams must be numbered 1..=n without gaps)")]
    EmptyTeam(u32),

    #[error("team number {0} is out of range")]
    TeamOutOfRange(u32),

    #[error("port {0} is outside 1024-65535")]
    InvalidPort(u32),

    #[error("bad roster entry `{0}` (expected creature:team)")]
    RosterEntry(String),
}

/// A participant channel failed.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0} disconnected")]
    Closed(PlayerId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected message: {0}")]
    Protocol(String),
}

/// Anything that ends a match early.
#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_messages() {
        let err = ActionError::NoSuchLimb {
            player: PlayerId::new(1),
            code: LimbCode::hand(2),
        };
        assert_eq!(err.to_string(), "Player 2 has no limb HC");

        let err: ActionError = "Q".parse::<LimbCode>().unwrap_err().into();
        assert!(matches!(err, ActionError::BadLimbCode(_)));
    }

    #[test]
    fn test_game_error_from() {
        let err: GameError = ConfigError::TooFewTeams.into();
        assert!(matches!(err, GameError::Config(ConfigError::TooFewTeams)));

        let err: GameError = TransportError::Closed(PlayerId::new(0)).into();
        assert_eq!(err.to_string(), "Player 1 disconnected");
    }
}

//! Core game types: limbs, creatures, players, teams, actions, RNG, configuration.
//!
//! Nothing here talks to participants. These types hold the match state and
//! the rules for how it changes when a limb is hit or hands are redistributed.

pub mod action;
pub mod config;
pub mod creature;
pub mod limb;
pub mod player;
pub mod rng;
pub mod team;

pub use action::{Action, ActionRecord, HandValues};
pub use config::{MatchConfig, Seat, MAX_LOBBY_PLAYERS, MIN_PLAYERS};
pub use creature::{Behavior, CreatureStats, CreatureType, LimbSet, ParseCreatureError};
pub use limb::{Limb, LimbCode, LimbKind, ParseLimbCodeError};
pub use player::{HitOutcome, Player, PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::GameRng;
pub use team::{SkipLog, SkipObserver, Team, TeamId};

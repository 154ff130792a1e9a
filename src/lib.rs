//! # limb-arena
//!
//! A turn-based combat game for teams of creatures that fight limb against
//! limb. Humans, aliens, zombies and dogs tap each other's hands and feet,
//! redistribute the values on their own hands, and try to be the last team
//! with anyone standing.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: The [`Game`] coordinator owns all match state and
//!    mutates it one validated action at a time.
//!
//! 2. **Reject Before Mutation**: Every action is parsed and validated
//!    against the current state before anything changes. A rejected line is
//!    answered with its reason and asked for again.
//!
//! 3. **Transport Agnostic**: The coordinator talks to participants only
//!    through the [`Transport`] trait. TCP clients, random bots and test
//!    scripts are interchangeable.
//!
//! ## Modules
//!
//! - `core`: Limbs, creatures, players, teams, actions, RNG, match configuration
//! - `events`: Per-player event bus and creature reactions
//! - `rules`: Validation, legal actions, applying actions, team elimination
//! - `session`: The coordinator and the transport boundary
//! - `bots`: Random bot participants
//! - `net`: JSON-lines TCP protocol, lobby, server and client
//! - `config`: Environment-driven server settings
//! - `error`: Error taxonomy

pub mod core;
pub mod events;
pub mod rules;
pub mod session;
pub mod bots;
pub mod net;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, CreatureType, Limb, LimbCode, LimbKind, MatchConfig, Player,
    PlayerId, PlayerMap, Seat, Team, TeamId, GameRng,
};

pub use crate::events::{EventBus, PlayerEvent, Reaction};

pub use crate::rules::GameResult;

pub use crate::session::{
    ActionView, ForfeitReason, Game, LocalTransport, MatchReport, Received, ScriptedTransport, SessionEvent,
    StatusReport, Transport,
};

pub use crate::bots::RandomBots;

pub use crate::error::{ActionError, ConfigError, GameError, TransportError};

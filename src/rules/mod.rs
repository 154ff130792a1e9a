//! Match rules.
//!
//! - [`validate`]: is this action legal for this player right now?
//! - [`legal_actions`]: every action that would pass validation
//! - [`apply_action`]: mutate the match for an action that passed
//! - [`check_teams`]: recompute team deaths and report a winner
//! - [`is_stalemate`]: nobody alive can act any more
//!
//! The coordinator calls into these functions but owns no rules itself.

pub mod engine;
pub mod legal;
pub mod validate;

pub use engine::{apply_action, check_teams, winner, GameResult};
pub use legal::{action_menu, is_stalemate, legal_actions};
pub use validate::validate;

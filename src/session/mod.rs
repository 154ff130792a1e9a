//! Running a match: the coordinator and the transport boundary it drives.

pub mod game;
pub mod local;
pub mod script;
pub mod transport;

pub use game::{Game, MatchReport};
pub use local::LocalTransport;
pub use script::{Recipient, ScriptedTransport};
pub use transport::{
    ActionView, ForfeitReason, Received, SessionEvent, StatusReport, Transport,
};

//! TCP play: wire protocol, lobby, match server and terminal client.

pub mod client;
pub mod lobby;
pub mod protocol;
pub mod server;

pub use client::{join, run_client, ClientOutcome};
pub use lobby::{negotiate, Connection};
pub use protocol::{ClientMessage, ServerMessage};
pub use server::{serve, serve_on, ConnectionTasks, NetTransport, ServerSettings};

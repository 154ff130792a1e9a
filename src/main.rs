//! limb-arena command line.
//!
//! `serve` hosts one networked match, `join` plays in one from the terminal,
//! `local` runs a hot-seat match in this terminal and `simulate` pits random
//! bots against each other.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use limb_arena::bots::RandomBots;
use limb_arena::config;
use limb_arena::core::{MatchConfig, TeamId};
use limb_arena::error::GameError;
use limb_arena::net::{self, ServerSettings};
use limb_arena::session::{Game, LocalTransport};

#[derive(Parser, Debug)]
#[command(name = "limb-arena")]
#[command(about = "Turn-based team combat where creatures fight limb against limb")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Host a match and wait for every player to connect
    Serve {
        /// Port to listen on, 1024-65535 (default: ARENA_PORT or 7878)
        #[arg(long)]
        port: Option<u32>,

        /// Number of players, 2-6 (default: ARENA_PLAYERS or 2)
        #[arg(long)]
        players: Option<usize>,

        /// Forfeit a turn after this many milliseconds without an action; 0 waits forever
        #[arg(long)]
        action_timeout_ms: Option<u64>,
    },

    /// Join a hosted match
    Join {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port (default: ARENA_PORT or 7878)
        #[arg(long)]
        port: Option<u32>,
    },

    /// Play a whole match from this terminal, one player after another
    Local {
        /// Roster as creature:team pairs, e.g. human:1,alien:2,doggo:2
        #[arg(long)]
        roster: String,
    },

    /// Play random bots against each other
    Simulate {
        /// Roster as creature:team pairs, e.g. human:1,alien:2,dog:2
        #[arg(long)]
        roster: String,

        /// Random seed for deterministic runs
        #[arg(long)]
        seed: Option<u64>,

        /// Stop without a winner after this many applied actions
        #[arg(long, default_value_t = 10_000)]
        max_actions: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct SimulationSummary {
    outcome: &'static str,
    winner: Option<TeamId>,
    turns: u32,
    actions: usize,
    seed: u64,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

async fn serve(
    port: Option<u32>,
    players: Option<usize>,
    action_timeout_ms: Option<u64>,
) -> Result<(), GameError> {
    let port = match port {
        Some(port) => config::check_port(port)?,
        None => config::port(),
    };
    let settings = ServerSettings {
        port,
        players: players.unwrap_or_else(config::players),
        action_timeout: config::action_timeout(
            action_timeout_ms.unwrap_or_else(config::action_timeout_ms),
        ),
    };

    let report = net::serve(settings).await?;
    match report.winner {
        Some(team) => tracing::info!(%team, turns = report.turns, "match won"),
        None => tracing::info!(turns = report.turns, "match ended without a winner"),
    }
    Ok(())
}

async fn join(host: &str, port: Option<u32>) -> Result<(), GameError> {
    let port = match port {
        Some(port) => config::check_port(port)?,
        None => config::port(),
    };
    let outcome = net::join(host, port).await?;
    tracing::debug!(?outcome, "match finished");
    Ok(())
}

fn local(roster: &str) -> Result<(), GameError> {
    let config: MatchConfig = roster.parse()?;
    let stdin = std::io::stdin();
    let transport = LocalTransport::new(stdin.lock(), std::io::stdout());
    let report = Game::new(&config, transport).run()?;
    tracing::debug!(turns = report.turns, actions = report.history.len(), "local match over");
    Ok(())
}

fn simulate(roster: &str, seed: Option<u64>, max_actions: usize, json: bool) -> Result<(), GameError> {
    let config: MatchConfig = roster.parse()?;
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, players = config.player_count(), "simulating");

    let mut game = Game::new(&config, RandomBots::new(config.player_count(), seed))
        .with_action_limit(max_actions);
    let report = game.run()?;

    let summary = SimulationSummary {
        outcome: match (report.result, report.winner) {
            (_, Some(_)) => "winner",
            (Some(_), None) => "stalemate",
            (None, None) => "action_limit",
        },
        winner: report.winner,
        turns: report.turns,
        actions: report.history.len(),
        seed,
    };

    if json {
        let line = serde_json::to_string(&summary)
            .map_err(|e| GameError::Invariant(format!("summary not serializable: {e}")))?;
        println!("{line}");
    } else {
        println!("{}", game.status());
        match summary.winner {
            Some(team) => println!("{team} wins!"),
            None => println!("No winner ({})", summary.outcome),
        }
        println!(
            "{} turns, {} actions, seed {}",
            summary.turns, summary.actions, summary.seed
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let outcome = match args.command {
        Command::Serve {
            port,
            players,
            action_timeout_ms,
        } => serve(port, players, action_timeout_ms).await,
        Command::Join { host, port } => join(&host, port).await,
        Command::Local { roster } => local(&roster),
        Command::Simulate {
            roster,
            seed,
            max_actions,
            json,
        } => simulate(&roster, seed, max_actions, json),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "exiting");
            ExitCode::FAILURE
        }
    }
}

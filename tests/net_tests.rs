//! End-to-end matches over TCP on localhost.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use limb_arena::core::{PlayerId, TeamId};
use limb_arena::error::{GameError, TransportError};
use limb_arena::net::protocol::{decode, encode};
use limb_arena::net::{run_client, serve_on, ClientMessage, ServerMessage, ServerSettings};
use limb_arena::ForfeitReason;

#[derive(Clone, Copy, PartialEq, Eq)]
enum WhenOutOfMoves {
    HangUp,
    StaySilent,
}

/// A raw protocol participant that answers from a fixed script.
fn participant(
    addr: SocketAddr,
    creature: &'static str,
    team: u32,
    actions: Vec<&'static str>,
    out_of_moves: WhenOutOfMoves,
) -> JoinHandle<Vec<ServerMessage>> {
    tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();
        let mut actions = actions.into_iter();
        let mut seen = Vec::new();

        while let Ok(Some(line)) = lines.next_line().await {
            let msg: ServerMessage = decode(&line).unwrap();
            seen.push(msg.clone());
            let reply = match msg {
                ServerMessage::ChooseCreature { .. } => Some(ClientMessage::Creature {
                    name: creature.to_string(),
                }),
                ServerMessage::ChooseTeam { .. } => Some(ClientMessage::Team { number: team }),
                ServerMessage::InputAction { .. } => match actions.next() {
                    Some(line) => Some(ClientMessage::Action {
                        line: line.to_string(),
                    }),
                    None if out_of_moves == WhenOutOfMoves::HangUp => break,
                    None => None,
                },
                ServerMessage::GameOver { .. } => break,
                _ => None,
            };
            if let Some(reply) = reply {
                let line = encode(&reply).unwrap();
                if writer.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
            }
        }
        seen
    })
}

async fn listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejection_then_disconnect() {
    let (listener, addr) = listener().await;
    let settings = ServerSettings {
        port: addr.port(),
        players: 2,
        action_timeout: None,
    };
    let server = tokio::spawn(serve_on(listener, settings));

    let first = participant(
        addr,
        "human",
        1,
        vec!["tap HA 2 HZ", "tap HA 2 FA"],
        WhenOutOfMoves::StaySilent,
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = participant(addr, "doggo", 2, vec![], WhenOutOfMoves::HangUp);

    let outcome = server.await.unwrap();
    assert!(matches!(
        outcome,
        Err(GameError::Transport(TransportError::Closed(id))) if id == PlayerId::new(1)
    ));

    let seen = first.await.unwrap();
    assert_eq!(
        seen[0],
        ServerMessage::Welcome {
            player: PlayerId::new(0),
            players: 2
        }
    );
    assert!(seen.contains(&ServerMessage::Ready {
        team: TeamId::new(1),
        creature: limb_arena::CreatureType::Human
    }));
    let prompts = seen
        .iter()
        .filter(|m| matches!(m, ServerMessage::InputAction { .. }))
        .count();
    assert_eq!(prompts, 2);
    assert!(seen
        .iter()
        .any(|m| matches!(m, ServerMessage::Rejected { .. })));
    assert!(seen.contains(&ServerMessage::Acknowledged));

    let seen = second.await.unwrap();
    assert!(seen.contains(&ServerMessage::Standby {
        player: PlayerId::new(0)
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_silent_player_times_out_and_loses() {
    let (listener, addr) = listener().await;
    let settings = ServerSettings {
        port: addr.port(),
        players: 2,
        action_timeout: Some(Duration::from_millis(100)),
    };
    let server = tokio::spawn(serve_on(listener, settings));

    // Two taps per alien hand, one per foot.
    let mut input = String::from("human\n1\n");
    for target in ["FA", "FB", "HA", "HA", "HB", "HB", "HC", "HC", "HD", "HD"] {
        input.push_str(&format!("tap HA 2 {target}\n"));
    }
    let first = tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        let mut shown: Vec<u8> = Vec::new();
        let outcome = run_client(BufReader::new(reader), writer, input.as_bytes(), &mut shown)
            .await
            .unwrap();
        (outcome, String::from_utf8(shown).unwrap())
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = participant(addr, "alien", 2, vec![], WhenOutOfMoves::StaySilent);

    let report = server.await.unwrap().unwrap();
    assert_eq!(report.winner, Some(TeamId::new(1)));
    assert_eq!(report.history.len(), 10);

    let (outcome, shown) = first.await.unwrap();
    assert!(outcome.won());
    assert!(shown.contains("Your player number is: 1 of 2"));
    assert!(shown.ends_with("Congratulations: Team 1 wins!\n"));

    let seen = second.await.unwrap();
    assert!(seen.contains(&ServerMessage::Forfeited {
        player: PlayerId::new(1),
        reason: ForfeitReason::TimedOut,
    }));
    assert_eq!(
        seen.last(),
        Some(&ServerMessage::GameOver {
            winner: Some(TeamId::new(1))
        })
    );
}

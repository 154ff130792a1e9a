//! Hot-seat play: every participant shares one terminal.
//!
//! Events are printed as text and the current player is prompted with its
//! action menu, one line per action.

use std::io::{BufRead, Write};

use super::transport::{ActionView, Received, SessionEvent, Transport};
use crate::core::PlayerId;
use crate::error::TransportError;

/// Transport over a single line-oriented input and output.
#[derive(Debug)]
pub struct LocalTransport<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> LocalTransport<I, O> {
    #[must_use]
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) -> Result<(), TransportError> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<I: BufRead, O: Write> Transport for LocalTransport<I, O> {
    fn receive_action(
        &mut self,
        participant: PlayerId,
        view: &ActionView<'_>,
    ) -> Result<Received, TransportError> {
        self.say(&view.menu())?;
        self.say(&format!(
            "Player {}, enter your valid action",
            participant.order()
        ))?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(TransportError::Closed(participant));
            }
            if !line.trim().is_empty() {
                return Ok(Received::Action(line.trim().to_string()));
            }
        }
    }

    fn send(&mut self, _participant: PlayerId, event: &SessionEvent) -> Result<(), TransportError> {
        // Standby and acknowledgements repeat what the shared screen shows.
        match event {
            SessionEvent::Acknowledged | SessionEvent::Standby { .. } => Ok(()),
            _ => self.say(&event.to_string()),
        }
    }

    fn broadcast(&mut self, event: &SessionEvent) -> Result<(), TransportError> {
        match event {
            SessionEvent::Standby { .. } => Ok(()),
            _ => self.say(&event.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LimbCode, MatchConfig, TeamId};
    use crate::error::GameError;
    use crate::session::Game;

    fn hot_seat<'a>(
        roster: &str,
        input: &'a [u8],
        shown: &'a mut Vec<u8>,
    ) -> Game<LocalTransport<&'a [u8], &'a mut Vec<u8>>> {
        let config: MatchConfig = roster.parse().unwrap();
        Game::new(&config, LocalTransport::new(input, shown))
    }

    #[test]
    fn test_hot_seat_match_to_the_end() {
        let mut shown: Vec<u8> = Vec::new();
        let report = {
            let mut g = hot_seat(
                "human:1,alien:2",
                b"\ntap HA 2 HZ\ntap HA 2 FB\n",
                &mut shown,
            );
            let alien = g.player_mut(PlayerId::new(1)).unwrap();
            for slot in 0..4 {
                alien.attacked(LimbCode::hand(slot), 2).unwrap();
            }
            alien.attacked(LimbCode::foot(0), 1).unwrap();
            alien.consume_skip();
            g.run().unwrap()
        };
        assert_eq!(report.winner, Some(TeamId::new(1)));
        assert_eq!(report.history.len(), 1);

        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("Player 1, enter your valid action"));
        assert!(shown.contains("Invalid action"));
        assert!(shown.contains("Team 1: >>P1h (11:11)"));
        assert!(shown.ends_with("Team 1 wins!\n"));
        assert!(!shown.contains("Turn over"));
    }

    #[test]
    fn test_input_running_out_ends_the_match() {
        let mut shown: Vec<u8> = Vec::new();
        let err = hot_seat("human:1,dog:2", b"tap HA 2 FA\n", &mut shown)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::Transport(TransportError::Closed(id)) if id == PlayerId::new(1)
        ));
    }
}

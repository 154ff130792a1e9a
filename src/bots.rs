//! Random bot participants.
//!
//! Each bot picks uniformly among the actions that would be accepted, using
//! its own fork of a seeded [`GameRng`]. The same seed replays the same
//! match, which makes bots handy for soak-testing the coordinator.

use crate::core::{GameRng, PlayerId, PlayerMap};
use crate::error::TransportError;
use crate::session::{ActionView, Received, SessionEvent, Transport};

/// A [`Transport`] where every participant is a random bot.
#[derive(Clone, Debug)]
pub struct RandomBots {
    rngs: PlayerMap<GameRng>,
    events_seen: usize,
}

impl RandomBots {
    /// One bot per player, each with an independent stream from `seed`.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        let mut root = GameRng::new(seed);
        Self {
            rngs: PlayerMap::new(player_count, |_| root.fork()),
            events_seen: 0,
        }
    }

    /// Events relayed to the bots so far.
    #[must_use]
    pub fn events_seen(&self) -> usize {
        self.events_seen
    }
}

impl Transport for RandomBots {
    fn receive_action(
        &mut self,
        participant: PlayerId,
        view: &ActionView<'_>,
    ) -> Result<Received, TransportError> {
        let rng = self
            .rngs
            .get_mut(participant)
            .ok_or(TransportError::Closed(participant))?;
        let actions = view.legal_actions();
        match rng.choose(&actions) {
            Some(action) => {
                tracing::trace!(bot = %participant, %action, "bot chose");
                Ok(Received::Action(action.to_string()))
            }
            None => Ok(Received::TimedOut),
        }
    }

    fn send(&mut self, participant: PlayerId, event: &SessionEvent) -> Result<(), TransportError> {
        tracing::trace!(bot = %participant, %event, "event");
        self.events_seen += 1;
        Ok(())
    }

    fn broadcast(&mut self, event: &SessionEvent) -> Result<(), TransportError> {
        tracing::debug!(%event, "broadcast");
        self.events_seen += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchConfig;
    use crate::session::Game;

    fn play(roster: &str, seed: u64) -> crate::session::MatchReport {
        let config: MatchConfig = roster.parse().unwrap();
        let bots = RandomBots::new(config.player_count(), seed);
        Game::new(&config, bots)
            .with_action_limit(10_000)
            .run()
            .unwrap()
    }

    #[test]
    fn test_bots_finish_a_duel() {
        let report = play("human:1,alien:2", 7);
        assert!(report.winner.is_some());
        assert!(!report.history.is_empty());
    }

    #[test]
    fn test_same_seed_same_match() {
        let a = play("zombie:1,dog:2,human:1,alien:2", 99);
        let b = play("zombie:1,dog:2,human:1,alien:2", 99);
        assert_eq!(a, b);
    }
}

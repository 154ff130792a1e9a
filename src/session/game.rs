//! The session coordinator.
//!
//! [`Game`] owns the match and is its only writer. Each round it picks the
//! next team that has a ready player, asks that player for as many actions
//! as its creature allows, and relays what happened through its
//! [`Transport`]. Play stops the moment a single team is left standing.
//!
//! ## Turn flow
//!
//! 1. Starting at the team cursor, skip dead teams and ask each team for
//!    its next ready player. A team with nobody ready is reported as
//!    skipped and the search moves on to the next team.
//! 2. Relay accumulated player and team skips, then the status board.
//! 3. For each action the creature gets: fetch a line, re-ask until it
//!    validates, apply it, and recompute team deaths.
//! 4. Tell everyone else to stand by and tell the actor its turn is over.
//!
//! A player with no legal action forfeits its turn. When that is true of
//! every living player the match ends in a stalemate.

use im::Vector;

use super::transport::{ActionView, ForfeitReason, Received, SessionEvent, StatusReport, Transport};
use crate::core::{
    Action, ActionRecord, MatchConfig, Player, PlayerId, PlayerMap, SkipLog, Team, TeamId,
};
use crate::error::GameError;
use crate::rules::{self, GameResult};

/// Summary of a finished (or halted) match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    /// `None` after a stalemate or when halted by an action limit.
    pub result: Option<GameResult>,
    pub winner: Option<TeamId>,
    pub turns: u32,
    pub history: Vector<ActionRecord>,
}

enum Fetched {
    Action(Action),
    Forfeit(ForfeitReason),
}

/// Authoritative match state plus the transport it talks through.
pub struct Game<T> {
    players: PlayerMap<Player>,
    teams: Vec<Team>,
    cursor: usize,
    transport: T,
    history: Vector<ActionRecord>,
    turn: u32,
    current: Option<PlayerId>,
    action_limit: Option<usize>,
    result: Option<GameResult>,
}

impl<T: Transport> Game<T> {
    /// Seat every player of `config` and build its teams.
    pub fn new(config: &MatchConfig, transport: T) -> Self {
        let seats = config.seats();
        let mut teams: Vec<Team> = (1..=config.team_count())
            .map(|n| Team::new(TeamId::new(n as u8)))
            .collect();
        let players = PlayerMap::new(seats.len(), |id| {
            let seat = seats[id.index()];
            Player::new(id, TeamId::new(seat.team as u8), seat.creature)
        });
        for (id, player) in players.iter() {
            teams[player.team().index()].add_player(id);
        }

        Self {
            players,
            teams,
            cursor: 0,
            transport,
            history: Vector::new(),
            turn: 0,
            current: None,
            action_limit: None,
            result: None,
        }
    }

    /// Halt the match, without a winner, once this many actions were applied.
    #[must_use]
    pub fn with_action_limit(mut self, limit: usize) -> Self {
        self.action_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// Mutable access to a player, for setting up positions.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[must_use]
    pub fn into_transport(self) -> T {
        self.transport
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Player chosen by the last call to [`Game::next_player`].
    #[must_use]
    pub fn current(&self) -> Option<PlayerId> {
        self.current
    }

    /// Team whose turn comes next.
    #[must_use]
    pub fn team_cursor(&self) -> usize {
        self.cursor
    }

    /// Render the status board.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        StatusReport {
            teams: self
                .teams
                .iter()
                .map(|t| t.status_line(&self.players))
                .collect(),
            current: self.current,
            current_team: self
                .current
                .and_then(|id| self.players.get(id))
                .map(Player::team),
        }
    }

    /// Pick the next player to act and advance the team cursor past its team.
    ///
    /// Skips consumed along the way are relayed before returning.
    pub fn next_player(&mut self) -> Result<PlayerId, GameError> {
        let n = self.teams.len();
        let mut skips = SkipLog::new();

        // One pass consumes every pending skip, so the second always finds
        // someone while two teams are alive.
        for _ in 0..=2 * n {
            let index = self.cursor;
            self.cursor = (index + 1) % n;

            let team = &mut self.teams[index];
            if team.is_dead() {
                continue;
            }
            if let Some(id) = team.next_ready_player(&mut self.players, &mut skips) {
                self.current = Some(id);
                self.relay_skips(skips)?;
                return Ok(id);
            }
        }
        Err(GameError::Invariant(
            "no team has a player able to act".to_string(),
        ))
    }

    fn relay_skips(&mut self, skips: SkipLog) -> Result<(), GameError> {
        if !skips.players.is_empty() {
            tracing::debug!(players = ?skips.players, "players skipped");
            self.transport.broadcast(&SessionEvent::PlayersSkipped {
                players: skips.players.to_vec(),
            })?;
        }
        if !skips.teams.is_empty() {
            tracing::debug!(teams = ?skips.teams, "teams skipped");
            self.transport.broadcast(&SessionEvent::TeamsSkipped {
                teams: skips.teams.to_vec(),
            })?;
        }
        Ok(())
    }

    /// Run one scheduled turn for `actor`.
    ///
    /// Returns the result if the turn ended the match.
    pub fn play_turn(&mut self, actor: PlayerId) -> Result<Option<GameResult>, GameError> {
        let player = self
            .players
            .get(actor)
            .ok_or_else(|| GameError::Invariant(format!("{actor} does not exist")))?;
        let team = player.team();
        let actions = player.turns_per_round();
        self.turn += 1;

        self.transport.broadcast(&SessionEvent::Status(self.status()))?;
        self.transport.broadcast(&SessionEvent::TurnStarted {
            player: actor,
            team,
            actions,
        })?;
        tracing::info!(turn = self.turn, player = %actor, %team, actions, "turn started");

        for sequence in 0..actions {
            let action = match self.fetch_action(actor)? {
                Fetched::Action(action) => action,
                Fetched::Forfeit(reason) => {
                    tracing::warn!(player = %actor, %reason, "turn forfeited");
                    self.transport.broadcast(&SessionEvent::Forfeited {
                        player: actor,
                        reason,
                    })?;
                    if reason == ForfeitReason::NoLegalAction && rules::is_stalemate(&self.players)
                    {
                        self.finish(GameResult::Stalemate)?;
                        return Ok(Some(GameResult::Stalemate));
                    }
                    break;
                }
            };

            rules::apply_action(&mut self.players, actor, &action)?;
            tracing::info!(player = %actor, %action, "action applied");
            self.history
                .push_back(ActionRecord::new(actor, action, self.turn, sequence));

            if let Some(result) = rules::check_teams(&mut self.teams, &self.players) {
                self.finish(result)?;
                return Ok(Some(result));
            }
        }

        for other in self.players.player_ids().filter(|&id| id != actor) {
            self.transport
                .send(other, &SessionEvent::Standby { player: actor })?;
        }
        self.transport.send(actor, &SessionEvent::Acknowledged)?;
        Ok(None)
    }

    /// Ask `actor` until it submits a valid action or forfeits.
    fn fetch_action(&mut self, actor: PlayerId) -> Result<Fetched, GameError> {
        if rules::legal_actions(&self.players, actor).is_empty() {
            return Ok(Fetched::Forfeit(ForfeitReason::NoLegalAction));
        }

        loop {
            let view = ActionView {
                actor,
                players: &self.players,
                teams: &self.teams,
            };
            let line = match self.transport.receive_action(actor, &view)? {
                Received::Action(line) => line,
                Received::TimedOut => return Ok(Fetched::Forfeit(ForfeitReason::TimedOut)),
            };

            let checked = line
                .parse::<Action>()
                .and_then(|action| rules::validate(&self.players, actor, &action).map(|()| action));
            match checked {
                Ok(action) => return Ok(Fetched::Action(action)),
                Err(err) => {
                    tracing::warn!(player = %actor, %line, error = %err, "action rejected");
                    self.transport.send(
                        actor,
                        &SessionEvent::Rejected {
                            reason: err.to_string(),
                        },
                    )?;
                }
            }
        }
    }

    fn finish(&mut self, result: GameResult) -> Result<(), GameError> {
        let winner = result.winner();
        self.result = Some(result);
        self.transport.broadcast(&SessionEvent::Status(self.status()))?;
        self.transport
            .broadcast(&SessionEvent::GameOver { winner })?;
        tracing::info!(
            ?result,
            turns = self.turn,
            actions = self.history.len(),
            "match over"
        );
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.action_limit
            .is_some_and(|limit| self.history.len() >= limit)
    }

    /// Play until one team is left (or the action limit is hit).
    pub fn run(&mut self) -> Result<MatchReport, GameError> {
        tracing::info!(
            players = self.players.player_count(),
            teams = self.teams.len(),
            "match started"
        );

        if self.result.is_none() {
            if let Some(result) = rules::check_teams(&mut self.teams, &self.players) {
                self.finish(result)?;
            }
        }

        while self.result.is_none() {
            if self.limit_reached() {
                tracing::info!(actions = self.history.len(), "action limit reached");
                break;
            }
            let actor = self.next_player()?;
            self.play_turn(actor)?;
        }

        Ok(MatchReport {
            result: self.result,
            winner: self.result.and_then(|r| r.winner()),
            turns: self.turn,
            history: self.history.clone(),
        })
    }
}

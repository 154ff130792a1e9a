//! Teams and in-team turn rotation.
//!
//! A team keeps a fixed roster of players and a cursor naming whose turn
//! comes next. [`Team::next_ready_player`] walks the roster circularly from
//! the cursor, passing over dead players silently and consuming pending
//! skips as it goes. Every consumed skip is reported to a [`SkipObserver`]
//! so the coordinator can relay it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::{Player, PlayerId, PlayerMap};

/// Team number, 1-based as shown to participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u8);

impl TeamId {
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// The number participants type and see.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0 as u32
    }

    /// 0-based position in the coordinator's team list.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// Receives the skips a rotation scan passes over.
pub trait SkipObserver {
    /// A skip-pending player was passed over and its skip consumed.
    fn player_skipped(&mut self, player: PlayerId);

    /// A whole team had nobody ready this round.
    fn team_skipped(&mut self, _team: TeamId) {}
}

/// Observer that just collects what it is told.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipLog {
    pub players: SmallVec<[PlayerId; 4]>,
    pub teams: SmallVec<[TeamId; 2]>,
}

impl SkipLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.teams.is_empty()
    }

    /// Hand back everything collected so far and start over.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl SkipObserver for SkipLog {
    fn player_skipped(&mut self, player: PlayerId) {
        self.players.push(player);
    }

    fn team_skipped(&mut self, team: TeamId) {
        self.teams.push(team);
    }
}

/// A team: fixed roster plus rotation cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    roster: Vec<PlayerId>,
    cursor: usize,
    dead: bool,
}

impl Team {
    #[must_use]
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            roster: Vec::new(),
            cursor: 0,
            dead: false,
        }
    }

    /// Append a player during setup. The roster is fixed once play starts.
    pub fn add_player(&mut self, player: PlayerId) {
        self.roster.push(player);
    }

    #[must_use]
    pub fn id(&self) -> TeamId {
        self.id
    }

    #[must_use]
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Roster position the next scan starts from.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Player under the cursor, ready or not.
    #[must_use]
    pub fn next_in_line(&self) -> Option<PlayerId> {
        self.roster.get(self.cursor).copied()
    }

    /// Last value computed by [`Team::check_dead`].
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Recompute the dead flag: true iff every roster member is dead.
    pub fn check_dead(&mut self, players: &PlayerMap<Player>) -> bool {
        self.dead = self
            .roster
            .iter()
            .all(|&id| players.get(id).map_or(true, Player::is_dead));
        self.dead
    }

    /// Find the next player able to act, starting from the cursor.
    ///
    /// Dead players are passed over without a report. A skip-pending
    /// player has its skip consumed and is reported to `observer`. The
    /// first ready player found moves the cursor one past itself and is
    /// returned. If a full circle finds nobody, the team-skip is reported,
    /// the cursor stays where it was, and `None` comes back.
    pub fn next_ready_player(
        &mut self,
        players: &mut PlayerMap<Player>,
        observer: &mut impl SkipObserver,
    ) -> Option<PlayerId> {
        let n = self.roster.len();
        for step in 0..n {
            let index = (self.cursor + step) % n;
            let id = self.roster[index];
            let Some(player) = players.get_mut(id) else {
                continue;
            };
            if player.is_dead() {
                continue;
            }
            if player.consume_skip() {
                tracing::debug!(player = %id, team = %self.id, "skip consumed");
                observer.player_skipped(id);
                continue;
            }
            self.cursor = (index + 1) % n;
            return Some(id);
        }

        tracing::debug!(team = %self.id, "no ready player");
        observer.team_skipped(self.id);
        None
    }

    /// Status line, e.g. `Team 1: >>P1h (11:11) | P3a (XXXX:XX)`.
    ///
    /// The cursor is marked even when it rests on a dead player.
    #[must_use]
    pub fn status_line(&self, players: &PlayerMap<Player>) -> String {
        let members: Vec<String> = self
            .roster
            .iter()
            .enumerate()
            .filter_map(|(i, &id)| {
                let player = players.get(id)?;
                let marker = if i == self.cursor { ">>" } else { "" };
                Some(format!("{marker}{}", player.status()))
            })
            .collect();
        format!("{}: {}", self.id, members.join(" | "))
    }
}

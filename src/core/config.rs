//! Match configuration.
//!
//! A match is configured by its roster: one [`Seat`] per player, in join
//! order, naming the creature and the team number. Team numbers must form
//! at least two teams, numbered `1..=n` with no empty team in between.
//!
//! ```
//! use limb_arena::core::{CreatureType, MatchConfig};
//!
//! let config: MatchConfig = "human:1, dog:2, zombie:1".parse().unwrap();
//! assert_eq!(config.player_count(), 3);
//! assert_eq!(config.team_count(), 2);
//! assert_eq!(config.seats()[1].creature, CreatureType::Dog);
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::creature::CreatureType;
use super::player::MAX_PLAYERS;
use crate::error::ConfigError;

/// Fewest players a match can start with.
pub const MIN_PLAYERS: usize = 2;

/// Most players the network lobby will seat.
pub const MAX_LOBBY_PLAYERS: usize = 6;

/// One player's place in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub creature: CreatureType,
    /// 1-based team number.
    pub team: u32,
}

impl Seat {
    #[must_use]
    pub const fn new(creature: CreatureType, team: u32) -> Self {
        Self { creature, team }
    }
}

/// A validated roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    seats: Vec<Seat>,
    team_count: usize,
}

impl MatchConfig {
    /// Validate a roster.
    pub fn new(seats: Vec<Seat>) -> Result<Self, ConfigError> {
        check_player_count(seats.len(), MAX_PLAYERS)?;
        let teams: Vec<u32> = seats.iter().map(|s| s.team).collect();
        let team_count = check_team_numbers(&teams)?;
        Ok(Self { seats, team_count })
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.team_count
    }
}

impl FromStr for MatchConfig {
    type Err = ConfigError;

    /// Parse `creature:team` entries separated by commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seats = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let bad = || ConfigError::RosterEntry(entry.to_string());
                let (creature, team) = entry.split_once(':').ok_or_else(bad)?;
                let creature = creature.parse().map_err(|_| bad())?;
                let team = team.trim().parse().map_err(|_| bad())?;
                Ok(Seat::new(creature, team))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Self::new(seats)
    }
}

/// Check a player count against `MIN_PLAYERS..=max`.
pub fn check_player_count(got: usize, max: usize) -> Result<(), ConfigError> {
    if (MIN_PLAYERS..=max).contains(&got) {
        Ok(())
    } else {
        Err(ConfigError::PlayerCount {
            min: MIN_PLAYERS,
            max,
            got,
        })
    }
}

/// Check that team numbers form at least two contiguous, non-empty teams.
///
/// Returns the number of teams.
pub fn check_team_numbers(teams: &[u32]) -> Result<usize, ConfigError> {
    let limit = teams.len() as u32;
    if let Some(&bad) = teams.iter().find(|&&t| t == 0 || t > limit) {
        return Err(ConfigError::TeamOutOfRange(bad));
    }

    let highest = teams.iter().copied().max().unwrap_or(0);
    if highest < 2 {
        return Err(ConfigError::TooFewTeams);
    }
    if let Some(missing) = (1..=highest).find(|n| !teams.contains(n)) {
        return Err(ConfigError::EmptyTeam(missing));
    }
    Ok(highest as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_numbers() {
        assert_eq!(check_team_numbers(&[1, 2]), Ok(2));
        assert_eq!(check_team_numbers(&[2, 1, 2, 3]), Ok(3));
        assert_eq!(check_team_numbers(&[1, 1]), Err(ConfigError::TooFewTeams));
        assert_eq!(check_team_numbers(&[1, 3, 3]), Err(ConfigError::EmptyTeam(2)));
        assert_eq!(check_team_numbers(&[0, 1]), Err(ConfigError::TeamOutOfRange(0)));
        assert_eq!(check_team_numbers(&[1, 3]), Err(ConfigError::TeamOutOfRange(3)));
    }

    #[test]
    fn test_player_count() {
        assert!(check_player_count(2, MAX_LOBBY_PLAYERS).is_ok());
        assert!(check_player_count(6, MAX_LOBBY_PLAYERS).is_ok());
        assert_eq!(
            check_player_count(7, MAX_LOBBY_PLAYERS),
            Err(ConfigError::PlayerCount {
                min: 2,
                max: 6,
                got: 7
            })
        );
        assert!(check_player_count(1, MAX_LOBBY_PLAYERS).is_err());
    }

    #[test]
    fn test_parse_roster() {
        let config: MatchConfig = "human:1,alien:2,doggo:2".parse().unwrap();
        assert_eq!(
            config.seats(),
            &[
                Seat::new(CreatureType::Human, 1),
                Seat::new(CreatureType::Alien, 2),
                Seat::new(CreatureType::Dog, 2),
            ]
        );
    }

    #[test]
    fn test_parse_roster_errors() {
        assert!(matches!(
            "human".parse::<MatchConfig>(),
            Err(ConfigError::RosterEntry(_))
        ));
        assert!(matches!(
            "goblin:1,human:2".parse::<MatchConfig>(),
            Err(ConfigError::RosterEntry(_))
        ));
        assert!(matches!(
            "human:1".parse::<MatchConfig>(),
            Err(ConfigError::PlayerCount { got: 1, .. })
        ));
        assert_eq!(
            "human:1,alien:1".parse::<MatchConfig>(),
            Err(ConfigError::TooFewTeams)
        );
    }
}

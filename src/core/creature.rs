//! Creature types and their fixed starting stats.
//!
//! Every creature is described by data: how many hands and feet it grows,
//! their capacities, how many actions it takes per turn, and which
//! reactions it subscribes on its event bus.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::events::{PlayerEvent, Reaction};

/// Capacity of the extra hand a zombie grows when its hand first dies.
pub const ZOMBIE_REGROWN_HAND_CAPACITY: u32 = 4;

/// The fixed roster of creature types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureType {
    Human,
    Alien,
    Zombie,
    Dog,
}

/// A group of identical limbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimbSet {
    pub count: usize,
    pub capacity: u32,
}

impl LimbSet {
    const NONE: LimbSet = LimbSet {
        count: 0,
        capacity: 0,
    };
}

/// Starting stats for one creature type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatureStats {
    pub hands: LimbSet,
    pub feet: LimbSet,
    pub turns_per_round: u32,
}

/// A reaction a creature wires onto its own bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Behavior {
    pub name: &'static str,
    pub event: PlayerEvent,
    pub reaction: Reaction,
}

const SKIP_AFTER_FOOT_DEATH: Behavior = Behavior {
    name: "skip_after_foot_death",
    event: PlayerEvent::FootDied,
    reaction: Reaction::SkipTurn,
};

const SKIP_AFTER_TAPPING_DOG: Behavior = Behavior {
    name: "skip_after_tapping_dog",
    event: PlayerEvent::HasAttackedDog,
    reaction: Reaction::SkipTurn,
};

const HUMAN_BEHAVIORS: &[Behavior] = &[SKIP_AFTER_FOOT_DEATH, SKIP_AFTER_TAPPING_DOG];
const TAPPER_BEHAVIORS: &[Behavior] = &[SKIP_AFTER_TAPPING_DOG];
const DOG_BEHAVIORS: &[Behavior] = &[SKIP_AFTER_FOOT_DEATH, SKIP_AFTER_TAPPING_DOG];

impl CreatureType {
    /// All creature types.
    pub const ALL: [CreatureType; 4] = [
        CreatureType::Human,
        CreatureType::Alien,
        CreatureType::Zombie,
        CreatureType::Dog,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CreatureType::Human => "human",
            CreatureType::Alien => "alien",
            CreatureType::Zombie => "zombie",
            CreatureType::Dog => "dog",
        }
    }

    /// Single-letter tag used in status lines.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            CreatureType::Human => 'h',
            CreatureType::Alien => 'a',
            CreatureType::Zombie => 'z',
            CreatureType::Dog => 'd',
        }
    }

    #[must_use]
    pub const fn stats(self) -> CreatureStats {
        match self {
            CreatureType::Human => CreatureStats {
                hands: LimbSet { count: 2, capacity: 5 },
                feet: LimbSet { count: 2, capacity: 5 },
                turns_per_round: 1,
            },
            CreatureType::Alien => CreatureStats {
                hands: LimbSet { count: 4, capacity: 3 },
                feet: LimbSet { count: 2, capacity: 2 },
                turns_per_round: 1,
            },
            CreatureType::Zombie => CreatureStats {
                hands: LimbSet { count: 1, capacity: 4 },
                feet: LimbSet::NONE,
                turns_per_round: 2,
            },
            CreatureType::Dog => CreatureStats {
                hands: LimbSet::NONE,
                feet: LimbSet { count: 4, capacity: 4 },
                turns_per_round: 1,
            },
        }
    }

    /// Reactions subscribed when a player of this type is created.
    ///
    /// Every creature carries the tap-a-dog penalty, dogs included.
    #[must_use]
    pub const fn behaviors(self) -> &'static [Behavior] {
        match self {
            CreatureType::Human => HUMAN_BEHAVIORS,
            CreatureType::Alien | CreatureType::Zombie => TAPPER_BEHAVIORS,
            CreatureType::Dog => DOG_BEHAVIORS,
        }
    }

    /// Whether this creature grows a hand the first time one dies.
    #[must_use]
    pub const fn regenerates(self) -> bool {
        matches!(self, CreatureType::Zombie)
    }
}

impl std::fmt::Display for CreatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned for an unknown creature name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown creature `{0}` (expected human, alien, zombie or dog)")]
pub struct ParseCreatureError(pub String);

impl FromStr for CreatureType {
    type Err = ParseCreatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(CreatureType::Human),
            "alien" => Ok(CreatureType::Alien),
            "zombie" => Ok(CreatureType::Zombie),
            "dog" | "doggo" => Ok(CreatureType::Dog),
            _ => Err(ParseCreatureError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for creature in CreatureType::ALL {
            assert_eq!(creature.name().parse(), Ok(creature));
        }
        assert_eq!("doggo".parse(), Ok(CreatureType::Dog));
        assert_eq!(" Human ".parse(), Ok(CreatureType::Human));
        assert!("goblin".parse::<CreatureType>().is_err());
    }

    #[test]
    fn test_stats_table() {
        let human = CreatureType::Human.stats();
        assert_eq!((human.hands.count, human.hands.capacity), (2, 5));
        assert_eq!((human.feet.count, human.feet.capacity), (2, 5));

        let alien = CreatureType::Alien.stats();
        assert_eq!((alien.hands.count, alien.hands.capacity), (4, 3));
        assert_eq!((alien.feet.count, alien.feet.capacity), (2, 2));

        let zombie = CreatureType::Zombie.stats();
        assert_eq!(zombie.hands.count, 1);
        assert_eq!(zombie.feet.count, 0);
        assert_eq!(zombie.turns_per_round, 2);

        let dog = CreatureType::Dog.stats();
        assert_eq!(dog.hands.count, 0);
        assert_eq!((dog.feet.count, dog.feet.capacity), (4, 4));
    }

    #[test]
    fn test_behaviors() {
        let events = |c: CreatureType| c.behaviors().iter().map(|b| b.event).collect::<Vec<_>>();

        assert_eq!(
            events(CreatureType::Human),
            vec![PlayerEvent::FootDied, PlayerEvent::HasAttackedDog]
        );
        assert_eq!(events(CreatureType::Alien), vec![PlayerEvent::HasAttackedDog]);
        assert_eq!(events(CreatureType::Zombie), vec![PlayerEvent::HasAttackedDog]);
        assert_eq!(
            events(CreatureType::Dog),
            vec![PlayerEvent::FootDied, PlayerEvent::HasAttackedDog]
        );
        for creature in CreatureType::ALL {
            assert!(events(creature).contains(&PlayerEvent::HasAttackedDog));
        }
    }

    #[test]
    fn test_only_zombies_regenerate() {
        for creature in CreatureType::ALL {
            assert_eq!(creature.regenerates(), creature == CreatureType::Zombie);
        }
    }
}

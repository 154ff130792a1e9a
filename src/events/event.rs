//! Player event kinds.
//!
//! Events carry no payload: the player that publishes one is the only
//! context a reaction needs.

use serde::{Deserialize, Serialize};

/// Something that happened to, or was done by, a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// One of the player's feet just died.
    FootDied,
    /// The player was tapped.
    WasAttacked,
    /// The player tapped someone.
    HasAttacked,
    /// The player tapped a dog.
    HasAttackedDog,
}

impl PlayerEvent {
    /// All event kinds, in declaration order.
    pub const ALL: [PlayerEvent; 4] = [
        PlayerEvent::FootDied,
        PlayerEvent::WasAttacked,
        PlayerEvent::HasAttacked,
        PlayerEvent::HasAttackedDog,
    ];

    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerEvent::FootDied => "foot_died",
            PlayerEvent::WasAttacked => "was_attacked",
            PlayerEvent::HasAttacked => "has_attacked",
            PlayerEvent::HasAttackedDog => "has_attacked_dog",
        }
    }
}

impl std::fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        let mut names: Vec<_> = PlayerEvent::ALL.iter().map(|e| e.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PlayerEvent::ALL.len());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(PlayerEvent::HasAttackedDog.to_string(), "has_attacked_dog");
    }
}

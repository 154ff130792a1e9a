//! Player actions and their text grammar.
//!
//! Participants submit one line per action:
//!
//! - `tap <own limb> <target order> <target limb>`, e.g. `tap HA 2 FB`
//! - `disthands v1 v2 ... vk`, one value per living hand
//!
//! Parsing only checks shape. Whether an action is legal in the current
//! match is decided by [`crate::rules::validate`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;

use super::limb::LimbCode;
use super::player::PlayerId;
use crate::error::ActionError;

/// Values for a hand redistribution.
pub type HandValues = SmallVec<[u32; 4]>;

/// A single action.
///
/// ## Example
///
/// ```
/// use limb_arena::core::{Action, LimbCode, PlayerId};
///
/// let tap: Action = "tap HA 2 FB".parse().unwrap();
/// assert_eq!(
///     tap,
///     Action::Tap {
///         limb: LimbCode::hand(0),
///         target: PlayerId::new(1),
///         target_limb: LimbCode::foot(1),
///     }
/// );
/// assert_eq!(tap.to_string(), "tap HA 2 FB");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Hit `target_limb` of `target` with the value held by `limb`.
    Tap {
        limb: LimbCode,
        target: PlayerId,
        target_limb: LimbCode,
    },
    /// Reassign values across the actor's living hands.
    DistributeHands { values: HandValues },
}

impl Action {
    /// Command word as typed.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Action::Tap { .. } => "tap",
            Action::DistributeHands { .. } => "disthands",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Tap {
                limb,
                target,
                target_limb,
            } => write!(f, "tap {} {} {}", limb, target.order(), target_limb),
            Action::DistributeHands { values } => {
                f.write_str("disthands")?;
                for value in values {
                    write!(f, " {value}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().ok_or(ActionError::Empty)?;

        match command {
            "tap" => {
                let args: SmallVec<[&str; 3]> = words.collect();
                let [limb, target, target_limb] = args.as_slice() else {
                    return Err(ActionError::Malformed(format!(
                        "tap takes 3 arguments, got {}",
                        args.len()
                    )));
                };
                let order: u32 = target.parse().map_err(|_| {
                    ActionError::Malformed(format!("`{target}` is not a player number"))
                })?;
                let target = PlayerId::from_order(order).ok_or(ActionError::NoSuchPlayer(order))?;
                Ok(Action::Tap {
                    limb: limb.parse()?,
                    target,
                    target_limb: target_limb.parse()?,
                })
            }
            "disthands" => {
                let values = words
                    .map(|w| {
                        w.parse::<u32>().map_err(|_| {
                            ActionError::Malformed(format!("`{w}` is not a hand value"))
                        })
                    })
                    .collect::<Result<HandValues, _>>()?;
                Ok(Action::DistributeHands { values })
            }
            other => Err(ActionError::UnknownCommand(other.to_string())),
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_parse_tap() {
        let action: Action = "  tap  FB 3 HD ".parse().unwrap();
        assert_eq!(
            action,
            Action::Tap {
                limb: LimbCode::foot(1),
                target: PlayerId::new(2),
                target_limb: LimbCode::hand(3),
            }
        );
        assert_eq!(action.command(), "tap");
    }

    #[test]
    fn test_parse_disthands() {
        let action: Action = "disthands 2 0 1".parse().unwrap();
        assert_eq!(
            action,
            Action::DistributeHands {
                values: smallvec![2, 0, 1]
            }
        );
        assert_eq!(action.to_string(), "disthands 2 0 1");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Action>(), Err(ActionError::Empty));
        assert_eq!("   ".parse::<Action>(), Err(ActionError::Empty));
        assert!(matches!(
            "punch HA 2 HA".parse::<Action>(),
            Err(ActionError::UnknownCommand(c)) if c == "punch"
        ));
        assert!(matches!("tap HA 2".parse::<Action>(), Err(ActionError::Malformed(_))));
        assert!(matches!("tap HA two HA".parse::<Action>(), Err(ActionError::Malformed(_))));
        assert!(matches!("tap HA -1 HA".parse::<Action>(), Err(ActionError::Malformed(_))));
        assert_eq!("tap HA 0 HA".parse::<Action>(), Err(ActionError::NoSuchPlayer(0)));
        assert!(matches!("tap QA 2 HA".parse::<Action>(), Err(ActionError::BadLimbCode(_))));
        assert!(matches!("disthands 1 x".parse::<Action>(), Err(ActionError::Malformed(_))));
        assert!(matches!("disthands 1 -2".parse::<Action>(), Err(ActionError::Malformed(_))));
    }

    #[test]
    fn test_display_round_trips() {
        for line in ["tap HA 2 FB", "tap FD 6 HA", "disthands 4 0", "disthands"] {
            let action: Action = line.parse().unwrap();
            assert_eq!(action.to_string(), line);
        }
    }

    #[test]
    fn test_action_record() {
        let action: Action = "tap HA 2 HB".parse().unwrap();
        let record = ActionRecord::new(PlayerId::new(0), action.clone(), 3, 1);

        assert_eq!(record.player, PlayerId::new(0));
        assert_eq!(record.action, action);
        assert_eq!(record.turn, 3);
        assert_eq!(record.sequence, 1);
    }
}

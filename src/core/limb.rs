//! Limbs: bounded damage counters.
//!
//! A limb is a counter with a capacity. How it absorbs a hit depends on
//! its kind:
//!
//! - **Hand**: wraps once past capacity and dies when it lands exactly on it.
//! - **Foot**: saturates and dies as soon as it reaches capacity.
//!
//! Limbs are addressed with a two-character [`LimbCode`]: `H` or `F`
//! followed by a slot letter (`A` = slot 0, `B` = slot 1, ...).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every limb starts the match holding this value.
pub const STARTING_VALUE: u32 = 1;

/// The two limb kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimbKind {
    Hand,
    Foot,
}

impl LimbKind {
    /// The prefix letter used in limb codes.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            LimbKind::Hand => 'H',
            LimbKind::Foot => 'F',
        }
    }

    /// Plural name for menus and error messages.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            LimbKind::Hand => "hands",
            LimbKind::Foot => "feet",
        }
    }
}

/// A single hand or foot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limb {
    kind: LimbKind,
    value: u32,
    max: u32,
    dead: bool,
}

impl Limb {
    /// Create a living limb holding [`STARTING_VALUE`].
    #[must_use]
    pub fn new(kind: LimbKind, max: u32) -> Self {
        assert!(max > 0, "Limb capacity must be positive");
        Self {
            kind,
            value: STARTING_VALUE,
            max,
            dead: false,
        }
    }

    /// Create a hand with the given capacity.
    #[must_use]
    pub fn hand(max: u32) -> Self {
        Self::new(LimbKind::Hand, max)
    }

    /// Create a foot with the given capacity.
    #[must_use]
    pub fn foot(max: u32) -> Self {
        Self::new(LimbKind::Foot, max)
    }

    #[must_use]
    pub fn kind(&self) -> LimbKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub fn max_value(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Absorb a hit of `amount`.
    ///
    /// Callers must not hit a dead limb; the coordinator rejects such
    /// actions before they reach here.
    pub fn attacked(&mut self, amount: u32) {
        self.value += amount;
        match self.kind {
            LimbKind::Hand => {
                if self.value > self.max {
                    self.value -= self.max;
                }
                debug_assert!(self.value <= self.max, "hand wrapped more than once");
                if self.value == self.max {
                    self.dead = true;
                }
            }
            LimbKind::Foot => {
                if self.value >= self.max {
                    self.dead = true;
                }
            }
        }
    }

    /// Overwrite the current value (redistribution). Death is untouched.
    pub(crate) fn set_value(&mut self, value: u32) {
        self.value = value;
    }

    /// Render for status lines: the value, or `X` once dead.
    #[must_use]
    pub fn glyph(&self) -> String {
        if self.dead {
            "X".to_string()
        } else {
            self.value.to_string()
        }
    }
}

/// Address of a limb on a player: kind plus zero-based slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LimbCode {
    pub kind: LimbKind,
    pub slot: usize,
}

impl LimbCode {
    #[must_use]
    pub const fn new(kind: LimbKind, slot: usize) -> Self {
        Self { kind, slot }
    }

    #[must_use]
    pub const fn hand(slot: usize) -> Self {
        Self::new(LimbKind::Hand, slot)
    }

    #[must_use]
    pub const fn foot(slot: usize) -> Self {
        Self::new(LimbKind::Foot, slot)
    }
}

impl std::fmt::Display for LimbCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = u32::try_from(self.slot)
            .ok()
            .and_then(|slot| char::from_u32(u32::from('A') + slot))
            .filter(char::is_ascii_uppercase)
            .unwrap_or('?');
        write!(f, "{}{}", self.kind.prefix(), letter)
    }
}

/// Error returned when a string is not a well-formed limb code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a limb code (expected H or F followed by A-Z)")]
pub struct ParseLimbCodeError(pub String);

impl FromStr for LimbCode {
    type Err = ParseLimbCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseLimbCodeError(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(bad());
        }
        let kind = match bytes[0] {
            b'H' => LimbKind::Hand,
            b'F' => LimbKind::Foot,
            _ => return Err(bad()),
        };
        if !bytes[1].is_ascii_uppercase() {
            return Err(bad());
        }
        Ok(Self::new(kind, usize::from(bytes[1] - b'A')))
    }
}

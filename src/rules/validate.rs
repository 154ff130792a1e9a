//! Action validation.
//!
//! Every check runs against the current match state before anything is
//! mutated. A rejected action leaves the match untouched and the actor is
//! asked again.

use crate::core::{Action, Limb, LimbCode, LimbKind, Player, PlayerId, PlayerMap};
use crate::error::ActionError;

/// Check that `actor` may perform `action` right now.
pub fn validate(
    players: &PlayerMap<Player>,
    actor: PlayerId,
    action: &Action,
) -> Result<(), ActionError> {
    let player = players
        .get(actor)
        .ok_or(ActionError::NoSuchPlayer(actor.order()))?;

    match action {
        Action::Tap {
            limb,
            target,
            target_limb,
        } => validate_tap(players, player, *limb, *target, *target_limb),
        Action::DistributeHands { values } => validate_distribution(player, values),
    }
}

fn validate_tap(
    players: &PlayerMap<Player>,
    attacker: &Player,
    limb: LimbCode,
    target: PlayerId,
    target_limb: LimbCode,
) -> Result<(), ActionError> {
    let defender = players
        .get(target)
        .ok_or(ActionError::NoSuchPlayer(target.order()))?;
    if defender.team() == attacker.team() {
        return Err(ActionError::SameTeam(target));
    }
    if defender.is_dead() {
        return Err(ActionError::TargetDead(target));
    }

    let striking = living_limb(attacker, limb)?;
    living_limb(defender, target_limb)?;
    if striking.value() == 0 {
        return Err(ActionError::ZeroTap(limb));
    }
    Ok(())
}

/// Resolve `code` on `player`, failing if it is missing or dead.
fn living_limb(player: &Player, code: LimbCode) -> Result<&Limb, ActionError> {
    let limb = player.limb(code).ok_or(ActionError::NoSuchLimb {
        player: player.id(),
        code,
    })?;
    if limb.is_dead() {
        return Err(ActionError::DeadLimb {
            player: player.id(),
            code,
        });
    }
    Ok(limb)
}

fn validate_distribution(player: &Player, values: &[u32]) -> Result<(), ActionError> {
    let current = player.living_values(LimbKind::Hand);
    if current.len() < 2 {
        return Err(ActionError::NothingToDistribute);
    }

    let capacity = player.hand_capacity().unwrap_or(0);
    if let Some(&value) = values.iter().find(|&&v| v >= capacity) {
        return Err(ActionError::ValueTooLarge { value, capacity });
    }
    if values.len() != current.len() {
        return Err(ActionError::WrongValueCount {
            expected: current.len(),
            got: values.len(),
        });
    }

    let expected: u32 = current.iter().sum();
    let got: u32 = values.iter().sum();
    if expected != got {
        return Err(ActionError::SumMismatch { expected, got });
    }
    if current.as_slice() == values {
        return Err(ActionError::Unchanged);
    }
    Ok(())
}

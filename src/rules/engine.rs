//! Applying validated actions and deciding the match.

use crate::core::{
    Action, CreatureType, HitOutcome, LimbKind, Player, PlayerId, PlayerMap, Team, TeamId,
};
use crate::error::GameError;
use crate::events::PlayerEvent;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Exactly one team is left standing.
    Winner(TeamId),
    /// Nobody still alive has a legal action, so nothing can change.
    Stalemate,
}

impl GameResult {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: TeamId) -> bool {
        self.winner() == Some(team)
    }

    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        match self {
            GameResult::Winner(t) => Some(*t),
            GameResult::Stalemate => None,
        }
    }
}

/// Apply an action that already passed validation.
///
/// Returns the hit dealt by a tap. A limb that fails to resolve here is a
/// defect in validation and ends the match.
pub fn apply_action(
    players: &mut PlayerMap<Player>,
    actor: PlayerId,
    action: &Action,
) -> Result<Option<HitOutcome>, GameError> {
    match action {
        Action::Tap {
            limb,
            target,
            target_limb,
        } => {
            let amount = players
                .get(actor)
                .and_then(|p| p.limb_value(*limb))
                .ok_or_else(|| GameError::Invariant(format!("{actor} has no limb {limb}")))?;

            let defender = players
                .get_mut(*target)
                .ok_or_else(|| GameError::Invariant(format!("{target} does not exist")))?;
            let hit = defender
                .attacked(*target_limb, amount)
                .map_err(|e| GameError::Invariant(e.to_string()))?;
            let target_is_dog = defender.creature() == CreatureType::Dog;

            let attacker = &mut players[actor];
            attacker.publish(PlayerEvent::HasAttacked);
            if target_is_dog {
                attacker.publish(PlayerEvent::HasAttackedDog);
            }

            tracing::debug!(
                attacker = %actor,
                target = %target,
                limb = %target_limb,
                amount,
                died = hit.died,
                regenerated = hit.regenerated,
                "tap applied"
            );
            Ok(Some(hit))
        }
        Action::DistributeHands { values } => {
            let player = players
                .get_mut(actor)
                .ok_or_else(|| GameError::Invariant(format!("{actor} does not exist")))?;
            player.distribute(values, LimbKind::Hand);
            tracing::debug!(player = %actor, %action, "hands redistributed");
            Ok(None)
        }
    }
}

/// Recompute every team's dead flag and report the winner, if any.
pub fn check_teams(teams: &mut [Team], players: &PlayerMap<Player>) -> Option<GameResult> {
    for team in teams.iter_mut() {
        team.check_dead(players);
    }
    winner(teams)
}

/// The only team not dead, once there is exactly one.
#[must_use]
pub fn winner(teams: &[Team]) -> Option<GameResult> {
    let mut alive = teams.iter().filter(|t| !t.is_dead());
    match (alive.next(), alive.next()) {
        (Some(team), None) => Some(GameResult::Winner(team.id())),
        _ => None,
    }
}

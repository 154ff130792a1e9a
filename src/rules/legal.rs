//! Legal action enumeration and the action menu shown to participants.
//!
//! Enumeration is exhaustive: every action returned here passes
//! [`validate`](super::validate), and every action that passes
//! validation is returned.

use crate::core::{
    Action, HandValues, Limb, LimbCode, LimbKind, Player, PlayerId, PlayerMap, Team,
};

/// Every action `actor` could legally take right now.
///
/// Taps come first (own limbs in slot order, then targets in player
/// order), followed by hand distributions.
#[must_use]
pub fn legal_actions(players: &PlayerMap<Player>, actor: PlayerId) -> Vec<Action> {
    let Some(player) = players.get(actor) else {
        return Vec::new();
    };
    let mut actions = legal_taps(players, player);
    legal_distributions(player, &mut actions);
    actions
}

/// True when no living player has any legal action.
///
/// Actions are the only thing that changes limbs, so such a match can
/// never progress.
#[must_use]
pub fn is_stalemate(players: &PlayerMap<Player>) -> bool {
    players
        .iter()
        .filter(|(_, p)| !p.is_dead())
        .all(|(id, _)| legal_actions(players, id).is_empty())
}

fn legal_taps(players: &PlayerMap<Player>, attacker: &Player) -> Vec<Action> {
    let strikers: Vec<LimbCode> = [LimbKind::Hand, LimbKind::Foot]
        .into_iter()
        .flat_map(|kind| attacker.living_codes(kind))
        .filter(|&code| attacker.limb_value(code).is_some_and(|v| v > 0))
        .collect();

    let mut actions = Vec::new();
    for limb in strikers {
        for (target, defender) in players.iter() {
            if defender.team() == attacker.team() || defender.is_dead() {
                continue;
            }
            let targets = [LimbKind::Hand, LimbKind::Foot]
                .into_iter()
                .flat_map(|kind| defender.living_codes(kind));
            for target_limb in targets {
                actions.push(Action::Tap {
                    limb,
                    target,
                    target_limb,
                });
            }
        }
    }
    actions
}

fn legal_distributions(player: &Player, out: &mut Vec<Action>) {
    let current = player.living_values(LimbKind::Hand);
    if current.len() < 2 {
        return;
    }
    let Some(capacity) = player.hand_capacity() else {
        return;
    };
    let total: u32 = current.iter().sum();

    let mut prefix = HandValues::new();
    enumerate_distributions(current.len(), total, capacity, &mut prefix, &mut |values| {
        if values != current.as_slice() {
            out.push(Action::DistributeHands {
                values: HandValues::from_slice(values),
            });
        }
    });
}

/// Visit every way to split `remaining` across `slots` values below `capacity`.
fn enumerate_distributions(
    slots: usize,
    remaining: u32,
    capacity: u32,
    prefix: &mut HandValues,
    visit: &mut impl FnMut(&[u32]),
) {
    if slots == 0 {
        if remaining == 0 {
            visit(prefix.as_slice());
        }
        return;
    }
    let highest = remaining.min(capacity.saturating_sub(1));
    for value in 0..=highest {
        // The remaining slots can absorb at most (capacity - 1) each.
        let rest = remaining - value;
        if u64::from(rest) > (slots as u64 - 1) * u64::from(capacity.saturating_sub(1)) {
            continue;
        }
        prefix.push(value);
        enumerate_distributions(slots - 1, rest, capacity, prefix, visit);
        prefix.pop();
    }
}

/// Human-readable menu of what `actor` can do, sent with each prompt.
#[must_use]
pub fn action_menu(players: &PlayerMap<Player>, teams: &[Team], actor: PlayerId) -> String {
    let Some(player) = players.get(actor) else {
        return String::new();
    };

    let mut menu = String::from("Possible taps:\n");
    for team in teams.iter().filter(|t| t.id() != player.team() && !t.is_dead()) {
        menu.push_str(&format!("> {}:\n", team.id()));
        for &id in team.roster() {
            let Some(enemy) = players.get(id) else {
                continue;
            };
            if enemy.is_dead() {
                menu.push_str(&format!(" > Player {} (dead)\n", id.order()));
                continue;
            }
            menu.push_str(&format!(" > Player {} ({})\n", id.order(), enemy.creature()));
            push_limb_row(&mut menu, "     >> Hands:", enemy.hands(), LimbKind::Hand);
            push_limb_row(&mut menu, "     >> Feet: ", enemy.feet(), LimbKind::Foot);
        }
    }
    push_limb_row(&mut menu, "Your hands:", player.hands(), LimbKind::Hand);
    push_limb_row(&mut menu, "Your feet: ", player.feet(), LimbKind::Foot);
    menu.push_str("Commands: tap <your limb> <player> <their limb> | disthands <v1> .. <vk>\n");
    menu
}

fn push_limb_row(menu: &mut String, label: &str, limbs: &[Limb], kind: LimbKind) {
    menu.push_str(label);
    if limbs.is_empty() {
        menu.push_str(" none");
    }
    for (slot, limb) in limbs.iter().enumerate() {
        menu.push_str(&format!(" {}:{}", LimbCode::new(kind, slot), limb.glyph()));
    }
    menu.push('\n');
}

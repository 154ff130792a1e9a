//! Players: identity, per-player storage, and the limb-owning player record.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Stored 0-based; players see their 1-based
//! *order*, which is also what `tap` commands use to name a target.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by a `Vec` for O(1) access by `PlayerId`.
//!
//! ## Player
//!
//! Owns a creature's hands and feet, its event bus, and its skip state.
//! Hits and redistributions go through the player so that events are
//! published and creature reactions applied before the call returns.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

use super::creature::{CreatureType, ZOMBIE_REGROWN_HAND_CAPACITY};
use super::limb::{Limb, LimbCode, LimbKind};
use super::team::TeamId;
use crate::error::ActionError;
use crate::events::{EventBus, PlayerEvent, Reaction};

/// Maximum players in one match.
pub const MAX_PLAYERS: usize = u8::MAX as usize;

/// Player identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`, whose
/// order is 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Player with the given 1-based order, if it fits.
    #[must_use]
    pub fn from_order(order: u32) -> Option<Self> {
        let index = order.checked_sub(1)?;
        u8::try_from(index).ok().map(Self)
    }

    /// Raw 0-based index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 1-based order shown to participants.
    #[must_use]
    pub const fn order(self) -> u32 {
        self.0 as u32 + 1
    }

    /// Iterate over all player IDs for a match with `player_count` players.
    ///
    /// ```
    /// use limb_arena::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players.len(), 3);
    /// assert_eq!(players[2].order(), 3);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.order())
    }
}

/// Per-player data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl FnMut(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= MAX_PLAYERS, "At most 255 players supported");

        let data = PlayerId::all(player_count).map(factory).collect();
        Self { data }
    }

    /// Wrap entries already in player order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= MAX_PLAYERS, "At most 255 players supported");
        Self { data }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Whether `player` has an entry.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    /// Get a player's entry, or `None` if out of range.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.data.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Limb list; no creature grows more than five of a kind.
pub type Limbs = SmallVec<[Limb; 4]>;

/// What a single hit did to a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitOutcome {
    pub limb: LimbCode,
    /// The limb was alive before the hit and dead after it.
    pub died: bool,
    /// The hit triggered a zombie's one-time regrowth.
    pub regenerated: bool,
    /// Events published, in publish order.
    pub events: SmallVec<[PlayerEvent; 2]>,
    /// Hand count the reactions saw when the events went out.
    pub hands_at_publish: usize,
}

/// A player: one creature on one team.
#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    team: TeamId,
    creature: CreatureType,
    hands: Limbs,
    feet: Limbs,
    turns_per_round: u32,
    skip_pending: bool,
    has_regenerated: bool,
    bus: EventBus,
}

impl Player {
    /// Create a player with its creature's starting limbs and reactions.
    #[must_use]
    pub fn new(id: PlayerId, team: TeamId, creature: CreatureType) -> Self {
        let stats = creature.stats();
        let hands = (0..stats.hands.count)
            .map(|_| Limb::hand(stats.hands.capacity))
            .collect();
        let feet = (0..stats.feet.count)
            .map(|_| Limb::foot(stats.feet.capacity))
            .collect();

        let mut bus = EventBus::new();
        for behavior in creature.behaviors() {
            bus.subscribe(behavior.name, behavior.event, behavior.reaction);
        }

        Self {
            id,
            team,
            creature,
            hands,
            feet,
            turns_per_round: stats.turns_per_round,
            skip_pending: false,
            has_regenerated: false,
            bus,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.id.order()
    }

    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team
    }

    #[must_use]
    pub fn creature(&self) -> CreatureType {
        self.creature
    }

    /// Actions this player takes each time it is scheduled.
    #[must_use]
    pub fn turns_per_round(&self) -> u32 {
        self.turns_per_round
    }

    #[must_use]
    pub fn hands(&self) -> &[Limb] {
        &self.hands
    }

    #[must_use]
    pub fn feet(&self) -> &[Limb] {
        &self.feet
    }

    #[must_use]
    pub fn limbs(&self, kind: LimbKind) -> &[Limb] {
        match kind {
            LimbKind::Hand => &self.hands,
            LimbKind::Foot => &self.feet,
        }
    }

    fn limbs_mut(&mut self, kind: LimbKind) -> &mut Limbs {
        match kind {
            LimbKind::Hand => &mut self.hands,
            LimbKind::Foot => &mut self.feet,
        }
    }

    /// Resolve a limb code. `None` for slots this creature does not have.
    #[must_use]
    pub fn limb(&self, code: LimbCode) -> Option<&Limb> {
        self.limbs(code.kind).get(code.slot)
    }

    /// Current value of a limb, if it exists.
    #[must_use]
    pub fn limb_value(&self, code: LimbCode) -> Option<u32> {
        self.limb(code).map(Limb::value)
    }

    /// Codes of every limb of `kind` that is still alive.
    pub fn living_codes(&self, kind: LimbKind) -> impl Iterator<Item = LimbCode> + '_ {
        self.limbs(kind)
            .iter()
            .enumerate()
            .filter(|(_, limb)| !limb.is_dead())
            .map(move |(slot, _)| LimbCode::new(kind, slot))
    }

    #[must_use]
    pub fn living_count(&self, kind: LimbKind) -> usize {
        self.limbs(kind).iter().filter(|l| !l.is_dead()).count()
    }

    /// Values of living limbs of `kind`, in slot order.
    #[must_use]
    pub fn living_values(&self, kind: LimbKind) -> SmallVec<[u32; 4]> {
        self.limbs(kind)
            .iter()
            .filter(|l| !l.is_dead())
            .map(Limb::value)
            .collect()
    }

    /// Capacity shared by this creature's hands, `None` if it has none.
    #[must_use]
    pub fn hand_capacity(&self) -> Option<u32> {
        self.hands.first().map(Limb::max_value)
    }

    /// Take a hit of `amount` on the limb at `code`.
    ///
    /// A zombie whose hit limb dies grows its one extra hand before any
    /// event is published, so reactions already see the new hand.
    pub fn attacked(&mut self, code: LimbCode, amount: u32) -> Result<HitOutcome, ActionError> {
        let id = self.id;
        let limb = self
            .limbs_mut(code.kind)
            .get_mut(code.slot)
            .ok_or(ActionError::NoSuchLimb { player: id, code })?;

        let was_dead = limb.is_dead();
        limb.attacked(amount);
        let dead_now = limb.is_dead();
        let died = dead_now && !was_dead;

        let mut outcome = HitOutcome {
            limb: code,
            died,
            regenerated: false,
            events: SmallVec::new(),
            hands_at_publish: 0,
        };

        if dead_now && self.creature.regenerates() && !self.has_regenerated {
            self.regenerate();
            outcome.regenerated = true;
        }

        outcome.hands_at_publish = self.hands.len();
        if code.kind == LimbKind::Foot && died {
            self.publish(PlayerEvent::FootDied);
            outcome.events.push(PlayerEvent::FootDied);
        }
        self.publish(PlayerEvent::WasAttacked);
        outcome.events.push(PlayerEvent::WasAttacked);

        Ok(outcome)
    }

    fn regenerate(&mut self) {
        self.hands.push(Limb::hand(ZOMBIE_REGROWN_HAND_CAPACITY));
        self.has_regenerated = true;
        tracing::debug!(player = %self.id, hands = self.hands.len(), "zombie regrew a hand");
    }

    /// Assign `values` to the living limbs of `kind`, in slot order.
    ///
    /// `values` must hold exactly one entry per living limb; validation
    /// happens before this is called.
    pub fn distribute(&mut self, values: &[u32], kind: LimbKind) {
        debug_assert_eq!(values.len(), self.living_count(kind));
        let living = self.limbs_mut(kind).iter_mut().filter(|l| !l.is_dead());
        for (limb, &value) in living.zip(values) {
            limb.set_value(value);
        }
    }

    /// Run every reaction subscribed to `event` against this player.
    pub fn publish(&mut self, event: PlayerEvent) {
        for (name, reaction) in self.bus.publish(event) {
            tracing::debug!(player = %self.id, %event, subscriber = name, "reaction fired");
            match reaction {
                Reaction::SkipTurn => self.skip_turn(),
            }
        }
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Forfeit the next scheduled turn. Repeated calls do not stack.
    pub fn skip_turn(&mut self) {
        self.skip_pending = true;
    }

    /// Clear a pending skip, reporting whether one was pending.
    pub fn consume_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip_pending)
    }

    #[must_use]
    pub fn is_skip_pending(&self) -> bool {
        self.skip_pending
    }

    #[must_use]
    pub fn has_regenerated(&self) -> bool {
        self.has_regenerated
    }

    /// Dead once every hand and foot is dead.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hands.iter().chain(self.feet.iter()).all(Limb::is_dead)
    }

    /// Able to act on its next scheduled turn.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.skip_pending && !self.is_dead()
    }

    /// Status fragment, e.g. `P2a (1111:11)` or `P1h (1X:15):SKIP`.
    #[must_use]
    pub fn status(&self) -> String {
        let glyphs = |limbs: &[Limb]| limbs.iter().map(Limb::glyph).collect::<String>();
        let mut line = format!(
            "P{}{} ({}:{})",
            self.order(),
            self.creature.initial(),
            glyphs(&self.hands),
            glyphs(&self.feet),
        );
        if self.skip_pending {
            line.push_str(":SKIP");
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(creature: CreatureType) -> Player {
        Player::new(PlayerId::new(0), TeamId::new(1), creature)
    }

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        assert_eq!(p0.index(), 0);
        assert_eq!(p0.order(), 1);
        assert_eq!(format!("{}", p0), "Player 1");
        assert_eq!(PlayerId::from_order(3), Some(PlayerId::new(2)));
        assert_eq!(PlayerId::from_order(0), None);
        assert_eq!(PlayerId::from_order(257), None);
    }

    #[test]
    fn test_player_map() {
        let mut map: PlayerMap<u32> = PlayerMap::new(3, |p| p.order() * 10);
        assert_eq!(map.player_count(), 3);
        assert_eq!(map[PlayerId::new(1)], 20);
        assert!(map.contains(PlayerId::new(2)));
        assert!(!map.contains(PlayerId::new(3)));
        assert_eq!(map.get(PlayerId::new(3)), None);

        map[PlayerId::new(0)] = 7;
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[0], (PlayerId::new(0), &7));
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<u32> = PlayerMap::new(0, |_| 0);
    }

    #[test]
    fn test_starting_limbs() {
        let human = player(CreatureType::Human);
        assert_eq!(human.hands().len(), 2);
        assert_eq!(human.feet().len(), 2);
        assert_eq!(human.status(), "P1h (11:11)");

        let dog = player(CreatureType::Dog);
        assert!(dog.hands().is_empty());
        assert_eq!(dog.status(), "P1d (:1111)");
        assert_eq!(dog.hand_capacity(), None);

        let zombie = player(CreatureType::Zombie);
        assert_eq!(zombie.turns_per_round(), 2);
        assert_eq!(zombie.status(), "P1z (1:)");
    }

    #[test]
    fn test_limb_lookup_rejects_missing_slots() {
        let dog = player(CreatureType::Dog);
        assert!(dog.limb(LimbCode::hand(0)).is_none());
        assert!(dog.limb(LimbCode::foot(3)).is_some());
        assert!(dog.limb(LimbCode::foot(4)).is_none());

        let zombie = player(CreatureType::Zombie);
        assert!(zombie.limb(LimbCode::foot(0)).is_none());
    }

    #[test]
    fn test_attacked_unknown_limb_is_error() {
        let mut zombie = player(CreatureType::Zombie);
        let err = zombie.attacked(LimbCode::foot(0), 1).unwrap_err();
        assert!(matches!(err, ActionError::NoSuchLimb { .. }));
    }

    #[test]
    fn test_human_skips_after_foot_death() {
        let mut human = player(CreatureType::Human);
        let outcome = human.attacked(LimbCode::foot(0), 4).unwrap();

        assert!(outcome.died);
        assert_eq!(
            outcome.events.as_slice(),
            &[PlayerEvent::FootDied, PlayerEvent::WasAttacked]
        );
        assert!(human.is_skip_pending());
        assert!(!human.is_ready());
        assert_eq!(human.status(), "P1h (11:X1):SKIP");
    }

    #[test]
    fn test_alien_ignores_foot_death() {
        let mut alien = player(CreatureType::Alien);
        let outcome = alien.attacked(LimbCode::foot(0), 1).unwrap();

        assert!(outcome.died);
        assert!(!alien.is_skip_pending());
        assert!(!alien.is_dead());
    }

    #[test]
    fn test_hand_death_publishes_no_foot_event() {
        let mut human = player(CreatureType::Human);
        let outcome = human.attacked(LimbCode::hand(0), 4).unwrap();
        assert!(outcome.died);
        assert_eq!(outcome.events.as_slice(), &[PlayerEvent::WasAttacked]);
        assert!(!human.is_skip_pending());
    }

    #[test]
    fn test_zombie_regenerates_once() {
        let mut zombie = player(CreatureType::Zombie);

        let outcome = zombie.attacked(LimbCode::hand(0), 3).unwrap();
        assert!(outcome.died);
        assert!(outcome.regenerated);
        // The regrown hand already exists when WasAttacked goes out.
        assert_eq!(outcome.events.as_slice(), &[PlayerEvent::WasAttacked]);
        assert_eq!(outcome.hands_at_publish, 2);
        assert!(zombie.has_regenerated());
        assert_eq!(zombie.hands().len(), 2);
        assert_eq!(zombie.hands()[1].value(), 1);
        assert_eq!(zombie.hands()[1].max_value(), 4);
        assert!(!zombie.is_dead());

        let outcome = zombie.attacked(LimbCode::hand(1), 3).unwrap();
        assert!(outcome.died);
        assert!(!outcome.regenerated);
        assert_eq!(outcome.hands_at_publish, 2);
        assert_eq!(zombie.hands().len(), 2);
        assert!(zombie.is_dead());
    }

    #[test]
    fn test_zombie_survives_partial_hits() {
        let mut zombie = player(CreatureType::Zombie);
        zombie.attacked(LimbCode::hand(0), 1).unwrap();
        zombie.attacked(LimbCode::hand(0), 1).unwrap();
        assert_eq!(zombie.hands().len(), 1);
        assert_eq!(zombie.hands()[0].value(), 3);

        zombie.attacked(LimbCode::hand(0), 1).unwrap();
        assert_eq!(zombie.hands().len(), 2);
    }

    #[test]
    fn test_distribute_skips_dead_slots() {
        let mut alien = player(CreatureType::Alien);
        alien.attacked(LimbCode::hand(1), 2).unwrap();
        assert!(alien.hands()[1].is_dead());

        alien.distribute(&[2, 0, 1], LimbKind::Hand);
        let values: Vec<_> = alien.hands().iter().map(Limb::value).collect();
        assert_eq!(values, vec![2, 3, 0, 1]);
        assert_eq!(alien.living_values(LimbKind::Hand).as_slice(), &[2, 0, 1]);
        assert!(alien.hands()[1].is_dead());
    }

    #[test]
    fn test_consume_skip_does_not_accumulate() {
        let mut human = player(CreatureType::Human);
        human.skip_turn();
        human.skip_turn();
        assert!(human.consume_skip());
        assert!(!human.consume_skip());
        assert!(human.is_ready());
    }

    #[test]
    fn test_tapping_dog_penalty_applies_to_every_attacker() {
        for creature in CreatureType::ALL {
            let mut attacker = player(creature);
            attacker.publish(PlayerEvent::HasAttacked);
            assert!(!attacker.is_skip_pending());
            attacker.publish(PlayerEvent::HasAttackedDog);
            assert!(attacker.is_skip_pending(), "{creature} should skip");
        }
    }

    #[test]
    fn test_player_dies_with_last_limb() {
        let mut alien = player(CreatureType::Alien);
        for slot in 0..4 {
            alien.attacked(LimbCode::hand(slot), 2).unwrap();
        }
        assert!(!alien.is_dead());
        alien.attacked(LimbCode::foot(0), 1).unwrap();
        assert!(!alien.is_dead());
        alien.attacked(LimbCode::foot(1), 1).unwrap();
        assert!(alien.is_dead());
        assert!(!alien.is_ready());
        assert_eq!(alien.status(), "P1a (XXXX:XX)");
    }
}

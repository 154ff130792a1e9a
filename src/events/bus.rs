//! Per-player event bus.
//!
//! The bus stores subscriptions and, on publish, hands back the reactions
//! registered for that event kind. Reactions are a closed set of variants
//! rather than boxed closures so the bus can live inside the [`Player`]
//! it serves without borrowing it: the player publishes, receives the
//! matching reactions, and applies them to itself.
//!
//! [`Player`]: crate::core::Player

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::event::PlayerEvent;

/// Unique identifier for a subscription on one bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    /// Create a new subscription ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// What a subscriber does to its owning player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// Forfeit the owner's next scheduled turn.
    SkipTurn,
}

/// A registered reaction to one event kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    /// Human-readable name (for logs).
    pub name: &'static str,
    pub event: PlayerEvent,
    pub reaction: Reaction,
}

/// Reactions fired by one publish. Creatures subscribe at most two per kind.
pub type Fired = SmallVec<[(&'static str, Reaction); 2]>;

/// Subscriptions indexed by event kind.
#[derive(Clone, Debug, Default)]
pub struct EventBus {
    subscriptions: FxHashMap<SubscriptionId, Subscription>,
    by_event: FxHashMap<PlayerEvent, Vec<SubscriptionId>>,
    next_id: u32,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reaction` for `event`, returning its ID.
    pub fn subscribe(
        &mut self,
        name: &'static str,
        event: PlayerEvent,
        reaction: Reaction,
    ) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;

        self.by_event.entry(event).or_default().push(id);
        self.subscriptions.insert(
            id,
            Subscription {
                id,
                name,
                event,
                reaction,
            },
        );
        id
    }

    /// Remove a subscription. Returns it if it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Subscription> {
        let subscription = self.subscriptions.remove(&id)?;
        if let Some(list) = self.by_event.get_mut(&subscription.event) {
            list.retain(|&sid| sid != id);
            if list.is_empty() {
                self.by_event.remove(&subscription.event);
            }
        }
        Some(subscription)
    }

    /// Reactions subscribed to `event`, in subscription order.
    #[must_use]
    pub fn publish(&self, event: PlayerEvent) -> Fired {
        let Some(ids) = self.by_event.get(&event) else {
            return Fired::new();
        };
        ids.iter()
            .filter_map(|id| self.subscriptions.get(id))
            .map(|s| (s.name, s.reaction))
            .collect()
    }

    /// Get a subscription by ID.
    #[must_use]
    pub fn get(&self, id: SubscriptionId) -> Option<&Subscription> {
        self.subscriptions.get(&id)
    }

    /// Number of subscriptions listening for `event`.
    #[must_use]
    pub fn listeners(&self, event: PlayerEvent) -> usize {
        self.by_event.get(&event).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

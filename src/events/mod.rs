//! Event-driven reactions for players.
//!
//! Limb and attack outcomes are published as [`PlayerEvent`]s on the
//! acting player's [`EventBus`]. Each creature type subscribes its own
//! [`Reaction`]s at construction, so the player itself never needs to know
//! which creature cares about which event.
//!
//! ## Example
//!
//! ```
//! use limb_arena::events::{EventBus, PlayerEvent, Reaction};
//!
//! let mut bus = EventBus::new();
//! bus.subscribe("skip_after_foot_death", PlayerEvent::FootDied, Reaction::SkipTurn);
//!
//! let fired = bus.publish(PlayerEvent::FootDied);
//! assert_eq!(fired.len(), 1);
//! assert!(bus.publish(PlayerEvent::WasAttacked).is_empty());
//! ```

mod bus;
mod event;

pub use bus::{EventBus, Fired, Reaction, Subscription, SubscriptionId};
pub use event::PlayerEvent;

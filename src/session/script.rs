//! In-memory transport that replays canned replies and records events.
//!
//! ```
//! use limb_arena::core::PlayerId;
//! use limb_arena::session::ScriptedTransport;
//!
//! let mut script = ScriptedTransport::new();
//! script.push(PlayerId::new(0), "tap HA 2 FA");
//! script.push_timeout(PlayerId::new(1));
//! assert_eq!(script.pending(PlayerId::new(0)), 1);
//! ```

use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use super::transport::{ActionView, Received, SessionEvent, Transport};
use crate::core::PlayerId;
use crate::error::TransportError;

/// Who an event was delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    One(PlayerId),
    All,
}

/// Scripted participants.
///
/// Each participant answers from its own queue. Asking a participant whose
/// queue is empty fails with [`TransportError::Closed`], which ends the
/// match the same way a dropped connection would.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    replies: FxHashMap<PlayerId, VecDeque<Received>>,
    delivered: Vec<(Recipient, SessionEvent)>,
    prompts: Vec<PlayerId>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action line for `participant`.
    pub fn push(&mut self, participant: PlayerId, line: impl Into<String>) -> &mut Self {
        self.replies
            .entry(participant)
            .or_default()
            .push_back(Received::Action(line.into()));
        self
    }

    /// Queue a timeout for `participant`.
    pub fn push_timeout(&mut self, participant: PlayerId) -> &mut Self {
        self.replies
            .entry(participant)
            .or_default()
            .push_back(Received::TimedOut);
        self
    }

    /// Replies still queued for `participant`.
    #[must_use]
    pub fn pending(&self, participant: PlayerId) -> usize {
        self.replies.get(&participant).map_or(0, VecDeque::len)
    }

    /// Every event delivered so far, in order.
    #[must_use]
    pub fn delivered(&self) -> &[(Recipient, SessionEvent)] {
        &self.delivered
    }

    /// Events that reached `participant`, directly or by broadcast.
    pub fn events_for(&self, participant: PlayerId) -> impl Iterator<Item = &SessionEvent> {
        self.delivered.iter().filter_map(move |(to, event)| match to {
            Recipient::All => Some(event),
            Recipient::One(p) if *p == participant => Some(event),
            Recipient::One(_) => None,
        })
    }

    /// Participants prompted for an action, in order.
    #[must_use]
    pub fn prompts(&self) -> &[PlayerId] {
        &self.prompts
    }
}

impl Transport for ScriptedTransport {
    fn receive_action(
        &mut self,
        participant: PlayerId,
        _view: &ActionView<'_>,
    ) -> Result<Received, TransportError> {
        self.prompts.push(participant);
        self.replies
            .get_mut(&participant)
            .and_then(VecDeque::pop_front)
            .ok_or(TransportError::Closed(participant))
    }

    fn send(&mut self, participant: PlayerId, event: &SessionEvent) -> Result<(), TransportError> {
        self.delivered
            .push((Recipient::One(participant), event.clone()));
        Ok(())
    }

    fn broadcast(&mut self, event: &SessionEvent) -> Result<(), TransportError> {
        self.delivered.push((Recipient::All, event.clone()));
        Ok(())
    }
}

//! The engine's only contact with the outside world.
//!
//! Notifications go out through a [`NotificationSink`] and are never
//! answered. Decisions come back from a [`DecisionSource`] as plain values,
//! bounded by the per-decision budget. Both are handed to the engine at
//! construction.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
pub use crate::errors::DecisionError;
use crate::player::{Chips, PlayerView};
use crate::pot::BettingTable;
use crate::rules::{BettingDecision, BettingRequest, DrawRequest, ValidatedAction};

/// The table as one observer sees it, in round order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub round: u64,
    pub dealer: String,
    pub pot: Chips,
    pub players: Vec<PlayerView>,
    pub community: Vec<Card>,
    pub betting: BettingTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedHand {
    pub name: String,
    pub cards: Vec<Card>,
    pub hand: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    RoundStarted {
        round: u64,
        dealer: String,
        players: Vec<String>,
    },
    AntePosted {
        name: String,
        amount: Chips,
    },
    BlindOpen {
        name: String,
        amount: Chips,
    },
    BlindRaise {
        name: String,
        amount: Chips,
    },
    PlayerActed {
        name: String,
        action: ValidatedAction,
    },
    /// Directed at `name` only: their own private cards.
    CardsDealt {
        name: String,
        cards: Vec<Card>,
    },
    CommunityDealt {
        cards: Vec<Card>,
    },
    StreetCompleted {
        street: usize,
        all_folded: bool,
    },
    Sync(TableSnapshot),
    Showdown {
        hands: Vec<RevealedHand>,
    },
    DrawCompleted {
        name: String,
        replaced: usize,
    },
    PlayerWon {
        name: String,
        amount: Chips,
        hand: Option<String>,
    },
    PlayerEliminated {
        name: String,
    },
    PlayerRemoved {
        name: String,
        money: Chips,
    },
    PlayerJoined {
        name: String,
        money: Chips,
    },
    BlindsIncreased {
        ante: Chips,
        small_raise: Chips,
    },
    GameOver {
        winner: Option<String>,
    },
}

impl Notification {
    /// The single recipient of a directed notification. `None` means every
    /// observer may see it.
    pub fn recipient(&self) -> Option<&str> {
        match self {
            Notification::CardsDealt { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub trait NotificationSink: Send {
    fn notify(&mut self, notification: &Notification);
}

/// Answers the engine's decision requests.
///
/// The engine blocks on each call and only measures the elapsed time once
/// the call returns. Implementations must return within `budget`,
/// answering `Err(DecisionError::Timeout)` themselves when they cannot; a
/// late answer is discarded as a timeout but the table stays stalled until
/// it arrives.
pub trait DecisionSource: Send {
    fn request_betting(
        &mut self,
        request: &BettingRequest,
        budget: Duration,
    ) -> Result<BettingDecision, DecisionError>;

    /// Cards to replace. An empty answer keeps the hand. Bound by `budget`
    /// like `request_betting`.
    fn request_draw(
        &mut self,
        request: &DrawRequest,
        budget: Duration,
    ) -> Result<Vec<Card>, DecisionError>;

    /// Names waiting to be seated, at most `open_seats` of them.
    fn new_players(&mut self, _open_seats: usize) -> Vec<String> {
        Vec::new()
    }

    /// Asked after every round that leaves two or more players.
    fn should_continue(&mut self, _round: u64) -> bool {
        true
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: &Notification) {}
}

/// Keeps every notification. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        match self.log.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Notifications `name` is allowed to receive.
    pub fn visible_to(&self, name: &str) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.recipient().map_or(true, |r| r == name))
            .collect()
    }

    pub fn clear(&self) {
        let mut guard = match self.log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: &Notification) {
        let mut guard = match self.log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_notifications_reach_only_their_recipient() {
        let mut sink = RecordingSink::new();
        let handle = sink.clone();
        sink.notify(&Notification::CardsDealt {
            name: "ann".into(),
            cards: Vec::new(),
        });
        sink.notify(&Notification::GameOver { winner: None });
        assert_eq!(handle.notifications().len(), 2);
        assert_eq!(handle.visible_to("ann").len(), 2);
        assert_eq!(handle.visible_to("bob").len(), 1);
    }

    #[test]
    fn notifications_serialize_with_type_tag() {
        let n = Notification::BlindOpen {
            name: "ann".into(),
            amount: 125,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "blind_open");
        assert_eq!(json["amount"], 125);
    }
}

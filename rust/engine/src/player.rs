use crate::cards::{Card, CardView};
use serde::{Deserialize, Serialize};

/// Whole currency units.
pub type Chips = u64;

/// A seated player: unique name, money balance, what they have put in on
/// the current street, and the cards they hold this round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    money: Chips,
    bet: Chips,
    cards: Vec<Card>,
}

impl Player {
    pub fn new(name: impl Into<String>, money: Chips) -> Self {
        Self {
            name: name.into(),
            money,
            bet: 0,
            cards: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn money(&self) -> Chips {
        self.money
    }

    /// Amount committed on the current street.
    pub fn bet(&self) -> Chips {
        self.bet
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_all_in(&self) -> bool {
        self.money == 0
    }

    pub fn set_cards(&mut self, cards: &[Card]) {
        self.cards.clear();
        self.cards.extend_from_slice(cards);
    }

    pub fn add_money(&mut self, amount: Chips) {
        self.money = self.money.saturating_add(amount);
    }

    /// Moves up to `amount` from the balance onto the street bet and returns
    /// what was actually moved.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let taken = amount.min(self.money);
        self.money -= taken;
        self.bet += taken;
        taken
    }

    pub fn reset_bet(&mut self) {
        self.bet = 0;
    }

    /// Clears per-round state ahead of a new deal.
    pub fn reset_round(&mut self) {
        self.bet = 0;
        self.cards.clear();
    }

    pub fn view(&self, cards: Vec<CardView>, folded: bool) -> PlayerView {
        PlayerView {
            name: self.name.clone(),
            money: self.money,
            bet: self.bet,
            folded,
            cards,
        }
    }
}

/// A player as one observer sees them. Cards the observer may not see are
/// [`CardView::Hidden`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub money: Chips,
    pub bet: Chips,
    pub folded: bool,
    pub cards: Vec<CardView>,
}

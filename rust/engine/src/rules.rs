//! Betting and drawing requests handed to the decision source, and the
//! clamping that turns whatever comes back into a legal action.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::Chips;
use crate::variant::Seat;

/// Everything a decision source needs to choose a betting action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingRequest {
    pub round: u64,
    pub seat: Seat,
    pub name: String,
    /// Amount needed to match the high bet, already capped by `money`.
    pub call_amount: Chips,
    pub min_raise: Chips,
    pub money: Chips,
    pub pot: Chips,
    /// Set once someone at the table can no longer cover the street. Any
    /// non-fold answer then puts the whole stack in.
    pub all_in_forced: bool,
    pub can_raise: bool,
}

/// The answer to a [`BettingRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingDecision {
    Fold,
    Call,
    /// Amount on top of the call.
    Raise(Chips),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(Chips),
    Raise { call: Chips, raise: Chips },
    AllIn(Chips),
}

impl ValidatedAction {
    /// Money this action moves from the player's stack into the pot.
    pub fn amount(&self) -> Chips {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(c) => c,
            ValidatedAction::Raise { call, raise } => call + raise,
            ValidatedAction::AllIn(m) => m,
        }
    }
}

/// Clamps a decision into a legal action. Nothing is ever rejected.
///
/// * a raise below `min_raise` is lifted to it
/// * a raise the stack cannot cover becomes all-in
/// * a raise when raising is closed becomes a call
/// * under `all_in_forced`, a call or raise puts the entire stack in
///
/// ```
/// use cardroom_engine::rules::{validate_action, BettingDecision, BettingRequest, ValidatedAction};
///
/// let req = BettingRequest {
///     round: 1, seat: 0, name: "ann".into(),
///     call_amount: 50, min_raise: 100, money: 1000, pot: 200,
///     all_in_forced: false, can_raise: true,
/// };
/// assert_eq!(
///     validate_action(&req, BettingDecision::Raise(20)),
///     ValidatedAction::Raise { call: 50, raise: 100 }
/// );
/// assert_eq!(validate_action(&req, BettingDecision::Raise(5000)), ValidatedAction::AllIn(1000));
/// ```
pub fn validate_action(req: &BettingRequest, decision: BettingDecision) -> ValidatedAction {
    let call = req.call_amount.min(req.money);
    match decision {
        BettingDecision::Fold => ValidatedAction::Fold,
        _ if req.money == 0 => ValidatedAction::Check,
        _ if req.all_in_forced => ValidatedAction::AllIn(req.money),
        BettingDecision::Raise(_) | BettingDecision::Call if call >= req.money => {
            ValidatedAction::AllIn(req.money)
        }
        BettingDecision::Raise(amount) if req.can_raise => {
            let raise = amount.max(req.min_raise);
            if call.saturating_add(raise) >= req.money {
                ValidatedAction::AllIn(req.money)
            } else {
                ValidatedAction::Raise { call, raise }
            }
        }
        BettingDecision::Call | BettingDecision::Raise(_) => {
            if call == 0 {
                ValidatedAction::Check
            } else {
                ValidatedAction::Call(call)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub round: u64,
    pub seat: Seat,
    pub name: String,
    pub cards: Vec<Card>,
    pub max_discards: usize,
}

/// Drops discards the seat does not hold, duplicates, and anything beyond
/// `max_discards`, keeping the caller's order.
pub fn sanitize_draw(req: &DrawRequest, discards: &[Card]) -> Vec<Card> {
    let mut kept: Vec<Card> = Vec::new();
    for c in discards {
        if kept.len() == req.max_discards {
            break;
        }
        if req.cards.contains(c) && !kept.contains(c) {
            kept.push(*c);
        }
    }
    kept
}

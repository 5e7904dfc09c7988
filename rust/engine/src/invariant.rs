//! Money-conservation checks.
//!
//! Active in debug builds and whenever the `verify` feature is on. Release
//! builds without the feature skip them entirely.

use crate::errors::GameError;
use crate::player::{Chips, Player};
use crate::pot::Pot;

pub const ENABLED: bool = cfg!(any(debug_assertions, feature = "verify"));

/// Balances plus everything in the pot must equal the money in play.
pub fn check_money_sum(expected: Chips, players: &[Player], pot: Option<&Pot>) -> Result<(), GameError> {
    if !ENABLED {
        return Ok(());
    }
    let held: Chips = players.iter().map(Player::money).sum();
    let pooled = pot.map_or(0, Pot::total);
    if held + pooled != expected {
        tracing::error!(expected, held, pooled, "money sum mismatch");
        return Err(GameError::InvariantViolation(format!(
            "money in play {} != expected {expected}",
            held + pooled
        )));
    }
    Ok(())
}

/// Street bets on players must mirror the ledger.
pub fn check_street_bets(players: &[Player], order: &[usize], pot: &Pot) -> Result<(), GameError> {
    if !ENABLED {
        return Ok(());
    }
    for (seat, &idx) in order.iter().enumerate() {
        let Some(p) = players.get(idx) else {
            return Err(GameError::UnknownSeat(idx));
        };
        if p.bet() != pot.street_bet(seat) {
            return Err(GameError::InvariantViolation(format!(
                "{} bet {} but ledger holds {}",
                p.name(),
                p.bet(),
                pot.street_bet(seat)
            )));
        }
    }
    Ok(())
}

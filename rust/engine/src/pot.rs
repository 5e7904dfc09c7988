//! Betting ledger for one round.
//!
//! The ledger keeps two views of every seat's money: what it has put in on
//! the current street (used for call obligations) and what it has put in
//! over the whole round (used to form side pots at showdown). Seats are
//! positions in round order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{Chips, Player};
use crate::variant::Seat;

#[derive(Debug, Clone, Default)]
pub struct Pot {
    committed: Vec<Chips>,
    street: Vec<Chips>,
    folded: Vec<bool>,
    high_bet: Chips,
    last_raise: Chips,
}

/// Money awarded to one seat from one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: Seat,
    pub layer: usize,
    pub amount: Chips,
}

/// A slice of the pot funded equally by every seat that committed at least
/// `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub level: Chips,
    pub amount: Chips,
    pub contributors: Vec<Seat>,
}

/// Observer table: one row per layer, one column per seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingTable {
    pub columns: Vec<Seat>,
    pub rows: Vec<Vec<Chips>>,
}

impl BettingTable {
    pub fn layer_totals(&self) -> Vec<Chips> {
        self.rows.iter().map(|r| r.iter().sum()).collect()
    }
}

impl Pot {
    pub fn new(seats: usize) -> Self {
        Self {
            committed: vec![0; seats],
            street: vec![0; seats],
            folded: vec![false; seats],
            high_bet: 0,
            last_raise: 0,
        }
    }

    pub fn seats(&self) -> usize {
        self.committed.len()
    }

    /// Everything collected so far this round.
    pub fn total(&self) -> Chips {
        self.committed.iter().sum()
    }

    pub fn high_bet(&self) -> Chips {
        self.high_bet
    }

    /// Largest raise increment seen on the current street.
    pub fn last_raise(&self) -> Chips {
        self.last_raise
    }

    pub fn street_bet(&self, seat: Seat) -> Chips {
        self.street.get(seat).copied().unwrap_or(0)
    }

    pub fn committed(&self, seat: Seat) -> Chips {
        self.committed.get(seat).copied().unwrap_or(0)
    }

    pub fn is_folded(&self, seat: Seat) -> bool {
        self.folded.get(seat).copied().unwrap_or(true)
    }

    /// What `seat` still owes to match the street's high bet.
    pub fn player_call_sum(&self, seat: Seat) -> Chips {
        self.high_bet.saturating_sub(self.street_bet(seat))
    }

    /// Matches the high bet, or puts in everything if the player is short.
    pub fn call(&mut self, seat: Seat, player: &mut Player) -> Chips {
        let owed = self.player_call_sum(seat);
        self.put(seat, player, owed)
    }

    /// Calls and then adds `amount` on top, capped by the player's money.
    pub fn raise(&mut self, seat: Seat, player: &mut Player, amount: Chips) -> Chips {
        let owed = self.player_call_sum(seat);
        self.put(seat, player, owed.saturating_add(amount))
    }

    fn put(&mut self, seat: Seat, player: &mut Player, amount: Chips) -> Chips {
        if seat >= self.seats() {
            return 0;
        }
        let moved = player.commit(amount);
        self.street[seat] += moved;
        self.committed[seat] += moved;
        if self.street[seat] > self.high_bet {
            self.last_raise = self.last_raise.max(self.street[seat] - self.high_bet);
            self.high_bet = self.street[seat];
        }
        moved
    }

    pub fn fold(&mut self, seat: Seat) {
        if let Some(f) = self.folded.get_mut(seat) {
            *f = true;
        }
    }

    /// Closes the current street. Round totals are kept for side pots.
    pub fn reset_raise(&mut self) {
        self.street.iter_mut().for_each(|s| *s = 0);
        self.high_bet = 0;
        self.last_raise = 0;
    }

    /// Partitions the round's money into layers, lowest commitment first.
    pub fn layers(&self) -> Vec<Layer> {
        let mut levels: Vec<Chips> = self.committed.iter().copied().filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();
        let mut prev = 0;
        levels
            .into_iter()
            .map(|level| {
                let amount = self
                    .committed
                    .iter()
                    .map(|&c| c.min(level) - c.min(prev))
                    .sum();
                let contributors = (0..self.seats())
                    .filter(|&s| self.committed[s] >= level)
                    .collect();
                prev = level;
                Layer {
                    level,
                    amount,
                    contributors,
                }
            })
            .collect()
    }

    /// Splits every layer among its best live contributors.
    ///
    /// `cmp(a, b)` ranks two seats' hands; `Greater` means `a` wins. Ties
    /// share a layer evenly, and indivisible units go one at a time to the
    /// tied seats earliest in round order. A layer with no live contributor
    /// goes to whoever was eligible for the layer below it.
    pub fn split_pot<F>(&self, cmp: F) -> Result<Vec<Payout>, GameError>
    where
        F: Fn(Seat, Seat) -> Ordering,
    {
        let live: Vec<Seat> = (0..self.seats()).filter(|&s| !self.folded[s]).collect();
        let mut payouts = Vec::new();
        let mut carried: Vec<Seat> = Vec::new();
        let mut prev = 0;

        for (index, layer) in self.layers().into_iter().enumerate() {
            let mut eligible: Vec<Seat> = layer
                .contributors
                .iter()
                .copied()
                .filter(|&s| !self.folded[s])
                .collect();
            if eligible.is_empty() {
                eligible = if carried.is_empty() { live.clone() } else { carried.clone() };
            }

            if eligible.is_empty() {
                // nobody left to win it, hand the layer back
                for s in 0..self.seats() {
                    let back = self.committed[s].min(layer.level) - self.committed[s].min(prev);
                    if back > 0 {
                        payouts.push(Payout {
                            seat: s,
                            layer: index,
                            amount: back,
                        });
                    }
                }
            } else {
                let winners = best_seats(&eligible, &cmp);
                let count = winners.len() as Chips;
                let share = layer.amount / count;
                let mut remainder = layer.amount % count;
                for s in winners {
                    let mut amount = share;
                    if remainder > 0 {
                        amount += 1;
                        remainder -= 1;
                    }
                    tracing::debug!(layer = index, seat = s, amount, "layer awarded");
                    payouts.push(Payout {
                        seat: s,
                        layer: index,
                        amount,
                    });
                }
            }

            carried = eligible;
            prev = layer.level;
        }

        let paid: Chips = payouts.iter().map(|p| p.amount).sum();
        if paid != self.total() {
            return Err(GameError::InvariantViolation(format!(
                "pot split paid {paid} of {}",
                self.total()
            )));
        }
        Ok(payouts)
    }

    /// Per-layer contributions for observers, columns in `round_order`.
    /// Carries no card information.
    pub fn players_betting_data(&self, round_order: &[Seat]) -> BettingTable {
        let mut prev = 0;
        let rows = self
            .layers()
            .iter()
            .map(|layer| {
                let row = round_order
                    .iter()
                    .map(|&s| {
                        let c = self.committed(s);
                        c.min(layer.level) - c.min(prev)
                    })
                    .collect();
                prev = layer.level;
                row
            })
            .collect();
        BettingTable {
            columns: round_order.to_vec(),
            rows,
        }
    }
}

/// Seats holding the best hand under `cmp`, in ascending seat order.
fn best_seats<F>(eligible: &[Seat], cmp: &F) -> Vec<Seat>
where
    F: Fn(Seat, Seat) -> Ordering,
{
    let mut best: Vec<Seat> = Vec::new();
    for &s in eligible {
        match best.first().map(|&b| cmp(s, b)) {
            None | Some(Ordering::Equal) => best.push(s),
            Some(Ordering::Greater) => best = vec![s],
            Some(Ordering::Less) => {}
        }
    }
    best.sort_unstable();
    best
}

/// Sums payouts per seat.
pub fn totals_by_seat(payouts: &[Payout], seats: usize) -> Vec<Chips> {
    let mut totals = vec![0; seats];
    for p in payouts {
        if let Some(t) = totals.get_mut(p.seat) {
            *t += p.amount;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: &[Chips]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &m)| Player::new(format!("p{i}"), m))
            .collect()
    }

    #[test]
    fn call_is_capped_by_money() {
        let mut players = table(&[1000, 60]);
        let mut pot = Pot::new(2);
        pot.raise(0, &mut players[0], 100);
        assert_eq!(pot.player_call_sum(1), 100);
        assert_eq!(pot.call(1, &mut players[1]), 60);
        assert!(players[1].is_all_in());
        assert_eq!(pot.player_call_sum(1), 40);
        assert_eq!(pot.total(), 160);
    }

    #[test]
    fn raise_adds_on_top_of_call() {
        let mut players = table(&[1000, 1000]);
        let mut pot = Pot::new(2);
        pot.raise(0, &mut players[0], 100);
        assert_eq!(pot.raise(1, &mut players[1], 300), 400);
        assert_eq!(pot.high_bet(), 400);
        assert_eq!(pot.last_raise(), 300);
        assert_eq!(pot.player_call_sum(0), 300);
    }

    #[test]
    fn reset_raise_keeps_round_totals() {
        let mut players = table(&[500, 500]);
        let mut pot = Pot::new(2);
        pot.raise(0, &mut players[0], 50);
        pot.call(1, &mut players[1]);
        pot.reset_raise();
        assert_eq!(pot.high_bet(), 0);
        assert_eq!(pot.player_call_sum(1), 0);
        assert_eq!(pot.committed(1), 50);
        assert_eq!(pot.total(), 100);
    }

    #[test]
    fn short_all_in_only_wins_layers_it_funded() {
        let mut players = table(&[50, 200, 200]);
        let mut pot = Pot::new(3);
        pot.raise(0, &mut players[0], 50);
        pot.raise(1, &mut players[1], 150);
        pot.call(2, &mut players[2]);
        assert_eq!(pot.total(), 450);

        let layers = pot.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].amount, 150);
        assert_eq!(layers[0].contributors, vec![0, 1, 2]);
        assert_eq!(layers[1].amount, 300);
        assert_eq!(layers[1].contributors, vec![1, 2]);

        // seat 0 holds the best hand, seat 2 the second best
        let strength = [3, 1, 2];
        let payouts = pot.split_pot(|a, b| strength[a].cmp(&strength[b])).unwrap();
        assert_eq!(totals_by_seat(&payouts, 3), vec![150, 0, 300]);
    }

    #[test]
    fn folded_money_stays_in_the_pot() {
        let mut players = table(&[1000, 1000, 1000]);
        let mut pot = Pot::new(3);
        pot.raise(0, &mut players[0], 100);
        pot.call(1, &mut players[1]);
        pot.raise(2, &mut players[2], 300);
        pot.fold(0);
        pot.call(1, &mut players[1]);
        let payouts = pot.split_pot(|a, b| a.cmp(&b).reverse()).unwrap();
        // seat 0 would win on strength but folded
        assert_eq!(totals_by_seat(&payouts, 3), vec![0, 900, 0]);
    }

    #[test]
    fn odd_chip_goes_to_earliest_tied_seat() {
        let mut players = table(&[101, 1000, 1000]);
        let mut pot = Pot::new(3);
        pot.raise(0, &mut players[0], 101);
        pot.call(1, &mut players[1]);
        pot.call(2, &mut players[2]);
        pot.fold(0);
        let payouts = pot.split_pot(|_, _| Ordering::Equal).unwrap();
        assert_eq!(totals_by_seat(&payouts, 3), vec![0, 152, 151]);
    }

    #[test]
    fn betting_table_has_one_row_per_layer() {
        let mut players = table(&[50, 200, 200]);
        let mut pot = Pot::new(3);
        pot.raise(0, &mut players[0], 50);
        pot.raise(1, &mut players[1], 150);
        pot.call(2, &mut players[2]);
        let data = pot.players_betting_data(&[2, 0, 1]);
        assert_eq!(data.columns, vec![2, 0, 1]);
        assert_eq!(data.rows, vec![vec![50, 50, 50], vec![150, 0, 150]]);
        assert_eq!(data.layer_totals(), vec![150, 300]);
    }
}

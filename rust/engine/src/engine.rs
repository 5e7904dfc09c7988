use std::fmt;
use std::time::{Duration, Instant};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cards::CardView;
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::errors::{DecisionError, GameError};
use crate::hand::Hand;
use crate::helper::{DecisionSource, Notification, NotificationSink, RevealedHand, TableSnapshot};
use crate::invariant;
use crate::player::{Chips, Player, PlayerView};
use crate::pot::{totals_by_seat, BettingTable, Pot};
use crate::rules::{
    sanitize_draw, validate_action, BettingDecision, BettingRequest, DrawRequest, ValidatedAction,
};
use crate::variant::{Deal, GameVariant, Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    RoundStart,
    AnteAndBlinds,
    Betting,
    Showdown,
    Payout,
    RoundEnd,
    GameOver,
}

/// Money a player took from the pot this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
    pub amount: Chips,
    /// Set when the pot was contested at showdown.
    pub hand: Option<Hand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u64,
    pub pot: Chips,
    pub showdown: bool,
    pub awards: Vec<Award>,
    pub eliminated: Vec<String>,
    pub removed: Vec<String>,
    pub joined: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub money: Chips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub rounds_played: u64,
    pub winner: Option<String>,
    /// Richest first.
    pub standings: Vec<Standing>,
}

/// Per-round state. Seats are positions in round order; `order[seat]` is
/// the roster index of the player in that seat.
struct RoundTable {
    game: Box<dyn GameVariant>,
    pot: Pot,
    order: Vec<usize>,
    names: Vec<String>,
    disconnected: Vec<bool>,
    revealed: bool,
    settled: bool,
}

impl RoundTable {
    fn live(&self) -> Vec<Seat> {
        (0..self.order.len())
            .filter(|&s| !self.pot.is_folded(s))
            .collect()
    }

    fn live_count(&self) -> usize {
        (0..self.order.len())
            .filter(|&s| !self.pot.is_folded(s))
            .count()
    }
}

/// Round orchestrator.
///
/// Owns the roster and drives one round at a time: forced bets, betting
/// streets, card events, showdown, payout and roster reconciliation. All
/// decisions come from the [`DecisionSource`] and every observable event goes
/// to the [`NotificationSink`]; the engine runs on the caller's thread and
/// only blocks while waiting for a decision.
///
/// ```
/// use cardroom_engine::config::TableConfig;
/// use cardroom_engine::engine::{Engine, EngineState};
/// use cardroom_engine::helper::{DecisionSource, DecisionError, NullSink};
/// use cardroom_engine::rules::{BettingDecision, BettingRequest, DrawRequest};
/// use cardroom_engine::cards::Card;
/// use std::time::Duration;
///
/// struct AlwaysCall;
///
/// impl DecisionSource for AlwaysCall {
///     fn request_betting(&mut self, _: &BettingRequest, _: Duration) -> Result<BettingDecision, DecisionError> {
///         Ok(BettingDecision::Call)
///     }
///     fn request_draw(&mut self, _: &DrawRequest, _: Duration) -> Result<Vec<Card>, DecisionError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let config = TableConfig { seed: Some(7), ..TableConfig::default() };
/// let names = vec!["ann".to_string(), "bob".to_string()];
/// let mut engine = Engine::new(config, names, Box::new(NullSink), Box::new(AlwaysCall)).unwrap();
/// let outcome = engine.play_round().unwrap();
/// assert_eq!(outcome.round, 1);
/// assert_eq!(engine.players().iter().map(|p| p.money()).sum::<u64>(), 10_000);
/// assert_ne!(engine.state(), EngineState::Idle);
/// ```
pub struct Engine {
    config: TableConfig,
    players: Vec<Player>,
    dealer: Option<usize>,
    round: u64,
    ante: Chips,
    small_raise: Chips,
    total_money: Chips,
    state: EngineState,
    rng: ChaCha20Rng,
    next_deck: Option<Deck>,
    table: Option<RoundTable>,
    sink: Box<dyn NotificationSink>,
    source: Box<dyn DecisionSource>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("variant", &self.config.variant)
            .field("players", &self.players)
            .field("round", &self.round)
            .field("state", &self.state)
            .field("total_money", &self.total_money)
            .finish_non_exhaustive()
    }
}

fn check_name(players: &[Player], name: &str) -> Result<(), GameError> {
    if name.trim().is_empty() {
        return Err(GameError::EmptyPlayerName);
    }
    if players.iter().any(|p| p.name() == name) {
        return Err(GameError::DuplicatePlayerName(name.to_string()));
    }
    Ok(())
}

/// Runs one decision request, treating an answer that arrives after the
/// budget as a timeout. The request itself is not interrupted.
fn timed<T>(
    budget: Duration,
    request: impl FnOnce() -> Result<T, DecisionError>,
) -> Result<T, DecisionError> {
    let started = Instant::now();
    let answer = request()?;
    if started.elapsed() > budget {
        Err(DecisionError::Timeout)
    } else {
        Ok(answer)
    }
}

impl Engine {
    pub fn new(
        config: TableConfig,
        names: Vec<String>,
        sink: Box<dyn NotificationSink>,
        source: Box<dyn DecisionSource>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let max = config.seat_limit();
        if names.len() < 2 || names.len() > max {
            return Err(GameError::InvalidPlayerCount {
                count: names.len(),
                max,
            });
        }
        let mut players: Vec<Player> = Vec::with_capacity(names.len());
        for name in names {
            check_name(&players, &name)?;
            players.push(Player::new(name, config.starting_money));
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        let total_money = config.starting_money * players.len() as Chips;
        Ok(Self {
            ante: config.ante,
            small_raise: config.small_raise,
            dealer: None,
            round: 0,
            total_money,
            state: EngineState::Idle,
            rng: ChaCha20Rng::seed_from_u64(seed),
            next_deck: None,
            table: None,
            players,
            config,
            sink,
            source,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Current roster in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn ante(&self) -> Chips {
        self.ante
    }

    pub fn small_raise(&self) -> Chips {
        self.small_raise
    }

    /// Money still in play, excluding anything that left with removed players.
    pub fn total_money(&self) -> Chips {
        self.total_money
    }

    /// Deals the next round from `deck` instead of a fresh shuffle.
    pub fn set_next_deck(&mut self, deck: Deck) {
        self.next_deck = Some(deck);
    }

    /// Plays rounds until one player is left or the decision source stops
    /// the game.
    pub fn run(&mut self) -> Result<GameSummary, GameError> {
        while self.state != EngineState::GameOver {
            self.play_round()?;
            if self.state != EngineState::GameOver && !self.source.should_continue(self.round) {
                self.end_game();
            }
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> GameSummary {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|p| Standing {
                name: p.name().to_string(),
                money: p.money(),
            })
            .collect();
        standings.sort_by(|a, b| b.money.cmp(&a.money).then_with(|| a.name.cmp(&b.name)));
        GameSummary {
            rounds_played: self.round,
            winner: self.winner(),
            standings,
        }
    }

    fn winner(&self) -> Option<String> {
        match self.players.as_slice() {
            [only] => Some(only.name().to_string()),
            _ => None,
        }
    }

    pub fn play_round(&mut self) -> Result<RoundOutcome, GameError> {
        if self.state == EngineState::GameOver || self.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        let mut t = self.start_round()?;
        let start = self.post_forced_bets(&mut t)?;

        let mut street = 0;
        let mut offset = start;
        loop {
            self.betting_street(&mut t, street, offset)?;
            if t.live_count() <= 1 {
                break;
            }
            match t.game.advance()? {
                Some(deal) => self.handle_deal(&mut t, deal)?,
                None => break,
            }
            street += 1;
            offset = 0;
        }

        let pot = t.pot.total();
        let (hands, showdown) = self.showdown(&mut t);
        let awards = self.pay_out(&mut t, &hands, showdown)?;
        let (eliminated, removed) = self.reconcile(&t);
        self.table = Some(t);

        self.escalate_blinds(!eliminated.is_empty());
        let joined = self.admit_players();
        invariant::check_money_sum(self.total_money, &self.players, None)?;

        info!(
            round = self.round,
            pot,
            players = self.players.len(),
            "round finished"
        );
        if self.players.len() < 2 {
            self.end_game();
        } else {
            self.state = EngineState::RoundEnd;
        }

        Ok(RoundOutcome {
            round: self.round,
            pot,
            showdown,
            awards,
            eliminated,
            removed,
            joined,
        })
    }

    fn end_game(&mut self) {
        self.state = EngineState::GameOver;
        let winner = self.winner();
        info!(rounds = self.round, winner = ?winner, "game over");
        self.sink.notify(&Notification::GameOver { winner });
    }

    fn start_round(&mut self) -> Result<RoundTable, GameError> {
        self.state = EngineState::RoundStart;
        self.round += 1;
        let n = self.players.len();
        // the first button goes to the last seat so seat 0 acts first
        let dealer = self.dealer.map_or(n - 1, |d| (d + 1) % n);
        self.dealer = Some(dealer);
        let order: Vec<usize> = (1..=n).map(|k| (dealer + k) % n).collect();
        for p in &mut self.players {
            p.reset_round();
        }

        let deck = match self.next_deck.take() {
            Some(deck) => deck,
            None => Deck::shuffled(self.rng.next_u64()),
        };
        let mut game = self.config.variant.new_game(deck);
        game.begin_round(n)?;

        let names: Vec<String> = order
            .iter()
            .map(|&i| self.players[i].name().to_string())
            .collect();
        let dealer = self.players[dealer].name().to_string();
        info!(
            round = self.round,
            dealer = %dealer,
            players = n,
            variant = %self.config.variant,
            "round started"
        );
        self.sink.notify(&Notification::RoundStarted {
            round: self.round,
            dealer,
            players: names.clone(),
        });

        let t = RoundTable {
            game,
            pot: Pot::new(n),
            order,
            names,
            disconnected: vec![false; n],
            revealed: false,
            settled: false,
        };
        self.table = None;
        self.sync_cards(&t);
        self.sync(&t);
        Ok(t)
    }

    /// Posts the ante street and the blinds. Returns the seat that opens the
    /// first voluntary betting.
    fn post_forced_bets(&mut self, t: &mut RoundTable) -> Result<Seat, GameError> {
        self.state = EngineState::AnteAndBlinds;
        let n = t.order.len();

        if self.ante > 0 {
            let amount = t.pot.raise(0, &mut self.players[t.order[0]], self.ante);
            self.sink.notify(&Notification::AntePosted {
                name: t.names[0].clone(),
                amount,
            });
            for seat in 1..n {
                t.pot.call(seat, &mut self.players[t.order[seat]]);
            }
            self.close_street(t);
            debug!(round = self.round, amount, pot = t.pot.total(), "ante collected");
        }

        let open = self.small_raise / 2;
        let opener = 1 % n;
        let amount = t.pot.raise(opener, &mut self.players[t.order[opener]], open);
        debug!(round = self.round, seat = opener, amount, "blind open");
        self.sink.notify(&Notification::BlindOpen {
            name: t.names[opener].clone(),
            amount,
        });
        if n < 3 {
            invariant::check_money_sum(self.total_money, &self.players, Some(&t.pot))?;
            return Ok(opener);
        }

        let raiser = 2;
        let to_complete = self.small_raise.saturating_sub(t.pot.high_bet());
        let amount = t.pot.raise(raiser, &mut self.players[t.order[raiser]], to_complete);
        debug!(round = self.round, seat = raiser, amount, "blind raise");
        self.sink.notify(&Notification::BlindRaise {
            name: t.names[raiser].clone(),
            amount,
        });
        invariant::check_money_sum(self.total_money, &self.players, Some(&t.pot))?;
        Ok(3 % n)
    }

    fn close_street(&mut self, t: &mut RoundTable) {
        t.pot.reset_raise();
        for &idx in &t.order {
            self.players[idx].reset_bet();
        }
    }

    /// True while at least one live seat could still put money in.
    fn anyone_can_act(&self, t: &RoundTable) -> bool {
        let actors: Vec<Seat> = t
            .live()
            .into_iter()
            .filter(|&s| self.players[t.order[s]].money() > 0)
            .collect();
        match actors.as_slice() {
            [] => false,
            [only] => t.pot.player_call_sum(*only) > 0,
            _ => true,
        }
    }

    fn others_all_in(&self, t: &RoundTable, seat: Seat) -> bool {
        t.live()
            .into_iter()
            .filter(|&s| s != seat)
            .all(|s| self.players[t.order[s]].money() == 0)
    }

    fn betting_street(
        &mut self,
        t: &mut RoundTable,
        street: usize,
        start: Seat,
    ) -> Result<(), GameError> {
        self.state = EngineState::Betting;
        let n = t.order.len();
        let budget = self.config.decision_budget();
        let mut live = t.live_count();
        let raise_cap = self.config.raise_limit * live;
        let mut raises = 0;
        // a blind poster may already be all-in short of the high bet
        let mut all_in_mode = t.live().iter().any(|&s| {
            self.players[t.order[s]].is_all_in() && t.pot.street_bet(s) < t.pot.high_bet()
        });
        let mut settled = 0;
        let mut pos = start;

        if !self.anyone_can_act(t) {
            debug!(round = self.round, street, "nobody can act, street skipped");
            settled = live;
        }

        while live > 1 && settled < live {
            let seat = pos % n;
            pos += 1;
            if t.pot.is_folded(seat) {
                continue;
            }
            let idx = t.order[seat];
            let money = self.players[idx].money();
            let owed = t.pot.player_call_sum(seat);
            if money == 0 || (owed == 0 && self.others_all_in(t, seat)) {
                settled += 1;
                continue;
            }
            if money <= owed {
                all_in_mode = true;
            }

            let request = BettingRequest {
                round: self.round,
                seat,
                name: t.names[seat].clone(),
                call_amount: owed.min(money),
                min_raise: t.pot.last_raise().max(self.small_raise),
                money,
                pot: t.pot.total(),
                all_in_forced: all_in_mode,
                can_raise: raises < raise_cap,
            };
            let answer = if t.disconnected[seat] {
                Err(DecisionError::Disconnected)
            } else {
                let source = &mut self.source;
                timed(budget, || source.request_betting(&request, budget))
            };
            let decision = match answer {
                Ok(decision) => decision,
                Err(e) => {
                    self.decision_failed(t, seat, &e);
                    BettingDecision::Fold
                }
            };

            let action = validate_action(&request, decision);
            let high_before = t.pot.high_bet();
            match action {
                ValidatedAction::Fold => {
                    t.pot.fold(seat);
                    t.game.fold(seat)?;
                    live -= 1;
                }
                ValidatedAction::Check | ValidatedAction::Call(_) => {
                    t.pot.call(seat, &mut self.players[idx]);
                    settled += 1;
                }
                ValidatedAction::Raise { raise, .. } => {
                    t.pot.raise(seat, &mut self.players[idx], raise);
                    raises += 1;
                    settled = 1;
                }
                ValidatedAction::AllIn(amount) => {
                    t.pot.raise(seat, &mut self.players[idx], amount);
                    if t.pot.street_bet(seat) > high_before {
                        raises += 1;
                        settled = 1;
                    } else {
                        settled += 1;
                    }
                }
            }
            if self.players[idx].is_all_in() && t.pot.street_bet(seat) < t.pot.high_bet() {
                all_in_mode = true;
            }

            debug!(
                round = self.round,
                street,
                seat,
                player = %t.names[seat],
                action = ?action,
                pot = t.pot.total(),
                "player acted"
            );
            self.sink.notify(&Notification::PlayerActed {
                name: t.names[seat].clone(),
                action,
            });
            invariant::check_money_sum(self.total_money, &self.players, Some(&t.pot))?;
            invariant::check_street_bets(&self.players, &t.order, &t.pot)?;
        }

        self.close_street(t);
        self.sink.notify(&Notification::StreetCompleted {
            street,
            all_folded: live <= 1,
        });
        self.sync(t);
        Ok(())
    }

    fn decision_failed(&mut self, t: &mut RoundTable, seat: Seat, error: &DecisionError) {
        if *error == DecisionError::Disconnected {
            t.disconnected[seat] = true;
        }
        warn!(
            round = self.round,
            seat,
            player = %t.names[seat],
            error = %error,
            "decision failed, acting on the player's behalf"
        );
    }

    fn handle_deal(&mut self, t: &mut RoundTable, deal: Deal) -> Result<(), GameError> {
        match deal {
            Deal::Community(cards) => {
                debug!(round = self.round, cards = cards.len(), "community cards dealt");
                self.sink.notify(&Notification::CommunityDealt { cards });
            }
            Deal::Single { face_up } => {
                debug!(round = self.round, face_up, "single card dealt");
                self.sync_cards(t);
            }
            Deal::DrawPhase => self.draw_phase(t)?,
        }
        self.sync(t);
        Ok(())
    }

    fn draw_phase(&mut self, t: &mut RoundTable) -> Result<(), GameError> {
        let budget = self.config.decision_budget();
        for seat in 0..t.order.len() {
            if t.pot.is_folded(seat) {
                continue;
            }
            let request = DrawRequest {
                round: self.round,
                seat,
                name: t.names[seat].clone(),
                cards: t.game.cards(seat).to_vec(),
                max_discards: t.game.draws_remaining(seat),
            };
            let answer = if t.disconnected[seat] {
                Err(DecisionError::Disconnected)
            } else if request.max_discards == 0 {
                Ok(Vec::new())
            } else {
                let source = &mut self.source;
                timed(budget, || source.request_draw(&request, budget))
            };
            let discards = match answer {
                Ok(cards) => sanitize_draw(&request, &cards),
                Err(e) => {
                    self.decision_failed(t, seat, &e);
                    Vec::new()
                }
            };
            let fresh = if discards.is_empty() {
                Vec::new()
            } else {
                t.game.draw(seat, &discards)?
            };

            let cards = t.game.cards(seat).to_vec();
            self.players[t.order[seat]].set_cards(&cards);
            debug!(round = self.round, seat, replaced = fresh.len(), "draw completed");
            self.sink.notify(&Notification::DrawCompleted {
                name: t.names[seat].clone(),
                replaced: fresh.len(),
            });
            self.sink.notify(&Notification::CardsDealt {
                name: t.names[seat].clone(),
                cards,
            });
        }
        Ok(())
    }

    /// Best hand per seat, `None` for folded seats, and whether the pot was
    /// contested.
    fn showdown(&mut self, t: &mut RoundTable) -> (Vec<Option<Hand>>, bool) {
        self.state = EngineState::Showdown;
        let live = t.live();
        let results = t.game.end_round();
        let hands: Vec<Option<Hand>> = (0..t.order.len())
            .map(|s| {
                if t.pot.is_folded(s) {
                    None
                } else {
                    t.game.best_hand(s)
                }
            })
            .collect();

        let contested = live.len() >= 2;
        if contested {
            t.revealed = true;
            let revealed = live
                .iter()
                .map(|&s| RevealedHand {
                    name: t.names[s].clone(),
                    cards: t.game.cards(s).to_vec(),
                    hand: hands[s].map(|h| h.to_string()).unwrap_or_default(),
                })
                .collect();
            self.sink.notify(&Notification::Showdown { hands: revealed });
            for r in &results {
                debug!(round = self.round, seat = r.seat, hand = %r.hand, "best hand");
            }
        }
        (hands, contested)
    }

    fn pay_out(
        &mut self,
        t: &mut RoundTable,
        hands: &[Option<Hand>],
        contested: bool,
    ) -> Result<Vec<Award>, GameError> {
        self.state = EngineState::Payout;
        // a folded seat holds no hand and loses to any held hand
        let payouts = t.pot.split_pot(|a, b| hands[a].cmp(&hands[b]))?;
        let totals = totals_by_seat(&payouts, t.order.len());

        let mut awards = Vec::new();
        for (seat, &amount) in totals.iter().enumerate() {
            if amount == 0 {
                continue;
            }
            self.players[t.order[seat]].add_money(amount);
            let hand = if contested { hands[seat] } else { None };
            info!(round = self.round, player = %t.names[seat], amount, "pot awarded");
            self.sink.notify(&Notification::PlayerWon {
                name: t.names[seat].clone(),
                amount,
                hand: hand.map(|h| h.to_string()),
            });
            awards.push(Award {
                name: t.names[seat].clone(),
                amount,
                hand,
            });
        }
        t.settled = true;
        invariant::check_money_sum(self.total_money, &self.players, None)?;
        self.sync(t);
        Ok(awards)
    }

    /// Drops bankrupt and disconnected players. Returns (eliminated, removed).
    fn reconcile(&mut self, t: &RoundTable) -> (Vec<String>, Vec<String>) {
        self.state = EngineState::RoundEnd;
        let mut eliminated = Vec::new();
        let mut removed = Vec::new();
        let mut gone = Vec::new();

        for (seat, &idx) in t.order.iter().enumerate() {
            let name = t.names[seat].clone();
            let money = self.players[idx].money();
            if money == 0 {
                info!(round = self.round, player = %name, "player eliminated");
                self.sink.notify(&Notification::PlayerEliminated { name: name.clone() });
                eliminated.push(name);
                gone.push(idx);
            } else if t.disconnected[seat] {
                self.total_money -= money;
                info!(round = self.round, player = %name, money, "disconnected player removed");
                self.sink.notify(&Notification::PlayerRemoved {
                    name: name.clone(),
                    money,
                });
                removed.push(name);
                gone.push(idx);
            }
        }

        gone.sort_unstable_by(|a, b| b.cmp(a));
        for idx in gone {
            self.remove_player(idx);
        }
        (eliminated, removed)
    }

    fn remove_player(&mut self, idx: usize) {
        self.players.remove(idx);
        let n = self.players.len();
        self.dealer = match self.dealer {
            _ if n == 0 => None,
            Some(d) if idx < d => Some(d - 1),
            // the next advance lands on whoever sat after the old dealer
            Some(d) if idx == d => Some((idx + n - 1) % n),
            other => other,
        };
    }

    fn escalate_blinds(&mut self, eliminated: bool) {
        if !self.config.tournament {
            return;
        }
        if self.round % self.config.auto_increase_on_hand_divider != 0 && !eliminated {
            return;
        }
        let cap = self.total_money / 2;
        let ante = (self.ante + self.config.ante).min(cap);
        let small_raise = (self.small_raise + self.config.small_raise).min(cap);
        if ante == self.ante && small_raise == self.small_raise {
            return;
        }
        self.ante = ante;
        self.small_raise = small_raise;
        info!(round = self.round, ante, small_raise, "blinds increased");
        self.sink
            .notify(&Notification::BlindsIncreased { ante, small_raise });
    }

    fn admit_players(&mut self) -> Vec<String> {
        let limit = self.config.seat_limit();
        if self.config.tournament || self.players.is_empty() || self.players.len() >= limit {
            return Vec::new();
        }
        let mut joined = Vec::new();
        for name in self.source.new_players(limit - self.players.len()) {
            if self.players.len() >= limit {
                warn!(player = %name, "table full, join rejected");
                continue;
            }
            if let Err(e) = check_name(&self.players, &name) {
                warn!(player = %name, error = %e, "join rejected");
                continue;
            }
            let money = self.config.starting_money;
            self.players.push(Player::new(name.clone(), money));
            self.total_money += money;
            info!(round = self.round, player = %name, money, "player joined");
            self.sink.notify(&Notification::PlayerJoined {
                name: name.clone(),
                money,
            });
            joined.push(name);
        }
        joined
    }

    /// Copies dealt cards onto players and tells each live player their own.
    fn sync_cards(&mut self, t: &RoundTable) {
        for (seat, &idx) in t.order.iter().enumerate() {
            let cards = t.game.cards(seat);
            self.players[idx].set_cards(cards);
            if !t.game.is_folded(seat) {
                self.sink.notify(&Notification::CardsDealt {
                    name: t.names[seat].clone(),
                    cards: cards.to_vec(),
                });
            }
        }
    }

    fn sync(&mut self, t: &RoundTable) {
        let snapshot = self.table_view(t, None);
        self.sink.notify(&Notification::Sync(snapshot));
    }

    /// The table as `viewer` sees it. `None` is a spectator.
    pub fn snapshot(&self, viewer: Option<&str>) -> TableSnapshot {
        if let Some(t) = &self.table {
            return self.table_view(t, viewer);
        }
        let n = self.players.len();
        let dealer = self.dealer.unwrap_or(n.saturating_sub(1));
        let order: Vec<usize> = (1..=n).map(|k| (dealer + k) % n).collect();
        TableSnapshot {
            round: self.round,
            dealer: self
                .players
                .get(dealer)
                .map(|p| p.name().to_string())
                .unwrap_or_default(),
            pot: 0,
            players: order
                .iter()
                .filter_map(|&i| self.players.get(i))
                .map(|p| p.view(Vec::new(), false))
                .collect(),
            community: Vec::new(),
            betting: BettingTable {
                columns: Vec::new(),
                rows: Vec::new(),
            },
        }
    }

    fn table_view(&self, t: &RoundTable, viewer: Option<&str>) -> TableSnapshot {
        let viewer_seat = viewer.and_then(|v| t.names.iter().position(|n| n == v));
        let players = t
            .names
            .iter()
            .enumerate()
            .map(|(seat, name)| {
                let folded = t.pot.is_folded(seat);
                let cards = if t.revealed && !folded {
                    t.game.cards(seat).iter().copied().map(CardView::Face).collect()
                } else {
                    t.game.view(seat, viewer_seat)
                };
                match self.player(name) {
                    Some(p) => p.view(cards, folded),
                    None => PlayerView {
                        name: name.clone(),
                        money: 0,
                        bet: 0,
                        folded,
                        cards,
                    },
                }
            })
            .collect();
        let seats: Vec<Seat> = (0..t.order.len()).collect();
        TableSnapshot {
            round: self.round,
            dealer: t.names.last().cloned().unwrap_or_default(),
            pot: if t.settled { 0 } else { t.pot.total() },
            players,
            community: t.game.community().to_vec(),
            betting: t.pot.players_betting_data(&seats),
        }
    }
}

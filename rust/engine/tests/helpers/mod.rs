#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cardroom_engine::cards::{parse_cards, Card};
use cardroom_engine::config::TableConfig;
use cardroom_engine::deck::Deck;
use cardroom_engine::engine::Engine;
use cardroom_engine::errors::DecisionError;
use cardroom_engine::helper::{DecisionSource, Notification, RecordingSink};
use cardroom_engine::rules::{BettingDecision, BettingRequest, DrawRequest};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub type BettingScript =
    Box<dyn FnMut(&BettingRequest) -> Result<BettingDecision, DecisionError> + Send>;
pub type DrawScript = Box<dyn FnMut(&DrawRequest) -> Result<Vec<Card>, DecisionError> + Send>;

/// Decision source driven by closures. Every request it sees is recorded.
pub struct ScriptedSource {
    betting: BettingScript,
    draws: DrawScript,
    joiners: VecDeque<String>,
    stop_after: Option<u64>,
    pub betting_log: Arc<Mutex<Vec<BettingRequest>>>,
    pub draw_log: Arc<Mutex<Vec<DrawRequest>>>,
    pub open_seats_log: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedSource {
    pub fn new(betting: BettingScript) -> Self {
        Self {
            betting,
            draws: Box::new(|_| Ok(Vec::new())),
            joiners: VecDeque::new(),
            stop_after: None,
            betting_log: Arc::default(),
            draw_log: Arc::default(),
            open_seats_log: Arc::default(),
        }
    }

    pub fn calling() -> Self {
        Self::new(Box::new(|_| Ok(BettingDecision::Call)))
    }

    pub fn folding() -> Self {
        Self::new(Box::new(|_| Ok(BettingDecision::Fold)))
    }

    pub fn with_draws(mut self, draws: DrawScript) -> Self {
        self.draws = draws;
        self
    }

    pub fn with_joiners(mut self, names: &[&str]) -> Self {
        self.joiners = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn stop_after(mut self, rounds: u64) -> Self {
        self.stop_after = Some(rounds);
        self
    }
}

impl DecisionSource for ScriptedSource {
    fn request_betting(
        &mut self,
        request: &BettingRequest,
        _budget: Duration,
    ) -> Result<BettingDecision, DecisionError> {
        self.betting_log.lock().unwrap().push(request.clone());
        (self.betting)(request)
    }

    fn request_draw(
        &mut self,
        request: &DrawRequest,
        _budget: Duration,
    ) -> Result<Vec<Card>, DecisionError> {
        self.draw_log.lock().unwrap().push(request.clone());
        (self.draws)(request)
    }

    fn new_players(&mut self, open_seats: usize) -> Vec<String> {
        self.open_seats_log.lock().unwrap().push(open_seats);
        let n = open_seats.min(self.joiners.len());
        self.joiners.drain(..n).collect()
    }

    fn should_continue(&mut self, round: u64) -> bool {
        self.stop_after.map_or(true, |last| round < last)
    }
}

/// Answers uniformly at random from a seeded generator.
pub struct RandomSource {
    rng: ChaCha20Rng,
    pub betting_log: Arc<Mutex<Vec<BettingRequest>>>,
    stop_after: u64,
}

impl RandomSource {
    pub fn new(seed: u64, stop_after: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            betting_log: Arc::default(),
            stop_after,
        }
    }
}

impl DecisionSource for RandomSource {
    fn request_betting(
        &mut self,
        request: &BettingRequest,
        _budget: Duration,
    ) -> Result<BettingDecision, DecisionError> {
        self.betting_log.lock().unwrap().push(request.clone());
        Ok(match self.rng.random_range(0..10) {
            0 => BettingDecision::Fold,
            1..=6 => BettingDecision::Call,
            _ => BettingDecision::Raise(self.rng.random_range(0..=request.money)),
        })
    }

    fn request_draw(
        &mut self,
        request: &DrawRequest,
        _budget: Duration,
    ) -> Result<Vec<Card>, DecisionError> {
        // deliberately asks for too many at times
        let n = self.rng.random_range(0..=5);
        Ok(request.cards.iter().copied().take(n).collect())
    }

    fn should_continue(&mut self, round: u64) -> bool {
        round < self.stop_after
    }
}

pub fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("p{i}")).collect()
}

pub fn engine_with(
    config: TableConfig,
    players: usize,
    source: impl DecisionSource + 'static,
) -> (Engine, RecordingSink) {
    let sink = RecordingSink::new();
    let engine = Engine::new(config, names(players), Box::new(sink.clone()), Box::new(source))
        .expect("valid table");
    (engine, sink)
}

pub fn seeded(seed: u64) -> TableConfig {
    TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    }
}

pub fn money_in_play(engine: &Engine) -> u64 {
    engine.players().iter().map(|p| p.money()).sum()
}

pub fn stacked(cards: &str) -> Deck {
    Deck::stacked(parse_cards(cards).expect("valid cards"))
}

/// Four seats: p0 and p2 tie with a pair of aces, p1 and p3 hold ace high.
pub fn four_way_tie_deck() -> Deck {
    stacked("Ad 5c Ac 8c 3c 6d 4d 9d Th As Ks Qd Tc 7c Td 2h")
}

/// Everyone plays a royal flush on the board.
pub fn royal_board_deck() -> Deck {
    stacked("2c 3c 4c 5c 2d 3d 4d 5d 6h As Ks Qs 6c Js 6d Ts")
}

pub fn acted(sink: &RecordingSink, player: &str) -> Vec<cardroom_engine::rules::ValidatedAction> {
    sink.notifications()
        .into_iter()
        .filter_map(|n| match n {
            Notification::PlayerActed { name, action } if name == player => Some(action),
            _ => None,
        })
        .collect()
}

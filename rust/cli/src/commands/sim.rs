//! Simulation command handler.
//!
//! Seats random bots at a table built from the layered configuration and
//! plays rounds until one bot holds all the money or the round cap is hit.
//! Bots pick uniformly among legal-looking answers; the engine clamps
//! whatever they send into a legal action.

use std::io::Write;
use std::time::Duration;

use cardroom_engine::cards::Card;
use cardroom_engine::config::TableConfig;
use cardroom_engine::engine::{Engine, EngineState, RoundOutcome};
use cardroom_engine::errors::DecisionError;
use cardroom_engine::helper::{DecisionSource, RecordingSink};
use cardroom_engine::rules::{BettingDecision, BettingRequest, DrawRequest};
use cardroom_engine::variant::VariantKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config;
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimArgs {
    pub players: usize,
    pub rounds: u64,
    pub variant: Option<VariantKind>,
    pub seed: Option<u64>,
    pub tournament: bool,
    pub events: bool,
}

/// Answers every request at random from its own seeded stream.
#[derive(Debug)]
pub struct RandomBots {
    rng: ChaCha20Rng,
}

impl RandomBots {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionSource for RandomBots {
    fn request_betting(
        &mut self,
        request: &BettingRequest,
        _budget: Duration,
    ) -> Result<BettingDecision, DecisionError> {
        let roll: f64 = self.rng.random();
        let decision = if request.call_amount > 0 && roll < 0.15 {
            BettingDecision::Fold
        } else if request.can_raise && roll > 0.75 {
            let top = request.min_raise.saturating_mul(3).max(request.min_raise);
            BettingDecision::Raise(self.rng.random_range(request.min_raise..=top))
        } else {
            BettingDecision::Call
        };
        Ok(decision)
    }

    fn request_draw(
        &mut self,
        request: &DrawRequest,
        _budget: Duration,
    ) -> Result<Vec<Card>, DecisionError> {
        let mut discards = Vec::new();
        for &card in &request.cards {
            if discards.len() == request.max_discards {
                break;
            }
            if self.rng.random_bool(0.3) {
                discards.push(card);
            }
        }
        Ok(discards)
    }
}

pub fn handle_sim_command(args: &SimArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;
    run_sim(resolved.config, args, out)
}

/// Plays the simulation on top of `table`, with `args` overriding it.
pub fn run_sim(mut table: TableConfig, args: &SimArgs, out: &mut dyn Write) -> Result<(), CliError> {
    if args.rounds == 0 {
        return Err(CliError::InvalidInput("rounds must be >= 1".into()));
    }
    if let Some(variant) = args.variant {
        table.variant = variant;
    }
    table.tournament |= args.tournament;
    let seed = args.seed.or(table.seed).unwrap_or_else(rand::random);
    table.seed = Some(seed);

    let names: Vec<String> = (1..=args.players).map(|i| format!("bot{i}")).collect();
    let sink = RecordingSink::new();
    let bots = RandomBots::new(seed.wrapping_add(1));
    let variant = table.variant;
    let mut engine = Engine::new(table, names, Box::new(sink.clone()), Box::new(bots))?;
    tracing::info!(variant = %variant, players = args.players, seed, "simulation started");
    writeln!(
        out,
        "Variant: {} | Players: {} | Seed: {}",
        variant, args.players, seed
    )?;

    while engine.state() != EngineState::GameOver && engine.round() < args.rounds {
        let outcome = engine.play_round()?;
        if args.events {
            // hole cards go to one player only
            for note in sink.notifications().iter().filter(|n| n.recipient().is_none()) {
                let line = serde_json::to_string(&note).map_err(std::io::Error::other)?;
                writeln!(out, "{}", line)?;
            }
        }
        sink.clear();
        writeln!(out, "{}", describe(&outcome))?;
    }

    let summary = engine.summary();
    writeln!(out, "Rounds played: {}", summary.rounds_played)?;
    match &summary.winner {
        Some(name) => writeln!(out, "Winner: {}", name)?,
        None => writeln!(out, "Winner: none")?,
    }
    for standing in &summary.standings {
        writeln!(out, "  {}: {}", standing.name, standing.money)?;
    }
    writeln!(out, "Money in play: {}", engine.total_money())?;
    Ok(())
}

fn describe(outcome: &RoundOutcome) -> String {
    let awards: Vec<String> = outcome
        .awards
        .iter()
        .map(|a| match &a.hand {
            Some(hand) => format!("{} +{} ({})", a.name, a.amount, hand),
            None => format!("{} +{}", a.name, a.amount),
        })
        .collect();
    let mut line = format!(
        "Round {}: pot {}{}, {}",
        outcome.round,
        outcome.pot,
        if outcome.showdown { ", showdown" } else { "" },
        awards.join(", ")
    );
    if !outcome.eliminated.is_empty() {
        line.push_str(&format!("; out: {}", outcome.eliminated.join(", ")));
    }
    line
}

//! Deal command handler.
//!
//! Runs one variant's card events for a table with no betting and prints
//! each seat's cards, the board, and the best hand every seat ends with.

use std::io::Write;

use cardroom_engine::cards::{parse_cards, Card};
use cardroom_engine::deck::Deck;
use cardroom_engine::variant::{Deal, VariantKind};

use crate::error::CliError;
use crate::ui;

pub fn handle_deal_command(
    players: usize,
    variant: Option<VariantKind>,
    seed: Option<u64>,
    deck: Option<&str>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if players < 2 {
        return Err(CliError::InvalidInput("players must be >= 2".into()));
    }
    let kind = variant.unwrap_or(VariantKind::TexasHoldem);
    writeln!(out, "Variant: {}", kind)?;

    let deck = match deck {
        Some(text) => {
            if seed.is_some() {
                ui::warn_parameter_unused(err, "seed", "when --deck is given")?;
            }
            let cards = parse_cards(text).map_err(|e| CliError::InvalidInput(e.to_string()))?;
            Deck::stacked(cards)
        }
        None => {
            let seed = seed.unwrap_or_else(rand::random);
            writeln!(out, "Seed: {}", seed)?;
            Deck::shuffled(seed)
        }
    };

    let mut game = kind.new_game(deck);
    game.begin_round(players)?;
    let mut events = 0usize;
    while let Some(deal) = game.advance()? {
        events += 1;
        if deal == Deal::DrawPhase {
            tracing::debug!("draw phase skipped, nobody draws in a dealt-only round");
        }
    }
    tracing::debug!(variant = %kind, players, events, "round dealt");

    for seat in 0..players {
        let hand = game
            .best_hand(seat)
            .map_or_else(|| "-".to_string(), |h| h.to_string());
        writeln!(out, "Seat {}: {} ({})", seat, join(game.cards(seat)), hand)?;
    }
    if !game.community().is_empty() {
        writeln!(out, "Board: {}", join(game.community()))?;
    }
    Ok(())
}

fn join(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

//! Command-line surface of the `cardroom` binary.

use clap::{Parser, Subcommand};
use cardroom_engine::variant::VariantKind;

fn parse_variant(s: &str) -> Result<VariantKind, String> {
    s.parse().map_err(|e: cardroom_engine::errors::GameError| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "cardroom", version, about = "Cardroom multiplayer poker engine CLI")]
pub struct CardroomCli {
    /// Log filter directive, e.g. `debug` or `warn,cardroom_engine=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play rounds between random bots
    Sim {
        #[arg(long, default_value_t = 4)]
        players: usize,
        /// Stop after this many rounds even if several players remain
        #[arg(long, default_value_t = 10)]
        rounds: u64,
        #[arg(long, value_parser = parse_variant)]
        variant: Option<VariantKind>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        tournament: bool,
        /// Print every public table notification as a JSON line
        #[arg(long)]
        events: bool,
    },
    /// Describe the best hand in a set of cards
    Eval {
        /// Cards such as "Ah Kh Qh Jh Th"
        cards: String,
        /// A second set of cards to compare against
        #[arg(long)]
        against: Option<String>,
    },
    /// Deal one round without betting and show every seat
    Deal {
        #[arg(long, default_value_t = 2)]
        players: usize,
        #[arg(long, value_parser = parse_variant)]
        variant: Option<VariantKind>,
        #[arg(long)]
        seed: Option<u64>,
        /// Deal from these cards, top first, instead of a shuffle
        #[arg(long)]
        deck: Option<String>,
    },
    /// Show the resolved table configuration and where each value came from
    Cfg,
}

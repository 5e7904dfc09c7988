//! # Cardroom CLI Library
//!
//! Command-line driver for the cardroom poker engine. It resolves the layered
//! table configuration, sets up logging, and exposes a handful of
//! subcommands for exercising the engine.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments and dispatches to a subcommand, writing to
//! the streams it is given.
//!
//! ```
//! use std::io;
//! let args = vec!["cardroom", "eval", "Ah Kh Qh Jh Th"];
//! let code = cardroom_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Play rounds between random bots
//! - `eval`: Describe and compare hands
//! - `deal`: Deal one round without betting
//! - `cfg`: Display the resolved configuration

use std::io::Write;

use clap::Parser;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;

use cli::{CardroomCli, Commands};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command, SimArgs,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["sim", "eval", "deal", "cfg"];

/// Parses `args` and runs the selected subcommand.
///
/// Returns `0` on success and `2` on any error. Help and version output go
/// to `out` and count as success.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match CardroomCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };
    logging::init_logging(cli.log_level.as_deref());

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Eval { cards, against } => handle_eval_command(&cards, against.as_deref(), out),
        Commands::Deal {
            players,
            variant,
            seed,
            deck,
        } => handle_deal_command(players, variant, seed, deck.as_deref(), out, err),
        Commands::Sim {
            players,
            rounds,
            variant,
            seed,
            tournament,
            events,
        } => handle_sim_command(
            &SimArgs {
                players,
                rounds,
                variant,
                seed,
                tournament,
                events,
            },
            out,
        ),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            let _ = ui::write_error(err, &e.to_string());
            e.exit_code()
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }
    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: cardroom <command> [options]\n\nCommands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: cardroom --help");
    exit_code::ERROR
}

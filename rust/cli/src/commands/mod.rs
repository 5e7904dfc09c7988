//! Command handler modules for the cardroom CLI.
//!
//! Each subcommand lives in its own module and exposes one
//! `handle_COMMAND_command` function. Output streams are passed in as
//! `&mut dyn Write` and every failure comes back as a [`CliError`](crate::CliError).

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::{handle_sim_command, SimArgs};

//! Configuration command handler.
//!
//! Prints the resolved [`TableConfig`](cardroom_engine::config::TableConfig)
//! as pretty JSON, each field paired with the layer that set it:
//!
//! ```json
//! {
//!   "ante": {
//!     "source": "default",
//!     "value": 100
//!   },
//!   ...
//! }
//! ```

use std::io::Write;

use crate::config;
use crate::error::CliError;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;

    let display = serde_json::json!({
        "variant": { "value": config.variant, "source": sources.variant },
        "starting_money": { "value": config.starting_money, "source": sources.starting_money },
        "ante": { "value": config.ante, "source": sources.ante },
        "small_raise": { "value": config.small_raise, "source": sources.small_raise },
        "raise_limit": { "value": config.raise_limit, "source": sources.raise_limit },
        "tournament": { "value": config.tournament, "source": sources.tournament },
        "auto_increase_on_hand_divider": {
            "value": config.auto_increase_on_hand_divider,
            "source": sources.auto_increase_on_hand_divider,
        },
        "decision_timeout_ms": {
            "value": config.decision_timeout_ms,
            "source": sources.decision_timeout_ms,
        },
        "seed": { "value": config.seed, "source": sources.seed },
        "max_players": { "value": config.max_players, "source": sources.max_players },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

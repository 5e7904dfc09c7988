use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::Chips;
use crate::variant::VariantKind;

/// Added to every decision window to absorb round-trip overhead.
pub const DECISION_GRACE: Duration = Duration::from_millis(500);

/// Table-wide settings fixed when the engine is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub variant: VariantKind,
    pub starting_money: Chips,
    pub ante: Chips,
    pub small_raise: Chips,
    /// Raises allowed per street, per live player.
    pub raise_limit: usize,
    pub tournament: bool,
    /// Tournament blinds go up every this many hands.
    pub auto_increase_on_hand_divider: u64,
    pub decision_timeout_ms: u64,
    pub seed: Option<u64>,
    /// Seats open to late joiners. `None` means the variant maximum.
    pub max_players: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            variant: VariantKind::TexasHoldem,
            starting_money: 5000,
            ante: 100,
            small_raise: 250,
            raise_limit: 3,
            tournament: false,
            auto_increase_on_hand_divider: 7,
            decision_timeout_ms: 30_000,
            seed: None,
            max_players: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.decision_timeout_ms == 0 {
            return Err(GameError::InvalidConfig(
                "decision_timeout_ms must be positive".into(),
            ));
        }
        if self.small_raise == 0 {
            return Err(GameError::InvalidConfig("small_raise must be positive".into()));
        }
        if self.raise_limit == 0 {
            return Err(GameError::InvalidConfig("raise_limit must be positive".into()));
        }
        if self.starting_money == 0 {
            return Err(GameError::InvalidConfig(
                "starting_money must be positive".into(),
            ));
        }
        if self.auto_increase_on_hand_divider == 0 {
            return Err(GameError::InvalidConfig(
                "auto_increase_on_hand_divider must be positive".into(),
            ));
        }
        if let Some(max) = self.max_players {
            let limit = self.variant.max_players();
            if max < 2 || max > limit {
                return Err(GameError::InvalidConfig(format!(
                    "max_players must be within 2..={limit} for {}",
                    self.variant
                )));
            }
        }
        Ok(())
    }

    pub fn seat_limit(&self) -> usize {
        self.max_players.unwrap_or_else(|| self.variant.max_players())
    }

    /// Longest the engine waits for one decision.
    pub fn decision_budget(&self) -> Duration {
        Duration::from_millis(self.decision_timeout_ms) + DECISION_GRACE
    }
}

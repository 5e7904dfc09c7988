//! Layered table configuration.
//!
//! Values start from [`TableConfig::default`], are overridden by the TOML file
//! named in `CARDROOM_CONFIG`, and finally by `CARDROOM_*` environment
//! variables. Every field remembers which layer set it.

use std::fmt;
use std::fs;
use std::str::FromStr;

use cardroom_engine::config::TableConfig;
use cardroom_engine::errors::GameError;
use cardroom_engine::player::Chips;
use cardroom_engine::variant::VariantKind;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_VAR: &str = "CARDROOM_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub variant: ValueSource,
    pub starting_money: ValueSource,
    pub ante: ValueSource,
    pub small_raise: ValueSource,
    pub raise_limit: ValueSource,
    pub tournament: ValueSource,
    pub auto_increase_on_hand_divider: ValueSource,
    pub decision_timeout_ms: ValueSource,
    pub seed: ValueSource,
    pub max_players: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            variant: ValueSource::Default,
            starting_money: ValueSource::Default,
            ante: ValueSource::Default,
            small_raise: ValueSource::Default,
            raise_limit: ValueSource::Default,
            tournament: ValueSource::Default,
            auto_increase_on_hand_divider: ValueSource::Default,
            decision_timeout_ms: ValueSource::Default,
            seed: ValueSource::Default,
            max_players: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<GameError> for ConfigError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::InvalidConfig(msg) => ConfigError::Invalid(msg),
            other => ConfigError::Invalid(other.to_string()),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read {}: {}", CONFIG_PATH_VAR, e),
            ConfigError::Parse(e) => write!(f, "malformed config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolves the configuration from the process environment.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Resolves the configuration with `env` standing in for the environment.
pub fn load_from<E>(env: E) -> Result<ConfigResolved, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
        let text = fs::read_to_string(&path)?;
        let file: FileConfig = toml::from_str(&text)?;
        apply_file(&mut cfg, &mut sources, file);
    }
    apply_env(&mut cfg, &mut sources, &env)?;

    cfg.validate()?;
    tracing::debug!(variant = %cfg.variant, seed = ?cfg.seed, "configuration resolved");
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    variant: Option<VariantKind>,
    #[serde(default)]
    starting_money: Option<Chips>,
    #[serde(default)]
    ante: Option<Chips>,
    #[serde(default)]
    small_raise: Option<Chips>,
    #[serde(default)]
    raise_limit: Option<usize>,
    #[serde(default)]
    tournament: Option<bool>,
    #[serde(default)]
    auto_increase_on_hand_divider: Option<u64>,
    #[serde(default)]
    decision_timeout_ms: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    max_players: Option<usize>,
}

fn set<T>(slot: &mut T, source: &mut ValueSource, value: Option<T>, layer: ValueSource) {
    if let Some(v) = value {
        *slot = v;
        *source = layer;
    }
}

fn apply_file(cfg: &mut TableConfig, s: &mut ConfigSources, f: FileConfig) {
    let file = ValueSource::File;
    set(&mut cfg.variant, &mut s.variant, f.variant, file);
    set(&mut cfg.starting_money, &mut s.starting_money, f.starting_money, file);
    set(&mut cfg.ante, &mut s.ante, f.ante, file);
    set(&mut cfg.small_raise, &mut s.small_raise, f.small_raise, file);
    set(&mut cfg.raise_limit, &mut s.raise_limit, f.raise_limit, file);
    set(&mut cfg.tournament, &mut s.tournament, f.tournament, file);
    set(
        &mut cfg.auto_increase_on_hand_divider,
        &mut s.auto_increase_on_hand_divider,
        f.auto_increase_on_hand_divider,
        file,
    );
    set(
        &mut cfg.decision_timeout_ms,
        &mut s.decision_timeout_ms,
        f.decision_timeout_ms,
        file,
    );
    set(&mut cfg.seed, &mut s.seed, f.seed.map(Some), file);
    set(&mut cfg.max_players, &mut s.max_players, f.max_players.map(Some), file);
}

fn apply_env<E>(cfg: &mut TableConfig, s: &mut ConfigSources, env: &E) -> Result<(), ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let from_env = ValueSource::Env;
    set(&mut cfg.variant, &mut s.variant, parsed(env, "CARDROOM_VARIANT")?, from_env);
    set(
        &mut cfg.starting_money,
        &mut s.starting_money,
        parsed(env, "CARDROOM_STARTING_MONEY")?,
        from_env,
    );
    set(&mut cfg.ante, &mut s.ante, parsed(env, "CARDROOM_ANTE")?, from_env);
    set(
        &mut cfg.small_raise,
        &mut s.small_raise,
        parsed(env, "CARDROOM_SMALL_RAISE")?,
        from_env,
    );
    set(
        &mut cfg.raise_limit,
        &mut s.raise_limit,
        parsed(env, "CARDROOM_RAISE_LIMIT")?,
        from_env,
    );
    let tournament = match raw(env, "CARDROOM_TOURNAMENT") {
        Some(v) => Some(
            parse_bool(&v)
                .ok_or_else(|| ConfigError::Invalid(format!("CARDROOM_TOURNAMENT={v:?} is not a boolean")))?,
        ),
        None => None,
    };
    set(&mut cfg.tournament, &mut s.tournament, tournament, from_env);
    set(
        &mut cfg.auto_increase_on_hand_divider,
        &mut s.auto_increase_on_hand_divider,
        parsed(env, "CARDROOM_AUTO_INCREASE_ON_HAND_DIVIDER")?,
        from_env,
    );
    set(
        &mut cfg.decision_timeout_ms,
        &mut s.decision_timeout_ms,
        parsed(env, "CARDROOM_DECISION_TIMEOUT_MS")?,
        from_env,
    );
    let seed: Option<u64> = parsed(env, "CARDROOM_SEED")?;
    set(&mut cfg.seed, &mut s.seed, seed.map(Some), from_env);
    let max: Option<usize> = parsed(env, "CARDROOM_MAX_PLAYERS")?;
    set(&mut cfg.max_players, &mut s.max_players, max.map(Some), from_env);
    Ok(())
}

fn raw<E>(env: &E, key: &str) -> Option<String>
where
    E: Fn(&str) -> Option<String>,
{
    env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<E, T>(env: &E, key: &str) -> Result<Option<T>, ConfigError>
where
    E: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match raw(env, key) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{key}={v:?} is not a valid value"))),
        None => Ok(None),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

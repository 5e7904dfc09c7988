#![allow(dead_code)]

use cardroom_cli::run;

pub const CONFIG_VARS: &[&str] = &[
    "CARDROOM_CONFIG",
    "CARDROOM_VARIANT",
    "CARDROOM_STARTING_MONEY",
    "CARDROOM_ANTE",
    "CARDROOM_SMALL_RAISE",
    "CARDROOM_RAISE_LIMIT",
    "CARDROOM_TOURNAMENT",
    "CARDROOM_AUTO_INCREASE_ON_HAND_DIVIDER",
    "CARDROOM_DECISION_TIMEOUT_MS",
    "CARDROOM_SEED",
    "CARDROOM_MAX_PLAYERS",
];

#[derive(Debug)]
pub struct CliResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn cardroom(args: &[&str]) -> CliResult {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let argv = std::iter::once("cardroom").chain(args.iter().copied());
    let code = run(argv, &mut out, &mut err);
    CliResult {
        code,
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    }
}

/// Sets environment variables for the life of the guard and restores the
/// previous values on drop. Tests using it must be `#[serial]`.
#[derive(Debug)]
pub struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    /// Clears every `CARDROOM_*` config variable, then applies `pairs`.
    pub fn clean(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for key in CONFIG_VARS {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
        for (key, value) in pairs {
            if !CONFIG_VARS.contains(key) {
                restores.push((key.to_string(), std::env::var(key).ok()));
            }
            unsafe { std::env::set_var(key, value) };
        }
        EnvGuard { restores }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            match previous {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

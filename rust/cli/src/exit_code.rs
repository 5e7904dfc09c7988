//! Exit codes returned by [`crate::run`].

/// The command completed.
pub const SUCCESS: i32 = 0;

/// Bad arguments, bad configuration, or an engine failure.
pub const ERROR: i32 = 2;

//! Shared stderr formatting for command handlers.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Warns that a flag had no effect on this run.
pub fn warn_parameter_unused(err: &mut dyn Write, param_name: &str, reason: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: Parameter --{} is ignored {}.", param_name, reason)
}

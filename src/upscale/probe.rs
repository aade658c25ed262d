//! Capability probe for the optional `-s` (scale) argument
//!
//! Older upscaler builds reject `-s`. We run `<exe> -h` once per run and look
//! for the flag in the help output. This is a plain substring check, so any
//! help text that happens to contain "-s" counts as support.

use std::path::Path;

use super::runner::ToolRunner;

pub const SCALE_FLAG: &str = "-s";

/// Decision for a given help text.
pub fn help_mentions_scale(help_text: &str) -> bool {
    help_text.contains(SCALE_FLAG)
}

/// Probe `exe` for scale support. A tool that cannot be launched is treated
/// as not supporting it.
pub fn supports_scale_arg(runner: &dyn ToolRunner, exe: &Path) -> bool {
    match runner.help_text(exe) {
        Ok(text) => help_mentions_scale(&text),
        Err(e) => {
            tracing::debug!(exe = %exe.display(), error = %e, "scale probe failed");
            false
        }
    }
}

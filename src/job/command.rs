//! Murdock command-line parsing
//!
//! Every job record carries the runner invocation as a single shell-like
//! string. Structured jobs follow the convention:
//!
//! ```text
//! ./.murdock <type> <application> <board>:<toolchain>
//! ```
//!
//! e.g. `./.murdock compile examples/hello-world nrf52dk:gnu`. Anything
//! else (setup scripts, collectors) only gets a derived name.

use regex_lite::Regex;
use std::sync::OnceLock;

/// Structured fields extracted from a murdock invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    /// Job type (`compile`, `run_test`, ...)
    pub job_type: String,
    /// Application path (e.g. `examples/hello-world`)
    pub application: String,
    /// Target board identifier
    pub board: String,
    /// Toolchain identifier
    pub toolchain: String,
}

fn murdock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\./\.murdock ([a-z_]+) ([a-zA-Z0-9/_-]+) ([a-zA-Z0-9_-]+):([a-z]+)")
            .expect("murdock command pattern is valid")
    })
}

/// Match a command string against the structured murdock convention.
///
/// Returns `None` for commands that do not follow the convention; such
/// jobs are excluded from per-application aggregation.
pub fn parse_command(command: &str) -> Option<CommandTarget> {
    let caps = murdock_pattern().captures(command)?;
    Some(CommandTarget {
        job_type: caps[1].to_string(),
        application: caps[2].to_string(),
        board: caps[3].to_string(),
        toolchain: caps[4].to_string(),
    })
}

/// Derive a path-like job name from a command string.
///
/// Drops the first token (the invocation itself) and joins the rest as
/// path segments.
pub fn derive_name(command: &str) -> String {
    command
        .split_whitespace()
        .skip(1)
        .collect::<Vec<_>>()
        .join("/")
}

//! Expiry duration expressions
//!
//! Cache callers supply expiry as a human-readable string ("10 min",
//! "2 hours", or a bare number of seconds). This module resolves such an
//! expression into a canonical count of seconds.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*([A-Za-z]*)").expect("valid duration pattern"));

/// Parse an expiry expression into seconds.
///
/// A missing or empty expression resolves to `default_secs`. The expression
/// shape is leading digits, optional whitespace, then an optional unit word;
/// units are matched case-insensitively by prefix (`s`/`sec`/`seconds`,
/// `m`/`min`/`minutes`, `h`/`hours`, `d`/`days`). No unit, or an
/// unrecognized one, means the magnitude is already seconds.
///
/// An expression without a leading digit is unparsable and falls back to
/// `default_secs` rather than failing the caller's cache operation.
pub fn parse_duration(expr: Option<&str>, default_secs: u64) -> u64 {
    let Some(expr) = expr else {
        return default_secs;
    };
    if expr.trim().is_empty() {
        return default_secs;
    }

    let Some(captures) = EXPRESSION.captures(expr) else {
        warn!(expr, "unparsable expiry expression, using default");
        return default_secs;
    };

    let Ok(magnitude) = captures[1].parse::<u64>() else {
        warn!(expr, "expiry magnitude out of range, using default");
        return default_secs;
    };

    magnitude.saturating_mul(unit_factor(&captures[2]))
}

fn unit_factor(unit: &str) -> u64 {
    match unit.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('m') => 60,
        Some('h') => 3_600,
        Some('d') => 86_400,
        _ => 1,
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Retention period parsing. A bare number is a count of days, anything else is a
//! Go-style duration (`72h`, `1h30m`, `2.5d`).

use crate::error::{ReconcilerError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)$").expect("Failed to compile bare number regex")
});

static WHOLE_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|ms|s|m|h|d))+$")
        .expect("Failed to compile duration regex")
});

static DURATION_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<number>\d+(?:\.\d*)?|\.\d+)(?P<unit>ns|us|µs|ms|s|m|h|d)")
        .expect("Failed to compile duration component regex")
});

/// Parse a retention value, treating a value without a unit suffix as days
pub fn parse_retention(value: &str) -> Result<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(value, "value is empty"));
    }

    if BARE_NUMBER.is_match(trimmed) {
        parse_duration(&format!("{trimmed}d")).map_err(|reason| invalid(value, &reason))
    } else {
        parse_duration(trimmed).map_err(|reason| invalid(value, &reason))
    }
}

/// Whole and fractional days in `ttl`, derived as hours / 24
pub fn retention_days(ttl: Duration) -> f64 {
    ttl.as_secs_f64() / 3600.0 / 24.0
}

/// Render a day count the way it is written in a manifest (`17`, `1.5`)
pub fn format_days(days: f64) -> String {
    format!("{}", days)
}

fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    if !WHOLE_DURATION.is_match(value) {
        return Err("expected a number of days or <number><unit> with unit one of ns, us, ms, s, m, h, d".to_string());
    }

    let mut seconds = 0f64;
    for captures in DURATION_COMPONENT.captures_iter(value) {
        let number: f64 = captures["number"]
            .parse()
            .map_err(|e| format!("invalid number '{}': {}", &captures["number"], e))?;
        seconds += number * unit_seconds(&captures["unit"])?;
    }

    Duration::try_from_secs_f64(seconds).map_err(|e| format!("duration out of range: {}", e))
}

fn unit_seconds(unit: &str) -> std::result::Result<f64, String> {
    match unit {
        "ns" => Ok(1e-9),
        "us" | "µs" => Ok(1e-6),
        "ms" => Ok(1e-3),
        "s" => Ok(1.0),
        "m" => Ok(60.0),
        "h" => Ok(3600.0),
        "d" => Ok(86400.0),
        other => Err(format!("unknown unit '{}'", other)),
    }
}

fn invalid(value: &str, reason: &str) -> ReconcilerError {
    ReconcilerError::Configuration(format!(
        "invalid retention format for field 'retention' ('{}'): {}",
        value, reason
    ))
}

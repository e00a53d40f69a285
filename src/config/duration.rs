// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Duration parsing for tick frequencies.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Parse a duration string like "250ms", "5s", "2m", "1h" or "300".
/// Supports:
/// - Plain numbers (interpreted as milliseconds): "300"
/// - Milliseconds suffix: "250ms"
/// - Seconds suffix: "5s"
/// - Minutes suffix: "2m"
/// - Hours suffix: "1h"
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty duration string".to_string());
    }

    // "ms" has to be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        return parse_number(num_str, "milliseconds").map(Duration::from_millis);
    }
    if let Some(num_str) = s.strip_suffix('h') {
        return parse_scaled(num_str, "hours", 3600);
    }
    if let Some(num_str) = s.strip_suffix('m') {
        return parse_scaled(num_str, "minutes", 60);
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return parse_number(num_str, "seconds").map(Duration::from_secs);
    }

    parse_number(s, "duration").map(Duration::from_millis)
}

fn parse_scaled(num_str: &str, unit: &str, seconds_per_unit: u64) -> Result<Duration, String> {
    let value = parse_number(num_str, unit)?;
    value
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("Invalid {} value '{}': out of range", unit, num_str.trim()))
}

fn parse_number(num_str: &str, unit: &str) -> Result<u64, String> {
    num_str
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("Invalid {} value '{}': {}", unit, num_str, e))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Millis(u64),
    Text(String),
}

/// Serde adapter for optional frequencies; zero collapses to `None` (run once).
pub fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    let duration = match raw {
        None => return Ok(None),
        Some(RawDuration::Millis(ms)) => Duration::from_millis(ms),
        Some(RawDuration::Text(text)) => parse_duration(&text).map_err(serde::de::Error::custom)?,
    };

    Ok(Some(duration).filter(|d| !d.is_zero()))
}

//! Display formatting helpers shared by the view model.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

/// Characters of a prompt shown in history rows.
pub const PROMPT_PREVIEW_CHARS: usize = 50;

/// `model_a` -> `Model A`, `model_b` -> `Model B`, anything else verbatim.
pub fn model_short_name(model_id: &str) -> String {
    match model_id {
        "model_a" => "Model A".to_string(),
        "model_b" => "Model B".to_string(),
        other => other.to_string(),
    }
}

/// `model_a` -> `Model A (Fast)`, `model_b` -> `Model B (Accurate)`.
pub fn model_description(model_id: &str) -> String {
    match model_id {
        "model_a" => "Model A (Fast)".to_string(),
        "model_b" => "Model B (Accurate)".to_string(),
        other => other.to_string(),
    }
}

pub fn latency_ms(ms: u64) -> String {
    format!("{}ms", ms)
}

/// Average latency rounded to whole milliseconds.
pub fn average_latency(ms: f64) -> String {
    format!("{:.0}ms", ms)
}

/// Fraction in `[0, 1]` as a one-decimal percentage.
pub fn success_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Time of day in the given zone, e.g. `14:03:27`.
pub fn time_of_day<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(tz).format("%H:%M:%S").to_string()
}

/// First [`PROMPT_PREVIEW_CHARS`] characters, with `...` when cut.
pub fn prompt_preview(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Rough token count: one token per four characters, rounded up.
pub fn token_estimate(chars: usize) -> usize {
    chars.div_ceil(4)
}

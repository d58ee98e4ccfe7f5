use std::time::Duration;

use jiff::{SpanRelativeTo, civil::Time};

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(String::from("Invalid duration"))
}

/// Like [`parse_duration`], rejecting negative and zero durations.
pub fn parse_interval(input: &str) -> Result<Duration, String> {
    let duration = parse_duration(input)?;
    if !duration.is_positive() {
        return Err(String::from("Interval must be positive"));
    }

    Duration::try_from(duration).map_err(|error| error.to_string())
}

/// `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(input: &str) -> Result<Time, String> {
    input
        .trim()
        .parse::<Time>()
        .map_err(|_| format!("Invalid time of day: {input}, expected HH:MM"))
}

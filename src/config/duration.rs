//! Unit-suffixed duration syntax.
//!
//! Accepts a sequence of decimal numbers, each with an optional fraction and
//! a unit suffix, e.g. `300ms`, `1.5h` or `1h30m`. Valid units are `ns`,
//! `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is the only value
//! allowed without a unit.

use std::fmt::Write;
use std::time::Duration;

use thiserror::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

// Fraction digits past this point cannot change the nanosecond result.
const MAX_FRACTION_DIGITS: usize = 20;

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{b5}s", 1_000),
    ("\u{3bc}s", 1_000),
    ("ms", 1_000_000),
    ("s", NANOS_PER_SEC),
    ("m", 60 * NANOS_PER_SEC),
    ("h", 3_600 * NANOS_PER_SEC),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("expected a number at '{0}'")]
    InvalidNumber(String),

    #[error("missing unit in duration")]
    MissingUnit,

    #[error("unknown unit '{0}' in duration")]
    UnknownUnit(String),

    #[error("duration out of range")]
    Overflow,

    #[error("negative durations are not supported")]
    Negative,
}

/// Parses a duration string such as `30s` or `1h30m`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, tail) = take_digits(rest);
        let (fraction, tail) = match tail.strip_prefix('.') {
            Some(after_dot) => {
                let (fraction, tail) = take_digits(after_dot);
                (Some(fraction), tail)
            }
            None => (None, tail),
        };

        if whole.is_empty() && fraction.map_or(true, str::is_empty) {
            return Err(DurationError::InvalidNumber(rest.to_string()));
        }

        let unit_len = tail
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit);
        }
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| DurationError::UnknownUnit(unit.to_string()))?;

        let mut value = parse_whole(whole)?
            .checked_mul(scale)
            .ok_or(DurationError::Overflow)?;
        if let Some(fraction) = fraction {
            value = value
                .checked_add(fraction_nanos(fraction, scale))
                .ok_or(DurationError::Overflow)?;
        }
        total = total.checked_add(value).ok_or(DurationError::Overflow)?;
        rest = tail;
    }

    let nanos = u64::try_from(total).map_err(|_| DurationError::Overflow)?;
    if negative && nanos != 0 {
        return Err(DurationError::Negative);
    }
    Ok(Duration::from_nanos(nanos))
}

/// Renders a duration in the canonical form accepted by [`parse_duration`].
///
/// Sub-second values use the largest fitting unit (`1.5ms`, `250ns`); longer
/// values are written as `1h2m3.5s`, dropping leading zero components.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}\u{b5}s", decimal(nanos, 1_000));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = u128::from(total_secs % 60) * NANOS_PER_SEC
        + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let _ = write!(out, "{}s", decimal(seconds, NANOS_PER_SEC));
    out
}

fn take_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_whole(digits: &str) -> Result<u128, DurationError> {
    digits
        .bytes()
        .try_fold(0u128, |acc, b| {
            acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
        })
        .ok_or(DurationError::Overflow)
}

fn fraction_nanos(digits: &str, scale: u128) -> u128 {
    let digits = &digits[..digits.len().min(MAX_FRACTION_DIGITS)];
    let (numerator, denominator) = digits.bytes().fold((0u128, 1u128), |(n, d), b| {
        (n * 10 + u128::from(b - b'0'), d * 10)
    });
    numerator * scale / denominator
}

/// Formats `value / unit` with the fractional part trimmed of trailing zeros.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let remainder = value % unit;
    if remainder == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let fraction = format!("{remainder:0width$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

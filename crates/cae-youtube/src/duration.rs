//! ISO-8601 duration tokens (`PT1H2M3S`) as reported in `contentDetails.duration`.
//!
//! Each component is identified by its unit letter, never by position, so a
//! seconds-only token such as `PT45S` can't be misread as minutes. A leading
//! day component (`P1DT2H`) is accepted because the platform emits it for
//! long livestreams; `P0D` is the platform's spelling of "no duration".

use thiserror::Error;

const MINUTES_PER_DAY: f64 = 1_440.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse duration \"{token}\": {reason}")]
pub struct DurationParseError {
    pub token: String,
    pub reason: String,
}

/// Parse a duration token into total minutes, rounded to two decimals.
///
/// Absent units contribute zero. Hours count as 60 minutes, seconds as
/// 1/60 of a minute.
///
/// # Errors
///
/// Returns [`DurationParseError`] when the `P` prefix is missing, a unit
/// letter is unknown, out of order or repeated, or a number has no unit.
pub fn parse_duration_minutes(token: &str) -> Result<f64, DurationParseError> {
    let fail = |reason: &str| DurationParseError {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = token.trim();
    let body = trimmed
        .strip_prefix('P')
        .ok_or_else(|| fail("missing leading 'P' marker"))?;

    let (date_part, time_part) = match body.split_once('T') {
        Some((date, time)) => {
            if time.is_empty() {
                return Err(fail("'T' marker without any time component"));
            }
            (date, Some(time))
        }
        None => (body, None),
    };

    let date_components = scan_components(date_part).map_err(|r| fail(&r))?;
    let time_components = match time_part {
        Some(time) => scan_components(time).map_err(|r| fail(&r))?,
        None => Vec::new(),
    };

    if date_components.is_empty() && time_components.is_empty() {
        return Err(fail("no duration components"));
    }

    let mut minutes = 0.0;

    for (value, unit) in &date_components {
        match unit {
            'D' => minutes += value * MINUTES_PER_DAY,
            other => return Err(fail(&format!("unsupported date unit '{other}'"))),
        }
    }
    if date_components.len() > 1 {
        return Err(fail("repeated day component"));
    }

    // H, M, S must appear at most once each, in that order.
    let mut last_rank = 0;
    for (value, unit) in &time_components {
        let rank = match unit {
            'H' => 1,
            'M' => 2,
            'S' => 3,
            other => return Err(fail(&format!("unknown time unit '{other}'"))),
        };
        if rank <= last_rank {
            return Err(fail("time units repeated or out of order"));
        }
        last_rank = rank;

        minutes += match unit {
            'H' => value * MINUTES_PER_HOUR,
            'M' => *value,
            _ => value / SECONDS_PER_MINUTE,
        };
    }

    Ok(round2(minutes))
}

/// Split `"1H2M3.5S"` into `[(1.0, 'H'), (2.0, 'M'), (3.5, 'S')]`.
fn scan_components(part: &str) -> Result<Vec<(f64, char)>, String> {
    let mut components = Vec::new();
    let mut number = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
        } else if c.is_ascii_alphabetic() {
            if number.is_empty() {
                return Err(format!("unit '{c}' has no value"));
            }
            let value = number
                .parse::<f64>()
                .map_err(|e| format!("invalid number \"{number}\": {e}"))?;
            components.push((value, c.to_ascii_uppercase()));
            number.clear();
        } else {
            return Err(format!("unexpected character '{c}'"));
        }
    }

    if !number.is_empty() {
        return Err(format!("value \"{number}\" has no unit"));
    }
    Ok(components)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! `MM:SS` match clock shared by the server (validation) and the timer engine.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Countdown value every new period starts from (12:00).
pub const REGULATION_SECONDS: u32 = 12 * 60;

/// Clock value persisted on a match, stored as total seconds.
///
/// Minutes are unbounded, seconds are always within `0..=59` once formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MatchClock {
    seconds: u32,
}

/// Reasons a string is not a valid `MM:SS` clock.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockParseError {
    /// No `:` separator, or more than one.
    #[error("time must be formatted as MM:SS")]
    Format,
    /// Minutes or seconds are not plain decimal digits.
    #[error("time must only contain digits around the colon")]
    Digits,
    /// Seconds component outside `00..=59`.
    #[error("seconds must be between 00 and 59 (got {0})")]
    SecondsOutOfRange(u32),
}

impl MatchClock {
    /// Build a clock from a total number of seconds.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    /// Total seconds represented by the clock.
    pub const fn seconds(self) -> u32 {
        self.seconds
    }

    /// Regulation start value (12:00).
    pub const fn regulation() -> Self {
        Self::from_seconds(REGULATION_SECONDS)
    }
}

impl fmt::Display for MatchClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl FromStr for MatchClock {
    type Err = ClockParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (minutes, seconds) = value.trim().split_once(':').ok_or(ClockParseError::Format)?;
        if seconds.contains(':') {
            return Err(ClockParseError::Format);
        }

        let minutes = parse_component(minutes)?;
        let seconds = parse_component(seconds)?;
        if seconds > 59 {
            return Err(ClockParseError::SecondsOutOfRange(seconds));
        }

        minutes
            .checked_mul(60)
            .and_then(|total| total.checked_add(seconds))
            .map(Self::from_seconds)
            .ok_or(ClockParseError::Digits)
    }
}

fn parse_component(raw: &str) -> Result<u32, ClockParseError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClockParseError::Digits);
    }
    raw.parse().map_err(|_| ClockParseError::Digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(MatchClock::from_seconds(0).to_string(), "00:00");
        assert_eq!(MatchClock::from_seconds(330).to_string(), "05:30");
        assert_eq!(MatchClock::regulation().to_string(), "12:00");
        assert_eq!(MatchClock::from_seconds(6_000).to_string(), "100:00");
    }

    #[test]
    fn parses_valid_clocks() {
        assert_eq!("05:30".parse::<MatchClock>().unwrap().seconds(), 330);
        assert_eq!("0:07".parse::<MatchClock>().unwrap().seconds(), 7);
        assert_eq!("120:59".parse::<MatchClock>().unwrap().seconds(), 7_259);
    }

    #[test]
    fn rejects_malformed_clocks() {
        assert_eq!("1230".parse::<MatchClock>(), Err(ClockParseError::Format));
        assert_eq!("12:00:00".parse::<MatchClock>(), Err(ClockParseError::Format));
        assert_eq!("ab:00".parse::<MatchClock>(), Err(ClockParseError::Digits));
        assert_eq!(":30".parse::<MatchClock>(), Err(ClockParseError::Digits));
        assert_eq!("-1:30".parse::<MatchClock>(), Err(ClockParseError::Digits));
        assert_eq!(
            "10:60".parse::<MatchClock>(),
            Err(ClockParseError::SecondsOutOfRange(60))
        );
    }
}

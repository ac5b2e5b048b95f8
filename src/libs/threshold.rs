//! Distraction threshold parsing.
//!
//! A threshold is the minimum length of an uninterrupted distraction window
//! before an alert fires. It is configured as a whole number of seconds.
//! Input that is not a positive integer never crashes the monitor: the
//! lenient parser turns it into [`Threshold::Never`], which disables alerts
//! until a valid value is supplied.

use crate::libs::messages::Message;
use crate::msg_warning;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the strict threshold parser.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold is empty")]
    Empty,
    #[error("threshold '{0}' is not a whole number of seconds")]
    NotANumber(String),
    #[error("threshold must be greater than zero")]
    Zero,
}

/// How long a distraction window has to last before an alert fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Alert once the window reaches this duration.
    After(Duration),
    /// Never alert.
    Never,
}

impl Threshold {
    /// Builds a threshold from configured seconds. Zero disables alerts.
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Threshold::Never
        } else {
            Threshold::After(Duration::from_secs(secs))
        }
    }

    /// Parses user input, falling back to [`Threshold::Never`] with a warning
    /// when the input is malformed.
    pub fn parse_lenient(input: &str) -> Self {
        match input.parse() {
            Ok(threshold) => threshold,
            Err(e) => {
                msg_warning!(Message::ThresholdInvalid(e.to_string()));
                Threshold::Never
            }
        }
    }

    /// Returns true once `elapsed` has reached the threshold.
    pub fn is_reached(&self, elapsed: Duration) -> bool {
        match self {
            Threshold::After(limit) => elapsed >= *limit,
            Threshold::Never => false,
        }
    }

    /// Whole seconds as stored in the config file (`0` for never).
    pub fn as_secs(&self) -> u64 {
        match self {
            Threshold::After(limit) => limit.as_secs(),
            Threshold::Never => 0,
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::from_secs(5)
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ThresholdError::Empty);
        }
        let secs: u64 = trimmed.parse().map_err(|_| ThresholdError::NotANumber(trimmed.to_string()))?;
        if secs == 0 {
            return Err(ThresholdError::Zero);
        }
        Ok(Threshold::from_secs(secs))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Threshold::After(limit) => write!(f, "{}s", limit.as_secs()),
            Threshold::Never => write!(f, "never"),
        }
    }
}

//! Error types for yomtov-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YomTovError {
    /// The caller supplied a missing or unparseable date.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A config file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Hebrew-date oracle could not produce a usable answer.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Failures talking to the Gregorian-to-Hebrew conversion oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The oracle did not answer (connection failure, timeout, 5xx) within the
    /// configured number of attempts, or refused the request outright (4xx).
    #[error("Hebrew date oracle unreachable for {date} after {attempts} attempt(s): {message}")]
    Unreachable {
        date: NaiveDate,
        attempts: u32,
        message: String,
    },

    /// The oracle answered but the payload lacked the Hebrew month/day fields
    /// or carried values outside their domain.
    #[error("Malformed Hebrew date payload for {date}: {message}")]
    Malformed { date: NaiveDate, message: String },

    /// The request-scoped deadline elapsed before the scan finished.
    #[error("Deadline exceeded after scanning {scanned_days} day(s)")]
    DeadlineExceeded { scanned_days: u32 },
}

pub type Result<T> = std::result::Result<T, YomTovError>;

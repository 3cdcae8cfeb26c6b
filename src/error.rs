//! Error types for the X9C driver.
//!
//! The chip itself has no feedback path, so the only failures the driver can
//! observe are the ones the HAL reports when a pin write fails, plus a
//! rejected configuration at construction time.  Out-of-range requests are
//! not errors: they are clamped or refused and reported through
//! [`MoveOutcome`](crate::controller::MoveOutcome).

use core::fmt;

use crate::pins::Line;

// ---------------------------------------------------------------------------
// Top-level driver error
// ---------------------------------------------------------------------------

/// Every fallible driver operation returns this type.  `E` is the HAL's
/// `OutputPin` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Writing a control line failed.  The wiper may have moved by an
    /// unknown number of taps.
    Pin { line: Line, source: E },
    /// The configuration was rejected.
    Config(ConfigError),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin { line, source } => write!(f, "pin {line}: {source:?}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl core::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Driver-wide `Result` alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

//! Crate-wide error type.

use thiserror::Error;

/// Catch-all error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter node was missing a required key, carried a value outside its valid domain, or
    /// otherwise failed validation. Carries the owning reaction's equation string when one was
    /// supplied to `validate`.
    #[error("invalid parameter{}: {message}", equation.as_ref().map_or(String::new(), |e| format!(" in reaction '{e}'")))]
    InvalidParameter {
        /// Equation string of the reaction that owns the offending rate, if known.
        equation: Option<String>,
        /// Human-readable description of what was wrong.
        message: String,
    },
    /// A quantity carried units incompatible with its expected dimension.
    #[error("unit mismatch: {message}")]
    UnitMismatch {
        /// Human-readable description of the mismatch.
        message: String,
    },
    /// An operation required state that was not present, e.g. querying the link index of an
    /// unlinked rate.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Human-readable description of the invalid state.
        message: String,
    },
    /// Error that does not originate from this crate.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Builds an [`Error::InvalidParameter`] without an owning equation.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            equation: None,
            message: message.into(),
        }
    }

    /// Builds an [`Error::InvalidParameter`] tagged with the owning reaction's equation string.
    pub fn invalid_parameter_in(equation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            equation: Some(equation.into()),
            message: message.into(),
        }
    }

    /// Builds an [`Error::UnitMismatch`].
    pub fn unit_mismatch(message: impl Into<String>) -> Self {
        Self::UnitMismatch {
            message: message.into(),
        }
    }

    /// Builds an [`Error::InvalidState`].
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

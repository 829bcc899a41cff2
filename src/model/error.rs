//! Error types for the endless list core.
//!
//! This module defines the error taxonomy using `thiserror`. Every core error is a
//! programmer error detected synchronously at the call that violates the contract:
//! nothing here is a runtime condition to recover from, and nothing is retried.
//!
//! # Error Hierarchy
//!
//! - [`EndlessError`] - Returned by every fallible core operation
//!   - [`ConfigurationError`] - The list is not wired up for the requested operation
//!     (unsupported layout strategy, missing pager, missing layout strategy)
//!   - `InvalidArgument` - A value outside its domain (non-positive threshold)
//!   - `UnsupportedOperation` - Bypassing the scroll multicaster
//! - [`AppError`] - Top-level error of the demo binary
//!
//! # Load failures
//!
//! A failed page load is not an error of this crate. Callers report "load finished"
//! (successful or not) with `set_refreshing(direction, false)` and own any retry policy.

use thiserror::Error;

/// Error returned by the endless list core.
///
/// All variants are raised eagerly by the offending call. The list state is left
/// untouched when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndlessError {
    /// The list is missing a collaborator, or was handed one it cannot drive.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// An argument is outside its accepted domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use endless_list::model::{EndlessError, Threshold};
    ///
    /// let err = Threshold::new(0).unwrap_err();
    /// assert!(matches!(err, EndlessError::InvalidArgument { .. }));
    /// assert!(err.to_string().contains("threshold"));
    /// ```
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the rejected argument.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The operation is not allowed on this list.
    #[error("Unsupported operation `{operation}`: {hint}")]
    UnsupportedOperation {
        /// Operation that was attempted.
        operation: &'static str,
        /// What to call instead.
        hint: &'static str,
    },
}

impl EndlessError {
    /// Convenience constructor for [`EndlessError::InvalidArgument`].
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Wiring problems between the list and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The attached layout strategy is neither single-track nor multi-track.
    #[error("unsupported layout strategy: {kind}")]
    UnsupportedLayout {
        /// Name reported by the layout strategy.
        kind: String,
    },

    /// The operation needs a pager but none is attached.
    #[error("no pager attached")]
    NoPager,

    /// A scroll event needs visibility information but no layout strategy is attached.
    #[error("no layout strategy attached")]
    MissingLayoutStrategy,

    /// A placeholder row was requested but no placeholder renderer is configured.
    #[error("no placeholder renderer configured")]
    NoPlaceholderRenderer,
}

/// Top-level error of the demo application.
///
/// Wraps every failure mode of the binary so `main` can propagate with `?`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file could not be read, parsed or validated.
    #[error("Configuration failed: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The endless list rejected an operation.
    #[error("List error: {0}")]
    List(#[from] EndlessError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Tui(#[from] crate::view::TuiError),
}

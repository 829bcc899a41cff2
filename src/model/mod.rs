//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod types;

// Re-export for convenience
pub use error::{AppError, ConfigurationError, EndlessError};
pub use types::{Direction, Edge, RefreshingState, RowType, Threshold};

//! Common error infrastructure shared by the algorithm, config, and stats
//! modules.
//!
//! # Design Principles
//!
//! - **Severity classification**: errors are categorized for recovery
//!   strategies, mirroring the taxonomy the runtime maps onto HTTP status
//!   codes.
//! - **Stable error codes**: every error exposes a `&'static str` code so
//!   callers can surface it verbatim in a transaction result without a
//!   separate mapping table.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Invalid input or precondition; the caller should not retry unchanged.
    Validation,
    /// Unexpected state inconsistency; indicates a bug or corrupted config.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Common trait for all `engine-core` errors.
///
/// Use `#[derive(thiserror::Error)]` for `Display`/`Error` and implement this
/// trait to expose severity and a stable code for the HTTP layer.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable string identifier for this error variant (e.g.
    /// `"INVALID_CONFIG_REFERENCE"`), suitable for use as a transaction
    /// `errorCode`.
    fn error_code(&self) -> &'static str;
}

//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`DuelError`, `FlowError`, `ChoiceError`) live next
//! to the operations they reject. They share the classification defined here
//! so callers can decide how loudly to report a rejection.
//!
//! Nothing in this crate is fatal: every error describes a rejected call that
//! left state untouched and can be retried with corrected input.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The call arrived at the wrong time (battle already over, wrong flow phase).
    ///
    /// Retrying later, once the session has advanced, may succeed.
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: out-of-range choice index, missing action
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and test assertions.
    fn error_code(&self) -> &'static str;
}

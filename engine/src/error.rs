//! Error types for form editing and submission

use thiserror::Error;

/// Errors raised by a form instance. None of them is fatal: each leaves the
/// form usable for further edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Key path string was empty
    #[error("Key path is empty")]
    EmptyPath,

    /// Key path contained `..` or a leading/trailing dot
    #[error("Key path '{0}' contains an empty segment")]
    EmptySegment(String),

    /// No schema node at this path
    #[error("No field at path '{0}'")]
    UnknownField(String),

    /// Variant selection on a node without `oneOf`/`anyOf`
    #[error("Field '{0}' has no variants")]
    NoVariants(String),

    #[error("Variant {index} out of range: '{path}' has {count} variants")]
    VariantOutOfRange {
        path: String,
        index: usize,
        count: usize,
    },

    /// Raw control input could not be coerced for the field's type
    #[error("Invalid input for '{path}': {reason}")]
    InvalidInput { path: String, reason: String },

    /// A required top-level field is empty, null or absent
    #[error("Missing required field: {0}")]
    MissingRequired(String),

    /// Another submission on this form has not finished yet
    #[error("A submission is already in flight")]
    SubmissionInFlight,

    /// The invocation collaborator reported a failure
    #[error("Invocation failed: {0}")]
    Invocation(String),
}

/// Result type alias for form operations
pub type FormResult<T> = Result<T, FormError>;

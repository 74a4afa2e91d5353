//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Boxed error returned by caller-supplied closures (label functions).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Domain errors represent malformed input or failing caller logic.
/// Styling problems never end up here: they fall back to defaults.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("tree deeper than {limit} levels at: {path}")]
    DepthLimitExceeded { path: String, limit: usize },

    #[error("invalid size {size} on leaf: {path}")]
    InvalidSize { path: String, size: f64 },

    #[error("label function failed for node: {name}")]
    Label {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl DomainError {
    /// True for errors raised while validating the input tree shape.
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            DomainError::DepthLimitExceeded { .. } | DomainError::InvalidSize { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

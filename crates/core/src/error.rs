//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// malformed identifiers). Storage and transport failures
/// belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed validation. Each entry is a human-readable violation.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(violations: Vec<String>) -> Self {
        Self::Validation(violations)
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Violations carried by a validation error, empty for every other variant.
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation(v) => v,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_violation() {
        let err = DomainError::validation(vec![
            "Invoice number must not be null or empty".to_string(),
            "Buyer must not be null".to_string(),
        ]);

        assert_eq!(
            err.to_string(),
            "validation failed: Invoice number must not be null or empty; Buyer must not be null"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn non_validation_errors_carry_no_violations() {
        assert!(DomainError::invalid_id("x").violations().is_empty());
    }
}

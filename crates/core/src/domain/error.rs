// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Wrong input representation for a type-sensitive operation
    #[error("{operation} does not accept {found} input")]
    TypeKind {
        operation: &'static str,
        found: String,
    },

    /// Text does not match the expected grammar or pattern
    #[error("Format error: {0}")]
    Format(String),

    /// Numeric result has no representation in the target type
    #[error("{operation} cannot represent {value}")]
    OutOfRange {
        operation: &'static str,
        value: String,
    },

    #[error("Unknown time zone: {0}")]
    UnknownZone(String),

    #[error("Credentials entry for {0} must be a non-empty object")]
    InvalidCredentialEntry(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;

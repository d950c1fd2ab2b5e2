//! Domain errors for the villagewatch system.

use thiserror::Error;

/// Domain-level errors that can occur in villagewatch.
///
/// Oracle failures never appear here; the services recover them with
/// fallback values.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Village not found: {0}")]
    VillageNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

/// Failures reported by a risk or advisory oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Oracle rate limited")]
    RateLimited,

    #[error("Oracle call timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("Oracle response violates contract: {0}")]
    ContractViolation(String),
}

impl OracleError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::NotConfigured(_) | Self::MalformedResponse(_) | Self::ContractViolation(_) => {
                false
            }
        }
    }
}

pub type OracleResult<T> = Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(OracleError::Status { status: 529, body: String::new() }.is_transient());
        assert!(OracleError::RateLimited.is_transient());
        assert!(!OracleError::Status { status: 401, body: String::new() }.is_transient());
        assert!(OracleError::Http("reset".into()).is_transient());
        assert!(!OracleError::ContractViolation("bad level".into()).is_transient());
    }
}

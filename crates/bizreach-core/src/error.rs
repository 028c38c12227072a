//! Error types for BizReach.

use thiserror::Error;

/// Errors surfaced by the registry, the communication log, and the stores.
#[derive(Debug, Error)]
pub enum ReachError {
    /// A required field was missing or empty on create.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation referenced an id that does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Config error: {0}")]
    Config(String),

    /// Snapshot store failure (SQLite, malformed rows).
    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReachError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn company_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Company",
            id: id.to_string(),
        }
    }

    pub fn method_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Communication method",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ReachError::company_not_found("c-42");
        assert_eq!(err.to_string(), "Company not found: c-42");
    }

    #[test]
    fn test_io_conversion() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.toml")?)
        }
        assert!(matches!(read(), Err(ReachError::Io(_))));
    }
}

/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Persistence-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote catalog errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity, e.g. `Playlist`
        entity: String,
        /// Identifier that was looked up
        id: String,
    },
}

impl CadenceError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = CadenceError::not_found("Playlist", "abc");
        assert_eq!(err.to_string(), "Playlist not found: abc");
    }

    #[test]
    fn storage_and_catalog_messages_carry_context() {
        assert_eq!(
            CadenceError::storage("disk full").to_string(),
            "Storage error: disk full"
        );
        assert_eq!(
            CadenceError::catalog("unreachable").to_string(),
            "Catalog error: unreachable"
        );
    }
}

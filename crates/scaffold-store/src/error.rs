//! Error types for repositories

use crate::record::RecordId;

/// Repository operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record under this id
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A record already exists under this id
    #[error("record already exists: {0}")]
    AlreadyExists(RecordId),

    /// Id text is not a valid record id
    #[error("invalid record id: '{0}'")]
    InvalidId(String),

    /// Backing storage could not serve the request
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_display() {
        let err = StoreError::InvalidId("42".to_string());
        assert_eq!(err.to_string(), "invalid record id: '42'");
    }

    #[test]
    fn not_found_names_id() {
        let id = RecordId::new();
        let err = StoreError::NotFound(id);
        assert_eq!(err.to_string(), format!("record not found: {id}"));
    }
}

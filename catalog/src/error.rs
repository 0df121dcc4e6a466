use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Transient(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl CatalogError {
    pub fn not_found(message: impl Into<String>) -> Self {
        CatalogError::NotFound(message.into())
    }

    /// A retry of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Conflict(_) | CatalogError::Transient(_))
    }
}

impl From<sled::Error> for CatalogError {
    fn from(err: sled::Error) -> Self {
        CatalogError::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(CatalogError::Conflict("dup".into()).is_retryable());
        assert!(CatalogError::Transient("down".into()).is_retryable());
        assert!(!CatalogError::NotFound("gone".into()).is_retryable());
        assert!(!CatalogError::Authorization("no".into()).is_retryable());
    }
}

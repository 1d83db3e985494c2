use thiserror::Error;

use crate::model::ValidationError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Invalid fields: {0}")]
    InvalidFields(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidSortKey(_)
                | CatalogError::InvalidFields(_)
                | CatalogError::MalformedPayload(_)
                | CatalogError::Validation(_)
                | CatalogError::NotFound(_)
                | CatalogError::Conflict(_)
        )
    }

    pub fn not_found(resource: &str, id: i64) -> Self {
        CatalogError::NotFound(format!("{resource} {id} does not exist"))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

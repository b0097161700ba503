use thiserror::Error;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The query string failed validation; the message is caller-facing.
    #[error("{message}")]
    InvalidQuery { message: String },

    #[error("The requested {what} was not found.")]
    NotFound { what: String },

    #[error("Internal error")]
    Internal,
}

impl CatalogError {
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

use query_core::{QueryError, SchemaError};
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("The requested {what} was not found.")]
    NotFound { what: String },

    #[error("Invalid resource definition '{resource}': {source}")]
    Schema {
        resource: String,
        #[source]
        source: SchemaError,
    },

    #[error("Failed to load collection '{resource}': {message}")]
    Storage { resource: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn schema(resource: impl Into<String>, source: SchemaError) -> Self {
        Self::Schema {
            resource: resource.into(),
            source,
        }
    }

    pub fn storage(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<DomainError> for crate::contract::error::CatalogError {
    fn from(e: DomainError) -> Self {
        use crate::contract::error::CatalogError;
        match e {
            DomainError::InvalidQuery(q) => CatalogError::invalid_query(q.message()),
            DomainError::NotFound { what } => CatalogError::not_found(what),
            other => {
                tracing::error!(error = %other, "catalog operation failed");
                CatalogError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_kind() {
        let err = DomainError::not_found("crafting recipe");
        assert_eq!(err.to_string(), "The requested crafting recipe was not found.");
    }
}

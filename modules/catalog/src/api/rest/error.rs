use api_ingress::AppError;

use crate::domain::error::DomainError;

/// Map a domain error to the HTTP error. Validation and not-found messages go
/// out verbatim; everything else becomes an opaque 500.
pub fn map_domain_error(e: DomainError) -> AppError {
    match e {
        DomainError::InvalidQuery(q) => AppError::BadRequest(q.message().to_string()),
        not_found @ DomainError::NotFound { .. } => AppError::NotFound(not_found.to_string()),
        other => AppError::internal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn statuses() {
        assert_eq!(
            map_domain_error(DomainError::not_found("block")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_domain_error(DomainError::storage("items", "gone")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

use thiserror::Error;

use crate::error::{ErrorMessage, HttpError};

/// Every failure the signup flow or leaderboard can produce, already folded
/// into the kinds the frontend knows how to render. Raw sqlx/reqwest errors
/// never cross this boundary.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No verified identity attached to this request")]
    NotAuthenticated,

    #[error("This email or Farcaster ID is already registered")]
    DuplicateEmail,

    #[error("The waitlist store refused the operation")]
    PermissionDenied,

    #[error("{0}")]
    Validation(String),

    #[error("Waitlist backend error: {0}")]
    Unknown(String),
}

impl ServiceError {
    /// Classify a store failure. Unique violations (23505) are the store's
    /// authoritative word on dedup; 42501 is Postgres row-level security
    /// turning the request away.
    pub fn from_store_error(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return ServiceError::DuplicateEmail;
            }
            if db_error.code().as_deref() == Some("42501") {
                return ServiceError::PermissionDenied;
            }
        }

        ServiceError::Unknown(error.to_string())
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotAuthenticated => {
                HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string())
            }
            ServiceError::DuplicateEmail => {
                HttpError::conflict(ErrorMessage::EmailExist.to_string())
            }
            ServiceError::PermissionDenied => {
                HttpError::unauthorized(ErrorMessage::PermissionDenied.to_string())
            }
            ServiceError::Validation(message) => HttpError::bad_request(message),
            ServiceError::Unknown(_) => {
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::db::test_support::{permission_denied, unique_violation};

    #[test]
    fn unique_violation_becomes_duplicate_email() {
        let error = ServiceError::from_store_error(unique_violation());
        assert!(matches!(error, ServiceError::DuplicateEmail));
    }

    #[test]
    fn rls_violation_becomes_permission_denied() {
        let error = ServiceError::from_store_error(permission_denied());
        assert!(matches!(error, ServiceError::PermissionDenied));
    }

    #[test]
    fn other_store_errors_become_unknown() {
        let error = ServiceError::from_store_error(sqlx::Error::RowNotFound);
        assert!(matches!(error, ServiceError::Unknown(_)));
    }

    #[test]
    fn http_statuses_follow_the_taxonomy() {
        assert_eq!(
            HttpError::from(ServiceError::NotAuthenticated).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            HttpError::from(ServiceError::DuplicateEmail).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            HttpError::from(ServiceError::PermissionDenied).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            HttpError::from(ServiceError::Validation("nope".to_string())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from(ServiceError::Unknown("boom".to_string())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

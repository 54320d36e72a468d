use diesel::result::DatabaseErrorKind;
use std::fmt::{Display, Formatter};
use strum::Display;

pub type BackendResult<T> = Result<T, BackendError>;

/// Broad classification of failures, mapped to HTTP status codes in responses.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    ConflictOrTransient,
    Internal,
}

#[derive(Debug)]
pub struct BackendError {
    pub kind: ErrorKind,
    pub inner: anyhow::Error,
}

impl BackendError {
    pub fn not_found(msg: &'static str) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            inner: anyhow::anyhow!(msg),
        }
    }

    pub fn invalid_argument(msg: &'static str) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            inner: anyhow::anyhow!(msg),
        }
    }

    pub fn message(&self) -> String {
        self.inner.to_string()
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

/// Serialization failures can be retried, everything else from the
/// database is deterministic.
pub fn is_transient(e: &diesel::result::Error) -> bool {
    matches!(
        e,
        diesel::result::Error::DatabaseError(DatabaseErrorKind::SerializationFailure, _)
    )
}

impl<T> From<T> for BackendError
where
    T: Into<anyhow::Error>,
{
    fn from(t: T) -> Self {
        let inner = t.into();
        let kind = match inner.downcast_ref::<diesel::result::Error>() {
            Some(diesel::result::Error::NotFound) => ErrorKind::NotFound,
            Some(e) if is_transient(e) => ErrorKind::ConflictOrTransient,
            Some(_) => ErrorKind::Internal,
            None => ErrorKind::Internal,
        };
        BackendError { kind, inner }
    }
}

impl axum::response::IntoResponse for BackendError {
    fn into_response(self) -> axum::response::Response {
        use http::StatusCode;
        let status = match self.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::ConflictOrTransient => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diesel_not_found_becomes_not_found_kind() {
        let err: BackendError = diesel::result::Error::NotFound.into();
        assert_eq!(ErrorKind::NotFound, err.kind);
    }

    #[test]
    fn test_serialization_failure_is_transient() {
        let err: BackendError = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::SerializationFailure,
            Box::new(String::from("could not serialize access")),
        )
        .into();
        assert_eq!(ErrorKind::ConflictOrTransient, err.kind);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err: BackendError = anyhow::anyhow!("boom").into();
        assert_eq!(ErrorKind::Internal, err.kind);
    }

    #[test]
    fn test_constructors_keep_message() {
        let err = BackendError::not_found("Comment not found");
        assert_eq!(ErrorKind::NotFound, err.kind);
        assert_eq!("Comment not found", err.message());
    }
}

//! Pod operation errors

use crate::link::LinkError;
use crate::rdf::{ParseError, PrefixError, RdfError, SerializeError};
use crate::shape::ShapeError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by [`PodClient`](crate::PodClient) operations
///
/// Status errors carry the numeric code and a message prefixed with the
/// step that failed, e.g. `"Creating container: Forbidden"`.
#[derive(Error, Debug)]
pub enum PodError {
    /// No response: network, DNS or timeout
    #[error("{message}")]
    Transport { message: String, body: String },

    #[error("{message}")]
    Unauthorized { code: u16, message: String },

    #[error("{message}")]
    Forbidden { code: u16, message: String },

    #[error("{message}")]
    NotAcceptable { code: u16, message: String },

    #[error("{message}")]
    InsufficientStorage { code: u16, message: String },

    /// Any other non-success status
    #[error("{message}")]
    UnexpectedStatus {
        code: u16,
        message: String,
        body: String,
    },

    /// `Link` header unparsable or lacking a required relation
    #[error("Malformed header: {0}")]
    MalformedHeader(#[from] LinkError),

    #[error("Response from {url} has no {header} header")]
    MissingHeader { header: &'static str, url: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Prefix(#[from] PrefixError),

    /// Some requests of a concurrent group failed
    #[error("{count} request(s) failed, first: {first}", count = .failures.len(), first = first_failure(.failures))]
    Incomplete { failures: Vec<PodError> },
}

pub type PodResult<T> = Result<T, PodError>;

impl PodError {
    /// The HTTP status behind this error, if there was one
    pub fn code(&self) -> Option<u16> {
        match self {
            PodError::Unauthorized { code, .. }
            | PodError::Forbidden { code, .. }
            | PodError::NotAcceptable { code, .. }
            | PodError::InsufficientStorage { code, .. }
            | PodError::UnexpectedStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Map a non-success status to its error kind
    pub fn from_status(status: StatusCode, context: &str, body: String) -> Self {
        let code = status.as_u16();
        let message = format!(
            "{context}: {}",
            status.canonical_reason().unwrap_or("Unknown status")
        );
        match status {
            StatusCode::UNAUTHORIZED => PodError::Unauthorized { code, message },
            StatusCode::FORBIDDEN => PodError::Forbidden { code, message },
            StatusCode::NOT_ACCEPTABLE => PodError::NotAcceptable { code, message },
            StatusCode::INSUFFICIENT_STORAGE => PodError::InsufficientStorage { code, message },
            _ => PodError::UnexpectedStatus {
                code,
                message,
                body,
            },
        }
    }
}

fn first_failure(failures: &[PodError]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognised_statuses() {
        let cases = [
            (StatusCode::UNAUTHORIZED, 401),
            (StatusCode::FORBIDDEN, 403),
            (StatusCode::NOT_ACCEPTABLE, 406),
            (StatusCode::INSUFFICIENT_STORAGE, 507),
        ];
        for (status, code) in cases {
            let err = PodError::from_status(status, "Writing ACL", String::new());
            assert_eq!(err.code(), Some(code));
            assert!(err.to_string().starts_with("Writing ACL: "));
            assert!(!matches!(err, PodError::UnexpectedStatus { .. }));
        }

        assert!(matches!(
            PodError::from_status(StatusCode::FORBIDDEN, "x", String::new()),
            PodError::Forbidden { code: 403, .. }
        ));
    }

    #[test]
    fn test_other_status_keeps_body() {
        let err = PodError::from_status(StatusCode::CONFLICT, "Deleting", "busy".into());
        match err {
            PodError::UnexpectedStatus { code, message, body } => {
                assert_eq!(code, 409);
                assert_eq!(message, "Deleting: Conflict");
                assert_eq!(body, "busy");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_display() {
        let err = PodError::Incomplete {
            failures: vec![
                PodError::from_status(StatusCode::FORBIDDEN, "Deleting a", String::new()),
                PodError::from_status(StatusCode::FORBIDDEN, "Deleting b", String::new()),
            ],
        };
        assert_eq!(err.to_string(), "2 request(s) failed, first: Deleting a: Forbidden");
        assert_eq!(err.code(), None);
    }
}

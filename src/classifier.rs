//! Turns raw transport outcomes into the fixed set of messages shown to the operator.

use thiserror::Error;
use tracing::error;

/// What actually happened to a request that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The server never answered (connection refused, timeout, closed channel).
    #[error("no response received: {0}")]
    NoResponse(String),
    /// The server answered with a status the caller cannot use.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },
}

/// User-facing error category produced by an [`ErrorClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    #[error("Unable to connect to the server")]
    ConnectionUnavailable,
    #[error("Invalid data sent to the server")]
    InvalidInput,
    #[error("Not authorized. Check your credentials")]
    Unauthorized,
    #[error("Access denied")]
    Forbidden,
    #[error("Resource not found")]
    NotFound,
    #[error("Internal server error")]
    ServerError,
    #[error("Error {status}: {message}")]
    Other { status: u16, message: String },
}

pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, failure: &TransportFailure) -> ClassifiedError;
}

/// Classifies by HTTP status, logging the raw failure first.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusClassifier;

impl ErrorClassifier for StatusClassifier {
    fn classify(&self, failure: &TransportFailure) -> ClassifiedError {
        error!(failure = %failure, "API request failed");
        classify_failure(failure)
    }
}

pub fn classify_failure(failure: &TransportFailure) -> ClassifiedError {
    match failure {
        TransportFailure::NoResponse(_) => ClassifiedError::ConnectionUnavailable,
        TransportFailure::Status { status, message } => match status {
            0 => ClassifiedError::ConnectionUnavailable,
            400 => ClassifiedError::InvalidInput,
            401 => ClassifiedError::Unauthorized,
            403 => ClassifiedError::Forbidden,
            404 => ClassifiedError::NotFound,
            500 => ClassifiedError::ServerError,
            other => ClassifiedError::Other {
                status: *other,
                message: message.clone(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> TransportFailure {
        TransportFailure::Status {
            status,
            message: format!("Http failure response: {status}"),
        }
    }

    #[test]
    fn test_known_statuses_map_to_fixed_categories() {
        let cases = [
            (400, ClassifiedError::InvalidInput),
            (401, ClassifiedError::Unauthorized),
            (403, ClassifiedError::Forbidden),
            (404, ClassifiedError::NotFound),
            (500, ClassifiedError::ServerError),
            (0, ClassifiedError::ConnectionUnavailable),
        ];
        for (code, expected) in cases {
            assert_eq!(StatusClassifier.classify(&status(code)), expected, "status {code}");
        }
    }

    #[test]
    fn test_no_response_is_connection_unavailable() {
        let failure = TransportFailure::NoResponse("connection refused".to_string());
        assert_eq!(classify_failure(&failure), ClassifiedError::ConnectionUnavailable);
        assert_eq!(classify_failure(&failure), classify_failure(&failure));
    }

    #[test]
    fn test_unmapped_status_carries_code_and_message() {
        let classified = classify_failure(&status(418));
        assert_eq!(
            classified,
            ClassifiedError::Other {
                status: 418,
                message: "Http failure response: 418".to_string(),
            }
        );
        assert_eq!(classified.to_string(), "Error 418: Http failure response: 418");
    }

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(ClassifiedError::NotFound.to_string(), "Resource not found");
        assert_eq!(
            ClassifiedError::ConnectionUnavailable.to_string(),
            "Unable to connect to the server"
        );
    }
}

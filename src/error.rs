//! Error types
//!
//! Lifecycle handlers never pattern-match on error text. Every failure that
//! reaches them carries an [`ErrorKind`] so "not found" can be told apart
//! from everything else.

use aws_sdk_quicksight::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Error code QuickSight returns when a group (or its namespace) is absent
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Coarse classification used by the lifecycle handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Remote entity does not exist
    NotFound,
    /// Anything else
    Other,
}

/// Identifier could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected format of ID ({id}), expected AWS_ACCOUNT_ID/NAMESPACE/GROUP_NAME")]
pub struct IdError {
    pub id: String,
}

/// Failure of a remote QuickSight (or STS) call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with an error
    #[error("{code}: {message} (status {status})")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    /// The request never got an answer: credentials, connection, timeout
    #[error("sending request: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Response(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Service { code, .. } if code == RESOURCE_NOT_FOUND => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }

    /// Build a service error from its status and error metadata
    pub fn service(status: u16, code: Option<&str>, message: Option<&str>) -> Self {
        Self::Service {
            status,
            code: code
                .filter(|c| !c.is_empty())
                .unwrap_or("UnknownError")
                .to_string(),
            message: message.unwrap_or("request failed").to_string(),
        }
    }

    /// Build a not-found error, mostly useful for fakes
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Service {
            status: 404,
            code: RESOURCE_NOT_FOUND.to_string(),
            message: message.into(),
        }
    }
}

impl<E> From<SdkError<E>> for ApiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    fn from(err: SdkError<E>) -> Self {
        match &err {
            SdkError::ServiceError(context) => Self::service(
                context.raw().status().as_u16(),
                context.err().code(),
                context.err().message(),
            ),
            _ => Self::Transport(DisplayErrorContext(&err).to_string()),
        }
    }
}

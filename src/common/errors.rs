use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Error categories shared by the whole client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input or failed validation
    InvalidInput,
    /// Authentication rejected by the remote service
    AccessDenied,
    /// Request timed out
    Timeout,
    /// The remote API answered with a non-zero errno
    RemoteError,
    /// Transport, decoding or other internal failure
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::InvalidInput => write!(f, "Invalid Input"),
            ErrorKind::AccessDenied => write!(f, "Access Denied"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::RemoteError => write!(f, "Remote Error"),
            ErrorKind::InternalError => write!(f, "Internal Error"),
        }
    }
}

/// Domain error with enough context to log a failed remote call
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct DomainError {
    /// Error category
    pub kind: ErrorKind,
    /// Affected entity type (e.g. "TrashEntry", "RemoteTrash")
    pub entity_type: &'static str,
    /// Entity identifier when available
    pub entity_id: Option<String>,
    /// Human readable message
    pub message: String,
    /// Underlying error (optional)
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, DomainError>;

impl DomainError {
    pub fn new<S: Into<String>>(kind: ErrorKind, entity_type: &'static str, message: S) -> Self {
        Self {
            kind,
            entity_type,
            entity_id: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn timeout<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Timeout, entity_type, message)
    }

    pub fn internal_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InternalError, entity_type, message)
    }

    pub fn validation_error<S: Into<String>>(entity_type: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InvalidInput, entity_type, message)
    }

    /// Non-zero `errno` reported by the remote API
    pub fn remote_errno(entity_type: &'static str, errno: i64) -> Self {
        Self {
            kind: ErrorKind::RemoteError,
            entity_type,
            entity_id: None,
            message: format!("remote API returned errno {}", errno),
            source: None,
        }
    }

    pub fn with_source<E: StdError + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Adds context to foreign errors while converting them to `DomainError`
pub trait ErrorContext<T, E> {
    fn with_context<C, F>(self, context: F) -> std::result::Result<T, DomainError>
    where
        C: Into<String>,
        F: FnOnce() -> C;

    fn with_error_kind(
        self,
        kind: ErrorKind,
        entity_type: &'static str,
    ) -> std::result::Result<T, DomainError>;
}

impl<T, E: StdError + Send + Sync + 'static> ErrorContext<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, context: F) -> std::result::Result<T, DomainError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| DomainError {
            kind: ErrorKind::InternalError,
            entity_type: "Unknown",
            entity_id: None,
            message: context().into(),
            source: Some(Box::new(e)),
        })
    }

    fn with_error_kind(
        self,
        kind: ErrorKind,
        entity_type: &'static str,
    ) -> std::result::Result<T, DomainError> {
        self.map_err(|e| DomainError {
            kind,
            entity_type,
            entity_id: None,
            message: format!("{}", e),
            source: Some(Box::new(e)),
        })
    }
}

/// Converts a foreign error type into an internal `DomainError`
#[macro_export]
macro_rules! impl_from_error {
    ($error_type:ty, $entity_type:expr) => {
        impl From<$error_type> for DomainError {
            fn from(err: $error_type) -> Self {
                DomainError {
                    kind: ErrorKind::InternalError,
                    entity_type: $entity_type,
                    entity_id: None,
                    message: format!("{}", err),
                    source: Some(Box::new(err)),
                }
            }
        }
    };
}

impl_from_error!(serde_json::Error, "Serialization");

// reqwest errors carry timeout and status information worth keeping
impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err
            .status()
            .map(|s| s == reqwest::StatusCode::UNAUTHORIZED || s == reqwest::StatusCode::FORBIDDEN)
            .unwrap_or(false)
        {
            ErrorKind::AccessDenied
        } else {
            ErrorKind::InternalError
        };

        DomainError {
            kind,
            entity_type: "RemoteTrash",
            entity_id: None,
            message: format!("{}", err),
            source: Some(Box::new(err)),
        }
    }
}

use strum::Display;
use thiserror::Error;

/// Broad classification of a failed billing provider call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Missing or rejected credential
    Authentication,
    /// The provider refused the parameters
    InvalidRequest,
    RateLimited,
    /// The request never produced a response (DNS, TLS, timeout, reset)
    Network,
    /// The referenced provider object does not exist
    NotFound,
    /// Any other non-success response
    Api,
}

/// A failed call to the billing provider.
///
/// `code` is the provider's own error code and is carried through untouched.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, message)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Billing provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The local store rejected a read or write. When the failed write follows
    /// a successful provider create, `orphaned_provider_id` names the remote
    /// object that now has no local row.
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        orphaned_provider_id: Option<String>,
    },

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    pub fn persistence(message: impl Into<String>) -> Self {
        AppError::Persistence {
            message: message.into(),
            orphaned_provider_id: None,
        }
    }

    /// Attach the id of a provider object left without a local row.
    /// Errors other than `Persistence` are returned unchanged.
    pub fn orphaning(self, provider_id: &str) -> Self {
        match self {
            AppError::Persistence { message, .. } => AppError::Persistence {
                message,
                orphaned_provider_id: Some(provider_id.to_string()),
            },
            other => other,
        }
    }

    pub fn orphaned_provider_id(&self) -> Option<&str> {
        match self {
            AppError::Persistence {
                orphaned_provider_id,
                ..
            } => orphaned_provider_id.as_deref(),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Provider(_) => ErrorCode::ProviderError,
            AppError::Persistence { .. } => ErrorCode::PersistenceError,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    ProviderError,
    PersistenceError,
    NotFound,
    InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ProviderError => "PROVIDER_ERROR",
            ErrorCode::PersistenceError => "PERSISTENCE_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidInput => "INVALID_INPUT",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

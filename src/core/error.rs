//! Errors returned by the services.

use crate::infrastructure::traits::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Daily limit reached. Upgrade to Pro for unlimited generations!")]
    QuotaExceeded,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session is missing, expired or signed out")]
    Unauthorized,

    #[error("admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("response generation failed: {0}")]
    Generation(#[from] minijinja::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Failures that are the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ServiceError::Generation(_) | ServiceError::PasswordHash(_) | ServiceError::Repository(_)
        )
    }
}

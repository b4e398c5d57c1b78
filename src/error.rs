//! Error type shared by the service layer and the GraphQL resolvers

use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// No verified identity on the request, or the identity no longer maps to a user
    #[error("You need to be logged in!")]
    Unauthenticated,

    /// Unknown email or wrong password. The two cases share one error on purpose.
    #[error("Incorrect credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable code placed in the GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::InvalidCredentials => "UNAUTHENTICATED",
            AppError::Validation(_) => "BAD_USER_INPUT",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let message = match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Request failed with internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("disk I/O error at /var/db"));
        let gql = err.extend();
        assert_eq!(gql.message, "Internal server error");
    }

    #[test]
    fn test_credential_errors_share_code_with_unauthenticated() {
        assert_eq!(AppError::InvalidCredentials.code(), "UNAUTHENTICATED");
        assert_eq!(AppError::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(AppError::Conflict("taken".into()).code(), "CONFLICT");
    }
}

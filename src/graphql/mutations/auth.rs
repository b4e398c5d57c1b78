//! GraphQL authentication mutations
//!
//! Neither mutation requires authentication. Failures are returned to the
//! client as GraphQL errors with an `extensions.code`.

use super::prelude::*;
use crate::error::AppError;
use crate::services::NewAccount;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Create a user account and return a token for it
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<Auth> {
        let service = ctx.data_unchecked::<Arc<BookshelfService>>();

        let payload = service
            .add_user(NewAccount {
                username,
                email,
                password,
            })
            .await
            .map_err(|e| {
                // Internal errors are logged when extended
                if !matches!(e, AppError::Internal(_)) {
                    tracing::warn!(error = %e, "User registration failed");
                }
                e.extend()
            })?;

        Ok(payload.into())
    }

    /// Authenticate with email and password
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<Auth> {
        let service = ctx.data_unchecked::<Arc<BookshelfService>>();

        let payload = service
            .login(&email, &password)
            .await
            .map_err(|e| e.extend())?;

        Ok(payload.into())
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, Variables};
    use serde_json::json;

    use crate::db::Database;
    use crate::graphql::{BookshelfSchema, build_schema};
    use crate::services::{AuthConfig, AuthService, BookshelfService};
    use crate::test_support::capture_logs;

    use super::*;

    async fn schema_with_db() -> (BookshelfSchema, Database) {
        let db = Database::connect_in_memory().await.unwrap();
        let auth = AuthService::new(AuthConfig {
            jwt_secret: "test-secret".into(),
            token_lifetime: 3600,
            bcrypt_cost: 4,
        })
        .unwrap();
        let schema = build_schema(Arc::new(BookshelfService::new(db.clone(), auth)));
        (schema, db)
    }

    fn add_user(email: &str) -> Request {
        Request::new(
            "mutation AddUser($email: String!) {
                addUser(username: \"reader\", email: $email, password: \"hunter22\") { token }
            }",
        )
        .variables(Variables::from_json(json!({ "email": email })))
    }

    #[tokio::test]
    async fn test_failed_login_keeps_email_out_of_logs() {
        let (schema, _db) = schema_with_db().await;
        let (logs, _guard) = capture_logs();

        let response = schema
            .execute(
                Request::new(
                    "mutation Login($email: String!) {
                        login(email: $email, password: \"wrong\") { token }
                    }",
                )
                .variables(Variables::from_json(json!({ "email": "private-reader@x.com" }))),
            )
            .await;

        assert_eq!(response.errors.len(), 1);
        let logs = logs.contents();
        assert!(logs.contains("Login failed"), "{}", logs);
        assert!(!logs.contains("private-reader@x.com"), "{}", logs);
    }

    #[tokio::test]
    async fn test_internal_signup_failure_logged_once() {
        let (schema, db) = schema_with_db().await;
        db.pool().close().await;
        let (logs, _guard) = capture_logs();

        let response = schema.execute(add_user("a@x.com")).await;

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Internal server error");
        let logs = logs.contents();
        assert_eq!(
            logs.matches("Request failed with internal error").count(),
            1,
            "{}",
            logs
        );
        assert!(!logs.contains("User registration failed"), "{}", logs);
    }

    #[tokio::test]
    async fn test_rejected_signup_is_logged() {
        let (schema, _db) = schema_with_db().await;
        let (logs, _guard) = capture_logs();

        let response = schema.execute(add_user("not-an-email")).await;

        assert_eq!(response.errors.len(), 1);
        assert!(logs.contents().contains("User registration failed"));
    }
}

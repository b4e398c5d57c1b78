//! Account and saved-book operations
//!
//! Every identity-scoped operation takes the caller's identity as an explicit
//! `Option<&AuthUser>` and runs it through [`require_identity`] first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::{CreateUser, Database, SaveBook, SavedBookRecord, UserRecord};
use crate::error::{AppError, AppResult};
use crate::services::auth::{AuthService, AuthUser};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+@.+\..+$").expect("valid regex"));

/// A user record with its saved books, minus credential fields
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub saved_books: Vec<SavedBookRecord>,
}

impl UserProfile {
    pub fn book_count(&self) -> usize {
        self.saved_books.len()
    }
}

/// Token plus user returned by signup and login
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

/// Signup fields
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Auth guard: turn an optional identity into a required one
pub fn require_identity(identity: Option<&AuthUser>) -> AppResult<&AuthUser> {
    identity.ok_or(AppError::Unauthenticated)
}

#[derive(Clone)]
pub struct BookshelfService {
    db: Database,
    auth: AuthService,
}

impl BookshelfService {
    pub fn new(db: Database, auth: AuthService) -> Self {
        Self { db, auth }
    }

    /// The calling user's profile with saved books
    pub async fn me(&self, identity: Option<&AuthUser>) -> AppResult<UserProfile> {
        let identity = require_identity(identity)?;
        let user = self.current_user(identity).await?;
        self.profile(user).await
    }

    /// Create an account and sign the new user in
    pub async fn add_user(&self, input: NewAccount) -> AppResult<AuthPayload> {
        let NewAccount {
            username,
            email,
            password,
        } = input;
        let username = username.trim().to_string();
        let email = email.trim().to_string();

        if username.is_empty() {
            return Err(AppError::Validation("Username is required".into()));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(AppError::Validation("Must use a valid email address".into()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }

        let users = self.db.users();
        if users.get_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        if users.get_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".into()));
        }

        let password_hash = self.auth.hash_password(&password)?;
        let user = users
            .create(CreateUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Username or email already registered".into())
                } else {
                    AppError::Internal(e)
                }
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        let token = self.auth.issue_token(&user)?;
        Ok(AuthPayload {
            token,
            user: self.profile(user).await?,
        })
    }

    /// Exchange email and password for a token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthPayload> {
        let Some(user) = self.db.users().get_by_email(email.trim()).await? else {
            self.auth.verify_dummy_password(password);
            tracing::debug!("Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !user.is_correct_password(password)? {
            tracing::debug!(user_id = %user.id, "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        let token = self.auth.issue_token(&user)?;
        Ok(AuthPayload {
            token,
            user: self.profile(user).await?,
        })
    }

    /// Add a book to the caller's collection unless its book id is already there
    pub async fn save_book(
        &self,
        identity: Option<&AuthUser>,
        mut book: SaveBook,
    ) -> AppResult<UserProfile> {
        let identity = require_identity(identity)?;

        book.book_id = book.book_id.trim().to_string();
        if book.book_id.is_empty() {
            return Err(AppError::Validation("bookId is required".into()));
        }
        if book.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }

        let user = self.current_user(identity).await?;
        let book_id = book.book_id.clone();
        let inserted = self.db.saved_books().add_if_absent(&user.id, book).await?;

        if inserted {
            self.db.users().touch(&user.id).await?;
            tracing::info!(user_id = %user.id, book_id = %book_id, "Book saved");
        } else {
            tracing::debug!(user_id = %user.id, book_id = %book_id, "Book already saved");
        }

        self.profile(user).await
    }

    /// Remove every entry with the given book id from the caller's collection
    pub async fn remove_book(
        &self,
        identity: Option<&AuthUser>,
        book_id: &str,
    ) -> AppResult<UserProfile> {
        let identity = require_identity(identity)?;
        let book_id = book_id.trim();
        let user = self.current_user(identity).await?;

        let removed = self
            .db
            .saved_books()
            .remove_by_book_id(&user.id, book_id)
            .await?;

        if removed > 0 {
            self.db.users().touch(&user.id).await?;
            tracing::info!(user_id = %user.id, book_id = %book_id, "Book removed");
        }

        self.profile(user).await
    }

    /// Load the user a verified identity points at.
    ///
    /// A valid token for a user that no longer exists is treated as anonymous.
    async fn current_user(&self, identity: &AuthUser) -> AppResult<UserRecord> {
        self.db
            .users()
            .get_by_id(&identity.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %identity.user_id, "Token refers to unknown user");
                AppError::Unauthenticated
            })
    }

    async fn profile(&self, user: UserRecord) -> AppResult<UserProfile> {
        let saved_books = self.db.saved_books().list_for_user(&user.id).await?;
        Ok(UserProfile {
            id: user.id,
            username: user.username,
            email: user.email,
            saved_books,
        })
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

//! Business logic services

pub mod auth;
pub mod bookshelf;

pub use auth::{AuthConfig, AuthService, AuthUser};
pub use bookshelf::{AuthPayload, BookshelfService, NewAccount, UserProfile};

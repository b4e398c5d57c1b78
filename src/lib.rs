//! Bookshelf backend
//!
//! GraphQL API for searching and saving books: signup, login, and a per-user
//! saved-book list. All operations are exposed at `/graphql`.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
pub use error::{AppError, AppResult};

#[cfg(test)]
pub(crate) mod test_support;

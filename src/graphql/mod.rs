//! GraphQL API
//!
//! Queries and mutations are split by domain under `queries/` and
//! `mutations/` and merged into `QueryRoot`/`MutationRoot` in `schema.rs`.

pub mod auth;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::AuthUser;
pub use schema::{BookshelfSchema, MutationRoot, QueryRoot, build_schema};

//! REST endpoints alongside the GraphQL API

pub mod health;

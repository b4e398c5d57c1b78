//! GraphQL authentication context
//!
//! The HTTP handler verifies the bearer token and, on success, attaches an
//! [`AuthUser`] to the request data. Resolvers read it with [`AuthExt`] and
//! pass it on to the service layer, which decides whether it is required.

use async_graphql::Context;

pub use crate::services::AuthUser;

/// Extension trait to get the caller's identity from GraphQL context
pub trait AuthExt {
    /// The verified identity, or None for anonymous requests
    fn identity(&self) -> Option<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn identity(&self) -> Option<&AuthUser> {
        self.data_opt::<AuthUser>()
    }
}

//! GraphQL schema definition with queries and mutations

use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::services::BookshelfService;

use super::mutations::{AuthMutations, BookMutations};
use super::queries::UserQueries;

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, BookMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(service: Arc<BookshelfService>) -> BookshelfSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(service)
    .finish()
}

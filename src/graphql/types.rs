//! GraphQL type definitions
//!
//! These types mirror the service layer's models but are decorated with async-graphql attributes.

use async_graphql::{ID, InputObject, SimpleObject};

use crate::db::{SaveBook, SavedBookRecord};
use crate::services::{AuthPayload, UserProfile};

/// A registered user and their saved books
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    #[graphql(name = "_id")]
    pub id: ID,
    pub username: String,
    pub email: String,
    /// Number of saved books
    pub book_count: i32,
    pub saved_books: Vec<Book>,
}

impl From<UserProfile> for User {
    fn from(profile: UserProfile) -> Self {
        Self {
            book_count: profile.book_count() as i32,
            id: ID(profile.id),
            username: profile.username,
            email: profile.email,
            saved_books: profile.saved_books.into_iter().map(Book::from).collect(),
        }
    }
}

/// A book saved from the search provider
#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    /// Provider-assigned book id
    pub book_id: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub title: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Info page URL
    pub link: Option<String>,
}

impl From<SavedBookRecord> for Book {
    fn from(r: SavedBookRecord) -> Self {
        Self {
            book_id: r.book_id,
            authors: r.authors,
            description: r.description,
            title: r.title,
            image: r.image,
            link: r.link,
        }
    }
}

/// Token and user returned by addUser and login
#[derive(Debug, Clone, SimpleObject)]
pub struct Auth {
    pub token: String,
    pub user: User,
}

impl From<AuthPayload> for Auth {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: payload.token,
            user: payload.user.into(),
        }
    }
}

/// Book to save
#[derive(Debug, InputObject)]
pub struct BookInput {
    pub book_id: String,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub title: String,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl From<BookInput> for SaveBook {
    fn from(input: BookInput) -> Self {
        Self {
            book_id: input.book_id,
            title: input.title,
            authors: input.authors.unwrap_or_default(),
            description: input.description,
            image: input.image,
            link: input.link,
        }
    }
}

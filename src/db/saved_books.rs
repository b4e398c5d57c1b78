//! Saved books repository
//!
//! A user's saved books behave as a set keyed by provider book id. Both
//! mutations are single statements, so concurrent requests for the same user
//! rely on SQLite's per-statement atomicity and the `(user_id, book_id)`
//! unique constraint.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{json_to_vec, now_iso8601, vec_to_json};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBookRecord {
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub saved_at: String,
}

type SavedBookRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
);

impl From<SavedBookRow> for SavedBookRecord {
    fn from(r: SavedBookRow) -> Self {
        Self {
            book_id: r.0,
            title: r.1,
            authors: json_to_vec(&r.2),
            description: r.3,
            image: r.4,
            link: r.5,
            saved_at: r.6,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveBook {
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

pub struct SavedBooksRepository {
    pool: SqlitePool,
}

impl SavedBooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's saved books in the order they were saved
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<SavedBookRecord>> {
        let rows = sqlx::query_as::<_, SavedBookRow>(
            r#"
            SELECT book_id, title, authors, description, image, link, saved_at
            FROM saved_books
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SavedBookRecord::from).collect())
    }

    /// Add a book unless the user already saved one with the same book id.
    ///
    /// Returns `true` if a row was inserted. An existing entry is left as is,
    /// including its position and metadata.
    pub async fn add_if_absent(&self, user_id: &str, book: SaveBook) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_books (user_id, book_id, title, authors, description, image, link, saved_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(vec_to_json(&book.authors))
        .bind(&book.description)
        .bind(&book.image)
        .bind(&book.link)
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every entry with the given book id. Returns the number removed.
    pub async fn remove_by_book_id(&self, user_id: &str, book_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM saved_books WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

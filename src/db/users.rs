//! Users repository for account records and credential checks

use anyhow::{Result, anyhow};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_helpers::now_iso8601;

// ============================================================================
// User Records
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    /// Check a plaintext password against this user's stored bcrypt hash
    pub fn is_correct_password(&self, password: &str) -> Result<bool> {
        bcrypt::verify(password, &self.password_hash)
            .map_err(|e| anyhow!("Failed to verify password: {}", e))
    }
}

type UserRow = (String, String, String, String, String, String);

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

impl From<UserRow> for UserRecord {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.0,
            username: r.1,
            email: r.2,
            password_hash: r.3,
            created_at: r.4,
            updated_at: r.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("Failed to create user"))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = ? COLLATE NOCASE",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = ? COLLATE NOCASE",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    /// Bump `updated_at` after the user's saved books changed
    pub async fn touch(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
            .bind(now_iso8601())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn create_input(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: bcrypt::hash("hunter22", 4).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Database::connect_in_memory().await.unwrap();
        let users = db.users();

        let created = users.create(create_input("reader", "reader@example.com")).await.unwrap();

        let by_id = users.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "reader");

        let by_email = users.get_by_email("READER@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(users.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_index() {
        let db = Database::connect_in_memory().await.unwrap();
        let users = db.users();

        users.create(create_input("first", "same@example.com")).await.unwrap();
        let err = users
            .create(create_input("second", "same@example.com"))
            .await
            .unwrap_err();

        let is_unique = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique, "unexpected error: {}", err);
    }

    #[test]
    fn test_password_check() {
        let record = UserRecord {
            id: "u1".into(),
            username: "reader".into(),
            email: "reader@example.com".into(),
            password_hash: bcrypt::hash("correct horse", 4).unwrap(),
            created_at: now_iso8601(),
            updated_at: now_iso8601(),
        };

        assert!(record.is_correct_password("correct horse").unwrap());
        assert!(!record.is_correct_password("battery staple").unwrap());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let record = UserRecord {
            id: "u1".into(),
            username: "reader".into(),
            email: "reader@example.com".into(),
            password_hash: "$2b$04$secret".into(),
            created_at: now_iso8601(),
            updated_at: now_iso8601(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}

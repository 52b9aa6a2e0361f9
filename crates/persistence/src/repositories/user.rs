//! User repository for database operations.
//!
//! Every method opens its own connection, runs one statement, and drops
//! the connection before returning. There is no pool and no cross-call
//! reuse; an unreachable store fails the single call with
//! [`StoreError::Unavailable`] and the process keeps serving.

use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::error;

use crate::db::DatabaseConfig;
use crate::entities::UserEntity;
use crate::error::StoreError;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    options: PgConnectOptions,
}

impl UserRepository {
    /// Creates a new UserRepository from the database settings.
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }

    /// Opens the connection used by a single operation.
    ///
    /// Connection failures are logged and reported as
    /// [`StoreError::Unavailable`]; they never panic and never take the
    /// process down.
    async fn connect(&self) -> Result<PgConnection, StoreError> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|err| {
                error!(error = %err, "database connection failed");
                StoreError::Unavailable(err)
            })
    }

    /// Creates the users table if it does not exist yet.
    ///
    /// Safe to call on every start; the caller logs a failure and keeps
    /// the server running.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let timer = QueryTimer::new("ensure_schema");
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(100) NOT NULL UNIQUE,
                age INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut conn)
        .await;
        timer.record();
        result?;
        Ok(())
    }

    /// Returns all users, newest first.
    pub async fn list_all(&self) -> Result<Vec<UserEntity>, StoreError> {
        let timer = QueryTimer::new("list_users");
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, age
            FROM users
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&mut conn)
        .await;
        timer.record();
        Ok(result?)
    }

    /// Finds a user by id. `Ok(None)` when no row matches.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<UserEntity>, StoreError> {
        let timer = QueryTimer::new("find_user_by_id");
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, age
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await;
        timer.record();
        Ok(result?)
    }

    /// Inserts a new user and returns the persisted row, id assigned by
    /// the store. An email collision surfaces as
    /// [`StoreError::DuplicateEmail`].
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        age: i32,
    ) -> Result<UserEntity, StoreError> {
        let timer = QueryTimer::new("insert_user");
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (name, email, age)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, age
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(age)
        .fetch_one(&mut conn)
        .await;
        timer.record();
        Ok(result?)
    }

    /// Replaces all fields of the row matching `id` and returns the
    /// updated row. `Ok(None)` when the id does not exist; an email
    /// collision with a different row surfaces as
    /// [`StoreError::DuplicateEmail`].
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        email: &str,
        age: i32,
    ) -> Result<Option<UserEntity>, StoreError> {
        let timer = QueryTimer::new("update_user");
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET name = $1, email = $2, age = $3
            WHERE id = $4
            RETURNING id, name, email, age
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(age)
        .bind(id)
        .fetch_optional(&mut conn)
        .await;
        timer.record();
        Ok(result?)
    }

    /// Deletes the row matching `id`. Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("delete_user");
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut conn)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Case-insensitive substring search on name or email, newest first.
    ///
    /// An empty query matches everything; rejecting an empty `q` is the
    /// handler's job, not this one's.
    pub async fn search(&self, query: &str) -> Result<Vec<UserEntity>, StoreError> {
        let pattern = format!("%{}%", query.to_lowercase());
        let timer = QueryTimer::new("search_users");
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, age
            FROM users
            WHERE LOWER(name) LIKE $1 OR LOWER(email) LIKE $1
            ORDER BY id DESC
            "#,
        )
        .bind(&pattern)
        .fetch_all(&mut conn)
        .await;
        timer.record();
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Settings pointing at a port nothing listens on, so every connect
    /// attempt fails fast with a refused connection.
    fn unreachable_repository() -> UserRepository {
        UserRepository::new(&DatabaseConfig {
            host: "127.0.0.1".to_string(),
            name: "users_test".to_string(),
            user: "nobody".to_string(),
            password: "nothing".to_string(),
            port: 9,
        })
    }

    #[tokio::test]
    async fn test_list_all_reports_unavailable_not_empty() {
        let repo = unreachable_repository();
        let result = repo.list_all().await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_reports_unavailable_not_missing() {
        let repo = unreachable_repository();
        let result = repo.find_by_id(1).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_insert_reports_unavailable() {
        let repo = unreachable_repository();
        let result = repo.insert("Ana", "ana@x.com", 30).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_update_reports_unavailable() {
        let repo = unreachable_repository();
        let result = repo.update(1, "Ana", "ana@x.com", 30).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_unavailable() {
        let repo = unreachable_repository();
        let result = repo.delete(1).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_search_reports_unavailable() {
        let repo = unreachable_repository();
        let result = repo.search("ana").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_ensure_schema_reports_unavailable() {
        let repo = unreachable_repository();
        let result = repo.ensure_schema().await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}

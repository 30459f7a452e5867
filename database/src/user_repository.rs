use crate::common::{is_unique_violation, row_to_user, sqlx_error_to_todo_error, USER_COLUMNS};
use async_trait::async_trait;
use sqlx::SqlitePool;
use todo_core::{
    error::Result,
    models::{NewUser, User},
    repository::UserRepository,
    validation::Validator,
};

/// SQLite implementation of the UserRepository trait
///
/// Usernames are kept unique by the table's UNIQUE constraint; a clash
/// surfaces as zero rows affected from [`UserRepository::register`].
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
    table: String,
}

impl SqliteUserRepository {
    /// `table` must already be validated as an identifier
    pub fn new(pool: SqlitePool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                salt TEXT NOT NULL
            )
            "#,
            self.table
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::info!(table = %self.table, "Users table ready");
        Ok(())
    }

    async fn register(&self, user: NewUser) -> Result<u64> {
        Validator::validate_new_user(&user)?;

        let sql = format!(
            "INSERT INTO {} (username, password_hash, salt) VALUES (?, ?, ?)",
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.salt)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => {
                tracing::debug!(username = %user.username, "User registered");
                Ok(done.rows_affected())
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(username = %user.username, "Username already taken");
                Ok(0)
            }
            Err(e) => Err(sqlx_error_to_todo_error(e)),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM {} WHERE username = ?", self.table);

        let result = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        match result {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        Ok(())
    }
}

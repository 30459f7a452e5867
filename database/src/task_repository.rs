use crate::common::{
    is_foreign_key_violation, row_to_task, rows_to_tasks, sortable_date_expr,
    sqlx_error_to_todo_error, TASK_COLUMNS,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::sync::Arc;
use todo_core::{
    clock::{Clock, LocalClock},
    error::{Result, TodoError},
    models::{
        format_date, sortable_date, storable_range, DateField, EditTask, Importance, NewTask,
        Task, TaskStatus,
    },
    repository::TaskRepository,
    validation::Validator,
};

/// SQLite implementation of the TaskRepository trait
///
/// Every statement that changes a task carries `status = 'A'` in its WHERE
/// clause, so finished tasks are frozen without a separate read.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
    table: String,
    users_table: String,
    clock: Arc<dyn Clock>,
}

impl SqliteTaskRepository {
    /// Both table names must already be validated as identifiers
    pub fn new(pool: SqlitePool, table: &str, users_table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
            users_table: users_table.to_string(),
            clock: Arc::new(LocalClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn today(&self) -> String {
        format_date(self.clock.today())
    }

    /// Run an owner-scoped SELECT whose extra condition binds one text value
    async fn list_where(&self, owner_id: i64, condition: &str, value: &str) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM {} WHERE owner_id = ? AND {condition} ORDER BY id",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        rows_to_tasks(&rows)
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                importance TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                finished_at TEXT,
                FOREIGN KEY (owner_id) REFERENCES {} (id)
            )
            "#,
            self.table, self.users_table
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::info!(table = %self.table, references = %self.users_table, "Tasks table ready");
        Ok(())
    }

    async fn add_task(&self, task: NewTask) -> Result<u64> {
        Validator::validate_new_task(&task)?;

        let sql = format!(
            "INSERT INTO {} (owner_id, description, importance, status, created_at) \
             VALUES (?, ?, ?, ?, ?)",
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(task.owner_id)
            .bind(&task.description)
            .bind(task.importance.as_str())
            .bind(TaskStatus::Active.as_code())
            .bind(self.today())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => {
                tracing::debug!(owner_id = task.owner_id, "Task added");
                Ok(done.rows_affected())
            }
            Err(e) if is_foreign_key_violation(&e) => Err(TodoError::OwnerNotFound(task.owner_id)),
            Err(e) => Err(sqlx_error_to_todo_error(e)),
        }
    }

    async fn edit_task(&self, changes: EditTask) -> Result<u64> {
        Validator::validate_edit_task(&changes)?;

        let sql = format!(
            "UPDATE {} SET description = ?, importance = ? WHERE id = ? AND status = 'A'",
            self.table
        );

        let done = sqlx::query(&sql)
            .bind(&changes.description)
            .bind(changes.importance.as_str())
            .bind(changes.id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::debug!(task_id = changes.id, rows = done.rows_affected(), "Task edited");
        Ok(done.rows_affected())
    }

    async fn delete_task(&self, task_id: i64) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE id = ? AND status = 'A'", self.table);

        let done = sqlx::query(&sql)
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::debug!(task_id, rows = done.rows_affected(), "Task deleted");
        Ok(done.rows_affected())
    }

    async fn finish_task(&self, task_id: i64) -> Result<u64> {
        let sql = format!(
            "UPDATE {} SET status = ?, finished_at = ? WHERE id = ? AND status = 'A'",
            self.table
        );

        let done = sqlx::query(&sql)
            .bind(TaskStatus::Finished.as_code())
            .bind(self.today())
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::debug!(task_id, rows = done.rows_affected(), "Task finished");
        Ok(done.rows_affected())
    }

    async fn list_all_tasks(&self, owner_id: i64) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM {} WHERE owner_id = ? ORDER BY id",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        rows_to_tasks(&rows)
    }

    async fn get_task_by_id(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM {} WHERE id = ? AND owner_id = ? AND status = 'A'",
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        match result {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_by_status(&self, owner_id: i64, status: TaskStatus) -> Result<Vec<Task>> {
        self.list_where(owner_id, "status = ?", status.as_code()).await
    }

    async fn list_by_importance(&self, owner_id: i64, importance: Importance) -> Result<Vec<Task>> {
        self.list_where(owner_id, "importance = ?", importance.as_str())
            .await
    }

    async fn list_by_date_range(
        &self,
        field: DateField,
        owner_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>> {
        let Some((start, end)) = storable_range(start, end) else {
            return Ok(Vec::new());
        };

        let key = sortable_date_expr(field.column());
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM {} \
             WHERE owner_id = ? AND {key} >= ? AND {key} <= ? ORDER BY id",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .bind(sortable_date(start))
            .bind(sortable_date(end))
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::debug!(
            column = field.column(),
            owner_id,
            count = rows.len(),
            "Date range query"
        );

        rows_to_tasks(&rows)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        Ok(())
    }
}

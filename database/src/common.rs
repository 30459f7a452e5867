use sqlx::{sqlite::SqliteRow, Row};
use todo_core::{
    error::{Result, TodoError},
    models::{parse_date, Task, User},
};

/// Columns selected by every task query, in the order `row_to_task` expects
pub const TASK_COLUMNS: &str =
    "id, owner_id, description, importance, status, created_at, finished_at";

/// Columns selected by every user query
pub const USER_COLUMNS: &str = "id, username, password_hash, salt";

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| TodoError::Database(format!("Failed to read column '{name}': {e}")))
}

/// Convert SQLite row to User model
pub fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: column(row, "id")?,
        username: column(row, "username")?,
        password_hash: column(row, "password_hash")?,
        salt: column(row, "salt")?,
    })
}

/// Convert SQLite row to Task model
pub fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let importance: String = column(row, "importance")?;
    let status: String = column(row, "status")?;
    let created_at: String = column(row, "created_at")?;
    let finished_at: Option<String> = column(row, "finished_at")?;

    Ok(Task {
        id: column(row, "id")?,
        owner_id: column(row, "owner_id")?,
        description: column(row, "description")?,
        importance: importance.parse()?,
        status: status.parse()?,
        created_at: parse_date(&created_at)?,
        finished_at: finished_at.as_deref().map(parse_date).transpose()?,
    })
}

pub fn rows_to_tasks(rows: &[SqliteRow]) -> Result<Vec<Task>> {
    rows.iter().map(row_to_task).collect()
}

/// SQL expression turning a stored `DD/MM/YYYY` column into `YYYYMMDD`
///
/// Day-first text does not sort chronologically; the rearranged form does.
/// A NULL column stays NULL and so never satisfies a comparison.
pub fn sortable_date_expr(column: &str) -> String {
    format!("(substr({column}, 7, 4) || substr({column}, 4, 2) || substr({column}, 1, 2))")
}

/// Convert SQLx error to TodoError
pub fn sqlx_error_to_todo_error(err: sqlx::Error) -> TodoError {
    match &err {
        sqlx::Error::Database(db_err) => {
            TodoError::Database(format!("Database constraint error: {}", db_err.message()))
        }
        sqlx::Error::RowNotFound => TodoError::Database("Unexpected RowNotFound error".to_string()),
        sqlx::Error::PoolTimedOut => TodoError::Database("Connection pool timeout".to_string()),
        sqlx::Error::Io(io_err) => TodoError::Database(format!("Database I/O error: {io_err}")),
        _ => TodoError::Database(format!("Database operation failed: {err}")),
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

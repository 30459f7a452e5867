use async_trait::async_trait;
use chrono::NaiveDate;
use crate::{
    error::Result,
    models::{DateField, EditTask, Importance, NewTask, NewUser, Task, TaskStatus, User},
};

/// Repository trait for user accounts
///
/// Users are created once and never modified afterwards.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the users table if it does not exist yet
    async fn ensure_schema(&self) -> Result<()>;

    /// Register a new user
    ///
    /// # Returns
    /// * `Ok(1)` - The user was stored
    /// * `Ok(0)` - The username is already taken; nothing was stored
    /// * `Err(TodoError::Validation)` - If a field is blank
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn register(&self, user: NewUser) -> Result<u64>;

    /// Look up a user by exact username
    ///
    /// # Returns
    /// * `Ok(Some(User))` - The matching user
    /// * `Ok(None)` - If no user has that username
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Repository trait for tasks, always scoped to an owning user.
///
/// Mutating operations report the number of rows they touched. Zero means
/// the task does not exist or is no longer active; the two cases are not
/// distinguished.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create the tasks table if it does not exist yet
    ///
    /// The table references the users table, which must be created first.
    async fn ensure_schema(&self) -> Result<()>;

    /// Add an active task created today
    ///
    /// # Returns
    /// * `Ok(1)` - The task was stored
    /// * `Err(TodoError::OwnerNotFound)` - If `owner_id` is not a registered user
    /// * `Err(TodoError::Validation)` - If the description is blank
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn add_task(&self, task: NewTask) -> Result<u64>;

    /// Replace description and importance of an active task
    async fn edit_task(&self, changes: EditTask) -> Result<u64>;

    /// Remove an active task
    async fn delete_task(&self, task_id: i64) -> Result<u64>;

    /// Mark an active task finished today
    async fn finish_task(&self, task_id: i64) -> Result<u64>;

    /// All tasks of a user, in id order
    async fn list_all_tasks(&self, owner_id: i64) -> Result<Vec<Task>>;

    /// Fetch an active task owned by `owner_id`
    ///
    /// A task owned by someone else, or already finished, comes back as `None`.
    async fn get_task_by_id(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>>;

    /// Tasks of a user with the given status, in id order
    async fn list_by_status(&self, owner_id: i64, status: TaskStatus) -> Result<Vec<Task>>;

    /// Tasks of a user with the given importance, in id order
    async fn list_by_importance(&self, owner_id: i64, importance: Importance) -> Result<Vec<Task>>;

    /// Tasks of a user whose `field` falls within `[start, end]`, in id order
    ///
    /// Tasks without a value for `field` (unfinished tasks when filtering on
    /// [`DateField::FinishedAt`]) never match.
    async fn list_by_date_range(
        &self,
        field: DateField,
        owner_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;
}

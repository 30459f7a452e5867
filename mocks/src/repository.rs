//! Mock implementations of the repository traits
//!
//! Provides thread-safe in-memory repositories with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - The same rows-affected semantics as the SQLite implementation

use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use todo_core::{
    Clock, DateField, EditTask, Importance, LocalClock, NewTask, NewUser, Result, Task,
    TaskRepository, TaskStatus, TodoError, User, UserRepository, Validator,
};

/// Call tracking and one-shot error injection shared by both mocks
#[derive(Default)]
struct Instrumentation {
    error_injection: Mutex<Option<TodoError>>,
    call_history: Mutex<Vec<String>>,
}

impl Instrumentation {
    /// Check if an error should be injected, consuming it if so
    fn check_error_injection(&self) -> Result<()> {
        match self.error_injection.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record_call_with_params(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }

    fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.starts_with(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }
}

type UserTable = Arc<Mutex<BTreeMap<i64, User>>>;

/// In-memory UserRepository
#[derive(Clone)]
pub struct MockUserRepository {
    users: UserTable,
    next_id: Arc<AtomicI64>,
    instrumentation: Arc<Instrumentation>,
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            instrumentation: Arc::new(Instrumentation::default()),
        }
    }

    /// Create mock repository with pre-registered users
    pub fn with_users(users: Vec<User>) -> Self {
        let max_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        let table = users.into_iter().map(|u| (u.id, u)).collect();

        Self {
            users: Arc::new(Mutex::new(table)),
            next_id: Arc::new(AtomicI64::new(max_id + 1)),
            instrumentation: Arc::new(Instrumentation::default()),
        }
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TodoError) {
        *self.instrumentation.error_injection.lock() = Some(error);
    }

    pub fn call_history(&self) -> Vec<String> {
        self.instrumentation.call_history.lock().clone()
    }

    pub fn assert_called(&self, method: &str) {
        self.instrumentation.assert_called(method);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().len()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn ensure_schema(&self) -> Result<()> {
        self.instrumentation.record_call_with_params("ensure_schema", "");
        self.instrumentation.check_error_injection()
    }

    async fn register(&self, user: NewUser) -> Result<u64> {
        self.instrumentation
            .record_call_with_params("register", &format!("username={}", user.username));
        self.instrumentation.check_error_injection()?;
        Validator::validate_new_user(&user)?;

        let mut users = self.users.lock();
        if users.values().any(|u| u.username == user.username) {
            return Ok(0);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        users.insert(
            id,
            User {
                id,
                username: user.username,
                password_hash: user.password_hash,
                salt: user.salt,
            },
        );
        Ok(1)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.instrumentation
            .record_call_with_params("find_by_username", &format!("username={username}"));
        self.instrumentation.check_error_injection()?;

        let users = self.users.lock();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn health_check(&self) -> Result<()> {
        self.instrumentation.record_call_with_params("health_check", "");
        self.instrumentation.check_error_injection()
    }
}

/// In-memory TaskRepository
///
/// Tasks live in a map ordered by id, so every listing comes out in id
/// order without sorting. When linked to a [`MockUserRepository`], adding a
/// task for an unknown owner fails the way the foreign key does in SQLite.
#[derive(Clone)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<BTreeMap<i64, Task>>>,
    next_id: Arc<AtomicI64>,
    owners: Option<UserTable>,
    clock: Arc<dyn Clock>,
    instrumentation: Arc<Instrumentation>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository that accepts any owner id
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            owners: None,
            clock: Arc::new(LocalClock),
            instrumentation: Arc::new(Instrumentation::default()),
        }
    }

    /// Create mock repository with pre-populated tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let repo = Self::new();
        repo.next_id.store(max_id + 1, Ordering::SeqCst);
        repo.tasks
            .lock()
            .extend(tasks.into_iter().map(|t| (t.id, t)));
        repo
    }

    /// Only accept owners registered in `users`
    pub fn linked_to(mut self, users: &MockUserRepository) -> Self {
        self.owners = Some(users.users.clone());
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TodoError) {
        *self.instrumentation.error_injection.lock() = Some(error);
    }

    pub fn call_history(&self) -> Vec<String> {
        self.instrumentation.call_history.lock().clone()
    }

    pub fn assert_called(&self, method: &str) {
        self.instrumentation.assert_called(method);
    }

    /// Snapshot of every stored task regardless of owner
    pub fn all_tasks(&self) -> Vec<Task> {
        self.tasks.lock().values().cloned().collect()
    }

    fn select(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks
            .lock()
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }

    /// Apply `change` to the task if it exists and is still active
    fn update_active(&self, task_id: i64, change: impl FnOnce(&mut Task)) -> u64 {
        let mut tasks = self.tasks.lock();
        match tasks.get_mut(&task_id) {
            Some(task) if task.is_active() => {
                change(task);
                1
            }
            _ => 0,
        }
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn ensure_schema(&self) -> Result<()> {
        self.instrumentation.record_call_with_params("ensure_schema", "");
        self.instrumentation.check_error_injection()
    }

    async fn add_task(&self, task: NewTask) -> Result<u64> {
        self.instrumentation
            .record_call_with_params("add_task", &format!("owner_id={}", task.owner_id));
        self.instrumentation.check_error_injection()?;
        Validator::validate_new_task(&task)?;

        if let Some(owners) = &self.owners {
            if !owners.lock().contains_key(&task.owner_id) {
                return Err(TodoError::OwnerNotFound(task.owner_id));
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tasks.lock().insert(
            id,
            Task {
                id,
                owner_id: task.owner_id,
                description: task.description,
                importance: task.importance,
                status: TaskStatus::Active,
                created_at: self.clock.today(),
                finished_at: None,
            },
        );
        Ok(1)
    }

    async fn edit_task(&self, changes: EditTask) -> Result<u64> {
        self.instrumentation
            .record_call_with_params("edit_task", &format!("id={}", changes.id));
        self.instrumentation.check_error_injection()?;
        Validator::validate_edit_task(&changes)?;

        Ok(self.update_active(changes.id, |task| {
            task.description = changes.description;
            task.importance = changes.importance;
        }))
    }

    async fn delete_task(&self, task_id: i64) -> Result<u64> {
        self.instrumentation
            .record_call_with_params("delete_task", &format!("id={task_id}"));
        self.instrumentation.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        if tasks.get(&task_id).is_some_and(Task::is_active) {
            tasks.remove(&task_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn finish_task(&self, task_id: i64) -> Result<u64> {
        self.instrumentation
            .record_call_with_params("finish_task", &format!("id={task_id}"));
        self.instrumentation.check_error_injection()?;

        let today = self.clock.today();
        Ok(self.update_active(task_id, |task| {
            task.status = TaskStatus::Finished;
            task.finished_at = Some(today);
        }))
    }

    async fn list_all_tasks(&self, owner_id: i64) -> Result<Vec<Task>> {
        self.instrumentation
            .record_call_with_params("list_all_tasks", &format!("owner_id={owner_id}"));
        self.instrumentation.check_error_injection()?;

        Ok(self.select(|t| t.owner_id == owner_id))
    }

    async fn get_task_by_id(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>> {
        self.instrumentation.record_call_with_params(
            "get_task_by_id",
            &format!("id={task_id}, owner_id={owner_id}"),
        );
        self.instrumentation.check_error_injection()?;

        let tasks = self.tasks.lock();
        Ok(tasks
            .get(&task_id)
            .filter(|t| t.owner_id == owner_id && t.is_active())
            .cloned())
    }

    async fn list_by_status(&self, owner_id: i64, status: TaskStatus) -> Result<Vec<Task>> {
        self.instrumentation.record_call_with_params(
            "list_by_status",
            &format!("owner_id={owner_id}, status={status}"),
        );
        self.instrumentation.check_error_injection()?;

        Ok(self.select(|t| t.owner_id == owner_id && t.status == status))
    }

    async fn list_by_importance(&self, owner_id: i64, importance: Importance) -> Result<Vec<Task>> {
        self.instrumentation.record_call_with_params(
            "list_by_importance",
            &format!("owner_id={owner_id}, importance={importance}"),
        );
        self.instrumentation.check_error_injection()?;

        Ok(self.select(|t| t.owner_id == owner_id && t.importance == importance))
    }

    async fn list_by_date_range(
        &self,
        field: DateField,
        owner_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Task>> {
        self.instrumentation.record_call_with_params(
            "list_by_date_range",
            &format!("field={}, owner_id={owner_id}", field.column()),
        );
        self.instrumentation.check_error_injection()?;

        Ok(self.select(|t| {
            t.owner_id == owner_id
                && field
                    .value_of(t)
                    .is_some_and(|date| start <= date && date <= end)
        }))
    }

    async fn health_check(&self) -> Result<()> {
        self.instrumentation.record_call_with_params("health_check", "");
        self.instrumentation.check_error_injection()
    }
}

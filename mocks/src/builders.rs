//! Builder pattern implementations for easy test data construction
//!
//! Provides fluent builders for:
//! - Task construction with sensible defaults
//! - NewTask and NewUser variants

use chrono::NaiveDate;
use todo_core::{Importance, NewTask, NewUser, Task, TaskStatus};

use crate::fixtures::test_date;

/// Builder for constructing Task instances in tests
pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            task: Task {
                id: 1,
                owner_id: 1,
                description: "A test task".to_string(),
                importance: Importance::Medium,
                status: TaskStatus::Active,
                created_at: test_date(),
                finished_at: None,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.task.id = id;
        self
    }

    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.task.owner_id = owner_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.task.importance = importance;
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDate) -> Self {
        self.task.created_at = created_at;
        self
    }

    /// Mark finished on `finished_at`, keeping the status/date invariant
    pub fn finished_on(mut self, finished_at: NaiveDate) -> Self {
        self.task.status = TaskStatus::Finished;
        self.task.finished_at = Some(finished_at);
        self
    }

    /// Build the final Task
    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for constructing NewTask instances in tests
pub struct NewTaskBuilder {
    new_task: NewTask,
}

impl Default for NewTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewTaskBuilder {
    pub fn new() -> Self {
        Self {
            new_task: NewTask::new(1, "New test task", Importance::Medium),
        }
    }

    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.new_task.owner_id = owner_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.new_task.description = description.into();
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.new_task.importance = importance;
        self
    }

    pub fn build(self) -> NewTask {
        self.new_task
    }
}

/// Builder for constructing NewUser instances in tests
pub struct NewUserBuilder {
    new_user: NewUser,
}

impl Default for NewUserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewUserBuilder {
    pub fn new() -> Self {
        Self {
            new_user: NewUser::new("test-user", "c2VjcmV0LWhhc2g=", "c2FsdA=="),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.new_user.username = username.into();
        self
    }

    pub fn with_password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.new_user.password_hash = password_hash.into();
        self
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.new_user.salt = salt.into();
        self
    }

    pub fn build(self) -> NewUser {
        self.new_user
    }
}

//! Standard test fixtures for consistent testing

use chrono::NaiveDate;
use todo_core::{Importance, NewTask, NewUser, Task};

use crate::builders::TaskBuilder;

/// Fixed reference day used by fixtures (1 March 2024)
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default()
}

pub fn create_new_user(username: &str) -> NewUser {
    NewUser::new(username, format!("hash-of-{username}"), format!("salt-{username}"))
}

pub fn create_new_task(owner_id: i64) -> NewTask {
    NewTask::new(owner_id, "Buy milk", Importance::Low)
}

/// One task of each importance for `owner_id`, ids starting at `first_id`
pub fn create_tasks_of_each_importance(owner_id: i64, first_id: i64) -> Vec<Task> {
    [Importance::High, Importance::Medium, Importance::Low]
        .into_iter()
        .enumerate()
        .map(|(offset, importance)| {
            TaskBuilder::new()
                .with_id(first_id + offset as i64)
                .with_owner(owner_id)
                .with_description(format!("{importance} priority chore"))
                .with_importance(importance)
                .build()
        })
        .collect()
}

/// Create multiple tasks spread across `owners` owners, ids 1..=count
pub fn create_test_tasks(count: usize, owners: i64) -> Vec<Task> {
    (1..=count as i64)
        .map(|i| {
            let importance = match i % 3 {
                0 => Importance::High,
                1 => Importance::Medium,
                _ => Importance::Low,
            };
            let builder = TaskBuilder::new()
                .with_id(i)
                .with_owner(i % owners.max(1) + 1)
                .with_description(format!("Test task number {i}"))
                .with_importance(importance);

            if i % 4 == 0 {
                builder.finished_on(test_date()).build()
            } else {
                builder.build()
            }
        })
        .collect()
}

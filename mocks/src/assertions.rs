//! Custom assertion helpers for testing

use todo_core::{Task, TaskStatus};

/// Assert tasks come back in strictly ascending id order
pub fn assert_ascending_ids(tasks: &[Task]) {
    for pair in tasks.windows(2) {
        assert!(
            pair[0].id < pair[1].id,
            "Tasks out of id order: {} before {}",
            pair[0].id,
            pair[1].id
        );
    }
}

/// Assert every task belongs to `owner_id`
pub fn assert_all_owned_by(tasks: &[Task], owner_id: i64) {
    for task in tasks {
        assert_eq!(
            task.owner_id, owner_id,
            "Task {} belongs to {}, expected {}",
            task.id, task.owner_id, owner_id
        );
    }
}

/// Assert `finished_at` is set exactly when the task is finished
pub fn assert_status_invariant(task: &Task) {
    match task.status {
        TaskStatus::Active => assert!(
            task.finished_at.is_none(),
            "Active task {} has finished_at {:?}",
            task.id,
            task.finished_at
        ),
        TaskStatus::Finished => assert!(
            task.finished_at.is_some(),
            "Finished task {} has no finished_at",
            task.id
        ),
    }
}

/// Ids of `tasks`, for compact comparisons
pub fn task_ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::create_test_tasks;

    #[test]
    fn test_fixture_tasks_satisfy_invariants() {
        let tasks = create_test_tasks(12, 3);
        assert_ascending_ids(&tasks);
        tasks.iter().for_each(assert_status_invariant);
        assert_eq!(task_ids(&tasks), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "out of id order")]
    fn test_detects_descending_ids() {
        let mut tasks = create_test_tasks(2, 1);
        tasks.reverse();
        assert_ascending_ids(&tasks);
    }
}

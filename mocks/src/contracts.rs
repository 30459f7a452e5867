//! Contract test helpers for validating trait implementations
//!
//! Provides standardized tests that any pair of `UserRepository` and
//! `TaskRepository` implementations should pass. The task repository must
//! stamp dates from the given [`FixedClock`], and both repositories must
//! share one store with an empty schema already created.

use chrono::NaiveDate;
use todo_core::{
    DateField, EditTask, FixedClock, Importance, NewTask, Task, TaskRepository, TaskStatus,
    TodoError, UserRepository,
};

use crate::assertions::{
    assert_all_owned_by, assert_ascending_ids, assert_status_invariant, task_ids,
};
use crate::fixtures::create_new_user;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Run the whole suite
pub async fn test_repository_contract<U, T>(users: &U, tasks: &T, clock: &FixedClock)
where
    U: UserRepository,
    T: TaskRepository,
{
    test_health_check_contract(users, tasks).await;
    test_register_contract(users).await;
    test_add_task_contract(users, tasks, clock).await;
    test_edit_task_contract(users, tasks).await;
    test_finish_task_contract(users, tasks, clock).await;
    test_delete_task_contract(users, tasks).await;
    test_get_task_by_id_contract(users, tasks).await;
    test_listing_contract(users, tasks).await;
    test_date_range_contract(users, tasks, clock).await;
    test_buy_milk_scenario(users, tasks).await;
}

/// Register `username` and return the stored id
pub async fn register_owner<U: UserRepository>(users: &U, username: &str) -> i64 {
    let affected = users
        .register(create_new_user(username))
        .await
        .expect("Register should succeed");
    assert_eq!(affected, 1, "Fresh username should register");

    users
        .find_by_username(username)
        .await
        .expect("Lookup should succeed")
        .expect("Registered user should be found")
        .id
}

/// Add a task and return it as stored (the newest task of its owner)
pub async fn add_and_fetch<T: TaskRepository>(tasks: &T, new_task: NewTask) -> Task {
    let owner_id = new_task.owner_id;
    let affected = tasks.add_task(new_task).await.expect("Add should succeed");
    assert_eq!(affected, 1, "Add should affect one row");

    tasks
        .list_all_tasks(owner_id)
        .await
        .expect("List should succeed")
        .pop()
        .expect("Added task should be listed")
}

pub async fn test_health_check_contract<U, T>(users: &U, tasks: &T)
where
    U: UserRepository,
    T: TaskRepository,
{
    assert!(users.health_check().await.is_ok(), "User repository should be healthy");
    assert!(tasks.health_check().await.is_ok(), "Task repository should be healthy");
}

pub async fn test_register_contract<U: UserRepository>(users: &U) {
    let new_user = create_new_user("contract-register");
    assert_eq!(users.register(new_user.clone()).await.unwrap(), 1);

    let found = users
        .find_by_username("contract-register")
        .await
        .unwrap()
        .expect("Registered user should be found");
    assert!(found.id > 0, "Stored user should have positive ID");
    assert_eq!(found.username, new_user.username);
    assert_eq!(found.password_hash, new_user.password_hash);
    assert_eq!(found.salt, new_user.salt);

    // Duplicate username is reported as zero rows, not an error
    let mut duplicate = create_new_user("contract-register");
    duplicate.password_hash = "another-hash".to_string();
    assert_eq!(users.register(duplicate).await.unwrap(), 0);

    let still = users.find_by_username("contract-register").await.unwrap().unwrap();
    assert_eq!(still, found, "Duplicate registration must not alter the stored user");

    assert!(users.find_by_username("contract-nobody").await.unwrap().is_none());
    assert!(
        users.find_by_username("CONTRACT-REGISTER").await.unwrap().is_none(),
        "Lookup is an exact match"
    );

    let blank = create_new_user("   ");
    assert!(users.register(blank).await.unwrap_err().is_validation());
}

pub async fn test_add_task_contract<U, T>(users: &U, tasks: &T, clock: &FixedClock)
where
    U: UserRepository,
    T: TaskRepository,
{
    clock.set(day(2024, 5, 20));
    let owner = register_owner(users, "contract-add").await;

    let task = add_and_fetch(tasks, NewTask::new(owner, "Water plants", Importance::High)).await;
    assert!(task.id > 0);
    assert_eq!(task.owner_id, owner);
    assert_eq!(task.description, "Water plants");
    assert_eq!(task.importance, Importance::High);
    assert_eq!(task.status, TaskStatus::Active);
    assert_eq!(task.created_at, day(2024, 5, 20));
    assert!(task.finished_at.is_none());

    match tasks.add_task(NewTask::new(987_654, "Orphan", Importance::Low)).await {
        Err(TodoError::OwnerNotFound(987_654)) => {}
        other => panic!("Expected OwnerNotFound, got: {other:?}"),
    }

    let blank = NewTask::new(owner, "", Importance::Low);
    assert!(tasks.add_task(blank).await.unwrap_err().is_validation());
    assert_eq!(tasks.list_all_tasks(owner).await.unwrap().len(), 1);
}

pub async fn test_edit_task_contract<U: UserRepository, T: TaskRepository>(users: &U, tasks: &T) {
    let owner = register_owner(users, "contract-edit").await;
    let task = add_and_fetch(tasks, NewTask::new(owner, "Draft report", Importance::Low)).await;

    let changes = EditTask {
        id: task.id,
        description: "Final report".to_string(),
        importance: Importance::High,
    };
    assert_eq!(tasks.edit_task(changes).await.unwrap(), 1);

    let edited = tasks.get_task_by_id(task.id, owner).await.unwrap().unwrap();
    assert_eq!(edited.description, "Final report");
    assert_eq!(edited.importance, Importance::High);
    assert_eq!(edited.created_at, task.created_at);

    // Finished tasks are frozen
    assert_eq!(tasks.finish_task(task.id).await.unwrap(), 1);
    let refused = EditTask {
        id: task.id,
        description: "Too late".to_string(),
        importance: Importance::Low,
    };
    assert_eq!(tasks.edit_task(refused).await.unwrap(), 0);

    let stored = tasks.list_all_tasks(owner).await.unwrap();
    assert_eq!(stored[0].description, "Final report");
    assert_eq!(stored[0].importance, Importance::High);

    let missing = EditTask {
        id: 9_999_999,
        description: "Ghost".to_string(),
        importance: Importance::Low,
    };
    assert_eq!(tasks.edit_task(missing).await.unwrap(), 0);
}

pub async fn test_finish_task_contract<U, T>(users: &U, tasks: &T, clock: &FixedClock)
where
    U: UserRepository,
    T: TaskRepository,
{
    clock.set(day(2024, 6, 1));
    let owner = register_owner(users, "contract-finish").await;
    let task = add_and_fetch(tasks, NewTask::new(owner, "File taxes", Importance::High)).await;

    clock.set(day(2024, 6, 3));
    assert_eq!(tasks.finish_task(task.id).await.unwrap(), 1);

    let finished = tasks.list_by_status(owner, TaskStatus::Finished).await.unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].status, TaskStatus::Finished);
    assert_eq!(finished[0].finished_at, Some(day(2024, 6, 3)));
    assert_eq!(finished[0].created_at, day(2024, 6, 1));
    assert_status_invariant(&finished[0]);

    // Second finish is a no-op and keeps the first finish date
    clock.set(day(2024, 6, 9));
    assert_eq!(tasks.finish_task(task.id).await.unwrap(), 0);
    let again = tasks.list_all_tasks(owner).await.unwrap();
    assert_eq!(again[0].finished_at, Some(day(2024, 6, 3)));

    assert_eq!(tasks.finish_task(9_999_999).await.unwrap(), 0);
}

pub async fn test_delete_task_contract<U: UserRepository, T: TaskRepository>(users: &U, tasks: &T) {
    let owner = register_owner(users, "contract-delete").await;
    let doomed = add_and_fetch(tasks, NewTask::new(owner, "Cancel gym", Importance::Low)).await;
    let kept = add_and_fetch(tasks, NewTask::new(owner, "Call mom", Importance::Medium)).await;

    assert_eq!(tasks.delete_task(doomed.id).await.unwrap(), 1);
    assert!(tasks.get_task_by_id(doomed.id, owner).await.unwrap().is_none());
    assert_eq!(task_ids(&tasks.list_all_tasks(owner).await.unwrap()), vec![kept.id]);

    assert_eq!(tasks.delete_task(doomed.id).await.unwrap(), 0);

    assert_eq!(tasks.finish_task(kept.id).await.unwrap(), 1);
    assert_eq!(tasks.delete_task(kept.id).await.unwrap(), 0);
    assert_eq!(tasks.list_all_tasks(owner).await.unwrap().len(), 1);
}

pub async fn test_get_task_by_id_contract<U, T>(users: &U, tasks: &T)
where
    U: UserRepository,
    T: TaskRepository,
{
    let owner = register_owner(users, "contract-get-owner").await;
    let stranger = register_owner(users, "contract-get-stranger").await;
    let task = add_and_fetch(tasks, NewTask::new(owner, "Renew passport", Importance::High)).await;

    let fetched = tasks.get_task_by_id(task.id, owner).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&task));

    // Someone else's task is simply not found
    assert!(tasks.get_task_by_id(task.id, stranger).await.unwrap().is_none());
    assert!(tasks.get_task_by_id(9_999_999, owner).await.unwrap().is_none());

    // Only active tasks are fetched by id
    tasks.finish_task(task.id).await.unwrap();
    assert!(tasks.get_task_by_id(task.id, owner).await.unwrap().is_none());
}

pub async fn test_listing_contract<U: UserRepository, T: TaskRepository>(users: &U, tasks: &T) {
    let alice = register_owner(users, "contract-list-alice").await;
    let bob = register_owner(users, "contract-list-bob").await;

    let a1 = add_and_fetch(tasks, NewTask::new(alice, "Laundry", Importance::Low)).await;
    let b1 = add_and_fetch(tasks, NewTask::new(bob, "Dentist", Importance::High)).await;
    let a2 = add_and_fetch(tasks, NewTask::new(alice, "Budget", Importance::High)).await;
    let a3 = add_and_fetch(tasks, NewTask::new(alice, "Groceries", Importance::Low)).await;
    tasks.finish_task(a2.id).await.unwrap();

    let all = tasks.list_all_tasks(alice).await.unwrap();
    assert_eq!(task_ids(&all), vec![a1.id, a2.id, a3.id]);
    assert_ascending_ids(&all);
    assert_all_owned_by(&all, alice);
    all.iter().for_each(assert_status_invariant);

    let active = tasks.list_by_status(alice, TaskStatus::Active).await.unwrap();
    assert_eq!(task_ids(&active), vec![a1.id, a3.id]);
    let finished = tasks.list_by_status(alice, TaskStatus::Finished).await.unwrap();
    assert_eq!(task_ids(&finished), vec![a2.id]);

    let low = tasks.list_by_importance(alice, Importance::Low).await.unwrap();
    assert_eq!(task_ids(&low), vec![a1.id, a3.id]);
    let high = tasks.list_by_importance(alice, Importance::High).await.unwrap();
    assert_eq!(task_ids(&high), vec![a2.id]);
    assert!(tasks.list_by_importance(alice, Importance::Medium).await.unwrap().is_empty());

    assert_eq!(task_ids(&tasks.list_all_tasks(bob).await.unwrap()), vec![b1.id]);
    assert!(tasks.list_by_status(bob, TaskStatus::Finished).await.unwrap().is_empty());
    assert!(tasks.list_all_tasks(123_456_789).await.unwrap().is_empty());
}

pub async fn test_date_range_contract<U, T>(users: &U, tasks: &T, clock: &FixedClock)
where
    U: UserRepository,
    T: TaskRepository,
{
    let owner = register_owner(users, "contract-dates").await;

    clock.set(day(2023, 12, 30));
    let december =
        add_and_fetch(tasks, NewTask::new(owner, "Year-end review", Importance::High)).await;
    clock.set(day(2024, 1, 2));
    let january = add_and_fetch(tasks, NewTask::new(owner, "New planner", Importance::Low)).await;
    clock.set(day(2024, 2, 15));
    let february =
        add_and_fetch(tasks, NewTask::new(owner, "Car service", Importance::Medium)).await;

    clock.set(day(2024, 1, 5));
    tasks.finish_task(december.id).await.unwrap();

    let range = move |start: NaiveDate, end: NaiveDate| {
        tasks.list_by_date_range(DateField::CreatedAt, owner, start, end)
    };

    // Across a year boundary, where day-first text comparison would fail
    let ids = task_ids(&range(day(2023, 12, 30), day(2024, 1, 2)).await.unwrap());
    assert_eq!(ids, vec![december.id, january.id]);

    // Across a month boundary
    let ids = task_ids(&range(day(2024, 1, 31), day(2024, 2, 29)).await.unwrap());
    assert_eq!(ids, vec![february.id]);

    // Bounds are inclusive on both ends
    let ids = task_ids(&range(day(2024, 1, 2), day(2024, 1, 2)).await.unwrap());
    assert_eq!(ids, vec![january.id]);

    let ids = task_ids(&range(day(2000, 1, 1), day(2099, 12, 31)).await.unwrap());
    assert_eq!(ids, vec![december.id, january.id, february.id]);

    // Inverted range matches nothing
    assert!(range(day(2024, 2, 15), day(2023, 12, 30)).await.unwrap().is_empty());

    // Extreme dates work as open-ended bounds
    let ids = task_ids(&range(day(2024, 1, 1), NaiveDate::MAX).await.unwrap());
    assert_eq!(ids, vec![january.id, february.id]);
    let ids = task_ids(&range(NaiveDate::MIN, day(2023, 12, 31)).await.unwrap());
    assert_eq!(ids, vec![december.id]);
    let ids = task_ids(&range(NaiveDate::MIN, NaiveDate::MAX).await.unwrap());
    assert_eq!(ids, vec![december.id, january.id, february.id]);
    assert!(range(day(10_000, 1, 1), NaiveDate::MAX).await.unwrap().is_empty());

    // Unfinished tasks never match a finished_at range
    let finished = tasks
        .list_by_date_range(DateField::FinishedAt, owner, day(2000, 1, 1), day(2099, 12, 31))
        .await
        .unwrap();
    assert_eq!(task_ids(&finished), vec![december.id]);

    let finished = tasks
        .list_by_date_range(DateField::FinishedAt, owner, day(2024, 1, 6), day(2024, 12, 31))
        .await
        .unwrap();
    assert!(finished.is_empty());

    // Other owners are never included
    let stranger = register_owner(users, "contract-dates-stranger").await;
    assert!(tasks
        .list_by_date_range(DateField::CreatedAt, stranger, day(2000, 1, 1), day(2099, 12, 31))
        .await
        .unwrap()
        .is_empty());
}

/// Add "Buy milk", finish it, finish it again
pub async fn test_buy_milk_scenario<U: UserRepository, T: TaskRepository>(users: &U, tasks: &T) {
    let owner = register_owner(users, "contract-milk").await;

    assert_eq!(tasks.add_task(NewTask::new(owner, "Buy milk", Importance::Low)).await.unwrap(), 1);
    let task = tasks.list_all_tasks(owner).await.unwrap().remove(0);

    assert_eq!(tasks.finish_task(task.id).await.unwrap(), 1);
    let finished = tasks.list_all_tasks(owner).await.unwrap().remove(0);
    assert_eq!(finished.status, TaskStatus::Finished);

    assert_eq!(tasks.finish_task(task.id).await.unwrap(), 0);
    let unchanged = tasks.list_all_tasks(owner).await.unwrap().remove(0);
    assert_eq!(unchanged, finished);
}

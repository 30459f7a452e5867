use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use todo_database::{
    Database, DatabaseOptions, DateField, EditTask, FixedClock, Importance, NewTask, NewUser,
    TaskRepository, TaskStatus, TodoError, UserRepository,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn create_test_database() -> (Database, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(day(2024, 3, 1)));
    let db = Database::connect(":memory:")
        .await
        .unwrap()
        .with_clock(clock.clone());
    db.ensure_schema().await.unwrap();
    (db, clock)
}

async fn register(db: &Database, username: &str) -> i64 {
    let users = db.users();
    users
        .register(NewUser::new(username, "hash", "salt"))
        .await
        .unwrap();
    users.find_by_username(username).await.unwrap().unwrap().id
}

#[tokio::test]
async fn test_schema_creation_is_idempotent() {
    let (db, _) = create_test_database().await;
    let owner = register(&db, "maria").await;
    db.tasks()
        .add_task(NewTask::new(owner, "Buy milk", Importance::Low))
        .await
        .unwrap();

    // Running it again neither fails nor wipes data
    db.ensure_schema().await.unwrap();
    db.users().ensure_schema().await.unwrap();
    db.tasks().ensure_schema().await.unwrap();

    assert!(db.users().find_by_username("maria").await.unwrap().is_some());
    assert_eq!(db.tasks().list_all_tasks(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_username_leaves_single_row() {
    let (db, _) = create_test_database().await;
    let users = db.users();

    assert_eq!(users.register(NewUser::new("joao", "h1", "s1")).await.unwrap(), 1);
    assert_eq!(users.register(NewUser::new("joao", "h2", "s2")).await.unwrap(), 0);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind("joao")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    let stored = users.find_by_username("joao").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "h1");
    assert_eq!(stored.salt, "s1");
}

#[tokio::test]
async fn test_dates_are_stored_day_first() {
    let (db, clock) = create_test_database().await;
    let owner = register(&db, "ana").await;
    let tasks = db.tasks();

    clock.set(day(2024, 1, 9));
    tasks
        .add_task(NewTask::new(owner, "Dentist", Importance::High))
        .await
        .unwrap();
    let task = tasks.list_all_tasks(owner).await.unwrap().remove(0);
    clock.set(day(2024, 11, 23));
    tasks.finish_task(task.id).await.unwrap();

    let (status, created_at, finished_at): (String, String, Option<String>) = sqlx::query_as(
        "SELECT status, created_at, finished_at FROM tasks WHERE id = ?",
    )
    .bind(task.id)
    .fetch_one(db.pool())
    .await
    .unwrap();

    assert_eq!(status, "F");
    assert_eq!(created_at, "09/01/2024");
    assert_eq!(finished_at.as_deref(), Some("23/11/2024"));
}

#[tokio::test]
async fn test_importance_is_stored_as_label() {
    let (db, _) = create_test_database().await;
    let owner = register(&db, "rui").await;
    let tasks = db.tasks();

    tasks
        .add_task(NewTask::new(owner, "Taxes", Importance::Medium))
        .await
        .unwrap();
    let task = tasks.list_all_tasks(owner).await.unwrap().remove(0);
    tasks
        .edit_task(EditTask {
            id: task.id,
            description: "Taxes 2024".to_string(),
            importance: Importance::High,
        })
        .await
        .unwrap();

    let (importance,): (String,) = sqlx::query_as("SELECT importance FROM tasks WHERE id = ?")
        .bind(task.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(importance, "high");
}

#[tokio::test]
async fn test_corrupt_stored_values_are_reported() {
    let (db, _) = create_test_database().await;
    let owner = register(&db, "leo").await;

    sqlx::query(
        "INSERT INTO tasks (owner_id, description, importance, status, created_at) \
         VALUES (?, 'Legacy', 'Alta', 'A', '01/01/2024')",
    )
    .bind(owner)
    .execute(db.pool())
    .await
    .unwrap();

    let err = db.tasks().list_all_tasks(owner).await.unwrap_err();
    assert_eq!(err, TodoError::invalid_stored_value("importance", "Alta"));
    assert!(err.is_database());
}

#[tokio::test]
async fn test_unknown_owner_is_rejected_by_foreign_key() {
    let (db, _) = create_test_database().await;

    let err = db
        .tasks()
        .add_task(NewTask::new(42, "Nobody's task", Importance::Low))
        .await
        .unwrap_err();
    assert_eq!(err, TodoError::OwnerNotFound(42));
}

#[tokio::test]
async fn test_file_database_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite");
    let url = format!("sqlite://{}", path.display());

    {
        let db = Database::connect(&url).await.unwrap();
        db.ensure_schema().await.unwrap();
        let owner = register(&db, "persisted").await;
        db.tasks()
            .add_task(NewTask::new(owner, "Survive restart", Importance::Medium))
            .await
            .unwrap();
        db.close().await;
    }

    assert!(path.exists());

    let db = Database::connect_with(&DatabaseOptions::new(path.display().to_string()))
        .await
        .unwrap();
    db.ensure_schema().await.unwrap();
    let user = db.users().find_by_username("persisted").await.unwrap().unwrap();
    let tasks = db.tasks().list_all_tasks(user.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "Survive restart");
    assert_eq!(tasks[0].status, TaskStatus::Active);
}

#[tokio::test]
async fn test_empty_file_path_is_rejected() {
    let err = Database::connect("sqlite://").await.unwrap_err();
    assert!(matches!(err, TodoError::Configuration(_)));
}

#[tokio::test]
async fn test_far_future_bound_matches_in_memory_repository() {
    let (db, _) = create_test_database().await;
    let owner = register(&db, "open-ended").await;
    db.tasks()
        .add_task(NewTask::new(owner, "Renew lease", Importance::Medium))
        .await
        .unwrap();

    let mock = todo_mocks::MockTaskRepository::new()
        .with_clock(Arc::new(FixedClock::new(day(2024, 3, 1))));
    mock.add_task(NewTask::new(owner, "Renew lease", Importance::Medium))
        .await
        .unwrap();

    for (start, end) in [
        (day(2000, 1, 1), day(10_000, 1, 1)),
        (day(2000, 1, 1), NaiveDate::MAX),
        (NaiveDate::MIN, day(2024, 3, 1)),
        (day(10_000, 1, 1), NaiveDate::MAX),
    ] {
        let stored = db
            .tasks()
            .list_by_date_range(DateField::CreatedAt, owner, start, end)
            .await
            .unwrap();
        let in_memory = mock
            .list_by_date_range(DateField::CreatedAt, owner, start, end)
            .await
            .unwrap();
        assert_eq!(stored.len(), in_memory.len(), "range {start} ..= {end}");
    }

    let open_ended = db
        .tasks()
        .list_by_date_range(DateField::CreatedAt, owner, day(2000, 1, 1), NaiveDate::MAX)
        .await
        .unwrap();
    assert_eq!(open_ended.len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Date range filtering agrees with plain chronological comparison
    #[test]
    fn test_date_range_is_chronological(
        created in proptest::collection::vec(todo_mocks::date_strategy(), 1..8),
        a in todo_mocks::date_strategy(),
        b in todo_mocks::date_strategy(),
    ) {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let (expected, actual) = runtime.block_on(async {
            let (db, clock) = create_test_database().await;
            let owner = register(&db, "prop").await;
            let tasks = db.tasks();

            for date in &created {
                clock.set(*date);
                tasks
                    .add_task(NewTask::new(owner, "generated", Importance::Low))
                    .await
                    .unwrap();
            }

            let stored = tasks.list_all_tasks(owner).await.unwrap();
            let expected: Vec<i64> = stored
                .iter()
                .filter(|t| start <= t.created_at && t.created_at <= end)
                .map(|t| t.id)
                .collect();
            let actual: Vec<i64> = tasks
                .list_by_date_range(DateField::CreatedAt, owner, start, end)
                .await
                .unwrap()
                .iter()
                .map(|t| t.id)
                .collect();
            (expected, actual)
        });

        prop_assert_eq!(expected, actual);
    }
}

use std::env;
use tempfile::TempDir;
use todo_core::{Importance, NewTask, NewUser, TaskRepository, UserRepository};
use todo_service::config::{Config, LogFormat};
use todo_service::setup::initialize_app;

fn file_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.database.url = Some(format!(
        "sqlite://{}",
        temp_dir.path().join("tracker").join("tasks.sqlite").display()
    ));
    config
}

#[tokio::test]
async fn test_app_startup_with_sqlite_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_config(&temp_dir);

    let app = initialize_app(&config).await.unwrap();

    assert_eq!(
        app.users
            .register(NewUser::new("maria", "hash", "salt"))
            .await
            .unwrap(),
        1
    );
    let owner = app.users.find_by_username("maria").await.unwrap().unwrap();
    assert_eq!(
        app.tasks
            .add_task(NewTask::new(owner.id, "Buy milk", Importance::Low))
            .await
            .unwrap(),
        1
    );
    app.shutdown().await;

    // A second start reuses the existing tables and rows
    let app = initialize_app(&config).await.unwrap();
    let owner = app.users.find_by_username("maria").await.unwrap().unwrap();
    let tasks = app.tasks.list_all_tasks(owner.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description, "Buy milk");
}

#[tokio::test]
async fn test_app_startup_with_custom_tables_in_memory() {
    let mut config = Config::default();
    config.database.url = Some(":memory:".to_string());
    config.database.tables.users = "usuarios".to_string();
    config.database.tables.tasks = "tarefas".to_string();

    let app = initialize_app(&config).await.unwrap();
    assert_eq!(app.database.tables().tasks, "tarefas");

    app.users
        .register(NewUser::new("ana", "hash", "salt"))
        .await
        .unwrap();
    let owner = app.users.find_by_username("ana").await.unwrap().unwrap();
    app.tasks
        .add_task(NewTask::new(owner.id, "Dentist", Importance::High))
        .await
        .unwrap();

    let tasks = app.tasks.list_all_tasks(owner.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].importance, Importance::High);
}

#[tokio::test]
async fn test_invalid_configuration_is_rejected_at_startup() {
    let mut config = Config::default();
    config.database.url = Some(":memory:".to_string());
    config.database.tables.tasks = "tasks WHERE 1=1".to_string();

    let err = initialize_app(&config).await.unwrap_err();
    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn test_environment_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tracker.toml");
    std::fs::write(&config_path, "[logging]\nlevel = \"warn\"\nformat = \"json\"\n").unwrap();

    env::set_var("CONFIG_FILE", &config_path);
    env::set_var("TODO_DATABASE__MAX_CONNECTIONS", "9");
    env::set_var("TODO_DATABASE__TABLES__TASKS", "todo_items");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.database.max_connections, 9);
    assert_eq!(config.database.tables.tasks, "todo_items");
    assert_eq!(config.database.tables.users, "users");

    env::set_var("DATABASE_URL", "sqlite://env.db");
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database.url.as_deref(), Some("sqlite://env.db"));
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());

    let merged = Config::default().merge_with_env();
    assert_eq!(merged.database.url.as_deref(), Some("sqlite://env.db"));

    for var in [
        "CONFIG_FILE",
        "TODO_DATABASE__MAX_CONNECTIONS",
        "TODO_DATABASE__TABLES__TASKS",
        "DATABASE_URL",
        "LOG_LEVEL",
    ] {
        env::remove_var(var);
    }
}

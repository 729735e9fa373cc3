//! Repository-level tests for the database crate

use accountdesk_config::DatabaseConfig;
use accountdesk_database::{
    initialize_database, DatabaseError, NewUser, NotificationFrequency, ProfileVisibility,
    UserRepository,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Helper function to create a migrated test database
async fn create_test_database() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_users_repo.db");

    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
        max_connections: 2,
    };

    let pool = initialize_database(&config)
        .await
        .expect("Failed to create test database");

    (pool, temp_dir)
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

#[tokio::test]
async fn test_create_applies_default_preferences() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let user = repo.create(&new_user("alice", "alice@example.com")).await.unwrap();

    assert!(user.id > 0);
    assert!(!user.public_id.is_empty());
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");

    let prefs = &user.preferences;
    assert!(prefs.email_notifications);
    assert!(!prefs.push_notifications);
    assert_eq!(prefs.notification_frequency, NotificationFrequency::Weekly);
    assert_eq!(prefs.layout_style.as_deref(), Some("list"));
    assert_eq!(prefs.profile_visibility, ProfileVisibility::Public);
    assert!(!prefs.data_sharing);
}

#[tokio::test]
async fn test_find_by_id_and_email() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let created = repo.create(&new_user("bob", "bob@example.com")).await.unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    let by_email = repo.find_by_email("bob@example.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(repo.find_by_id(9_999).await.unwrap().is_none());
    assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_uniqueness_queries_exclude_own_row() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let alice = repo.create(&new_user("alice", "alice@example.com")).await.unwrap();
    let bob = repo.create(&new_user("bob", "bob@example.com")).await.unwrap();

    assert!(repo.username_taken("alice", None).await.unwrap());
    assert!(!repo.username_taken("alice", Some(alice.id)).await.unwrap());
    assert!(repo.username_taken("alice", Some(bob.id)).await.unwrap());
    assert!(!repo.username_taken("carol", None).await.unwrap());

    assert!(repo.email_taken("bob@example.com", None).await.unwrap());
    assert!(!repo.email_taken("bob@example.com", Some(bob.id)).await.unwrap());
    assert!(repo.email_taken("bob@example.com", Some(alice.id)).await.unwrap());
}

#[tokio::test]
async fn test_save_persists_preferences_and_identity() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let mut user = repo.create(&new_user("carol", "carol@example.com")).await.unwrap();
    user.username = "caroline".to_string();
    user.preferences.notification_frequency = NotificationFrequency::Monthly;
    user.preferences.push_notifications = true;
    user.preferences.theme_color = "green".to_string();
    user.preferences.layout_style = None;
    user.preferences.profile_visibility = ProfileVisibility::Private;
    user.preferences.data_sharing = true;

    let saved = repo.save(&user).await.unwrap();

    assert_eq!(saved.username, "caroline");
    assert_eq!(saved.preferences.notification_frequency, NotificationFrequency::Monthly);
    assert!(saved.preferences.push_notifications);
    assert_eq!(saved.preferences.theme_color, "green");
    assert_eq!(saved.preferences.layout_style, None);
    assert_eq!(saved.preferences.effective_layout_style(), "list");
    assert_eq!(saved.preferences.profile_visibility, ProfileVisibility::Private);
    assert!(saved.preferences.data_sharing);
    assert_eq!(saved.created_at, user.created_at);
}

#[tokio::test]
async fn test_unique_constraints_report_conflicting_field() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_user("dave", "dave@example.com")).await.unwrap();

    let err = repo
        .create(&new_user("dave", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::UniqueViolation { ref field } if field == "username"));

    let err = repo
        .create(&new_user("david", "dave@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::UniqueViolation { ref field } if field == "email"));

    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_save_of_missing_user_is_not_found() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let mut ghost = repo.create(&new_user("erin", "erin@example.com")).await.unwrap();
    ghost.id = 4_242;

    let err = repo.save(&ghost).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn test_list_returns_users_in_creation_order() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    for name in ["one", "two", "three"] {
        repo.create(&new_user(name, &format!("{name}@example.com")))
            .await
            .unwrap();
    }

    let users = repo.list(2).await.unwrap();
    let names: Vec<_> = users.iter().map(|user| user.username.as_str()).collect();
    assert_eq!(names, vec!["one", "two"]);
    assert_eq!(repo.count().await.unwrap(), 3);
}

//! In-memory `UserStore` for tests and local experiments.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use accountdesk_database::{DatabaseError, DatabaseResult, NewUser, Preferences, User};
use chrono::Utc;
use tokio::sync::RwLock;

use super::account_service::UserStore;

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

/// Store backed by a map, enforcing the same uniqueness rules as SQLite.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    state: Arc<RwLock<MemoryState>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent create/save fail with a connection error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_writable(&self) -> DatabaseResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionError("store is read-only".to_string()));
        }
        Ok(())
    }
}

fn conflict(
    users: &BTreeMap<i64, User>,
    username: &str,
    email: &str,
    exclude: Option<i64>,
) -> Option<&'static str> {
    let others = || users.values().filter(move |user| Some(user.id) != exclude);
    if others().any(|user| user.username == username) {
        Some("username")
    } else if others().any(|user| user.email == email) {
        Some("email")
    } else {
        None
    }
}

impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|user| user.email == email).cloned())
    }

    async fn username_taken(
        &self,
        username: &str,
        exclude_id: Option<i64>,
    ) -> DatabaseResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .any(|user| user.username == username && Some(user.id) != exclude_id))
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> DatabaseResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .any(|user| user.email == email && Some(user.id) != exclude_id))
    }

    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if let Some(field) = conflict(&state.users, &new_user.username, &new_user.email, None) {
            return Err(DatabaseError::UniqueViolation {
                field: field.to_string(),
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        let now = Utc::now().to_rfc3339();
        let user = User {
            id,
            public_id: format!("user_{id}"),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            preferences: Preferences::default(),
            created_at: now.clone(),
            updated_at: now,
        };

        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> DatabaseResult<User> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Err(DatabaseError::NotFound(format!("user {}", user.id)));
        }
        if let Some(field) = conflict(&state.users, &user.username, &user.email, Some(user.id)) {
            return Err(DatabaseError::UniqueViolation {
                field: field.to_string(),
            });
        }

        let mut stored = user.clone();
        stored.updated_at = Utc::now().to_rfc3339();
        state.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_rejects_duplicates() {
        let store = MemoryUserStore::new();

        let alice = store.create(&new_user("alice", "a@example.com")).await.unwrap();
        let bob = store.create(&new_user("bob", "b@example.com")).await.unwrap();
        assert_ne!(alice.id, bob.id);

        let err = store
            .create(&new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation { ref field } if field == "username"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn save_checks_uniqueness_against_other_rows_only() {
        let store = MemoryUserStore::new();
        let mut alice = store.create(&new_user("alice", "a@example.com")).await.unwrap();
        store.create(&new_user("bob", "b@example.com")).await.unwrap();

        alice.preferences.theme_color = "red".to_string();
        let saved = store.save(&alice).await.unwrap();
        assert_eq!(saved.preferences.theme_color, "red");

        alice.email = "b@example.com".to_string();
        let err = store.save(&alice).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation { ref field } if field == "email"));
    }

    #[tokio::test]
    async fn failing_writes_leave_state_untouched() {
        let store = MemoryUserStore::new();
        let mut alice = store.create(&new_user("alice", "a@example.com")).await.unwrap();

        store.set_fail_writes(true);
        alice.username = "alicia".to_string();
        assert!(store.save(&alice).await.is_err());
        assert!(store.create(&new_user("carol", "c@example.com")).await.is_err());

        let stored = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.username, "alice");
        assert_eq!(store.len().await, 1);
    }
}

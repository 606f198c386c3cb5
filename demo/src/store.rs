//! In-memory user store shared by the handlers.

use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, Mutex};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Simulated database
#[derive(Debug)]
pub struct UserStore {
    users: Mutex<Vec<User>>,
    next_id: Mutex<u32>,
}

static STORE: LazyLock<UserStore> = LazyLock::new(UserStore::seeded);

/// The process-wide store.
pub fn users() -> &'static UserStore {
    &STORE
}

impl UserStore {
    fn seeded() -> Self {
        Self {
            users: Mutex::new(vec![
                User::new(1, "Alice", "alice@example.com"),
                User::new(2, "Bob", "bob@example.com"),
            ]),
            next_id: Mutex::new(3),
        }
    }

    pub fn get(&self, id: u32) -> Option<User> {
        self.users.lock().ok()?.iter().find(|u| u.id == id).cloned()
    }

    /// Users whose name contains `needle`, case-insensitive.
    pub fn search(&self, needle: &str) -> Vec<User> {
        let needle = needle.to_lowercase();
        self.all()
            .into_iter()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn all(&self) -> Vec<User> {
        self.users.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn create(&self, name: &str, email: &str) -> Option<User> {
        let mut users = self.users.lock().ok()?;
        let mut next_id = self.next_id.lock().ok()?;

        let user = User::new(*next_id, name, email);
        *next_id += 1;
        users.push(user.clone());
        Some(user)
    }

    pub fn delete(&self, id: u32) -> Option<User> {
        let mut users = self.users.lock().ok()?;
        let index = users.iter().position(|u| u.id == id)?;
        Some(users.remove(index))
    }
}

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// In-memory user list, insertion ordered.
///
/// Ids are random v4 UUIDs and are never checked for collisions; usernames
/// and emails are not unique.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> Vec<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn create(&self, username: &str, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
        };
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user.clone());
        user
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Apply the supplied fields in place. `None` when the id is unknown.
    pub fn update(&self, id: &str, username: Option<&str>, email: Option<&str>) -> Option<User> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let user = users.iter_mut().find(|user| user.id == id)?;
        if let Some(username) = username {
            user.username = username.to_string();
        }
        if let Some(email) = email {
            user.email = email.to_string();
        }
        Some(user.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match users.iter().position(|user| user.id == id) {
            Some(index) => {
                users.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_returns_same_record() {
        let store = UserStore::new();
        let created = store.create("a", "a@x.com");

        assert_eq!(store.get(&created.id), Some(created.clone()));
        assert!(Uuid::parse_str(&created.id).is_ok());
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let store = UserStore::new();
        let created = store.create("a", "a@x.com");

        let updated = store.update(&created.id, Some("b"), None).unwrap();
        assert_eq!(updated.username, "b");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(store.get(&created.id), Some(updated));
    }

    #[test]
    fn update_unknown_id_is_none() {
        let store = UserStore::new();
        assert!(store.update("missing", Some("b"), Some("b@x.com")).is_none());
    }

    #[test]
    fn delete_removes_record() {
        let store = UserStore::new();
        let created = store.create("a", "a@x.com");

        assert!(store.delete(&created.id));
        assert!(store.get(&created.id).is_none());
        assert!(!store.delete(&created.id));
    }

    #[test]
    fn delete_unknown_id_is_false() {
        let store = UserStore::new();
        store.create("a", "a@x.com");
        assert!(!store.delete("not-an-id"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn list_preserves_insertion_order_and_is_a_copy() {
        let store = UserStore::new();
        let first = store.create("first", "1@x.com");
        let second = store.create("second", "2@x.com");

        let mut listed = store.list();
        assert_eq!(listed, vec![first.clone(), second]);

        listed.clear();
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[0], first);
    }

    #[test]
    fn duplicate_usernames_are_allowed() {
        let store = UserStore::new();
        let a = store.create("same", "one@x.com");
        let b = store.create("same", "two@x.com");
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().len(), 2);
    }
}

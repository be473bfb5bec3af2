//! User Directory
//!
//! The seam between the role store and whatever owns user identities.

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::shared::error::{PlatformError, Result};
use crate::user::entity::User;

/// Answers whether a user currently exists.
pub trait UserDirectory: Send + Sync {
    fn user_exists(&self, user_id: &str) -> bool;
}

/// In-memory user directory for the standalone server and tests
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<IndexMap<String, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(&self, name: impl Into<String>, domain_id: Option<String>) -> Result<User> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlatformError::validation("user name must not be empty"));
        }

        let user = User::new(name.trim(), domain_id);
        let mut users = self.users.write();
        let taken = users
            .values()
            .any(|u| u.name == user.name && u.domain_id == user.domain_id);
        if taken {
            return Err(PlatformError::duplicate_name("user", &user.name));
        }

        users.insert(user.id.clone(), user.clone());
        tracing::info!(user_id = %user.id, name = %user.name, "User created");
        Ok(user)
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.users
            .read()
            .get(user_id)
            .cloned()
            .ok_or_else(|| PlatformError::not_found("user", user_id))
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }

    /// Remove the user. Callers must then signal the role store so that
    /// role links to this user are dropped.
    pub fn delete_user(&self, user_id: &str) -> Result<User> {
        let removed = self
            .users
            .write()
            .shift_remove(user_id)
            .ok_or_else(|| PlatformError::not_found("user", user_id))?;
        tracing::info!(user_id = %user_id, "User deleted");
        Ok(removed)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn user_exists(&self, user_id: &str) -> bool {
        self.users.read().contains_key(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create_user("alice", None).unwrap();
        assert_eq!(user.domain_id, "default");
        assert!(user.enabled);
        assert!(directory.user_exists(&user.id));
        assert_eq!(directory.get_user(&user.id).unwrap(), user);
    }

    #[test]
    fn test_duplicate_name_in_same_domain() {
        let directory = InMemoryUserDirectory::new();
        directory.create_user("alice", None).unwrap();
        assert!(matches!(
            directory.create_user("alice", None),
            Err(PlatformError::Conflict { .. })
        ));
        assert!(directory.create_user("alice", Some("other".into())).is_ok());
    }

    #[test]
    fn test_delete() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create_user("bob", None).unwrap();
        directory.delete_user(&user.id).unwrap();
        assert!(!directory.user_exists(&user.id));
        assert!(directory.list_users().is_empty());
        assert!(matches!(
            directory.delete_user(&user.id),
            Err(PlatformError::NotFound { .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let directory = InMemoryUserDirectory::new();
        assert!(matches!(
            directory.create_user("  ", None),
            Err(PlatformError::Validation { .. })
        ));
    }
}

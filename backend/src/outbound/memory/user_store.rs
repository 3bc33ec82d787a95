//! User records held in memory.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

/// [`UserRepository`] keyed by the provider identity.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn insert_if_absent(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        let stored = match users.entry(user.id().clone()) {
            Entry::Occupied(existing) => existing.into_mut(),
            Entry::Vacant(slot) => slot.insert(user.clone()),
        };
        Ok(stored.clone())
    }

    async fn replace(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(user.id())
            .ok_or_else(|| UserPersistenceError::missing(user.id().clone()))?;
        stored.clone_from(user);
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(drop)
            .ok_or_else(|| UserPersistenceError::missing(id.clone()))
    }

    async fn touch_last_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(id)
            .ok_or_else(|| UserPersistenceError::missing(id.clone()))?;
        *stored = stored.clone().with_last_login_at(Some(at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::test_support::{fixture_timestamp, user_with_role};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn insert_if_absent_keeps_the_first_record() {
        let store = MemoryUserStore::new();
        let first = user_with_role("u1", Role::Author);
        let second = user_with_role("u1", Role::Admin);

        store.insert_if_absent(&first).await.expect("insert");
        let kept = store.insert_if_absent(&second).await.expect("insert");
        assert_eq!(kept.role(), Role::Author);
        assert_eq!(store.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn touch_records_last_login() {
        let store = MemoryUserStore::new();
        let user = user_with_role("u1", Role::Editor);
        store.insert_if_absent(&user).await.expect("insert");

        let at = fixture_timestamp() + chrono::Duration::hours(1);
        store.touch_last_login(user.id(), at).await.expect("touch");
        let stored = store.find_by_id(user.id()).await.expect("lookup");
        assert_eq!(stored.and_then(|u| u.last_login_at()), Some(at));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_ids_are_missing() {
        let store = MemoryUserStore::new();
        let ghost = user_with_role("ghost", Role::Author);
        assert!(matches!(
            store.replace(&ghost).await,
            Err(UserPersistenceError::Missing { .. })
        ));
        assert!(matches!(
            store.touch_last_login(ghost.id(), fixture_timestamp()).await,
            Err(UserPersistenceError::Missing { .. })
        ));
        assert!(matches!(
            store.delete(ghost.id()).await,
            Err(UserPersistenceError::Missing { .. })
        ));
    }
}

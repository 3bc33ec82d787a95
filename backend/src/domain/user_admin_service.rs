//! Admin-only user management.
//!
//! Only name, role, and avatar are editable. Deleting a user revokes every
//! permission derived from the record because callers re-load the acting
//! user on each request.

use std::sync::Arc;

use tracing::debug;

use crate::domain::permissions::can_manage_users;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Error, User, UserChanges, UserId};

/// User management service over a [`UserRepository`].
pub struct UserAdminService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> UserAdminService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> UserAdminService<R>
where
    R: UserRepository + ?Sized,
{
    fn authorize(acting_user: Option<&User>) -> Result<(), Error> {
        if can_manage_users(acting_user) {
            Ok(())
        } else {
            Err(Error::forbidden("only admins may manage users"))
        }
    }

    /// Every user, newest account first.
    pub async fn list(&self, acting_user: Option<&User>) -> Result<Vec<User>, Error> {
        Self::authorize(acting_user)?;
        let mut users = self.repo.list().await.map_err(map_user_error)?;
        users.sort_by_key(|user| std::cmp::Reverse(user.created_at()));
        Ok(users)
    }

    pub async fn get(&self, id: &UserId, acting_user: Option<&User>) -> Result<User, Error> {
        Self::authorize(acting_user)?;
        self.find(id).await
    }

    /// Apply an admin edit. Email and id never change.
    pub async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        acting_user: Option<&User>,
    ) -> Result<User, Error> {
        Self::authorize(acting_user)?;
        let mut user = self.find(id).await?;
        user.apply(&changes);
        self.repo.replace(&user).await.map_err(map_user_error)?;
        debug!(user_id = %id, role = %user.role(), "user updated");
        Ok(user)
    }

    /// Remove a user record. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &UserId, acting_user: Option<&User>) -> Result<(), Error> {
        Self::authorize(acting_user)?;
        match self.repo.delete(id).await {
            Ok(()) | Err(UserPersistenceError::Missing { .. }) => {}
            Err(err) => return Err(map_user_error(err)),
        }
        debug!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn find(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Missing { id } => Error::not_found(format!("user {id} not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{DisplayName, ErrorCode, Role};
    use crate::test_support::user_with_role;
    use rstest::rstest;

    fn make_service(repo: MockUserRepository) -> UserAdminService<MockUserRepository> {
        UserAdminService::new(Arc::new(repo))
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Role::Author))]
    #[case(Some(Role::Editor))]
    #[tokio::test]
    async fn non_admins_are_denied(#[case] role: Option<Role>) {
        let caller = role.map(|role| user_with_role("2", role));
        let service = make_service(MockUserRepository::new());
        let id = UserId::new("3").expect("id");

        let listed = service.list(caller.as_ref()).await;
        assert_eq!(listed.expect_err("denied").code(), ErrorCode::Forbidden);
        let deleted = service.delete(&id, caller.as_ref()).await;
        assert_eq!(deleted.expect_err("denied").code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn update_changes_role_but_not_identity() {
        let admin = user_with_role("1", Role::Admin);
        let target = user_with_role("3", Role::Author);
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(target)));
        repo.expect_replace()
            .withf(|user: &User| user.role() == Role::Editor && user.id().as_ref() == "3")
            .times(1)
            .returning(|_| Ok(()));

        let updated = make_service(repo)
            .update(
                &UserId::new("3").expect("id"),
                UserChanges {
                    role: Some(Role::Editor),
                    name: Some(DisplayName::new("Promoted").expect("name")),
                    avatar: None,
                },
                Some(&admin),
            )
            .await
            .expect("updated");
        assert_eq!(updated.role(), Role::Editor);
        assert_eq!(updated.name().as_ref(), "Promoted");
        assert_eq!(
            updated.email().map(ToString::to_string),
            Some("3@example.com".to_owned())
        );
    }

    #[tokio::test]
    async fn updating_unknown_user_is_not_found() {
        let admin = user_with_role("1", Role::Admin);
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));
        let error = make_service(repo)
            .update(
                &UserId::new("ghost").expect("id"),
                UserChanges::default(),
                Some(&admin),
            )
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let admin = user_with_role("1", Role::Admin);
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .return_once(|id| Err(UserPersistenceError::missing(id.to_string())));
        make_service(repo)
            .delete(&UserId::new("ghost").expect("id"), Some(&admin))
            .await
            .expect("no-op");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let admin = user_with_role("1", Role::Admin);
        let older = user_with_role("old", Role::Author);
        let newer = User::new(
            UserId::new("new").expect("id"),
            None,
            DisplayName::fallback(),
            Role::Author,
            older.created_at() + chrono::Duration::days(1),
        );
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .return_once(move || Ok(vec![older, newer]));

        let users = make_service(repo).list(Some(&admin)).await.expect("list");
        let ids: Vec<_> = users.iter().map(|user| user.id().to_string()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}

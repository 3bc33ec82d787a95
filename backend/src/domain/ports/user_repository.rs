//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// No user exists under the given id.
        Missing { id: String } => "user {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user, in no particular order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Store `user` unless a record with the same id exists.
    ///
    /// Returns whichever record is stored afterwards, so concurrent first
    /// sightings of one identity converge on a single record.
    async fn insert_if_absent(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Overwrite an existing record, or fail with `Missing`.
    async fn replace(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a record, or fail with `Missing`.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;

    /// Record a successful sign-in, or fail with `Missing`.
    async fn touch_last_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), UserPersistenceError>;
}

//! Port abstraction for user persistence adapters and their errors.

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-specific detail.
            message: String,
        } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-specific detail.
            message: String,
        } => "user repository query failed: {message}",
        /// Another user already holds the same email address.
        Conflict {
            /// Adapter-specific detail.
            message: String,
        } => "user repository conflict: {message}",
    }
}

/// Port for storing and loading users.
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Insert or update a user, assigning an identifier on first save.
    fn save(&self, user: &mut User) -> Result<UserId, UserRepositoryError>;

    /// Fetch a user by identifier.
    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by exact email address.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Remove a user. Returns `true` when a record was deleted.
    fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}

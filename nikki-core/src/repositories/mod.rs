//! Repository traits for the data access layer
//!
//! Services talk to storage exclusively through these traits, so any
//! relational backend can be slotted in by implementing them plus the
//! provider traits below.
//!
//! Each operation is a single read or write against the store. The core
//! never layers its own locking, optimistic versioning or retries on top;
//! correctness of concurrent read-modify-write sequences on the same record
//! relies on the backend's per-row isolation.

pub mod entry;
pub mod user;

pub use entry::EntryRepository;
pub use user::UserRepository;

#[cfg(test)]
pub(crate) mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for user repository access.
pub trait UserRepositoryProvider: Send + Sync + 'static {
    /// The user repository implementation type
    type UserRepo: UserRepository;

    /// Get a shared handle to the user repository
    fn user(&self) -> Arc<Self::UserRepo>;
}

/// Provider trait for diary entry repository access.
pub trait EntryRepositoryProvider: Send + Sync + 'static {
    /// The entry repository implementation type
    type EntryRepo: EntryRepository;

    /// Get a shared handle to the entry repository
    fn entry(&self) -> Arc<Self::EntryRepo>;
}

/// Provider trait storage backends implement to expose all repositories,
/// plus lifecycle methods for migrations and health checks.
#[async_trait]
pub trait RepositoryProvider: UserRepositoryProvider + EntryRepositoryProvider {
    /// Bring the schema up to date.
    async fn migrate(&self) -> Result<(), Error>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), Error>;
}

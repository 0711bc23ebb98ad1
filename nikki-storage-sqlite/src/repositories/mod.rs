//! Repository implementations for SQLite storage

pub mod entry;
pub mod user;

pub use entry::SqliteEntryRepository;
pub use user::SqliteUserRepository;

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use nikki_core::{
    Error,
    error::StorageError,
    repositories::{EntryRepositoryProvider, RepositoryProvider, UserRepositoryProvider},
};

use crate::migrations::{SqliteMigrationManager, sqlite_migrations};

/// Repository provider implementation for SQLite.
///
/// Implements the individual repository provider traits as well as the
/// unified [`RepositoryProvider`] trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    user: Arc<SqliteUserRepository>,
    entry: Arc<SqliteEntryRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let user = Arc::new(SqliteUserRepository::new(pool.clone()));
        let entry = Arc::new(SqliteEntryRepository::new(pool.clone()));

        Self { pool, user, entry }
    }
}

impl UserRepositoryProvider for SqliteRepositoryProvider {
    type UserRepo = SqliteUserRepository;

    fn user(&self) -> Arc<Self::UserRepo> {
        self.user.clone()
    }
}

impl EntryRepositoryProvider for SqliteRepositoryProvider {
    type EntryRepo = SqliteEntryRepository;

    fn entry(&self) -> Arc<Self::EntryRepo> {
        self.entry.clone()
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        manager.up(&sqlite_migrations()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(
                "Failed to run migrations".to_string(),
            ))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;
        Ok(())
    }
}

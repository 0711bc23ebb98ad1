//! # Nikki
//!
//! Nikki is the backend for a personal diary application: account
//! registration, login with lockout after repeated failures, password reset
//! via time-limited single-use tokens, profile management, and owner-scoped
//! diary entries.
//!
//! The crate is a thin facade over `nikki-core`, wired to a storage backend
//! through the [`RepositoryProvider`] trait. Sessions are deliberately not
//! managed here: a successful login returns the sanitized profile, and the
//! caller decides what (if anything) to keep in its own session store.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nikki::{Nikki, Registration, SqliteRepositoryProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = sqlx::SqlitePool::connect("sqlite:nikki.db").await?;
//!     let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
//!
//!     let nikki = Nikki::new(repositories);
//!     nikki.migrate().await?;
//!
//!     let outcome = nikki
//!         .register(Registration {
//!             username: "alice".to_string(),
//!             email: "alice@example.com".to_string(),
//!             password: "Sup3rSecret".to_string(),
//!             first_name: None,
//!             last_name: None,
//!         })
//!         .await?;
//!     println!("{}", outcome.message);
//!
//!     let login = nikki.login("alice", "Sup3rSecret").await?;
//!     if let Some(profile) = login.payload {
//!         println!("welcome back, {}", profile.username);
//!     }
//!
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use nikki_core::{
    Error,
    repositories::RepositoryProvider,
    services::{AuthService, EntryService, PasswordResetService, ProfileService},
};

/// Re-export core types from nikki_core
///
/// These types are commonly used when working with the Nikki API.
pub use nikki_core::{
    DiaryEntry, EntryId, Outcome, User, UserId, UserProfile,
    services::{EntryUpdate, LockoutPolicy, NewEntry, ProfileUpdate, Registration},
};

/// Re-export storage backends
///
/// Available when the corresponding feature is enabled.
#[cfg(feature = "sqlite")]
pub use nikki_storage_sqlite::SqliteRepositoryProvider;

/// Errors that can occur when using Nikki.
///
/// Domain-level rejections (wrong password, locked account, duplicate
/// username, unknown token) are not errors: they arrive as unsuccessful
/// [`Outcome`] values. This enum only carries malformed input and storage
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum NikkiError {
    /// Input failed format validation before touching storage
    #[error("Validation error: {0}")]
    Validation(String),
    /// Error when interacting with storage
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<Error> for NikkiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(v) => NikkiError::Validation(v.to_string()),
            Error::Storage(s) => NikkiError::Storage(s.to_string()),
        }
    }
}

/// The application coordinator wiring services over a repository provider.
///
/// One instance serves any number of concurrent requests; all state lives in
/// the storage backend.
pub struct Nikki<R: RepositoryProvider> {
    repositories: Arc<R>,
    auth_service: Arc<AuthService<R::UserRepo>>,
    password_reset_service: Arc<PasswordResetService<R::UserRepo>>,
    profile_service: Arc<ProfileService<R::UserRepo>>,
    entry_service: Arc<EntryService<R::EntryRepo, R::UserRepo>>,
}

impl<R: RepositoryProvider> Nikki<R> {
    /// Create a new Nikki instance over a repository provider, with the
    /// default lockout policy (3 attempts, 15 minutes).
    pub fn new(repositories: Arc<R>) -> Self {
        let users = repositories.user();
        let entries = repositories.entry();

        Self {
            repositories,
            auth_service: Arc::new(AuthService::new(users.clone())),
            password_reset_service: Arc::new(PasswordResetService::new(users.clone())),
            profile_service: Arc::new(ProfileService::new(users.clone())),
            entry_service: Arc::new(EntryService::new(entries, users)),
        }
    }

    /// Replace the account lockout policy.
    pub fn with_lockout_policy(mut self, policy: LockoutPolicy) -> Self {
        self.auth_service = Arc::new(AuthService::with_policy(
            self.repositories.user(),
            policy,
        ));
        self
    }

    /// Bring the storage schema up to date.
    pub async fn migrate(&self) -> Result<(), NikkiError> {
        Ok(self.repositories.migrate().await?)
    }

    /// Verify the storage backend is reachable.
    pub async fn health_check(&self) -> Result<(), NikkiError> {
        Ok(self.repositories.health_check().await?)
    }

    /// Register a new account.
    pub async fn register(&self, registration: Registration) -> Result<Outcome, NikkiError> {
        Ok(self.auth_service.register(registration).await?)
    }

    /// Verify a username/password pair.
    ///
    /// On acceptance the outcome carries the sanitized profile; rejections
    /// (wrong password, unknown user, locked account) carry only a message.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Outcome<UserProfile>, NikkiError> {
        Ok(self.auth_service.attempt_login(username, password).await?)
    }

    /// Issue a password-reset token for `email`, if an account exists.
    ///
    /// The outcome message is identical whether or not the email is known.
    pub async fn request_password_reset(&self, email: &str) -> Result<Outcome, NikkiError> {
        Ok(self.password_reset_service.request_reset(email).await?)
    }

    /// Consume a reset token and store a new password.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Outcome, NikkiError> {
        Ok(self
            .password_reset_service
            .reset_password(token, new_password)
            .await?)
    }

    /// Fetch the sanitized profile for a user.
    pub async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>, NikkiError> {
        Ok(self.profile_service.profile(user_id).await?)
    }

    /// Apply a partial profile update.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Outcome, NikkiError> {
        Ok(self.profile_service.update_profile(user_id, update).await?)
    }

    /// Store the path of an already-uploaded profile picture.
    pub async fn set_profile_picture(
        &self,
        user_id: UserId,
        path: &str,
    ) -> Result<Outcome, NikkiError> {
        Ok(self
            .profile_service
            .set_profile_picture(user_id, path)
            .await?)
    }

    /// All diary entries belonging to a user, newest first.
    pub async fn entries(&self, user_id: UserId) -> Result<Vec<DiaryEntry>, NikkiError> {
        Ok(self.entry_service.entries_for_user(user_id).await?)
    }

    /// A single diary entry, only if it belongs to the user.
    pub async fn entry(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> Result<Option<DiaryEntry>, NikkiError> {
        Ok(self.entry_service.entry(entry_id, user_id).await?)
    }

    /// Create a new diary entry.
    pub async fn create_entry(
        &self,
        user_id: UserId,
        new_entry: NewEntry,
    ) -> Result<Outcome<DiaryEntry>, NikkiError> {
        Ok(self.entry_service.create_entry(user_id, new_entry).await?)
    }

    /// Rewrite a diary entry's title and content.
    pub async fn update_entry(
        &self,
        user_id: UserId,
        update: EntryUpdate,
    ) -> Result<Outcome<DiaryEntry>, NikkiError> {
        Ok(self.entry_service.update_entry(user_id, update).await?)
    }

    /// Delete a diary entry.
    pub async fn delete_entry(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> Result<Outcome, NikkiError> {
        Ok(self.entry_service.delete_entry(entry_id, user_id).await?)
    }
}

//! User records and their lifecycle state
//!
//! The user record is the only entity in the system carrying state-machine
//! behavior: the failed-login counter, the lockout window, and the
//! password-reset token. All of it lives on the persisted record; nothing is
//! cached in memory between requests.
//!
//! | Field                         | Type               | Description                                       |
//! | ----------------------------- | ------------------ | ------------------------------------------------- |
//! | `id`                          | `UserId`           | Store-assigned numeric identifier, immutable.     |
//! | `username`, `email`           | `String`           | Unique across all records.                        |
//! | `password_hash`               | `String`           | Salted SHA-256 digest, base64-encoded.            |
//! | `failed_login_attempts`       | `i32`              | Reset to 0 on successful login or password reset. |
//! | `lockout_end`                 | `Option<DateTime>` | While in the future, login is refused outright.   |
//! | `password_reset_token`        | `Option<String>`   | Single-use; cleared together with its expiry.     |
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a user record.
///
/// Assigned by the store at creation and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        UserId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A full user record as held by the store.
///
/// This type carries the password hash and reset token, so it never crosses
/// the service boundary towards callers; they receive a [`UserProfile`]
/// instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture_path: Option<String>,
    pub date_created: DateTime<Utc>,
    pub last_login_date: DateTime<Utc>,
    pub failed_login_attempts: i32,
    pub lockout_end: Option<DateTime<Utc>>,
    pub password_reset_token: Option<String>,
    pub password_reset_token_expiry: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account is locked out as of `now`.
    ///
    /// A lockout that has lapsed no longer counts as locked; the stored
    /// timestamp is cleared lazily on the next successful login or reset.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.is_some_and(|end| end > now)
    }

    /// Project the record into its caller-safe shape.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_picture_path: self.profile_picture_path.clone(),
            date_created: self.date_created,
        }
    }
}

/// The subset of a user record that is safe to hand back to callers.
///
/// Excludes the password hash, the reset token, and the lockout state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture_path: Option<String>,
    pub date_created: DateTime<Utc>,
}

/// Insert shape for [`crate::repositories::UserRepository::create`].
///
/// The password is already hashed by the time it reaches the repository;
/// timestamps and the attempt counter are stamped by the store.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

//! SQLite storage backend for the nikki diary backend
//!
//! Implements the `nikki-core` repository traits on top of `sqlx` with a
//! plain SQLite schema. Timestamps are stored as unix seconds, since that is
//! the one datetime representation every SQLite driver agrees on.

pub mod migrations;
pub mod repositories;

pub use repositories::{SqliteEntryRepository, SqliteRepositoryProvider, SqliteUserRepository};

use chrono::{DateTime, Utc};
use nikki_core::{DiaryEntry, EntryId, User, UserId};

fn timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).expect("Invalid timestamp")
}

/// Row shape of the `users` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteUser {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_picture_path: Option<String>,
    date_created: i64,
    last_login_date: i64,
    failed_login_attempts: i64,
    lockout_end: Option<i64>,
    password_reset_token: Option<String>,
    password_reset_token_expiry: Option<i64>,
}

impl From<SqliteUser> for User {
    fn from(row: SqliteUser) -> Self {
        User {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_picture_path: row.profile_picture_path,
            date_created: timestamp(row.date_created),
            last_login_date: timestamp(row.last_login_date),
            failed_login_attempts: row.failed_login_attempts as i32,
            lockout_end: row.lockout_end.map(timestamp),
            password_reset_token: row.password_reset_token,
            password_reset_token_expiry: row.password_reset_token_expiry.map(timestamp),
        }
    }
}

/// Row shape of the `diary_entries` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteEntry {
    id: i64,
    user_id: i64,
    title: String,
    content: String,
    created_date: i64,
    last_modified_date: i64,
}

impl From<SqliteEntry> for DiaryEntry {
    fn from(row: SqliteEntry) -> Self {
        DiaryEntry {
            id: EntryId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            content: row.content,
            created_date: timestamp(row.created_date),
            last_modified_date: timestamp(row.last_modified_date),
        }
    }
}

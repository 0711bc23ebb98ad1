//! Diary entries
//!
//! Entries are plain owned rows: every read and write is scoped to the
//! owning user, so one user can never see or touch another user's entries.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A unique, stable identifier for a diary entry, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(i64);

impl EntryId {
    pub fn new(id: i64) -> Self {
        EntryId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A diary entry as held by the store and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
}

/// Insert shape for [`crate::repositories::EntryRepository::create`].
#[derive(Debug, Clone)]
pub struct NewEntryRecord {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

//! In-memory repositories for service unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    DiaryEntry, EntryId, Error, User, UserId,
    entry::NewEntryRecord,
    error::StorageError,
    repositories::{EntryRepository, UserRepository},
    user::NewUserRecord,
};

#[derive(Default)]
pub(crate) struct MemoryUserRepository {
    next_id: AtomicI64,
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUserRecord) -> Result<User, Error> {
        let now = Utc::now();
        let user = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_picture_path: None,
            date_created: now,
            last_login_date: now,
            failed_login_attempts: 0,
            lockout_end: None,
            password_reset_token: None,
            password_reset_token_expiry: None,
        };
        self.users.lock().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| {
                u.password_reset_token.as_deref() == Some(token)
                    && u.password_reset_token_expiry.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<User, Error> {
        let mut users = self.users.lock().await;
        if !users.contains_key(&user.id) {
            return Err(Error::Storage(StorageError::NotFound));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[derive(Default)]
pub(crate) struct MemoryEntryRepository {
    next_id: AtomicI64,
    entries: Mutex<HashMap<EntryId, DiaryEntry>>,
}

impl MemoryEntryRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepository {
    async fn create(&self, entry: NewEntryRecord) -> Result<DiaryEntry, Error> {
        let now = Utc::now();
        let entry = DiaryEntry {
            id: EntryId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            user_id: entry.user_id,
            title: entry.title,
            content: entry.content,
            created_date: now,
            last_modified_date: now,
        };
        self.entries.lock().await.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn find_for_user(
        &self,
        id: EntryId,
        user_id: UserId,
    ) -> Result<Option<DiaryEntry>, Error> {
        Ok(self
            .entries
            .lock()
            .await
            .get(&id)
            .filter(|e| e.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<DiaryEntry>, Error> {
        let mut entries: Vec<_> = self
            .entries
            .lock()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Newest first, with the id as tie-breaker like the SQL backends.
        entries.sort_by(|a, b| {
            b.created_date
                .cmp(&a.created_date)
                .then(b.id.as_i64().cmp(&a.id.as_i64()))
        });
        Ok(entries)
    }

    async fn update(&self, entry: &DiaryEntry) -> Result<DiaryEntry, Error> {
        let mut entries = self.entries.lock().await;
        let stored = entries
            .get_mut(&entry.id)
            .filter(|e| e.user_id == entry.user_id)
            .ok_or(Error::Storage(StorageError::NotFound))?;
        stored.title = entry.title.clone();
        stored.content = entry.content.clone();
        stored.last_modified_date = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: EntryId, user_id: UserId) -> Result<u64, Error> {
        let mut entries = self.entries.lock().await;
        match entries.get(&id) {
            Some(e) if e.user_id == user_id => {
                entries.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

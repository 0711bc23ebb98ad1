use crate::{DiaryEntry, EntryId, Error, UserId, entry::NewEntryRecord};
use async_trait::async_trait;

/// Repository for diary entries. Every lookup and mutation is scoped to the
/// owning user.
#[async_trait]
pub trait EntryRepository: Send + Sync + 'static {
    /// Insert a new entry and return it with its store-assigned id; the
    /// store stamps `created_date` and `last_modified_date`.
    async fn create(&self, entry: NewEntryRecord) -> Result<DiaryEntry, Error>;

    /// Find an entry by id, only if it belongs to `user_id`.
    async fn find_for_user(&self, id: EntryId, user_id: UserId)
    -> Result<Option<DiaryEntry>, Error>;

    /// All entries belonging to `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<DiaryEntry>, Error>;

    /// Persist `title` and `content` of an existing entry, refreshing
    /// `last_modified_date`. The write is scoped to the entry's owner.
    async fn update(&self, entry: &DiaryEntry) -> Result<DiaryEntry, Error>;

    /// Delete the entry if it belongs to `user_id`; returns the number of
    /// rows removed (0 or 1).
    async fn delete(&self, id: EntryId, user_id: UserId) -> Result<u64, Error>;
}

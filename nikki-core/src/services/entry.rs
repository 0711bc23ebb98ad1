//! Diary entry CRUD, scoped to the owning user.

use crate::{
    DiaryEntry, EntryId, Error, Outcome, UserId,
    entry::NewEntryRecord,
    repositories::{EntryRepository, UserRepository},
    validation::validate_title,
};
use std::sync::Arc;

/// Input for [`EntryService::create_entry`].
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
}

/// Input for [`EntryService::update_entry`].
#[derive(Debug, Clone)]
pub struct EntryUpdate {
    pub id: EntryId,
    pub title: String,
    pub content: String,
}

/// Service for diary entry operations.
pub struct EntryService<E: EntryRepository, U: UserRepository> {
    entries: Arc<E>,
    users: Arc<U>,
}

impl<E: EntryRepository, U: UserRepository> EntryService<E, U> {
    pub fn new(entries: Arc<E>, users: Arc<U>) -> Self {
        Self { entries, users }
    }

    /// All entries belonging to `user_id`, newest first.
    pub async fn entries_for_user(&self, user_id: UserId) -> Result<Vec<DiaryEntry>, Error> {
        self.entries.list_for_user(user_id).await
    }

    /// A single entry, only if it belongs to `user_id`.
    pub async fn entry(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> Result<Option<DiaryEntry>, Error> {
        self.entries.find_for_user(entry_id, user_id).await
    }

    /// Create a new entry for `user_id`.
    pub async fn create_entry(
        &self,
        user_id: UserId,
        new_entry: NewEntry,
    ) -> Result<Outcome<DiaryEntry>, Error> {
        validate_title(&new_entry.title)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Ok(Outcome::rejected("User not found."));
        }

        let entry = self
            .entries
            .create(NewEntryRecord {
                user_id,
                title: new_entry.title,
                content: new_entry.content,
            })
            .await?;

        tracing::debug!(user_id = %user_id, entry_id = %entry.id, "created diary entry");
        Ok(Outcome::accepted_with(
            "Diary entry created successfully.",
            entry,
        ))
    }

    /// Rewrite an entry's title and content.
    pub async fn update_entry(
        &self,
        user_id: UserId,
        update: EntryUpdate,
    ) -> Result<Outcome<DiaryEntry>, Error> {
        validate_title(&update.title)?;

        let Some(mut entry) = self.entries.find_for_user(update.id, user_id).await? else {
            return Ok(Outcome::rejected(
                "Diary entry not found or you don't have permission to edit it.",
            ));
        };

        entry.title = update.title;
        entry.content = update.content;
        let entry = self.entries.update(&entry).await?;

        Ok(Outcome::accepted_with(
            "Diary entry updated successfully.",
            entry,
        ))
    }

    /// Delete an entry belonging to `user_id`.
    pub async fn delete_entry(&self, entry_id: EntryId, user_id: UserId) -> Result<Outcome, Error> {
        let removed = self.entries.delete(entry_id, user_id).await?;
        if removed == 0 {
            return Ok(Outcome::rejected(
                "Diary entry not found or you don't have permission to delete it.",
            ));
        }

        tracing::debug!(user_id = %user_id, entry_id = %entry_id, "deleted diary entry");
        Ok(Outcome::accepted("Diary entry deleted successfully."))
    }
}

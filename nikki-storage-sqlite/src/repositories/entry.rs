use crate::SqliteEntry;
use async_trait::async_trait;
use chrono::Utc;
use nikki_core::{
    DiaryEntry, EntryId, Error, UserId, entry::NewEntryRecord, error::StorageError,
    repositories::EntryRepository,
};
use sqlx::SqlitePool;

pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn create(&self, entry: NewEntryRecord) -> Result<DiaryEntry, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteEntry>(
            r#"
            INSERT INTO diary_entries (user_id, title, content, created_date, last_modified_date)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING *
            "#,
        )
        .bind(entry.user_id.as_i64())
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create diary entry");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        Ok(row.into())
    }

    async fn find_for_user(
        &self,
        id: EntryId,
        user_id: UserId,
    ) -> Result<Option<DiaryEntry>, Error> {
        let row = sqlx::query_as::<_, SqliteEntry>(
            "SELECT * FROM diary_entries WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to find diary entry");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        Ok(row.map(Into::into))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<DiaryEntry>, Error> {
        // Timestamps are second-granular, so the id breaks ties between
        // entries created within the same second.
        let rows = sqlx::query_as::<_, SqliteEntry>(
            r#"
            SELECT * FROM diary_entries
            WHERE user_id = ?1
            ORDER BY created_date DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list diary entries");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, entry: &DiaryEntry) -> Result<DiaryEntry, Error> {
        let row = sqlx::query_as::<_, SqliteEntry>(
            r#"
            UPDATE diary_entries
            SET title = ?3, content = ?4, last_modified_date = ?5
            WHERE id = ?1 AND user_id = ?2
            RETURNING *
            "#,
        )
        .bind(entry.id.as_i64())
        .bind(entry.user_id.as_i64())
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to update diary entry");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        row.map(Into::into)
            .ok_or(Error::Storage(StorageError::NotFound))
    }

    async fn delete(&self, id: EntryId, user_id: UserId) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM diary_entries WHERE id = ?1 AND user_id = ?2")
            .bind(id.as_i64())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to delete diary entry");
                Error::Storage(StorageError::Database(e.to_string()))
            })?;

        Ok(result.rows_affected())
    }
}

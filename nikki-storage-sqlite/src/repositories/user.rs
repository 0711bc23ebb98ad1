use crate::SqliteUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nikki_core::{
    Error, User, UserId, error::StorageError, repositories::UserRepository, user::NewUserRecord,
};
use sqlx::SqlitePool;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUserRecord) -> Result<User, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteUser>(
            r#"
            INSERT INTO users
                (username, email, password_hash, first_name, last_name,
                 date_created, last_login_date, failed_login_attempts)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, 0)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                Error::Storage(StorageError::Constraint(
                    "username or email already exists".to_string(),
                ))
            } else {
                tracing::error!(error = %e, "Failed to create user");
                Error::Storage(StorageError::Database(e.to_string()))
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to find user by id");
                Error::Storage(StorageError::Database(e.to_string()))
            })?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to find user by username");
                Error::Storage(StorageError::Database(e.to_string()))
            })?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to find user by email");
                Error::Storage(StorageError::Database(e.to_string()))
            })?;

        Ok(row.map(Into::into))
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, Error> {
        // The expiry filter lives in the query: an expired token matches
        // nothing, exactly like an unknown one.
        let row = sqlx::query_as::<_, SqliteUser>(
            r#"
            SELECT * FROM users
            WHERE password_reset_token = ?1 AND password_reset_token_expiry > ?2
            "#,
        )
        .bind(token)
        .bind(now.timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to find user by reset token");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, user: &User) -> Result<User, Error> {
        let row = sqlx::query_as::<_, SqliteUser>(
            r#"
            UPDATE users
            SET username = ?2, email = ?3, password_hash = ?4, first_name = ?5,
                last_name = ?6, profile_picture_path = ?7, last_login_date = ?8,
                failed_login_attempts = ?9, lockout_end = ?10,
                password_reset_token = ?11, password_reset_token_expiry = ?12
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(user.id.as_i64())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_picture_path)
        .bind(user.last_login_date.timestamp())
        .bind(user.failed_login_attempts)
        .bind(user.lockout_end.map(|dt| dt.timestamp()))
        .bind(&user.password_reset_token)
        .bind(
            user.password_reset_token_expiry
                .map(|dt| dt.timestamp()),
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to update user");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        row.map(Into::into)
            .ok_or(Error::Storage(StorageError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::{SqliteMigrationManager, sqlite_migrations};
    use chrono::Duration;
    use nikki_core::crypto;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");

        let manager = SqliteMigrationManager::new(pool.clone());
        manager
            .initialize()
            .await
            .expect("Failed to initialize migrations");
        manager
            .up(&sqlite_migrations())
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn new_record(username: &str, email: &str) -> NewUserRecord {
        NewUserRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: crypto::digest_password("Sup3rSecret"),
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = SqliteUserRepository::new(setup_test_db().await);

        let created = repo
            .create(new_record("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.failed_login_attempts, 0);
        assert!(created.lockout_end.is_none());

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        let by_username = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_username.id, created.id);

        let by_email = repo
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint_violation() {
        let repo = SqliteUserRepository::new(setup_test_db().await);

        repo.create(new_record("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = repo
            .create(new_record("alice", "other@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Storage(StorageError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_update_persists_lockout_state() {
        let repo = SqliteUserRepository::new(setup_test_db().await);

        let mut user = repo
            .create(new_record("alice", "alice@example.com"))
            .await
            .unwrap();

        user.failed_login_attempts = 3;
        user.lockout_end = Some(Utc::now() + Duration::minutes(15));
        repo.update(&user).await.unwrap();

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_login_attempts, 3);
        assert!(stored.lockout_end.is_some());

        user.failed_login_attempts = 0;
        user.lockout_end = None;
        repo.update(&user).await.unwrap();

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_login_attempts, 0);
        assert!(stored.lockout_end.is_none());
    }

    #[tokio::test]
    async fn test_find_by_reset_token_filters_expiry() {
        let repo = SqliteUserRepository::new(setup_test_db().await);

        let mut user = repo
            .create(new_record("alice", "alice@example.com"))
            .await
            .unwrap();
        user.password_reset_token = Some("tok_alive".to_string());
        user.password_reset_token_expiry = Some(Utc::now() + Duration::hours(1));
        repo.update(&user).await.unwrap();

        let found = repo
            .find_by_reset_token("tok_alive", Utc::now())
            .await
            .unwrap();
        assert!(found.is_some());

        // Same token string, lapsed expiry: no match.
        user.password_reset_token_expiry = Some(Utc::now() - Duration::seconds(1));
        repo.update(&user).await.unwrap();

        let found = repo
            .find_by_reset_token("tok_alive", Utc::now())
            .await
            .unwrap();
        assert!(found.is_none());

        assert!(
            repo.find_by_reset_token("tok_unknown", Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let repo = SqliteUserRepository::new(setup_test_db().await);

        let mut user = repo
            .create(new_record("alice", "alice@example.com"))
            .await
            .unwrap();
        user.id = UserId::new(999);

        let err = repo.update(&user).await.unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::NotFound)));
    }
}

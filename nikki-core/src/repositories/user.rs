use crate::{Error, User, UserId, user::NewUserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a new record and return it with its store-assigned id.
    ///
    /// The store stamps `date_created` and `last_login_date` and starts the
    /// failed-attempt counter at zero.
    async fn create(&self, user: NewUserRecord) -> Result<User, Error>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error>;

    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    /// Find the user holding `token` whose token expiry is strictly after
    /// `now`. An expired token matches nothing, exactly like an unknown one.
    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, Error>;

    /// Persist every mutable field of `user` in place. `id` and
    /// `date_created` are immutable.
    async fn update(&self, user: &User) -> Result<User, Error>;
}

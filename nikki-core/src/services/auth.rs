//! Registration and login with account lockout.
//!
//! Login drives the only state machine in the system: the failed-attempt
//! counter and the lockout window on the user record. The transitions are
//!
//! - wrong password → counter + 1; on reaching the threshold, a lockout
//!   timestamp is stamped in the same write
//! - login attempt while locked → refused outright, counter untouched
//! - correct password (not locked) → counter reset, lockout cleared,
//!   last-login stamped
//!
//! Rejection messages never distinguish "no such user" from "wrong
//! password", so usernames cannot be enumerated through the login form.

use crate::{
    Error, Outcome, UserProfile, crypto,
    repositories::UserRepository,
    user::NewUserRecord,
    validation::{validate_email, validate_password, validate_username},
};
use chrono::{Duration, Utc};
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Account lockout policy applied by [`AuthService::attempt_login`].
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// Failed attempts at which the account locks.
    pub max_failed_attempts: i32,
    /// How long a lockout lasts once applied.
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            lockout_duration: Duration::minutes(15),
        }
    }
}

/// Input for [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Service for registration and credential verification.
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    policy: LockoutPolicy,
}

impl<U: UserRepository> AuthService<U> {
    /// Create a new AuthService with the default lockout policy.
    pub fn new(users: Arc<U>) -> Self {
        Self::with_policy(users, LockoutPolicy::default())
    }

    /// Create a new AuthService with a custom lockout policy.
    pub fn with_policy(users: Arc<U>, policy: LockoutPolicy) -> Self {
        Self { users, policy }
    }

    /// Register a new account.
    ///
    /// Username and email uniqueness are enforced by existence checks here;
    /// the storage layer additionally carries unique indexes, so a
    /// concurrent duplicate insert surfaces as a constraint error rather
    /// than a second account.
    pub async fn register(&self, registration: Registration) -> Result<Outcome, Error> {
        validate_username(&registration.username)?;
        validate_email(&registration.email)?;
        validate_password(&registration.password)?;

        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Ok(Outcome::rejected("Username already exists."));
        }

        if self
            .users
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Ok(Outcome::rejected("Email already exists."));
        }

        let user = self
            .users
            .create(NewUserRecord {
                username: registration.username,
                email: registration.email,
                password_hash: crypto::digest_password(&registration.password),
                first_name: registration.first_name,
                last_name: registration.last_name,
            })
            .await?;

        tracing::info!(user_id = %user.id, "registered new user");
        Ok(Outcome::accepted("Registration successful."))
    }

    /// Verify a username/password pair, maintaining the failed-attempt
    /// counter and lockout window.
    ///
    /// On acceptance the outcome carries the sanitized [`UserProfile`];
    /// every rejection carries only a message. Each branch except
    /// unknown-username persists a write to the user record.
    pub async fn attempt_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Outcome<UserProfile>, Error> {
        let Some(mut user) = self.users.find_by_username(username).await? else {
            // Indistinguishable from a wrong password; no write happens.
            return Ok(Outcome::rejected(INVALID_CREDENTIALS));
        };

        let now = Utc::now();

        if let Some(end) = user.lockout_end.filter(|end| *end > now) {
            // The counter is never incremented while locked.
            return Ok(Outcome::rejected(format!(
                "Account is locked until {}.",
                end.format("%Y-%m-%d %H:%M:%S")
            )));
        }

        if !crypto::verify_password(password, &user.password_hash) {
            user.failed_login_attempts += 1;

            if user.failed_login_attempts >= self.policy.max_failed_attempts {
                user.lockout_end = Some(now + self.policy.lockout_duration);
                self.users.update(&user).await?;
                tracing::info!(
                    user_id = %user.id,
                    attempts = user.failed_login_attempts,
                    "account locked after repeated failed logins"
                );
                return Ok(Outcome::rejected(format!(
                    "Account locked due to too many failed login attempts. Try again in {} minutes.",
                    self.policy.lockout_duration.num_minutes()
                )));
            }

            self.users.update(&user).await?;
            return Ok(Outcome::rejected(INVALID_CREDENTIALS));
        }

        user.failed_login_attempts = 0;
        user.lockout_end = None;
        user.last_login_date = now;
        let user = self.users.update(&user).await?;

        tracing::debug!(user_id = %user.id, "login accepted");
        Ok(Outcome::accepted_with("Login successful.", user.profile()))
    }
}

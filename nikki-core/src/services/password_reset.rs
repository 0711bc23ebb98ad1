//! Password reset via single-use, time-limited tokens.
//!
//! The token and its expiry live on the user record and obey a
//! both-or-neither invariant: issuing sets both, consuming clears both in
//! the same write that stores the new password hash. A consumed token can
//! therefore never match a second time.

use crate::{
    Error, Outcome, crypto, repositories::UserRepository, validation::validate_password,
};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// The confirmation returned by [`PasswordResetService::request_reset`] for
/// existing and non-existing emails alike, so the endpoint cannot be used to
/// probe which addresses have accounts.
const RESET_CONFIRMATION: &str = "If the email exists, a password reset link has been sent.";

/// Service for issuing and consuming password-reset tokens.
pub struct PasswordResetService<U: UserRepository> {
    users: Arc<U>,
    token_ttl: Duration,
}

impl<U: UserRepository> PasswordResetService<U> {
    /// Create a new PasswordResetService with the default 1 hour token
    /// lifetime.
    pub fn new(users: Arc<U>) -> Self {
        Self::with_token_ttl(users, Duration::hours(1))
    }

    /// Create a new PasswordResetService with a custom token lifetime.
    pub fn with_token_ttl(users: Arc<U>, token_ttl: Duration) -> Self {
        Self { users, token_ttl }
    }

    /// Issue a reset token for the account behind `email`, if any.
    ///
    /// When the email matches an account, a fresh random token is stored
    /// with its expiry; otherwise nothing is written. The outcome message is
    /// identical either way. Delivering the token (email, etc.) is the
    /// caller's concern.
    pub async fn request_reset(&self, email: &str) -> Result<Outcome, Error> {
        if let Some(mut user) = self.users.find_by_email(email).await? {
            user.password_reset_token = Some(crypto::generate_reset_token());
            user.password_reset_token_expiry = Some(Utc::now() + self.token_ttl);
            self.users.update(&user).await?;
            tracing::debug!(user_id = %user.id, "issued password reset token");
        }

        Ok(Outcome::accepted(RESET_CONFIRMATION))
    }

    /// Consume a reset token and store a new password.
    ///
    /// The lookup only matches a stored token whose expiry is strictly in
    /// the future; expired and unknown tokens are rejected identically. A
    /// successful reset also clears the failed-attempt counter and any
    /// lockout, since proving control of the mailbox unlocks the account.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<Outcome, Error> {
        validate_password(new_password)?;

        let Some(mut user) = self.users.find_by_reset_token(token, Utc::now()).await? else {
            return Ok(Outcome::rejected("Invalid or expired reset token."));
        };

        user.password_hash = crypto::digest_password(new_password);
        user.password_reset_token = None;
        user.password_reset_token_expiry = None;
        user.failed_login_attempts = 0;
        user.lockout_end = None;
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "password reset completed");
        Ok(Outcome::accepted("Password reset successful."))
    }
}

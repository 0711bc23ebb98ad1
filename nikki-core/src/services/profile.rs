//! Profile management.

use crate::{
    Error, Outcome, UserId, UserProfile, repositories::UserRepository,
    validation::validate_email,
};
use std::sync::Arc;

/// Input for [`ProfileService::update_profile`]. Absent or empty fields are
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Service for reading and editing user profiles.
pub struct ProfileService<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> ProfileService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Fetch the sanitized profile for a user, if the user exists.
    pub async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>, Error> {
        Ok(self.users.find_by_id(user_id).await?.map(|u| u.profile()))
    }

    /// Apply a partial profile update.
    ///
    /// Changing the email re-checks uniqueness against every other account;
    /// keeping one's own email is not a collision.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Outcome, Error> {
        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Ok(Outcome::rejected("User not found."));
        };

        if let Some(email) = update
            .email
            .filter(|e| !e.is_empty() && *e != user.email)
        {
            validate_email(&email)?;
            let taken = self
                .users
                .find_by_email(&email)
                .await?
                .is_some_and(|other| other.id != user.id);
            if taken {
                return Ok(Outcome::rejected(
                    "Email is already in use by another account.",
                ));
            }
            user.email = email;
        }

        if let Some(first_name) = update.first_name.filter(|n| !n.is_empty()) {
            user.first_name = Some(first_name);
        }

        if let Some(last_name) = update.last_name.filter(|n| !n.is_empty()) {
            user.last_name = Some(last_name);
        }

        self.users.update(&user).await?;
        Ok(Outcome::accepted("Profile updated successfully."))
    }

    /// Store the path of an already-uploaded profile picture.
    ///
    /// The path is an opaque string to this service; where the bytes live is
    /// the caller's concern.
    pub async fn set_profile_picture(&self, user_id: UserId, path: &str) -> Result<Outcome, Error> {
        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Ok(Outcome::rejected("User not found."));
        };

        user.profile_picture_path = Some(path.to_string());
        self.users.update(&user).await?;
        Ok(Outcome::accepted("Profile picture updated successfully."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryUserRepository;
    use crate::services::auth::{AuthService, Registration};

    async fn setup() -> (ProfileService<MemoryUserRepository>, UserId, UserId) {
        let users = Arc::new(MemoryUserRepository::new());
        let auth = AuthService::new(users.clone());
        for (username, email) in [
            ("alice", "alice@example.com"),
            ("bob", "bob@example.com"),
        ] {
            auth.register(Registration {
                username: username.to_string(),
                email: email.to_string(),
                password: "Sup3rSecret".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();
        }

        let alice = users.find_by_username("alice").await.unwrap().unwrap().id;
        let bob = users.find_by_username("bob").await.unwrap().unwrap().id;
        (ProfileService::new(users), alice, bob)
    }

    #[tokio::test]
    async fn test_profile_lookup() {
        let (service, alice, _bob) = setup().await;

        let profile = service.profile(alice).await.unwrap().unwrap();
        assert_eq!(profile.username, "alice");

        assert!(service.profile(UserId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_partial_fields() {
        let (service, alice, _bob) = setup().await;

        let outcome = service
            .update_profile(
                alice,
                ProfileUpdate {
                    email: None,
                    first_name: Some("Alice".to_string()),
                    last_name: Some("Liddell".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(outcome.success);

        let profile = service.profile(alice).await.unwrap().unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Alice"));
        assert_eq!(profile.last_name.as_deref(), Some("Liddell"));
        // Untouched field keeps its value.
        assert_eq!(profile.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_email_collision() {
        let (service, alice, _bob) = setup().await;

        let outcome = service
            .update_profile(
                alice,
                ProfileUpdate {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Email is already in use by another account.");

        // Re-submitting one's own email is fine.
        let outcome = service
            .update_profile(
                alice,
                ProfileUpdate {
                    email: Some("alice@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let (service, _alice, _bob) = setup().await;

        let outcome = service
            .update_profile(UserId::new(999), ProfileUpdate::default())
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "User not found.");
    }

    #[tokio::test]
    async fn test_set_profile_picture() {
        let (service, alice, _bob) = setup().await;

        let outcome = service
            .set_profile_picture(alice, "/uploads/alice.png")
            .await
            .unwrap();
        assert!(outcome.success);

        let profile = service.profile(alice).await.unwrap().unwrap();
        assert_eq!(
            profile.profile_picture_path.as_deref(),
            Some("/uploads/alice.png")
        );

        let outcome = service
            .set_profile_picture(UserId::new(999), "/uploads/ghost.png")
            .await
            .unwrap();
        assert!(!outcome.success);
    }
}

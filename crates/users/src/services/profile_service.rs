//! Profile lookup service.
//!
//! Resolves a user id to the display profile captured as the chat
//! connect-time snapshot.

use uuid::Uuid;

use reelhub_database::{UserProfile, UserRepository};

use crate::types::errors::{UserError, UserResult};

/// Trait for profile lookups to allow generic usage
pub trait ProfileStore {
    async fn find_profile(&self, user_id: Uuid) -> UserResult<Option<UserProfile>>;
}

impl ProfileStore for UserRepository {
    async fn find_profile(&self, user_id: Uuid) -> UserResult<Option<UserProfile>> {
        self.find_profile(user_id).await.map_err(Into::into)
    }
}

/// Service for resolving user display profiles
pub struct ProfileService<R> {
    users: R,
}

impl<R> ProfileService<R>
where
    R: ProfileStore,
{
    pub fn new(users: R) -> Self {
        Self { users }
    }

    /// Fetch a user's display profile.
    pub async fn get_profile(&self, user_id: Uuid) -> UserResult<UserProfile> {
        self.users
            .find_profile(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelhub_database::UserRole;
    use std::collections::HashMap;

    struct MapProfileStore {
        profiles: HashMap<Uuid, UserProfile>,
    }

    impl ProfileStore for MapProfileStore {
        async fn find_profile(&self, user_id: Uuid) -> UserResult<Option<UserProfile>> {
            Ok(self.profiles.get(&user_id).cloned())
        }
    }

    #[tokio::test]
    async fn missing_user_maps_to_not_found() {
        let service = ProfileService::new(MapProfileStore {
            profiles: HashMap::new(),
        });
        let result = service.get_profile(Uuid::new_v4()).await;
        assert!(matches!(result, Err(UserError::UserNotFound)));
    }

    #[tokio::test]
    async fn known_user_profile_is_returned() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            avatar_url: None,
            level: 12,
            role: UserRole::Admin,
        };
        let service = ProfileService::new(MapProfileStore {
            profiles: HashMap::from([(profile.id, profile.clone())]),
        });

        let found = service.get_profile(profile.id).await.unwrap();
        assert_eq!(found.username, "alice");
        assert!(found.is_admin());
    }
}

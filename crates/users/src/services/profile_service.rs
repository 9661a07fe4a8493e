//! Profile fields and the account-level diet preferences.

use offramp_database::{
    DatabaseError, LookupKind, LookupRepository, UpdateUserPreferencesRequest, User,
    UserRepository,
};
use sqlx::SqlitePool;
use tracing::info;

use crate::types::{
    ProfilePreferences, ProfilePreferencesUpdate, ProfileUpdate, UserError, UserResult,
};

pub struct ProfileService {
    users: UserRepository,
    lookups: LookupRepository,
}

impl ProfileService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            lookups: LookupRepository::new(pool),
        }
    }

    pub async fn profile(&self, user_id: &str) -> UserResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    /// Overwrite the keys present in `update`; absent keys keep their value.
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> UserResult<()> {
        let current = self.profile(user_id).await?;

        let full_name = update.full_name.unwrap_or(current.full_name);
        let avatar_url = update.avatar_url.unwrap_or(current.avatar_url);

        self.users
            .update_profile(user_id, full_name.as_deref(), avatar_url.as_deref())
            .await
            .map_err(not_found_as_user)?;

        info!(user_id, "profile updated");
        Ok(())
    }

    pub async fn preferences(&self, user_id: &str) -> UserResult<ProfilePreferences> {
        let user = self.profile(user_id).await?;
        let cuisines = self.lookups.names_for_user(LookupKind::Cuisine, user_id).await?;
        let allergies = self.lookups.names_for_user(LookupKind::Allergy, user_id).await?;

        Ok(ProfilePreferences {
            region: user.region,
            budget_level: user.budget_level.map(|level| level.level()),
            cuisines,
            allergies,
            transition_from_diet: user.transition_from_diet,
            transition_to_diet: user.transition_to_diet,
        })
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        update: ProfilePreferencesUpdate,
    ) -> UserResult<()> {
        // Fail before touching the join tables for a deleted account.
        self.profile(user_id).await?;

        let columns = UpdateUserPreferencesRequest {
            region: update.region,
            budget_level: update.budget_level,
            transition_from_diet: update.transition_from_diet,
            transition_to_diet: update.transition_to_diet,
        };
        self.users
            .update_preferences(user_id, &columns)
            .await
            .map_err(not_found_as_user)?;

        if let Some(cuisines) = &update.cuisines {
            self.lookups
                .replace_for_user(LookupKind::Cuisine, user_id, cuisines)
                .await?;
        }
        if let Some(allergies) = &update.allergies {
            self.lookups
                .replace_for_user(LookupKind::Allergy, user_id, allergies)
                .await?;
        }

        info!(user_id, "profile preferences updated");
        Ok(())
    }
}

fn not_found_as_user(err: DatabaseError) -> UserError {
    match err {
        DatabaseError::NotFound(_) => UserError::UserNotFound,
        other => UserError::Database(other),
    }
}

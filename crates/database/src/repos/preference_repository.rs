//! Dietary goal and onboarding preference storage.

use crate::entities::{DietaryPreference, UpsertUserPreferenceRequest, UserPreference};
use crate::types::{format_timestamp, DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_PREFERENCE_SELECT: &str = "SELECT up.id, up.user_id, up.preference_id, \
     dp.name AS preference_name, dp.category AS preference_category, \
     up.baseline_nonveg_meals, up.target_goal, up.transition_period_weeks, \
     up.preferred_cuisine, up.effort_level, up.reminder_time, up.updated_at \
     FROM user_preferences up JOIN dietary_preferences dp ON dp.id = up.preference_id";

#[derive(Clone)]
pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the named goal or refresh its category.
    pub async fn upsert_dietary_preference(
        &self,
        name: &str,
        category: &str,
    ) -> DatabaseResult<DietaryPreference> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO dietary_preferences (name, category) VALUES (?, ?) \
             ON CONFLICT(name) DO UPDATE SET category = excluded.category",
        )
        .bind(name)
        .bind(category)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query("SELECT id, name, category FROM dietary_preferences WHERE name = ?")
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DietaryPreference {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
        })
    }

    /// Remove every preference row of the user except the one for `keep_preference_id`.
    pub async fn delete_other_preferences(
        &self,
        user_id: &str,
        keep_preference_id: i64,
    ) -> DatabaseResult<u64> {
        let result =
            sqlx::query("DELETE FROM user_preferences WHERE user_id = ? AND preference_id != ?")
                .bind(user_id)
                .bind(keep_preference_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Insert or update the user's row for the goal and read it back in the same transaction.
    pub async fn upsert_user_preference(
        &self,
        request: &UpsertUserPreferenceRequest,
    ) -> DatabaseResult<UserPreference> {
        let now = format_timestamp(Utc::now());
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO user_preferences (user_id, preference_id, baseline_nonveg_meals, target_goal, \
             transition_period_weeks, preferred_cuisine, effort_level, reminder_time, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(user_id, preference_id) DO UPDATE SET \
             baseline_nonveg_meals = excluded.baseline_nonveg_meals, \
             target_goal = excluded.target_goal, \
             transition_period_weeks = excluded.transition_period_weeks, \
             preferred_cuisine = excluded.preferred_cuisine, \
             effort_level = excluded.effort_level, \
             reminder_time = excluded.reminder_time, \
             updated_at = excluded.updated_at",
        )
        .bind(&request.user_id)
        .bind(request.preference_id)
        .bind(request.baseline_nonveg_meals)
        .bind(&request.target_goal)
        .bind(request.transition_period_weeks)
        .bind(&request.preferred_cuisine)
        .bind(&request.effort_level)
        .bind(&request.reminder_time)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!(
            "{USER_PREFERENCE_SELECT} WHERE up.user_id = ? AND up.preference_id = ?"
        ))
        .bind(&request.user_id)
        .bind(request.preference_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        let row = row.ok_or_else(|| {
            DatabaseError::NotFound(format!(
                "user preference {}/{}",
                request.user_id, request.preference_id
            ))
        })?;
        map_user_preference(&row)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserPreference>> {
        let row = sqlx::query(&format!("{USER_PREFERENCE_SELECT} WHERE up.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| map_user_preference(&row)).transpose()
    }

    /// Most recently updated preference row of the user.
    pub async fn latest_for_user(&self, user_id: &str) -> DatabaseResult<Option<UserPreference>> {
        let row = sqlx::query(&format!(
            "{USER_PREFERENCE_SELECT} WHERE up.user_id = ? ORDER BY up.updated_at DESC, up.id DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| map_user_preference(&row)).transpose()
    }

    pub async fn list_for_user(&self, user_id: &str) -> DatabaseResult<Vec<UserPreference>> {
        let rows = sqlx::query(&format!(
            "{USER_PREFERENCE_SELECT} WHERE up.user_id = ? ORDER BY up.updated_at DESC, up.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_user_preference).collect()
    }

    /// Every preference row that carries a reminder time.
    pub async fn list_with_reminders(&self) -> DatabaseResult<Vec<UserPreference>> {
        let rows = sqlx::query(&format!(
            "{USER_PREFERENCE_SELECT} WHERE up.reminder_time IS NOT NULL AND up.reminder_time != '' \
             ORDER BY up.user_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_user_preference).collect()
    }
}

fn map_user_preference(row: &SqliteRow) -> DatabaseResult<UserPreference> {
    Ok(UserPreference {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        preference_id: row.try_get("preference_id")?,
        preference_name: row.try_get("preference_name")?,
        preference_category: row.try_get("preference_category")?,
        baseline_nonveg_meals: row.try_get("baseline_nonveg_meals")?,
        target_goal: row.try_get("target_goal")?,
        transition_period_weeks: row.try_get("transition_period_weeks")?,
        preferred_cuisine: row.try_get("preferred_cuisine")?,
        effort_level: row.try_get("effort_level")?,
        reminder_time: row.try_get("reminder_time")?,
        updated_at: row.try_get("updated_at")?,
    })
}

//! Per-user transition progress.

use crate::entities::UserProgress;
use crate::types::{format_timestamp, DatabaseResult};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

pub(crate) const PROGRESS_SELECT: &str =
    "SELECT user_id, total_meals_replaced, current_week, transition_complete, updated_at \
     FROM user_progress";

#[derive(Clone)]
pub struct ProgressRepository {
    pool: SqlitePool,
}

impl ProgressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: &str) -> DatabaseResult<Option<UserProgress>> {
        let row = sqlx::query(&format!("{PROGRESS_SELECT} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| map_progress(&row)).transpose()
    }

    /// Start the user over at week 1 with nothing replaced.
    pub async fn reset(&self, user_id: &str) -> DatabaseResult<UserProgress> {
        let now = format_timestamp(Utc::now());
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO user_progress (user_id, total_meals_replaced, current_week, transition_complete, updated_at) \
             VALUES (?, 0, 1, 0, ?) \
             ON CONFLICT(user_id) DO UPDATE SET total_meals_replaced = 0, current_week = 1, \
             transition_complete = 0, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!("{PROGRESS_SELECT} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        map_progress(&row)
    }

    pub async fn set_transition_complete(
        &self,
        user_id: &str,
        complete: bool,
    ) -> DatabaseResult<()> {
        sqlx::query(
            "UPDATE user_progress SET transition_complete = ?, updated_at = ? WHERE user_id = ?",
        )
        .bind(complete)
        .bind(format_timestamp(Utc::now()))
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub(crate) fn map_progress(row: &SqliteRow) -> DatabaseResult<UserProgress> {
    Ok(UserProgress {
        user_id: row.try_get("user_id")?,
        total_meals_replaced: row.try_get("total_meals_replaced")?,
        current_week: row.try_get("current_week")?,
        transition_complete: row.try_get("transition_complete")?,
        updated_at: row.try_get("updated_at")?,
    })
}

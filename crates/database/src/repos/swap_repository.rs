//! Logged meal swaps.

use crate::entities::{CreateSwapRequest, UserProgress, UserSwap};
use crate::repos::progress_repository::{map_progress, PROGRESS_SELECT};
use crate::types::{format_timestamp, DatabaseResult};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const SWAP_COLUMNS: &str =
    "id, user_id, from_dish, to_dish, from_category, to_category, rating, image_url, created_at";

#[derive(Clone)]
pub struct SwapRepository {
    pool: SqlitePool,
}

impl SwapRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Latest swap with the same dishes logged at or after `since`.
    pub async fn find_recent_duplicate(
        &self,
        user_id: &str,
        from_dish: &str,
        to_dish: &str,
        since: DateTime<Utc>,
    ) -> DatabaseResult<Option<UserSwap>> {
        let row = sqlx::query(&format!(
            "SELECT {SWAP_COLUMNS} FROM user_swaps \
             WHERE user_id = ? AND from_dish = ? AND to_dish = ? AND created_at >= ? \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(user_id)
        .bind(from_dish)
        .bind(to_dish)
        .bind(format_timestamp(since))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| map_swap(&row)).transpose()
    }

    /// Insert the swap and bump the user's meal counter in one transaction.
    ///
    /// A missing progress row is created at week 1.
    pub async fn record_swap(
        &self,
        request: &CreateSwapRequest,
        at: DateTime<Utc>,
    ) -> DatabaseResult<(UserSwap, UserProgress)> {
        let created_at = format_timestamp(at);
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO user_swaps (user_id, from_dish, to_dish, from_category, to_category, rating, image_url, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.user_id)
        .bind(&request.from_dish)
        .bind(&request.to_dish)
        .bind(&request.from_category)
        .bind(&request.to_category)
        .bind(request.rating)
        .bind(&request.image_url)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        let swap_row = sqlx::query(&format!("SELECT {SWAP_COLUMNS} FROM user_swaps WHERE id = ?"))
            .bind(inserted.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;
        let swap = map_swap(&swap_row)?;

        sqlx::query(
            "INSERT INTO user_progress (user_id, total_meals_replaced, current_week, transition_complete, updated_at) \
             VALUES (?, 1, 1, 0, ?) \
             ON CONFLICT(user_id) DO UPDATE SET \
             total_meals_replaced = user_progress.total_meals_replaced + 1, \
             updated_at = excluded.updated_at",
        )
        .bind(&request.user_id)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        let progress_row = sqlx::query(&format!("{PROGRESS_SELECT} WHERE user_id = ?"))
            .bind(&request.user_id)
            .fetch_one(&mut *tx)
            .await?;
        let progress = map_progress(&progress_row)?;

        tx.commit().await?;
        Ok((swap, progress))
    }

    /// Newest first.
    pub async fn recent(&self, user_id: &str, limit: i64) -> DatabaseResult<Vec<UserSwap>> {
        let rows = sqlx::query(&format!(
            "SELECT {SWAP_COLUMNS} FROM user_swaps WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_swap).collect()
    }
}

fn map_swap(row: &SqliteRow) -> DatabaseResult<UserSwap> {
    Ok(UserSwap {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        from_dish: row.try_get("from_dish")?,
        to_dish: row.try_get("to_dish")?,
        from_category: row.try_get("from_category")?,
        to_category: row.try_get("to_category")?,
        rating: row.try_get("rating")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

//! Weekly plan and daily swap storage.

use crate::entities::{CreateWeeklyPlanRequest, DailySwap, WeeklyPlan};
use crate::types::DatabaseResult;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

#[derive(Clone)]
pub struct PlanRepository {
    pool: SqlitePool,
}

impl PlanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Swap the user's whole plan for `weeks` in one transaction.
    pub async fn replace_plan(
        &self,
        user_id: &str,
        weeks: &[CreateWeeklyPlanRequest],
    ) -> DatabaseResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM weekly_plans WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for week in weeks {
            let swap_days = serde_json::to_string(&week.swap_days)?;
            sqlx::query(
                "INSERT INTO weekly_plans (user_id, week_number, meals_to_replace, swap_days) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(week.week_number)
            .bind(week.meals_to_replace)
            .bind(swap_days)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_for_user(&self, user_id: &str) -> DatabaseResult<Vec<WeeklyPlan>> {
        let rows = sqlx::query(
            "SELECT user_id, week_number, meals_to_replace, swap_days FROM weekly_plans \
             WHERE user_id = ? ORDER BY week_number ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_weekly_plan).collect()
    }

    pub async fn find_week(
        &self,
        user_id: &str,
        week_number: i64,
    ) -> DatabaseResult<Option<WeeklyPlan>> {
        let row = sqlx::query(
            "SELECT user_id, week_number, meals_to_replace, swap_days FROM weekly_plans \
             WHERE user_id = ? AND week_number = ?",
        )
        .bind(user_id)
        .bind(week_number)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| map_weekly_plan(&row)).transpose()
    }

    /// Record that `swap_date` (YYYY-MM-DD) is a pending swap day for the user.
    pub async fn upsert_daily_swap(
        &self,
        user_id: &str,
        swap_date: &str,
        week_number: i64,
    ) -> DatabaseResult<DailySwap> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO daily_swaps (user_id, swap_date, week_number, completed) VALUES (?, ?, ?, 0) \
             ON CONFLICT(user_id, swap_date) DO UPDATE SET \
             week_number = excluded.week_number, completed = excluded.completed",
        )
        .bind(user_id)
        .bind(swap_date)
        .bind(week_number)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            "SELECT user_id, swap_date, week_number, completed FROM daily_swaps \
             WHERE user_id = ? AND swap_date = ?",
        )
        .bind(user_id)
        .bind(swap_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        map_daily_swap(&row)
    }

    pub async fn list_daily_swaps(&self, user_id: &str) -> DatabaseResult<Vec<DailySwap>> {
        let rows = sqlx::query(
            "SELECT user_id, swap_date, week_number, completed FROM daily_swaps \
             WHERE user_id = ? ORDER BY swap_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_daily_swap).collect()
    }
}

fn map_weekly_plan(row: &SqliteRow) -> DatabaseResult<WeeklyPlan> {
    let swap_days: String = row.try_get("swap_days")?;
    Ok(WeeklyPlan {
        user_id: row.try_get("user_id")?,
        week_number: row.try_get("week_number")?,
        meals_to_replace: row.try_get("meals_to_replace")?,
        swap_days: serde_json::from_str(&swap_days)?,
    })
}

fn map_daily_swap(row: &SqliteRow) -> DatabaseResult<DailySwap> {
    Ok(DailySwap {
        user_id: row.try_get("user_id")?,
        swap_date: row.try_get("swap_date")?,
        week_number: row.try_get("week_number")?,
        completed: row.try_get("completed")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_user, test_pool};

    fn week(number: i64, meals: i64, days: &[&str]) -> CreateWeeklyPlanRequest {
        CreateWeeklyPlanRequest {
            week_number: number,
            meals_to_replace: meals,
            swap_days: days.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn replace_plan_overwrites_previous_weeks() {
        let (pool, _dir) = test_pool().await;
        let user = create_user(&pool, "plan@example.com").await;
        let repo = PlanRepository::new(pool);

        repo.replace_plan(
            &user.id,
            &[week(1, 1, &["monday"]), week(2, 2, &["monday", "tuesday"]), week(3, 3, &["monday", "tuesday", "wednesday"])],
        )
        .await
        .unwrap();
        repo.replace_plan(&user.id, &[week(1, 2, &["monday", "tuesday"]), week(2, 4, &["monday", "tuesday", "wednesday", "thursday"])])
            .await
            .unwrap();

        let plan = repo.list_for_user(&user.id).await.unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].week_number, 1);
        assert_eq!(plan[1].meals_to_replace, 4);
        assert_eq!(plan[1].swap_days.len(), 4);

        let second = repo.find_week(&user.id, 2).await.unwrap().unwrap();
        assert_eq!(second.swap_days[3], "thursday");
        assert!(repo.find_week(&user.id, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn daily_swap_is_unique_per_date() {
        let (pool, _dir) = test_pool().await;
        let user = create_user(&pool, "daily@example.com").await;
        let repo = PlanRepository::new(pool);

        repo.upsert_daily_swap(&user.id, "2024-03-11", 1).await.unwrap();
        let updated = repo.upsert_daily_swap(&user.id, "2024-03-11", 2).await.unwrap();
        assert_eq!(updated.week_number, 2);
        assert!(!updated.completed);

        repo.upsert_daily_swap(&user.id, "2024-03-12", 2).await.unwrap();
        let all = repo.list_daily_swaps(&user.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].swap_date, "2024-03-11");
    }
}

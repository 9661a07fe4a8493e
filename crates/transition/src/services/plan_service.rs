use offramp_database::PlanRepository;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::TransitionResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedWeek {
    pub week_number: i64,
    pub meals_to_replace: i64,
    pub swap_days: Vec<String>,
}

pub struct PlanService {
    plans: PlanRepository,
}

impl PlanService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            plans: PlanRepository::new(pool),
        }
    }

    /// The stored plan, ordered by week number.
    pub async fn weekly_plan(&self, user_id: &str) -> TransitionResult<Vec<PlannedWeek>> {
        let weeks = self.plans.list_for_user(user_id).await?;
        Ok(weeks
            .into_iter()
            .map(|week| PlannedWeek {
                week_number: week.week_number,
                meals_to_replace: week.meals_to_replace,
                swap_days: week.swap_days,
            })
            .collect())
    }
}

//! Dashboard progress and impact figures.

use offramp_database::{PreferenceRepository, ProgressRepository};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{TransitionError, TransitionResult};
use crate::impact::{completion_percentage, ImpactMetrics};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardProgress {
    pub total_meals_replaced: i64,
    pub current_week: i64,
    pub total_weeks: i64,
    pub baseline_nonveg_meals: i64,
    pub transition_complete: bool,
    pub completion_percentage: i64,
}

pub struct ProgressService {
    preferences: PreferenceRepository,
    progress: ProgressRepository,
}

impl ProgressService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            preferences: PreferenceRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool),
        }
    }

    pub async fn dashboard(&self, user_id: &str) -> TransitionResult<DashboardProgress> {
        let preference = self
            .preferences
            .latest_for_user(user_id)
            .await?
            .ok_or_else(|| {
                TransitionError::NotFound(
                    "No preferences found. Complete onboarding first.".to_string(),
                )
            })?;
        let progress = self.progress.find(user_id).await?;

        let baseline = preference.baseline_nonveg_meals.unwrap_or(1);
        let total_weeks = preference.transition_period_weeks.unwrap_or(1);
        let total_meals_replaced = progress
            .as_ref()
            .map(|p| p.total_meals_replaced)
            .unwrap_or(0);
        let current_week = progress.as_ref().map(|p| p.current_week).unwrap_or(1);

        let completion = completion_percentage(total_meals_replaced, baseline, total_weeks);
        let transition_complete = completion >= 100;

        if let Some(stored) = &progress {
            if stored.transition_complete != transition_complete {
                debug!(user_id, transition_complete, "updating stored completion flag");
                self.progress
                    .set_transition_complete(user_id, transition_complete)
                    .await?;
            }
        }

        Ok(DashboardProgress {
            total_meals_replaced,
            current_week,
            total_weeks,
            baseline_nonveg_meals: baseline,
            transition_complete,
            completion_percentage: completion,
        })
    }

    pub async fn impact(&self, user_id: &str) -> TransitionResult<ImpactMetrics> {
        let meals = self
            .progress
            .find(user_id)
            .await?
            .map(|p| p.total_meals_replaced)
            .unwrap_or(0);
        Ok(ImpactMetrics::for_meals(meals))
    }
}

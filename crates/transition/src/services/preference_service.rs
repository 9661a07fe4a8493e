//! Onboarding answers and the plan derived from them.

use offramp_database::{
    CreateWeeklyPlanRequest, PlanRepository, PreferenceRepository, ProgressRepository,
    UpsertUserPreferenceRequest, UserPreference,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{TransitionError, TransitionResult};
use crate::input::{optional_positive_int, optional_text};
use crate::plan::{calculate_weekly_transition, generate_swap_days, WeekPlan};

pub const DEFAULT_PREFERENCE_CATEGORY: &str = "target_goal";
pub const DEFAULT_BASELINE_MEALS: u32 = 1;
pub const DEFAULT_TRANSITION_WEEKS: u32 = 12;
/// Longest plan that gets materialised, ten years of weeks.
pub const MAX_TRANSITION_WEEKS: u32 = 520;

/// Raw onboarding payload. Every field is optional and loosely typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePreferencesInput {
    #[serde(default)]
    pub preference_name: Value,
    #[serde(default)]
    pub preference_category: Value,
    #[serde(default)]
    pub target_goal: Value,
    #[serde(default)]
    pub transition_period_weeks: Value,
    #[serde(default)]
    pub baseline_nonveg_meals: Value,
    #[serde(default)]
    pub preferred_cuisine: Value,
    #[serde(default)]
    pub effort_level: Value,
    #[serde(default)]
    pub reminder_time: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPreferences {
    pub success: bool,
    pub plan: Vec<WeekPlan>,
}

pub struct PreferenceService {
    preferences: PreferenceRepository,
    plans: PlanRepository,
    progress: ProgressRepository,
}

impl PreferenceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            preferences: PreferenceRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool),
        }
    }

    /// Store the user's goal, rebuild their weekly plan and restart progress.
    ///
    /// A user keeps a single preference row: rows for other goals are removed.
    pub async fn save(
        &self,
        user_id: &str,
        input: &SavePreferencesInput,
    ) -> TransitionResult<SavedPreferences> {
        let preference_name = optional_text(&input.preference_name)
            .or_else(|| optional_text(&input.target_goal))
            .ok_or_else(|| {
                TransitionError::InvalidInput(
                    "Missing preference_name (or target_goal).".to_string(),
                )
            })?;
        let category = optional_text(&input.preference_category)
            .unwrap_or_else(|| DEFAULT_PREFERENCE_CATEGORY.to_string());
        let transition_weeks = optional_positive_int(&input.transition_period_weeks);
        let baseline_meals = optional_positive_int(&input.baseline_nonveg_meals);

        let goal = self
            .preferences
            .upsert_dietary_preference(&preference_name, &category)
            .await?;

        self.preferences
            .delete_other_preferences(user_id, goal.id)
            .await?;

        self.preferences
            .upsert_user_preference(&UpsertUserPreferenceRequest {
                user_id: user_id.to_string(),
                preference_id: goal.id,
                baseline_nonveg_meals: baseline_meals,
                target_goal: optional_text(&input.target_goal),
                transition_period_weeks: transition_weeks,
                preferred_cuisine: optional_text(&input.preferred_cuisine),
                effort_level: optional_text(&input.effort_level),
                reminder_time: optional_text(&input.reminder_time),
            })
            .await?;

        let plan = calculate_weekly_transition(
            clamp_u32(baseline_meals).unwrap_or(DEFAULT_BASELINE_MEALS),
            clamp_u32(transition_weeks)
                .unwrap_or(DEFAULT_TRANSITION_WEEKS)
                .min(MAX_TRANSITION_WEEKS),
        );

        let rows: Vec<CreateWeeklyPlanRequest> = plan
            .iter()
            .map(|week| CreateWeeklyPlanRequest {
                week_number: i64::from(week.week_number),
                meals_to_replace: i64::from(week.meals_to_replace),
                swap_days: generate_swap_days(week.meals_to_replace)
                    .iter()
                    .map(|day| day.as_str().to_string())
                    .collect(),
            })
            .collect();
        self.plans.replace_plan(user_id, &rows).await?;

        self.progress.reset(user_id).await?;

        info!(
            user_id,
            preference = %preference_name,
            weeks = plan.len(),
            "saved transition preferences"
        );

        Ok(SavedPreferences {
            success: true,
            plan,
        })
    }

    pub async fn latest(&self, user_id: &str) -> TransitionResult<Option<UserPreference>> {
        Ok(self.preferences.latest_for_user(user_id).await?)
    }
}

// Week counts beyond u32 are not meaningful plans; saturate instead of failing.
fn clamp_u32(value: Option<i64>) -> Option<u32> {
    value.map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

//! Onboarding preference entities

use serde::{Deserialize, Serialize};

/// Named diet goal shared between users, e.g. "Flexitarian".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietaryPreference {
    pub id: i64,
    pub name: String,
    pub category: String,
}

/// A user's onboarding answers joined with the goal they picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub id: i64,
    pub user_id: String,
    pub preference_id: i64,
    pub preference_name: String,
    pub preference_category: String,
    pub baseline_nonveg_meals: Option<i64>,
    pub target_goal: Option<String>,
    pub transition_period_weeks: Option<i64>,
    pub preferred_cuisine: Option<String>,
    pub effort_level: Option<String>,
    pub reminder_time: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertUserPreferenceRequest {
    pub user_id: String,
    pub preference_id: i64,
    pub baseline_nonveg_meals: Option<i64>,
    pub target_goal: Option<String>,
    pub transition_period_weeks: Option<i64>,
    pub preferred_cuisine: Option<String>,
    pub effort_level: Option<String>,
    pub reminder_time: Option<String>,
}

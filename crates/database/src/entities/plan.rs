//! Weekly plan and daily swap entities

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub user_id: String,
    pub week_number: i64,
    pub meals_to_replace: i64,
    pub swap_days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWeeklyPlanRequest {
    pub week_number: i64,
    pub meals_to_replace: i64,
    pub swap_days: Vec<String>,
}

/// A day on which the reminder sweep asked the user to make a swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySwap {
    pub user_id: String,
    pub swap_date: String,
    pub week_number: i64,
    pub completed: bool,
}

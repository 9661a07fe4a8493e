//! Transition progress entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    pub total_meals_replaced: i64,
    pub current_week: i64,
    pub transition_complete: bool,
    pub updated_at: String,
}

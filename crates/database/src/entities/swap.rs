//! Logged meal swaps

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSwap {
    pub id: i64,
    pub user_id: String,
    pub from_dish: String,
    pub to_dish: String,
    pub from_category: Option<String>,
    pub to_category: Option<String>,
    pub rating: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSwapRequest {
    pub user_id: String,
    pub from_dish: String,
    pub to_dish: String,
    pub from_category: Option<String>,
    pub to_category: Option<String>,
    pub rating: Option<i64>,
    pub image_url: Option<String>,
}

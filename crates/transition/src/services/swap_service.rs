//! Logging swaps and listing the recent ones.

use chrono::{DateTime, Duration, Utc};
use offramp_database::{CreateSwapRequest, ProgressRepository, SwapRepository, UserSwap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{TransitionError, TransitionResult};
use crate::input::{optional_rating, optional_text};

/// The same swap logged twice within this window counts once.
pub const DEDUPE_WINDOW_SECONDS: i64 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSwapInput {
    #[serde(default)]
    pub from_dish: Value,
    #[serde(default)]
    pub to_dish: Value,
    #[serde(default)]
    pub from_category: Value,
    #[serde(default)]
    pub to_category: Value,
    #[serde(default)]
    pub rating: Value,
    #[serde(default)]
    pub image_url: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSwapOutcome {
    pub ok: bool,
    pub total_meals_replaced: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSwap {
    pub id: i64,
    pub from_dish: String,
    pub to_dish: String,
    pub from_category: Option<String>,
    pub to_category: Option<String>,
    pub rating: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<UserSwap> for RecentSwap {
    fn from(swap: UserSwap) -> Self {
        Self {
            id: swap.id,
            from_dish: swap.from_dish,
            to_dish: swap.to_dish,
            from_category: swap.from_category,
            to_category: swap.to_category,
            rating: swap.rating,
            image_url: swap.image_url,
            created_at: swap.created_at,
        }
    }
}

pub struct SwapService {
    swaps: SwapRepository,
    progress: ProgressRepository,
}

impl SwapService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            swaps: SwapRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool),
        }
    }

    pub async fn record(
        &self,
        user_id: &str,
        input: &RecordSwapInput,
    ) -> TransitionResult<RecordSwapOutcome> {
        self.record_at(user_id, input, Utc::now()).await
    }

    /// Log a swap as of `now` and bump the meal counter, unless it repeats one
    /// logged inside the dedupe window.
    pub async fn record_at(
        &self,
        user_id: &str,
        input: &RecordSwapInput,
        now: DateTime<Utc>,
    ) -> TransitionResult<RecordSwapOutcome> {
        let (Some(from_dish), Some(to_dish)) =
            (optional_text(&input.from_dish), optional_text(&input.to_dish))
        else {
            return Err(TransitionError::InvalidInput(
                "fromDish and toDish are required".to_string(),
            ));
        };

        let since = now - Duration::seconds(DEDUPE_WINDOW_SECONDS);
        if self
            .swaps
            .find_recent_duplicate(user_id, &from_dish, &to_dish, since)
            .await?
            .is_some()
        {
            let total = self
                .progress
                .find(user_id)
                .await?
                .map(|p| p.total_meals_replaced)
                .unwrap_or(0);
            debug!(user_id, %from_dish, %to_dish, "ignoring duplicate swap");
            return Ok(RecordSwapOutcome {
                ok: true,
                total_meals_replaced: total,
            });
        }

        let request = CreateSwapRequest {
            user_id: user_id.to_string(),
            from_dish,
            to_dish,
            from_category: optional_text(&input.from_category),
            to_category: optional_text(&input.to_category),
            rating: optional_rating(&input.rating),
            image_url: optional_text(&input.image_url),
        };
        let (swap, progress) = self.swaps.record_swap(&request, now).await?;

        info!(
            user_id,
            swap_id = swap.id,
            total = progress.total_meals_replaced,
            "recorded meal swap"
        );

        Ok(RecordSwapOutcome {
            ok: true,
            total_meals_replaced: progress.total_meals_replaced,
        })
    }

    /// Newest swaps first; `limit` is expected to be already clamped.
    pub async fn recent(&self, user_id: &str, limit: i64) -> TransitionResult<Vec<RecentSwap>> {
        let swaps = self.swaps.recent(user_id, limit).await?;
        Ok(swaps.into_iter().map(RecentSwap::from).collect())
    }
}

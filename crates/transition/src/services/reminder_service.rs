//! Daily swap reminders, driven by an external scheduler once a minute.

use chrono::{DateTime, Utc};
use offramp_database::{PlanRepository, PreferenceRepository, ProgressRepository};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::TransitionResult;
use crate::plan::DayOfWeek;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderSweep {
    /// UTC `HH:MM` the sweep matched reminder times against.
    pub checked_at: String,
    pub day: DayOfWeek,
    pub triggered_count: usize,
    pub triggered_users: Vec<String>,
}

pub struct ReminderService {
    preferences: PreferenceRepository,
    plans: PlanRepository,
    progress: ProgressRepository,
}

impl ReminderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            preferences: PreferenceRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool),
        }
    }

    /// Queue today's swap for every user whose reminder time is now and whose
    /// current week schedules a swap today.
    pub async fn sweep(&self, now: DateTime<Utc>) -> TransitionResult<ReminderSweep> {
        let checked_at = now.format("%H:%M").to_string();
        let today = DayOfWeek::from_date(now.date_naive());
        let swap_date = now.format("%Y-%m-%d").to_string();

        let mut triggered_users = Vec::new();

        for preference in self.preferences.list_with_reminders().await? {
            let Some(reminder_time) = preference.reminder_time.as_deref() else {
                continue;
            };
            if reminder_prefix(reminder_time) != checked_at {
                continue;
            }

            let current_week = self
                .progress
                .find(&preference.user_id)
                .await?
                .map(|p| p.current_week)
                .unwrap_or(1);

            let swap_days = self
                .plans
                .find_week(&preference.user_id, current_week)
                .await?
                .map(|week| week.swap_days)
                .unwrap_or_default();

            if !swap_days.iter().any(|day| day == today.as_str()) {
                continue;
            }

            match self
                .plans
                .upsert_daily_swap(&preference.user_id, &swap_date, current_week)
                .await
            {
                Ok(_) => triggered_users.push(preference.user_id.clone()),
                Err(err) => {
                    warn!(user_id = %preference.user_id, error = %err, "failed to queue daily swap");
                }
            }
        }

        info!(
            checked_at = %checked_at,
            day = %today,
            triggered = triggered_users.len(),
            "reminder sweep finished"
        );

        Ok(ReminderSweep {
            checked_at,
            day: today,
            triggered_count: triggered_users.len(),
            triggered_users,
        })
    }
}

/// First five characters (`HH:MM`) of a stored reminder time.
fn reminder_prefix(reminder_time: &str) -> &str {
    match reminder_time.char_indices().nth(5) {
        Some((index, _)) => &reminder_time[..index],
        None => reminder_time,
    }
}

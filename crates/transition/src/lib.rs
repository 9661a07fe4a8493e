//! Diet transition planning.
//!
//! The pure half ([`plan`], [`impact`]) turns a weekly non-veg meal baseline
//! into a linear ramp of meals to replace. The [`services`] persist that plan
//! and track swaps, progress and daily reminders for each user.

pub mod error;
pub mod impact;
pub mod input;
pub mod plan;
pub mod services;

pub use error::{TransitionError, TransitionResult};
pub use impact::{completion_percentage, ImpactMetrics};
pub use plan::{
    calculate_weekly_transition, generate_swap_days, today_day_name, DayOfWeek, WeekPlan,
};
pub use services::{
    DashboardProgress, PlanService, PlannedWeek, PreferenceService, ProgressService, RecentSwap,
    RecordSwapInput, RecordSwapOutcome, ReminderService, ReminderSweep, SavePreferencesInput,
    SavedPreferences, SwapService,
};

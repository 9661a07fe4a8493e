//! Database-backed transition services.

pub mod plan_service;
pub mod preference_service;
pub mod progress_service;
pub mod reminder_service;
pub mod swap_service;

pub use plan_service::{PlanService, PlannedWeek};
pub use preference_service::{PreferenceService, SavePreferencesInput, SavedPreferences};
pub use progress_service::{DashboardProgress, ProgressService};
pub use reminder_service::{ReminderService, ReminderSweep};
pub use swap_service::{RecentSwap, RecordSwapInput, RecordSwapOutcome, SwapService};

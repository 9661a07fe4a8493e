//! Domain entities for the database layer

pub mod lookup;
pub mod plan;
pub mod preference;
pub mod progress;
pub mod swap;
pub mod user;

pub use lookup::LookupKind;
pub use plan::{CreateWeeklyPlanRequest, DailySwap, WeeklyPlan};
pub use preference::{DietaryPreference, UpsertUserPreferenceRequest, UserPreference};
pub use progress::UserProgress;
pub use swap::{CreateSwapRequest, UserSwap};
pub use user::{BudgetLevel, CreateUserRequest, UpdateUserPreferencesRequest, User};

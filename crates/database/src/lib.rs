//! OffRamp Database Crate
//!
//! Connection management, embedded migrations and the repositories behind
//! accounts, onboarding preferences, weekly plans, progress and swaps.

use offramp_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{
    LookupRepository, PlanRepository, PreferenceRepository, ProgressRepository, SwapRepository,
    UserRepository,
};

pub use entities::{
    BudgetLevel, CreateSwapRequest, CreateUserRequest, CreateWeeklyPlanRequest, DailySwap,
    DietaryPreference, LookupKind, UpdateUserPreferencesRequest, UpsertUserPreferenceRequest,
    User, UserPreference, UserProgress, UserSwap, WeeklyPlan,
};

pub use types::{format_timestamp, DatabaseError, DatabaseResult};

pub use sqlx::Pool;

/// Connect and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

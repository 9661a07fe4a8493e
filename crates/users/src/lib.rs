//! # OffRamp Users Crate
//!
//! Accounts, session tokens and the profile preferences attached to a user.
//!
//! ## Architecture
//!
//! - **Services**: registration, login, session lookup and profile editing
//! - **Types**: lenient request parsing, response bodies and [`UserError`]
//! - **Utils**: password hashing, JWT handling and input validation

pub mod services;
pub mod types;
pub mod utils;

pub use offramp_database::{BudgetLevel, User};

pub use services::{AuthService, ProfileService};
pub use types::{
    AccountSummary, LoginInput, LoginOutcome, ProfilePreferences, ProfilePreferencesUpdate,
    ProfileUpdate, RegisterInput, RegisteredAccount, SessionUser, UserError, UserResult,
};
pub use utils::{Claims, JwtManager};

//! Response bodies for the account endpoints.

use offramp_database::User;
use serde::Serialize;

/// The user fields echoed after registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

/// The signed-in user as returned by login and session lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub budget_level: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            city: user.city.clone(),
            region: user.region.clone(),
            budget_level: user.budget_level.map(|level| level.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub user: AccountSummary,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: SessionUser,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePreferences {
    pub region: Option<String>,
    /// 1 (low) to 3 (high).
    pub budget_level: Option<u8>,
    pub cuisines: Vec<String>,
    pub allergies: Vec<String>,
    pub transition_from_diet: Option<String>,
    pub transition_to_diet: Option<String>,
}

//! User entity definitions

use serde::{Deserialize, Serialize};

/// Account row, including the profile and diet-transition fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub budget_level: Option<BudgetLevel>,
    pub transition_from_diet: Option<String>,
    pub transition_to_diet: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub phone: String,
    pub city: String,
    pub region: Option<String>,
}

/// Partial update of the profile preference columns.
///
/// `None` leaves a column untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserPreferencesRequest {
    pub region: Option<Option<String>>,
    pub budget_level: Option<BudgetLevel>,
    pub transition_from_diet: Option<Option<String>>,
    pub transition_to_diet: Option<Option<String>>,
}

impl UpdateUserPreferencesRequest {
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.budget_level.is_none()
            && self.transition_from_diet.is_none()
            && self.transition_to_diet.is_none()
    }
}

/// Spending tier, exposed to clients as 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Low,
    Medium,
    High,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "low",
            BudgetLevel::Medium => "medium",
            BudgetLevel::High => "high",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "low" => Some(BudgetLevel::Low),
            "medium" => Some(BudgetLevel::Medium),
            "high" => Some(BudgetLevel::High),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            BudgetLevel::Low => 1,
            BudgetLevel::Medium => 2,
            BudgetLevel::High => 3,
        }
    }

    /// Clamp an arbitrary number onto the three tiers.
    pub fn from_number(value: f64) -> Self {
        if !value.is_finite() || value <= 1.0 {
            BudgetLevel::Low
        } else if value >= 3.0 {
            BudgetLevel::High
        } else {
            BudgetLevel::Medium
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_level_clamps_numbers() {
        assert_eq!(BudgetLevel::from_number(-4.0), BudgetLevel::Low);
        assert_eq!(BudgetLevel::from_number(1.0), BudgetLevel::Low);
        assert_eq!(BudgetLevel::from_number(1.5), BudgetLevel::Medium);
        assert_eq!(BudgetLevel::from_number(2.0), BudgetLevel::Medium);
        assert_eq!(BudgetLevel::from_number(3.0), BudgetLevel::High);
        assert_eq!(BudgetLevel::from_number(12.0), BudgetLevel::High);
        assert_eq!(BudgetLevel::from_number(f64::NAN), BudgetLevel::Low);
    }

    #[test]
    fn budget_level_round_trips_db_names() {
        for level in [BudgetLevel::Low, BudgetLevel::Medium, BudgetLevel::High] {
            assert_eq!(BudgetLevel::from_db(level.as_str()), Some(level));
        }
        assert_eq!(BudgetLevel::from_db("premium"), None);
    }
}

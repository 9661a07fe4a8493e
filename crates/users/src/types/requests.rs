//! Request payloads, parsed leniently from client JSON.

use offramp_database::BudgetLevel;
use serde_json::{Map, Value};

use super::errors::{UserError, UserResult};

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(|text| text.trim().to_string())
}

/// `None` when the key is absent, `Some(None)` for null or blank strings.
fn present_text(object: &Map<String, Value>, key: &str) -> Option<Option<String>> {
    let value = object.get(key)?;
    Some(
        value
            .as_str()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    )
}

fn name_list(object: &Map<String, Value>, key: &str) -> UserResult<Option<Vec<String>>> {
    let Some(value) = object.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(Some(Vec::new())),
        Value::Array(items) => Ok(Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        _ => Err(UserError::ValidationFailed(format!(
            "{key} must be a list of names"
        ))),
    }
}

/// Account registration form.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub city: Option<String>,
    pub region: Option<String>,
}

impl RegisterInput {
    /// Email is lower-cased and every field trimmed. `fullName` falls back to `name`.
    pub fn from_json(body: &Value) -> UserResult<Self> {
        let missing = || UserError::ValidationFailed("Missing required fields".to_string());
        let object = body.as_object().ok_or_else(missing)?;

        let email = object.get("email").and_then(Value::as_str).ok_or_else(missing)?;
        let password = object
            .get("password")
            .and_then(Value::as_str)
            .ok_or_else(missing)?;

        let full_name = trimmed_string(object.get("fullName"))
            .or_else(|| trimmed_string(object.get("name")))
            .unwrap_or_default();

        Ok(Self {
            email: email.trim().to_lowercase(),
            password: password.trim().to_string(),
            full_name,
            phone: trimmed_string(object.get("phone")).unwrap_or_default(),
            city: trimmed_string(object.get("city")),
            region: trimmed_string(object.get("region")),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn from_json(body: &Value) -> UserResult<Self> {
        let required = || UserError::ValidationFailed("Email and password required".to_string());

        let email = body.get("email").and_then(Value::as_str).ok_or_else(required)?;
        let password = body
            .get("password")
            .and_then(Value::as_str)
            .ok_or_else(required)?;

        let email = email.trim().to_lowercase();
        let password = password.trim().to_string();
        if email.is_empty() || password.is_empty() {
            return Err(required());
        }

        Ok(Self { email, password })
    }
}

/// Profile edit; absent keys keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn from_json(body: &Value) -> UserResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| UserError::ValidationFailed("Invalid JSON body".to_string()))?;
        Ok(Self {
            full_name: present_text(object, "full_name"),
            avatar_url: present_text(object, "avatar_url"),
        })
    }
}

/// Partial update of region, budget, cuisines, allergies and diet transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePreferencesUpdate {
    pub region: Option<Option<String>>,
    pub budget_level: Option<BudgetLevel>,
    pub cuisines: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub transition_from_diet: Option<Option<String>>,
    pub transition_to_diet: Option<Option<String>>,
}

impl ProfilePreferencesUpdate {
    pub fn from_json(body: &Value) -> UserResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| UserError::ValidationFailed("Invalid JSON body".to_string()))?;

        Ok(Self {
            region: present_text(object, "region"),
            budget_level: object.get("budgetLevel").and_then(normalize_budget_level),
            cuisines: name_list(object, "cuisines")?,
            allergies: name_list(object, "allergies")?,
            transition_from_diet: present_text(object, "transitionFromDiet"),
            transition_to_diet: present_text(object, "transitionToDiet"),
        })
    }
}

/// Map any client budget value onto the three tiers. Null means "not provided".
pub fn normalize_budget_level(value: &Value) -> Option<BudgetLevel> {
    match value {
        Value::Null => None,
        Value::Number(number) => Some(BudgetLevel::from_number(number.as_f64().unwrap_or(f64::NAN))),
        Value::String(text) => {
            let text = text.trim();
            Some(
                BudgetLevel::from_db(&text.to_ascii_lowercase()).unwrap_or_else(|| {
                    BudgetLevel::from_number(text.parse::<f64>().unwrap_or(f64::NAN))
                }),
            )
        }
        _ => Some(BudgetLevel::Low),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_input_normalizes_fields() {
        let input = RegisterInput::from_json(&json!({
            "email": "  Asha@Example.COM ",
            "password": " secret123 ",
            "name": " Asha ",
            "phone": " +91 98450 12345 ",
            "city": " Mysore ",
        }))
        .unwrap();

        assert_eq!(input.email, "asha@example.com");
        assert_eq!(input.password, "secret123");
        assert_eq!(input.full_name, "Asha");
        assert_eq!(input.phone, "+91 98450 12345");
        assert_eq!(input.city.as_deref(), Some("Mysore"));
        assert!(input.region.is_none());
    }

    #[test]
    fn register_input_requires_string_credentials() {
        for body in [json!([]), json!({ "email": "a@b.co" }), json!({ "email": 1, "password": "x" })] {
            let err = RegisterInput::from_json(&body).unwrap_err();
            assert_eq!(err.to_string(), "Missing required fields");
        }
    }

    #[test]
    fn login_input_rejects_blank_values() {
        let err = LoginInput::from_json(&json!({ "email": " ", "password": "pw" })).unwrap_err();
        assert_eq!(err.to_string(), "Email and password required");

        let ok = LoginInput::from_json(&json!({ "email": "A@B.CO", "password": " pw " })).unwrap();
        assert_eq!(ok.email, "a@b.co");
        assert_eq!(ok.password, "pw");
    }

    #[test]
    fn preferences_update_tracks_present_keys() {
        let update = ProfilePreferencesUpdate::from_json(&json!({
            "region": "  ",
            "budgetLevel": "2",
            "cuisines": ["Kerala", " ", "Punjabi"],
        }))
        .unwrap();

        assert_eq!(update.region, Some(None));
        assert_eq!(update.budget_level, Some(BudgetLevel::Medium));
        assert_eq!(update.cuisines, Some(vec!["Kerala".to_string(), "Punjabi".to_string()]));
        assert_eq!(update.allergies, None);
        assert_eq!(update.transition_from_diet, None);
    }

    #[test]
    fn preferences_update_rejects_non_list_cuisines() {
        let err = ProfilePreferencesUpdate::from_json(&json!({ "cuisines": "Kerala" })).unwrap_err();
        assert!(matches!(err, UserError::ValidationFailed(_)));
    }

    #[test]
    fn budget_levels_normalize() {
        assert_eq!(normalize_budget_level(&json!(0)), Some(BudgetLevel::Low));
        assert_eq!(normalize_budget_level(&json!(2.4)), Some(BudgetLevel::Medium));
        assert_eq!(normalize_budget_level(&json!(9)), Some(BudgetLevel::High));
        assert_eq!(normalize_budget_level(&json!("high")), Some(BudgetLevel::High));
        assert_eq!(normalize_budget_level(&json!("lots")), Some(BudgetLevel::Low));
        assert_eq!(normalize_budget_level(&Value::Null), None);
    }
}

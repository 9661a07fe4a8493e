//! Proxy for the VeganSwap engine: ask for swap suggestions, then fetch
//! every suggested recipe and reshape it into a [`DishDetail`] card.

use std::time::Duration;

use futures_util::future::join_all;
use offramp_config::VeganSwapConfig;
use offramp_dishes::{Diet, DishDetail, DishStep, Ingredient};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::error::{IntegrationError, IntegrationResult};

const FALLBACK_IMAGE: &str = "/assets/tempeh-coastal-curry.svg";
const DEFAULT_FLAVOR: &str = "Chef-crafted spice pairing";
const DEFAULT_SCORE: f64 = 0.85;
pub const NOT_CONFIGURED: &str = "VEGANSWAP_API_BASE_URL is not configured";

/// Client payload for `POST /api/veganswap/swap`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VeganSwapRequest {
    pub dish_name: String,
    pub dietary_restrictions: Vec<String>,
    pub texture_preference: Option<f64>,
}

impl VeganSwapRequest {
    /// Lenient read: non-string restrictions and non-numeric textures are ignored.
    pub fn from_json(body: &Value) -> Self {
        let dish_name = body
            .get("dishName")
            .and_then(Value::as_str)
            .map(|name| name.trim().to_string())
            .unwrap_or_default();

        let dietary_restrictions = body
            .get("dietaryRestrictions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let texture_preference = body.get("texturePreference").and_then(Value::as_f64);

        Self {
            dish_name,
            dietary_restrictions,
            texture_preference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeganSwapMeta {
    pub applied_restrictions: Vec<String>,
    pub texture_preference: Option<f64>,
    pub original_dish: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VeganSwapResponse {
    pub dishes: Vec<DishDetail>,
    pub meta: VeganSwapMeta,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    id: Value,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Recipe {
    id: Value,
    slug: Option<String>,
    name: String,
    diet: Option<String>,
    course: Option<String>,
    flavor_profile: Option<String>,
    taste_profile: Option<String>,
    state: Option<String>,
    region: Option<String>,
    replaces: Value,
    ingredients: Value,
    steps: Value,
    chef_tips: Value,
    #[serde(rename = "chefTips")]
    chef_tips_camel: Value,
    why_it_works: Option<String>,
    hero_summary: Option<String>,
    image_url: Option<String>,
    categories: Value,
    reviews: Option<f64>,
    calories: Value,
    protein: Value,
    fiber: Value,
    price_original: Option<f64>,
    price_swap: Option<f64>,
    estimated_cost: Option<f64>,
    prep_time_minutes: Option<f64>,
    cook_time_minutes: Option<f64>,
    total_time_minutes: Option<f64>,
    texture_score: Value,
    texture_match: Value,
}

pub struct VeganSwapClient {
    base_url: Option<String>,
    client: Client,
}

impl VeganSwapClient {
    pub fn new(config: &VeganSwapConfig) -> IntegrationResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config
                .base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    pub async fn swap(&self, request: &VeganSwapRequest) -> IntegrationResult<VeganSwapResponse> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| IntegrationError::NotConfigured(NOT_CONFIGURED.to_string()))?;

        let dish_name = request.dish_name.trim();
        if dish_name.is_empty() {
            return Err(IntegrationError::InvalidInput(
                "dishName is required".to_string(),
            ));
        }

        let meta = VeganSwapMeta {
            applied_restrictions: request.dietary_restrictions.clone(),
            texture_preference: request.texture_preference,
            original_dish: dish_name.to_string(),
        };

        let response = self
            .client
            .post(format!("{base_url}/swap/"))
            .json(&json!({
                "dish_name": dish_name,
                "dietary_restrictions": request.dietary_restrictions,
                "texture_preference": request.texture_preference,
            }))
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "VeganSwap proxy failed");
                IntegrationError::upstream(502, "Unable to reach VeganSwap backend")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body, "VeganSwap /swap/ error");
            return Err(IntegrationError::upstream(
                status.as_u16(),
                "VeganSwap engine returned an error",
            ));
        }

        let body: Value = response.json().await.map_err(|err| {
            error!(error = %err, "VeganSwap /swap/ returned unreadable JSON");
            IntegrationError::upstream(502, "Unable to reach VeganSwap backend")
        })?;

        let suggestions: Vec<Suggestion> = body
            .get("suggestions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        debug!(dish = dish_name, suggestions = suggestions.len(), "VeganSwap suggestions received");

        let fetches = suggestions
            .iter()
            .map(|suggestion| self.fetch_recipe(base_url, suggestion));
        let dishes = join_all(fetches).await.into_iter().flatten().collect();

        Ok(VeganSwapResponse { dishes, meta })
    }

    // Failures are logged and dropped so one bad recipe does not sink the batch.
    async fn fetch_recipe(&self, base_url: &str, suggestion: &Suggestion) -> Option<DishDetail> {
        let id = match &suggestion.id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        };

        let response = match self
            .client
            .get(format!("{base_url}/recipes/{id}"))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(recipe = %id, error = %err, "recipe detail fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(recipe = %id, status = response.status().as_u16(), "failed to fetch recipe");
            return None;
        }

        match response.json::<Recipe>().await {
            Ok(recipe) => Some(map_recipe(recipe, suggestion.score)),
            Err(err) => {
                warn!(recipe = %id, error = %err, "recipe detail was not valid JSON");
                None
            }
        }
    }
}

fn map_recipe(recipe: Recipe, score: Option<f64>) -> DishDetail {
    let id = match &recipe.id {
        Value::String(id) => id.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    let score_source = score
        .or_else(|| numeric(&recipe.texture_score))
        .or_else(|| {
            recipe
                .texture_match
                .get("similarity_score")
                .and_then(numeric)
        });
    let rating_base = clamp_score(score_source);
    let rating = ((4.0 + rating_base) * 100.0).round() / 100.0;

    let total_minutes = recipe.total_time_minutes.or_else(|| {
        recipe
            .prep_time_minutes
            .zip(recipe.cook_time_minutes)
            .map(|(prep, cook)| prep + cook)
    });

    let diet = match recipe.diet.as_deref().and_then(Diet::parse) {
        Some(Diet::Jain) => Diet::Jain,
        Some(Diet::Vegetarian) => Diet::Vegetarian,
        _ => Diet::Vegan,
    };

    let chef_tips = if recipe.chef_tips.is_null() {
        &recipe.chef_tips_camel
    } else {
        &recipe.chef_tips
    };

    DishDetail {
        slug: recipe.slug.unwrap_or_else(|| format!("veganswap-{id}")),
        name: recipe.name,
        diet,
        course: recipe.course.unwrap_or_else(|| "Main".to_string()),
        flavor_profile: recipe
            .flavor_profile
            .or(recipe.taste_profile)
            .unwrap_or_else(|| DEFAULT_FLAVOR.to_string()),
        region: recipe
            .region
            .or_else(|| recipe.state.clone())
            .unwrap_or_else(|| "Pan-India".to_string()),
        state: recipe.state.unwrap_or_else(|| "Pan-India".to_string()),
        replaces: string_list(&recipe.replaces),
        ingredients: ingredients(&recipe.ingredients),
        prep_time: format_minutes(recipe.prep_time_minutes),
        cook_time: format_minutes(recipe.cook_time_minutes),
        total_time: format_minutes(total_minutes),
        steps: steps(&recipe.steps),
        chef_tips: string_list(chef_tips),
        why_it_works: recipe
            .why_it_works
            .or_else(|| recipe.hero_summary.clone())
            .unwrap_or_else(|| DEFAULT_FLAVOR.to_string()),
        image: recipe.image_url.unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
        video_id: None,
        categories: string_list(&recipe.categories),
        rating: Some(rating),
        reviews: Some(
            recipe
                .reviews
                .map(|reviews| reviews.max(0.0) as u32)
                .unwrap_or_else(|| (800.0 + rating_base * 400.0).round() as u32),
        ),
        trending_city: None,
        hero_summary: recipe.hero_summary,
        calories: numeric(&recipe.calories).map(format_number),
        protein: numeric(&recipe.protein).map(format_number),
        fiber: numeric(&recipe.fiber).map(format_number),
        price_original: recipe.price_original.map(format_rupees),
        price_swap: recipe.price_swap.map(format_rupees),
        estimated_cost: recipe.estimated_cost.map(format_rupees),
    }
}

/// Similarity in `[0, 1]`, 0.85 when unknown.
fn clamp_score(value: Option<f64>) -> f64 {
    match value {
        Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
        _ => DEFAULT_SCORE,
    }
}

fn format_minutes(value: Option<f64>) -> String {
    match value {
        Some(minutes) if minutes > 0.0 => format!("{} min", format_number(minutes)),
        _ => "—".to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn format_rupees(value: f64) -> String {
    format!("₹{}", format_number(value))
}

/// Numbers pass through; strings keep only digits and dots ("12 g" -> 12).
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(display)
                .filter(|item| !item.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn ingredients(value: &Value) -> Vec<Ingredient> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|entry| match entry {
            Value::String(item) => Some(Ingredient {
                item: item.clone(),
                quantity: String::new(),
            }),
            Value::Object(record) => {
                let item = record.get("item").map(display).unwrap_or_default();
                let quantity = record.get("quantity").map(display).unwrap_or_default();
                if item.trim().is_empty() && quantity.trim().is_empty() {
                    return None;
                }
                Some(Ingredient {
                    item: if item.is_empty() {
                        "Ingredient".to_string()
                    } else {
                        item
                    },
                    quantity,
                })
            }
            _ => None,
        })
        .collect()
}

fn steps(value: &Value) -> Vec<DishStep> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let position = index as u32 + 1;
            match entry {
                Value::Object(record) if record.contains_key("instruction") => Some(DishStep {
                    step: record
                        .get("step")
                        .and_then(numeric)
                        .map(|step| step as u32)
                        .unwrap_or(position),
                    instruction: record.get("instruction").map(display).unwrap_or_default(),
                    time: record.get("time").map(display).unwrap_or_default(),
                }),
                Value::String(instruction) => Some(DishStep {
                    step: position,
                    instruction: instruction.clone(),
                    time: String::new(),
                }),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(value: Value) -> Recipe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_parsing_is_lenient() {
        let request = VeganSwapRequest::from_json(&json!({
            "dishName": "  Fish Fry ",
            "dietaryRestrictions": [" jain ", "", 4, "nut-free"],
            "texturePreference": "crispy",
        }));

        assert_eq!(request.dish_name, "Fish Fry");
        assert_eq!(request.dietary_restrictions, vec!["jain", "nut-free"]);
        assert_eq!(request.texture_preference, None);
    }

    #[test]
    fn sparse_recipe_gets_defaults() {
        let dish = map_recipe(recipe(json!({ "id": 42, "name": "Jackfruit Fry" })), None);

        assert_eq!(dish.slug, "veganswap-42");
        assert_eq!(dish.diet, Diet::Vegan);
        assert_eq!(dish.course, "Main");
        assert_eq!(dish.flavor_profile, DEFAULT_FLAVOR);
        assert_eq!(dish.state, "Pan-India");
        assert_eq!(dish.region, "Pan-India");
        assert_eq!(dish.prep_time, "—");
        assert_eq!(dish.image, FALLBACK_IMAGE);
        assert_eq!(dish.rating, Some(4.85));
        assert_eq!(dish.reviews, Some(1140));
    }

    #[test]
    fn recipe_fields_are_normalized() {
        let dish = map_recipe(
            recipe(json!({
                "id": 7,
                "slug": "banana-fry",
                "name": "Banana Blossom Fry",
                "diet": "Jain",
                "state": "Kerala",
                "replaces": ["Fish Fry", "  "],
                "ingredients": ["Banana blossom", { "item": "", "quantity": "2 tbsp" }, { "item": "" }, 3],
                "steps": ["Clean", { "instruction": "Fry", "time": 5 }, { "no": "instruction" }],
                "prep_time_minutes": 10,
                "cook_time_minutes": 15,
                "calories": "320 kcal",
                "price_swap": 90,
                "texture_match": { "similarity_score": "1.7" },
            })),
            None,
        );

        assert_eq!(dish.slug, "banana-fry");
        assert_eq!(dish.diet, Diet::Jain);
        assert_eq!(dish.region, "Kerala");
        assert_eq!(dish.replaces, vec!["Fish Fry"]);
        assert_eq!(dish.ingredients.len(), 2);
        assert_eq!(dish.ingredients[1].item, "Ingredient");
        assert_eq!(dish.steps.len(), 2);
        assert_eq!(dish.steps[1].step, 2);
        assert_eq!(dish.steps[1].time, "5");
        assert_eq!(dish.total_time, "25 min");
        assert_eq!(dish.calories.as_deref(), Some("320"));
        assert_eq!(dish.price_swap.as_deref(), Some("₹90"));
        assert_eq!(dish.rating, Some(5.0));
    }

    #[test]
    fn suggestion_score_wins_over_recipe_score() {
        let dish = map_recipe(
            recipe(json!({ "id": 1, "name": "Tofu", "texture_score": 0.1 })),
            Some(0.5),
        );
        assert_eq!(dish.rating, Some(4.5));
        assert_eq!(dish.reviews, Some(1000));
    }
}

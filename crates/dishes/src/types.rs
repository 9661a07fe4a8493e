use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diet {
    Vegan,
    Vegetarian,
    Jain,
}

impl Diet {
    /// Lenient parse used for third-party recipe payloads.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vegan" => Some(Diet::Vegan),
            "vegetarian" | "veg" => Some(Diet::Vegetarian),
            "jain" => Some(Diet::Jain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishStep {
    pub step: u32,
    pub instruction: String,
    pub time: String,
}

/// A complete recipe card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishDetail {
    pub slug: String,
    pub name: String,
    pub diet: Diet,
    pub course: String,
    pub flavor_profile: String,
    pub state: String,
    pub region: String,
    /// Familiar dishes this recipe stands in for.
    pub replaces: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub steps: Vec<DishStep>,
    pub chef_tips: Vec<String>,
    pub why_it_works: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Replacement category ids, see [`crate::REPLACEMENT_CATEGORIES`].
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_swap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
}

/// Dishes matched for one replacement category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementGroup {
    pub id: String,
    pub title: String,
    /// Category keywords the query hit, or the query itself for the fallback group.
    pub keywords: Vec<String>,
    pub description: String,
    pub dishes: Vec<DishDetail>,
}

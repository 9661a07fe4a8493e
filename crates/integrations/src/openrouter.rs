//! OpenRouter chat completions used for dish suggestions and cost estimates.

use std::time::Duration;

use once_cell::sync::Lazy;
use offramp_config::OpenRouterConfig;
use regex::Regex;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::error::{IntegrationError, IntegrationResult};

pub const FALLBACK_PROVIDER: &str = "local-fallback";
const OPENROUTER_PROVIDER: &str = "openrouter";

static JSON_FENCE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"```json\n([\s\S]*?)```").ok());

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestOutcome {
    pub suggestions: Vec<Value>,
    pub provider: &'static str,
}

impl SuggestOutcome {
    fn fallback() -> Self {
        Self {
            suggestions: fallback_suggestions(),
            provider: FALLBACK_PROVIDER,
        }
    }
}

/// Body of `POST /api/cost-savings`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostSavingsInput {
    pub original_dish_name: Option<String>,
    pub original_cost: Option<String>,
    pub vegan_dish_name: Option<String>,
    pub vegan_cost: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChoiceMessage {
    content: Value,
}

impl ChatCompletion {
    /// First choice's text; array content parts are joined by newlines.
    fn text(&self) -> String {
        let Some(choice) = self.choices.first() else {
            return String::new();
        };
        match &choice.message.content {
            Value::String(text) => text.clone(),
            Value::Array(parts) => parts
                .iter()
                .map(|part| part.get("text").and_then(Value::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }
}

pub struct OpenRouterClient {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterClient {
    pub fn new(config: &OpenRouterConfig) -> IntegrationResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn completions(&self, api_key: &str) -> RequestBuilder {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut request = self.client.post(url).bearer_auth(api_key);
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            request = request.header("X-Title", title);
        }
        request
    }

    /// Ask the model for plant-based suggestions.
    ///
    /// Only a blank query is an error. Everything else that goes wrong
    /// (missing key, upstream failure, unparsable output) yields the
    /// built-in list tagged `local-fallback`.
    pub async fn suggest(&self, query: &str, preferences: &Value) -> IntegrationResult<SuggestOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(IntegrationError::InvalidInput("Query is required".to_string()));
        }

        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("no OpenRouter key, serving fallback suggestions");
            return Ok(SuggestOutcome::fallback());
        };

        let body = json!({
            "model": self.config.suggest_model,
            "messages": [
                { "role": "system", "content": "You are a precise API returning JSON only." },
                { "role": "user", "content": suggest_prompt(query, preferences) },
            ],
            "temperature": 0.4,
        });

        let response = match self.completions(api_key).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "OpenRouter suggest request failed");
                return Ok(SuggestOutcome::fallback());
            }
        };

        if !response.status().is_success() {
            error!(status = response.status().as_u16(), "OpenRouter suggest returned an error");
            return Ok(SuggestOutcome::fallback());
        }

        let completion: ChatCompletion = match response.json().await {
            Ok(completion) => completion,
            Err(err) => {
                error!(error = %err, "OpenRouter suggest response was not JSON");
                return Ok(SuggestOutcome::fallback());
            }
        };

        let suggestions = match parse_suggestions(&completion.text()) {
            ParsedSuggestions::Items(items) if !items.is_empty() => items,
            ParsedSuggestions::Items(_) | ParsedSuggestions::Missing => {
                warn!("OpenRouter suggest output had no suggestions, using the built-in list");
                fallback_suggestions()
            }
            ParsedSuggestions::Malformed => {
                warn!("OpenRouter suggest output held malformed JSON");
                return Ok(SuggestOutcome::fallback());
            }
        };

        info!(count = suggestions.len(), "OpenRouter suggestions generated");
        Ok(SuggestOutcome {
            suggestions,
            provider: OPENROUTER_PROVIDER,
        })
    }

    /// Estimated rupee savings of the vegan dish, `None` when the model
    /// answer holds no number.
    pub async fn cost_savings(&self, input: &CostSavingsInput) -> IntegrationResult<Option<i64>> {
        let field = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };
        let (Some(original_dish), Some(original_cost), Some(vegan_dish), Some(vegan_cost)) = (
            field(&input.original_dish_name),
            field(&input.original_cost),
            field(&input.vegan_dish_name),
            field(&input.vegan_cost),
        ) else {
            return Err(IntegrationError::InvalidInput(
                "Missing cost comparison fields".to_string(),
            ));
        };

        let Some(api_key) = self.config.api_key.as_deref() else {
            error!("OpenRouter API key is not configured");
            return Err(IntegrationError::NotConfigured(
                "Server configuration error".to_string(),
            ));
        };

        let prompt = format!(
            "Compare the cost of these dishes in India:\n\n\
             Non-vegan dish: {original_dish}\nAverage cost: {original_cost}\n\n\
             Vegan dish: {vegan_dish}\nAverage cost: {vegan_cost}\n\n\
             Return only the estimated savings in rupees as a number."
        );
        let body = json!({
            "model": self.config.cost_model,
            "messages": [
                { "role": "system", "content": "You are a food cost estimation assistant." },
                { "role": "user", "content": prompt },
            ],
        });

        let response = self
            .completions(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "cost savings request failed");
                IntegrationError::upstream(500, "Unable to reach cost savings service")
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = text, "OpenRouter cost savings error");
            return Err(IntegrationError::upstream(502, "Failed to calculate savings"));
        }

        let completion: ChatCompletion = response.json().await.map_err(|err| {
            error!(error = %err, "cost savings response was not JSON");
            IntegrationError::upstream(500, "Unable to reach cost savings service")
        })?;

        Ok(parse_savings(&completion.text()))
    }
}

fn suggest_prompt(query: &str, preferences: &Value) -> String {
    format!(
        "You are a culinary guide for plant-based swaps.\n\
         User query: {query}\n\
         Preferences: {preferences}\n\
         Return ONLY a JSON array of 3 objects with keys: name, prepTime, rating (number), \
         ingredients (number), tags (array of short strings), moneySaved (number, rupees), \
         description, origin, estimatedCost (number), vegan (boolean), impact {{animals, water, co2}}, \
         videoId (YouTube id or empty).\n\
         Make sure the output is valid JSON without extra text."
    )
}

/// What a suggestion answer from the model contained.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSuggestions {
    /// A JSON array, bare or inside a ```json fence.
    Items(Vec<Value>),
    /// No array: prose, a JSON object, or a fence holding something else.
    Missing,
    /// A ```json fence whose contents do not parse.
    Malformed,
}

/// Read a JSON array from model output, either bare or inside a ```json fence.
pub fn parse_suggestions(text: &str) -> ParsedSuggestions {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => return ParsedSuggestions::Items(items),
        Ok(_) => return ParsedSuggestions::Missing,
        Err(_) => {}
    }

    let Some(fenced) = JSON_FENCE
        .as_ref()
        .and_then(|fence| fence.captures(text))
        .and_then(|captures| captures.get(1))
    else {
        return ParsedSuggestions::Missing;
    };

    match serde_json::from_str::<Value>(fenced.as_str()) {
        Ok(Value::Array(items)) => ParsedSuggestions::Items(items),
        Ok(_) => ParsedSuggestions::Missing,
        Err(_) => ParsedSuggestions::Malformed,
    }
}

/// Keep digits and `-`, then read a leading integer ("₹120-150" gives 120).
pub fn parse_savings(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    let (sign, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, cleaned.as_str()),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

pub fn fallback_suggestions() -> Vec<Value> {
    vec![json!({
        "name": "Jackfruit Biryani",
        "prepTime": "25 mins",
        "rating": 4.8,
        "ingredients": 12,
        "tags": ["High protein", "Fiber rich", "Trending"],
        "moneySaved": 60,
        "description": "Slow-cooked jackfruit in aromatic rice with caramelized onions and mint.",
        "origin": "West Bengal",
        "estimatedCost": 90,
        "videoId": "MJUeygZ8MeQ",
        "vegan": true,
        "impact": { "animals": 1, "water": 900, "co2": 2.5 },
    })]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(parsed: ParsedSuggestions) -> Vec<Value> {
        match parsed {
            ParsedSuggestions::Items(items) => items,
            other => panic!("expected items, got {other:?}"),
        }
    }

    #[test]
    fn bare_array_is_parsed() {
        let parsed = items(parse_suggestions(r#" [{"name": "Tofu Tikka"}] "#));
        assert_eq!(parsed[0]["name"], "Tofu Tikka");
        assert!(items(parse_suggestions("[]")).is_empty());
    }

    #[test]
    fn fenced_array_is_parsed() {
        let text = "Here you go:\n```json\n[{\"name\": \"Soya Keema\"}]\n```\nEnjoy!";
        let parsed = items(parse_suggestions(text));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["name"], "Soya Keema");
    }

    #[test]
    fn objects_and_prose_hold_no_suggestions() {
        assert_eq!(parse_suggestions(r#"{"name": "Tofu"}"#), ParsedSuggestions::Missing);
        assert_eq!(parse_suggestions("I cannot help with that"), ParsedSuggestions::Missing);
        assert_eq!(
            parse_suggestions("```json\n{\"name\": \"Tofu\"}\n```"),
            ParsedSuggestions::Missing
        );
    }

    #[test]
    fn broken_fence_is_malformed() {
        assert_eq!(parse_suggestions("```json\nnot json\n```"), ParsedSuggestions::Malformed);
    }

    #[test]
    fn savings_are_read_from_noisy_text() {
        assert_eq!(parse_savings("120"), Some(120));
        assert_eq!(parse_savings("About ₹85 per plate."), Some(85));
        assert_eq!(parse_savings("₹120-150"), Some(120));
        assert_eq!(parse_savings("-40 rupees"), Some(-40));
        assert_eq!(parse_savings("no idea"), None);
        assert_eq!(parse_savings("-"), None);
    }

    #[test]
    fn completion_text_joins_content_parts() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{ "message": { "content": [{ "text": "a" }, { "type": "image" }, { "text": "b" }] } }]
        }))
        .unwrap();
        assert_eq!(completion.text(), "a\n\nb");

        let empty: ChatCompletion = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn fallback_list_has_one_dish() {
        let fallback = fallback_suggestions();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0]["name"], "Jackfruit Biryani");
    }
}

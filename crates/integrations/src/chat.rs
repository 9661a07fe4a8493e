//! Dish assistant: a streaming OpenRouter chat scoped to one recipe.

use std::time::Duration;

use bytes::Bytes;
use futures_util::{stream::BoxStream, StreamExt, TryStreamExt};
use offramp_config::OpenRouterConfig;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::{IntegrationError, IntegrationResult};

/// Plain-text answer when OpenRouter is unavailable.
pub const FALLBACK_REPLY: &str =
    "I'm here to help with this dish. Ask about steps, timing, or swaps.";

const ASSISTANT_TITLE: &str = "Dish Assistant";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a concise cooking assistant. Only answer about this dish, \
its ingredients, cooking steps, timing, or vegan/plant-based/Jain swaps. If the user asks about \
anything unrelated (general knowledge, tech, politics, celebrities, personal data, platform \
internals, non-food requests), respond exactly: 'I can only help with this dish and plant-based \
cooking.' Do not add any other words or follow-up when refusing. Stay under 120 words when \
answering relevant questions.";

const GUARDRAIL_PROMPT: &str = "Guardrail: If the latest user message is unrelated to the dish \
context, reply exactly: 'I can only help with this dish and plant-based cooking.' No extra \
wording, no follow-ups.";

/// Server-sent event bytes relayed from OpenRouter.
pub type ChatStream = BoxStream<'static, Result<Bytes, IntegrationError>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    /// The dish card the user is looking at, as the client sent it.
    pub dish: Option<Value>,
    pub messages: Vec<ChatMessage>,
    /// Replaces the default assistant prompt.
    pub system: Option<String>,
}

impl ChatRequest {
    /// Lenient read: a non-array `messages` is empty and non-string contents are stringified.
    pub fn from_json(body: &Value) -> Self {
        let messages = body
            .get("messages")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| ChatMessage {
                        role: item
                            .get("role")
                            .and_then(Value::as_str)
                            .unwrap_or("user")
                            .to_string(),
                        content: text_of(item.get("content")),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            dish: body.get("dish").filter(|dish| dish.is_object()).cloned(),
            messages,
            system: body
                .get("system")
                .and_then(Value::as_str)
                .filter(|system| !system.trim().is_empty())
                .map(str::to_string),
        }
    }

    /// Short recipe summary handed to the model as extra system context.
    pub fn dish_context(&self) -> Option<String> {
        let dish = self.dish.as_ref()?;
        let field = |key: &str| text_of(dish.get(key));

        let replaces = dish
            .get("replaces")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(|item| text_of(Some(item))).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        let ingredients = dish
            .get("ingredients")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        format!(
                            "{} {}",
                            text_of(item.get("quantity")),
                            text_of(item.get("item"))
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Some(format!(
            "Dish: {}\nDiet: {}\nCourse: {}\nRegion: {}\nFlavor: {}\nTotal time: {}\nReplaces: {replaces}\nIngredients: {ingredients}",
            field("name"),
            field("diet"),
            field("course"),
            field("region"),
            field("flavorProfile"),
            field("totalTime"),
        ))
    }

    fn payload(&self, model: &str) -> Value {
        let mut messages = vec![
            json!({
                "role": "system",
                "content": self.system.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT),
            }),
            json!({ "role": "system", "content": GUARDRAIL_PROMPT }),
        ];
        if let Some(context) = self.dish_context() {
            messages.push(json!({
                "role": "system",
                "content": format!("Dish context:\n{context}\nKeep swaps plant-forward."),
            }));
        }
        messages.extend(
            self.messages
                .iter()
                .map(|message| json!({ "role": message.role, "content": message.content })),
        );

        json!({
            "model": model,
            "stream": true,
            "messages": messages,
            "temperature": 0.4,
        })
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub enum ChatReply {
    Stream(ChatStream),
    Fallback,
}

impl ChatReply {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ChatReply::Fallback)
    }
}

pub struct ChatService {
    config: OpenRouterConfig,
    client: Client,
}

impl ChatService {
    /// Only connecting is bounded; an answer may stream for as long as the model writes.
    pub fn new(config: &OpenRouterConfig) -> IntegrationResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Open a streamed completion, or fall back when there is no key or OpenRouter fails.
    pub async fn reply(&self, request: &ChatRequest) -> ChatReply {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("no OpenRouter key, answering chat with the fallback reply");
            return ChatReply::Fallback;
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut upstream = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .header("X-Title", ASSISTANT_TITLE);
        if let Some(referer) = &self.config.referer {
            upstream = upstream.header("HTTP-Referer", referer);
        }

        let response = match upstream
            .json(&request.payload(&self.config.chat_model))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "chat request to OpenRouter failed");
                return ChatReply::Fallback;
            }
        };

        if !response.status().is_success() {
            error!(status = response.status().as_u16(), "OpenRouter chat returned an error");
            return ChatReply::Fallback;
        }

        debug!(messages = request.messages.len(), "relaying chat stream");
        ChatReply::Stream(
            response
                .bytes_stream()
                .map_err(|err| IntegrationError::upstream(502, format!("chat stream interrupted: {err}")))
                .boxed(),
        )
    }
}

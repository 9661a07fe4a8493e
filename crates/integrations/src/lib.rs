//! Outbound HTTP collaborators: the VeganSwap recommendation engine and
//! OpenRouter chat completions, including the streaming dish assistant.

pub mod chat;
pub mod error;
pub mod openrouter;
pub mod veganswap;

pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatService, ChatStream, FALLBACK_REPLY};
pub use error::{IntegrationError, IntegrationResult};
pub use openrouter::{
    fallback_suggestions, parse_savings, parse_suggestions, CostSavingsInput, OpenRouterClient,
    ParsedSuggestions, SuggestOutcome, FALLBACK_PROVIDER,
};
pub use veganswap::{VeganSwapClient, VeganSwapMeta, VeganSwapRequest, VeganSwapResponse};

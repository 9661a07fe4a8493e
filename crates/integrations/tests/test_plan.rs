use httpmock::prelude::*;
use offramp_config::{OpenRouterConfig, VeganSwapConfig};
use futures_util::TryStreamExt;
use offramp_integrations::{
    fallback_suggestions, ChatReply, ChatRequest, ChatService, CostSavingsInput, IntegrationError,
    OpenRouterClient, VeganSwapClient, VeganSwapRequest, FALLBACK_PROVIDER,
};
use serde_json::json;

fn veganswap(base_url: Option<String>) -> VeganSwapClient {
    VeganSwapClient::new(&VeganSwapConfig {
        base_url,
        request_timeout_seconds: 2,
    })
    .unwrap()
}

fn openrouter(base_url: String, api_key: Option<&str>) -> OpenRouterClient {
    OpenRouterClient::new(&OpenRouterConfig {
        api_key: api_key.map(str::to_string),
        base_url,
        request_timeout_seconds: 2,
        title: Some("OffRamp Tests".to_string()),
        ..OpenRouterConfig::default()
    })
    .unwrap()
}

fn chat(base_url: String, api_key: Option<&str>) -> ChatService {
    ChatService::new(&OpenRouterConfig {
        api_key: api_key.map(str::to_string),
        base_url,
        request_timeout_seconds: 2,
        ..OpenRouterConfig::default()
    })
    .unwrap()
}

fn chat_request() -> ChatRequest {
    ChatRequest::from_json(&json!({
        "dish": { "name": "Soya Keema", "diet": "vegan" },
        "messages": [{ "role": "user", "content": "Can I use tofu instead?" }],
    }))
}

fn completion(content: &str) -> String {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
}

fn cost_input() -> CostSavingsInput {
    CostSavingsInput {
        original_dish_name: Some("Chicken Biryani".to_string()),
        original_cost: Some("₹250".to_string()),
        vegan_dish_name: Some("Soya Chunk Biryani".to_string()),
        vegan_cost: Some("₹150".to_string()),
    }
}

#[tokio::test]
async fn veganswap_fetches_recipes_and_drops_failures() {
    let server = MockServer::start_async().await;

    let swap = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/swap/")
                .json_body(json!({
                    "dish_name": "Fish Curry",
                    "dietary_restrictions": ["jain"],
                    "texture_preference": 0.7,
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .body(
                    json!({
                        "suggestions": [
                            { "id": 1, "name": "Tempeh Curry", "score": 0.9 },
                            { "id": 2, "name": "Broken Recipe" },
                        ]
                    })
                    .to_string(),
                );
        })
        .await;

    let _recipe = server
        .mock_async(|when, then| {
            when.method(GET).path("/recipes/1");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(
                    json!({
                        "id": 1,
                        "name": "Tempeh Coastal Curry",
                        "diet": "jain",
                        "prep_time_minutes": 15,
                        "cook_time_minutes": 25,
                    })
                    .to_string(),
                );
        })
        .await;

    let _missing = server
        .mock_async(|when, then| {
            when.method(GET).path("/recipes/2");
            then.status(404);
        })
        .await;

    let client = veganswap(Some(format!("{}/", server.base_url())));
    let request = VeganSwapRequest::from_json(&json!({
        "dishName": " Fish Curry ",
        "dietaryRestrictions": ["jain"],
        "texturePreference": 0.7,
    }));

    let response = client.swap(&request).await.unwrap();
    swap.assert_async().await;

    assert_eq!(response.dishes.len(), 1);
    let dish = &response.dishes[0];
    assert_eq!(dish.slug, "veganswap-1");
    assert_eq!(dish.total_time, "40 min");
    assert_eq!(dish.rating, Some(4.9));

    assert_eq!(response.meta.original_dish, "Fish Curry");
    assert_eq!(response.meta.applied_restrictions, vec!["jain"]);
    assert_eq!(response.meta.texture_preference, Some(0.7));
}

#[tokio::test]
async fn veganswap_passes_upstream_status_through() {
    let server = MockServer::start_async().await;
    let _swap = server
        .mock_async(|when, then| {
            when.method(POST).path("/swap/");
            then.status(422).body("bad dish");
        })
        .await;

    let err = veganswap(Some(server.base_url()))
        .swap(&VeganSwapRequest {
            dish_name: "Fish".to_string(),
            ..VeganSwapRequest::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), 422);
    assert_eq!(err.to_string(), "VeganSwap engine returned an error");
}

#[tokio::test]
async fn veganswap_without_suggestions_returns_empty_list() {
    let server = MockServer::start_async().await;
    let _swap = server
        .mock_async(|when, then| {
            when.method(POST).path("/swap/");
            then.status(200).body(json!({ "suggestions": null }).to_string());
        })
        .await;

    let response = veganswap(Some(server.base_url()))
        .swap(&VeganSwapRequest {
            dish_name: "Fish".to_string(),
            ..VeganSwapRequest::default()
        })
        .await
        .unwrap();
    assert!(response.dishes.is_empty());
}

#[tokio::test]
async fn veganswap_checks_configuration_and_input() {
    let err = veganswap(None)
        .swap(&VeganSwapRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, IntegrationError::NotConfigured(_)));
    assert_eq!(err.to_string(), "VEGANSWAP_API_BASE_URL is not configured");

    let err = veganswap(Some("http://127.0.0.1:9".to_string()))
        .swap(&VeganSwapRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "dishName is required");
}

#[tokio::test]
async fn veganswap_unreachable_backend_is_bad_gateway() {
    // Nothing listens on the discard port.
    let err = veganswap(Some("http://127.0.0.1:9".to_string()))
        .swap(&VeganSwapRequest {
            dish_name: "Fish".to_string(),
            ..VeganSwapRequest::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), 502);
    assert_eq!(err.to_string(), "Unable to reach VeganSwap backend");
}

#[tokio::test]
async fn suggest_uses_model_output() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key")
                .header("x-title", "OffRamp Tests");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(completion("```json\n[{\"name\": \"Soya Keema\"}]\n```"));
        })
        .await;

    let outcome = openrouter(server.base_url(), Some("test-key"))
        .suggest("keema", &json!({ "spice": "high" }))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome.provider, "openrouter");
    assert_eq!(outcome.suggestions[0]["name"], "Soya Keema");
}

#[tokio::test]
async fn suggest_with_empty_model_answer_keeps_openrouter_provider() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(completion("[]"));
        })
        .await;

    let outcome = openrouter(server.base_url(), Some("test-key"))
        .suggest("keema", &json!({}))
        .await
        .unwrap();

    assert_eq!(outcome.provider, "openrouter");
    assert_eq!(outcome.suggestions, fallback_suggestions());
}

#[tokio::test]
async fn suggest_falls_back_without_key_or_on_errors() {
    let outcome = openrouter("http://127.0.0.1:9".to_string(), None)
        .suggest("keema", &json!({}))
        .await
        .unwrap();
    assert_eq!(outcome.provider, FALLBACK_PROVIDER);
    assert_eq!(outcome.suggestions[0]["name"], "Jackfruit Biryani");

    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500);
        })
        .await;

    let outcome = openrouter(server.base_url(), Some("test-key"))
        .suggest("keema", &json!({}))
        .await
        .unwrap();
    assert_eq!(outcome.provider, FALLBACK_PROVIDER);
}

#[tokio::test]
async fn suggest_requires_query() {
    let err = openrouter("http://127.0.0.1:9".to_string(), Some("key"))
        .suggest("   ", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Query is required");
}

#[tokio::test]
async fn cost_savings_parses_number() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(completion("Estimated savings: ₹100"));
        })
        .await;

    let savings = openrouter(server.base_url(), Some("test-key"))
        .cost_savings(&cost_input())
        .await
        .unwrap();
    assert_eq!(savings, Some(100));
}

#[tokio::test]
async fn cost_savings_error_mapping() {
    let client = openrouter("http://127.0.0.1:9".to_string(), Some("test-key"));
    let err = client
        .cost_savings(&CostSavingsInput {
            vegan_cost: Some("  ".to_string()),
            ..cost_input()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "Missing cost comparison fields");

    let err = openrouter("http://127.0.0.1:9".to_string(), None)
        .cost_savings(&cost_input())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 500);
    assert_eq!(err.to_string(), "Server configuration error");

    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429).body("rate limited");
        })
        .await;
    let err = openrouter(server.base_url(), Some("test-key"))
        .cost_savings(&cost_input())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 502);
    assert_eq!(err.to_string(), "Failed to calculate savings");
}

#[tokio::test]
async fn chat_relays_the_event_stream() {
    let events = "data: {\"choices\":[{\"delta\":{\"content\":\"Yes\"}}]}\n\ndata: [DONE]\n\n";
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer chat-key")
                .header("x-title", "Dish Assistant")
                .json_body_partial(r#"{ "stream": true, "model": "openai/gpt-4o-mini" }"#);
            then.status(200)
                .header("Content-Type", "text/event-stream")
                .body(events);
        })
        .await;

    let reply = chat(server.base_url(), Some("chat-key"))
        .reply(&chat_request())
        .await;

    let ChatReply::Stream(stream) = reply else {
        panic!("expected a streamed reply");
    };
    let chunks: Vec<_> = stream.try_collect().await.unwrap();
    let body: Vec<u8> = chunks.iter().flat_map(|chunk| chunk.iter().copied()).collect();

    mock.assert_async().await;
    assert_eq!(String::from_utf8(body).unwrap(), events);
}

#[tokio::test]
async fn chat_falls_back_without_key_or_on_upstream_errors() {
    let reply = chat("http://127.0.0.1:9".to_string(), None)
        .reply(&chat_request())
        .await;
    assert!(reply.is_fallback());

    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429);
        })
        .await;

    let reply = chat(server.base_url(), Some("chat-key"))
        .reply(&chat_request())
        .await;
    assert!(reply.is_fallback());

    let reply = chat("http://127.0.0.1:9".to_string(), Some("chat-key"))
        .reply(&chat_request())
        .await;
    assert!(reply.is_fallback());
}

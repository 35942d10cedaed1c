use orbit_server::ai::gemini::{GeminiClient, MODEL_CANDIDATES};
use orbit_server::ai::{AiError, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generate_path(endpoint: &str, model: &str) -> String {
    format!("/{endpoint}/models/{model}:generateContent")
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

#[tokio::test]
async fn first_candidate_answer_is_used() {
    let server = MockServer::start().await;
    let (endpoint, model) = MODEL_CANDIDATES[0];
    Mock::given(method("POST"))
        .and(path(generate_path(endpoint, model)))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({ "contents": [{ "parts": [{ "text": "Hello" }] }] })))
        .respond_with(text_response("Hi there"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(Some("test-key".to_string()), server.uri()).unwrap();
    let generation = client.generate("Hello").await.unwrap();

    assert_eq!(generation.text, "Hi there");
    assert_eq!(generation.model, model);
}

#[tokio::test]
async fn falls_back_to_next_candidate_on_failure() {
    let server = MockServer::start().await;
    let (first_endpoint, first_model) = MODEL_CANDIDATES[0];
    let (second_endpoint, second_model) = MODEL_CANDIDATES[1];
    Mock::given(method("POST"))
        .and(path(generate_path(first_endpoint, first_model)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "message": "model not found" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(generate_path(second_endpoint, second_model)))
        .respond_with(text_response("from fallback"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(Some("test-key".to_string()), format!("{}/", server.uri())).unwrap();
    let generation = client.generate("Summarize").await.unwrap();

    assert_eq!(generation.text, "from fallback");
    assert_eq!(generation.model, second_model);
}

#[tokio::test]
async fn malformed_success_body_moves_to_next_candidate() {
    let server = MockServer::start().await;
    let (first_endpoint, first_model) = MODEL_CANDIDATES[0];
    let (second_endpoint, second_model) = MODEL_CANDIDATES[1];
    Mock::given(method("POST"))
        .and(path(generate_path(first_endpoint, first_model)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(generate_path(second_endpoint, second_model)))
        .respond_with(text_response("second try"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(Some("test-key".to_string()), server.uri()).unwrap();
    let generation = client.generate("Quiz me").await.unwrap();

    assert_eq!(generation.text, "second try");
}

#[tokio::test]
async fn last_failure_decides_the_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "quota" }
        })))
        .expect(MODEL_CANDIDATES.len() as u64)
        .mount(&server)
        .await;

    let client = GeminiClient::new(Some("test-key".to_string()), server.uri()).unwrap();
    let err = client.generate("Hello").await.unwrap_err();

    assert_eq!(err, AiError::QuotaExceeded);
}

#[tokio::test]
async fn server_errors_surface_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "backend exploded" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(Some("test-key".to_string()), server.uri()).unwrap();
    let err = client.generate("Hello").await.unwrap_err();

    assert_eq!(err, AiError::Upstream("backend exploded".to_string()));
    assert_eq!(err.to_string(), "AI service error: backend exploded");
}

#[tokio::test]
async fn missing_key_never_calls_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::new(None, server.uri()).unwrap();
    let err = client.generate("Hello").await.unwrap_err();

    assert_eq!(err, AiError::NotConfigured);
}

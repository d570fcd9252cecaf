use axum::{
	Json, Router,
	http::{HeaderMap, StatusCode},
	routing::{get, post},
};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use replydesk_config::{Auth, LlmProviderConfig};
use replydesk_domain::prompt::{ChatMessage, ChatRole};
use replydesk_providers::{Error, completion, session};

async fn spawn(router: Router) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock server.");
	let addr = listener.local_addr().expect("Failed to read mock server address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, router).await;
	});

	format!("http://{addr}")
}

fn llm_config(api_base: String) -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "mock".to_string(),
		api_base,
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "gpt-4".to_string(),
		temperature: 0.7,
		timeout_ms: 5_000,
		default_headers: Map::new(),
	}
}

fn auth_config(url: String) -> Auth {
	Auth { url, public_key: "anon-key".to_string(), timeout_ms: 5_000 }
}

#[test]
fn builds_bearer_auth_header() {
	let headers = replydesk_providers::auth_headers("secret", &Map::new())
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_header() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = replydesk_providers::auth_headers("secret", &defaults)
		.expect_err("Expected invalid default header.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn completion_sends_model_and_messages() {
	let router = Router::new().route(
		"/v1/chat/completions",
		post(|headers: HeaderMap, Json(body): Json<Value>| async move {
			assert_eq!(
				headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
				Some("Bearer test-key")
			);
			assert_eq!(body["model"], "gpt-4");
			assert_eq!(body["messages"][0]["role"], "system");
			assert_eq!(body["messages"][1]["content"], "Do you have weekend slots?");

			Json(serde_json::json!({
				"choices": [{ "message": { "role": "assistant", "content": "We do, Saturday 9-5." } }]
			}))
		}),
	);
	let base = spawn(router).await;
	let messages = vec![
		ChatMessage::new(ChatRole::System, "You are helpful."),
		ChatMessage::new(ChatRole::User, "Do you have weekend slots?"),
	];
	let text = completion::complete(&llm_config(base), &messages)
		.await
		.expect("Completion should succeed.");

	assert_eq!(text, "We do, Saturday 9-5.");
}

#[tokio::test]
async fn completion_surfaces_http_errors() {
	let router = Router::new()
		.route("/v1/chat/completions", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
	let base = spawn(router).await;
	let err = completion::complete(&llm_config(base), &[])
		.await
		.expect_err("Completion should fail.");

	assert!(matches!(err, Error::Reqwest(_)), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn session_lookup_returns_user() {
	let router = Router::new().route(
		"/auth/v1/user",
		get(|headers: HeaderMap| async move {
			assert_eq!(headers.get("apikey").and_then(|v| v.to_str().ok()), Some("anon-key"));

			match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
				Some("Bearer good-token") => (
					StatusCode::OK,
					Json(serde_json::json!({ "id": "b1", "email": "owner@example.com" })),
				),
				_ => (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "msg": "invalid" }))),
			}
		}),
	);
	let base = spawn(router).await;
	let cfg = auth_config(base);
	let user = session::fetch_user(&cfg, "good-token").await.expect("Lookup should succeed.");

	assert_eq!(user.user_id, "b1");
	assert_eq!(user.email.as_deref(), Some("owner@example.com"));

	let err = session::fetch_user(&cfg, "bad-token").await.expect_err("Lookup should fail.");

	assert!(matches!(err, Error::Unauthorized), "Unexpected error: {err:?}");
}

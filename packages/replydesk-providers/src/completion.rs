use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use replydesk_config::LlmProviderConfig;
use replydesk_domain::prompt::ChatMessage;

use crate::{Error, Result};

/// Requests one chat completion and returns the top choice's text verbatim.
pub async fn complete(cfg: &LlmProviderConfig, messages: &[ChatMessage]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	tracing::debug!(provider_id = %cfg.provider_id, model = %cfg.model, "Completion received.");

	parse_completion_text(&json)
}

pub fn parse_completion_text(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str());

	match content {
		Some(text) if !text.is_empty() => Ok(text.to_string()),
		Some(_) => Err(Error::InvalidResponse {
			message: "Completion response content is empty.".to_string(),
		}),
		None => Err(Error::InvalidResponse {
			message: "Completion response is missing choices[0].message.content.".to_string(),
		}),
	}
}

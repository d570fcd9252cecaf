use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

const REDACTED: &str = "[redacted]";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub auth: Auth,
	pub webhook: Webhook,
	#[serde(default)]
	pub security: Security,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
}

/// An OpenAI-compatible chat completion endpoint.
#[derive(Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_completion_path")]
	pub path: String,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl fmt::Debug for LlmProviderConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LlmProviderConfig")
			.field("provider_id", &self.provider_id)
			.field("api_base", &self.api_base)
			.field("api_key", &REDACTED)
			.field("path", &self.path)
			.field("model", &self.model)
			.field("temperature", &self.temperature)
			.field("timeout_ms", &self.timeout_ms)
			.field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Hosted authentication service that issues dashboard sessions.
#[derive(Clone, Deserialize)]
pub struct Auth {
	/// Base URL, e.g. "https://project.example.co".
	pub url: String,
	/// Public (anon) key sent as the `apikey` header.
	pub public_key: String,
	#[serde(default = "default_auth_timeout_ms")]
	pub timeout_ms: u64,
}
impl fmt::Debug for Auth {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Auth")
			.field("url", &self.url)
			.field("public_key", &REDACTED)
			.field("timeout_ms", &self.timeout_ms)
			.finish()
	}
}

#[derive(Clone, Deserialize)]
pub struct Webhook {
	/// Shared secret for the `X-Yelp-Signature` HMAC.
	pub yelp_secret: String,
}
impl fmt::Debug for Webhook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Webhook").field("yelp_secret", &REDACTED).finish()
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Security {
	#[serde(default)]
	pub bind_localhost_only: bool,
	#[serde(default)]
	pub rate_limit: RateLimit,
}

/// Fixed-window limit shared by every route of the process.
#[derive(Clone, Debug, Deserialize)]
pub struct RateLimit {
	#[serde(default = "default_rate_limit_max_requests")]
	pub max_requests: u32,
	#[serde(default = "default_rate_limit_window_secs")]
	pub window_secs: u64,
}
impl Default for RateLimit {
	fn default() -> Self {
		Self {
			max_requests: default_rate_limit_max_requests(),
			window_secs: default_rate_limit_window_secs(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_completion_path() -> String {
	"/chat/completions".to_string()
}

fn default_model() -> String {
	"gpt-4".to_string()
}

fn default_temperature() -> f32 {
	0.7
}

fn default_auth_timeout_ms() -> u64 {
	5_000
}

fn default_rate_limit_max_requests() -> u32 {
	100
}

fn default_rate_limit_window_secs() -> u64 {
	15 * 60
}

mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Auth, Config, LlmProviderConfig, Postgres, Providers, RateLimit, Security, Service, Storage,
	Webhook,
};

use std::{fs, net::SocketAddr, path::Path};

use url::Url;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address, e.g. 127.0.0.1:3000.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	validate_auth(&cfg.auth)?;

	if cfg.webhook.yelp_secret.trim().is_empty() {
		return Err(Error::Validation {
			message: "webhook.yelp_secret must be non-empty.".to_string(),
		});
	}

	let llm = &cfg.providers.llm;

	for (label, value) in [
		("providers.llm.api_base", &llm.api_base),
		("providers.llm.api_key", &llm.api_key),
		("providers.llm.model", &llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&llm.temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.security.rate_limit.max_requests == 0 {
		return Err(Error::Validation {
			message: "security.rate_limit.max_requests must be greater than zero.".to_string(),
		});
	}
	if cfg.security.rate_limit.window_secs == 0 {
		return Err(Error::Validation {
			message: "security.rate_limit.window_secs must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_auth(auth: &Auth) -> Result<()> {
	if auth.url.trim().is_empty() {
		return Err(Error::Validation { message: "auth.url must be non-empty.".to_string() });
	}

	let parsed = Url::parse(&auth.url).map_err(|err| Error::Validation {
		message: format!("auth.url must be a valid URL: {err}."),
	})?;

	if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
		return Err(Error::Validation {
			message: "auth.url must be an absolute http or https URL.".to_string(),
		});
	}
	if auth.public_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "auth.public_key must be non-empty.".to_string(),
		});
	}
	if auth.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "auth.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.auth.url = cfg.auth.url.trim().trim_end_matches('/').to_string();
	cfg.auth.public_key = cfg.auth.public_key.trim().to_string();
	cfg.providers.llm.api_base = cfg.providers.llm.api_base.trim().trim_end_matches('/').to_string();

	if !cfg.providers.llm.path.starts_with('/') {
		cfg.providers.llm.path = format!("/{}", cfg.providers.llm.path);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = include_str!("../tests/fixtures/sample_config.toml");

	#[test]
	fn normalize_strips_trailing_slashes() {
		let mut cfg: Config = toml::from_str(SAMPLE).expect("Failed to parse sample config.");

		cfg.auth.url = " https://auth.example.com/ ".to_string();
		cfg.providers.llm.api_base = "https://api.openai.com/v1/".to_string();
		cfg.providers.llm.path = "chat/completions".to_string();

		normalize(&mut cfg);

		assert_eq!(cfg.auth.url, "https://auth.example.com");
		assert_eq!(cfg.providers.llm.api_base, "https://api.openai.com/v1");
		assert_eq!(cfg.providers.llm.path, "/chat/completions");
	}
}

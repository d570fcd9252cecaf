//! Access-token lookup against the hosted authentication service.

use std::time::Duration;

use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;

use replydesk_config::Auth;

use crate::{Error, Result};

const USER_PATH: &str = "/auth/v1/user";

/// The signed-in dashboard user. Its id doubles as the business id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
	#[serde(rename = "id")]
	pub user_id: String,
	#[serde(default)]
	pub email: Option<String>,
}

pub async fn fetch_user(cfg: &Auth, access_token: &str) -> Result<SessionUser> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{USER_PATH}", cfg.url);
	let res = client
		.get(&url)
		.header("apikey", cfg.public_key.as_str())
		.header(AUTHORIZATION, format!("Bearer {access_token}"))
		.send()
		.await?;

	if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
		return Err(Error::Unauthorized);
	}

	let user: SessionUser = res.error_for_status()?.json().await?;

	if user.user_id.trim().is_empty() {
		return Err(Error::InvalidResponse {
			message: "Auth service returned a user without an id.".to_string(),
		});
	}

	Ok(user)
}

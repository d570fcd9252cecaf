use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, ReplydeskService, Result, require_text};
use replydesk_providers::session::SessionUser;
use replydesk_storage::{models::Business, queries::businesses};

/// Business profile as shown to its owner. The platform key itself is never returned.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessView {
	pub id: String,
	pub email: String,
	pub business_name: String,
	pub phone: Option<String>,
	pub website_url: Option<String>,
	pub address: Option<String>,
	pub yelp_connected: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Business> for BusinessView {
	fn from(business: Business) -> Self {
		Self {
			yelp_connected: business.yelp_api_key.as_deref().is_some_and(|key| !key.is_empty()),
			id: business.business_id,
			email: business.email,
			business_name: business.business_name,
			phone: business.phone,
			website_url: business.website_url,
			address: business.address,
			created_at: business.created_at,
			updated_at: business.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectBusinessRequest {
	pub business_name: String,
	#[serde(default)]
	pub phone: Option<String>,
	#[serde(default)]
	pub website_url: Option<String>,
	#[serde(default)]
	pub address: Option<String>,
	/// Omitted keeps the stored key.
	#[serde(default)]
	pub yelp_api_key: Option<String>,
}

impl ReplydeskService {
	pub async fn get_business(&self, business_id: &str) -> Result<BusinessView> {
		businesses::get_business(&self.db.pool, business_id)
			.await?
			.map(BusinessView::from)
			.ok_or_else(|| Error::NotFound { message: "Business is not connected.".to_string() })
	}

	/// Creates or updates the signed-in user's business profile.
	pub async fn connect_business(
		&self,
		user: &SessionUser,
		req: ConnectBusinessRequest,
	) -> Result<BusinessView> {
		require_text("businessName", &req.business_name)?;

		let Some(email) = user.email.as_deref().filter(|email| !email.trim().is_empty()) else {
			return Err(Error::InvalidRequest {
				message: "Signed-in user has no email address.".to_string(),
			});
		};
		let now = OffsetDateTime::now_utc();
		let business = Business {
			business_id: user.user_id.clone(),
			email: email.to_string(),
			business_name: req.business_name.trim().to_string(),
			phone: non_blank(req.phone),
			website_url: non_blank(req.website_url),
			address: non_blank(req.address),
			yelp_api_key: non_blank(req.yelp_api_key),
			created_at: now,
			updated_at: now,
		};
		let stored = businesses::upsert_business(&self.db.pool, &business).await?;

		tracing::info!(business_id = %stored.business_id, "Business profile saved.");

		Ok(stored.into())
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|raw| raw.trim().to_string()).filter(|trimmed| !trimmed.is_empty())
}

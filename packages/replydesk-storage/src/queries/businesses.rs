use sqlx::PgExecutor;

use crate::{Result, models::Business};

pub async fn get_business<'e, E>(executor: E, business_id: &str) -> Result<Option<Business>>
where
	E: PgExecutor<'e>,
{
	let business = sqlx::query_as::<_, Business>(
		"\
SELECT *
FROM businesses
WHERE business_id = $1",
	)
	.bind(business_id)
	.fetch_optional(executor)
	.await?;

	Ok(business)
}

/// Creates the business on first connect and updates its profile afterwards.
///
/// A `None` platform key keeps the stored one.
pub async fn upsert_business<'e, E>(executor: E, business: &Business) -> Result<Business>
where
	E: PgExecutor<'e>,
{
	let stored = sqlx::query_as::<_, Business>(
		"\
INSERT INTO businesses (
	business_id,
	email,
	business_name,
	phone,
	website_url,
	address,
	yelp_api_key,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (business_id) DO UPDATE
SET
	business_name = EXCLUDED.business_name,
	phone = EXCLUDED.phone,
	website_url = EXCLUDED.website_url,
	address = EXCLUDED.address,
	yelp_api_key = COALESCE(EXCLUDED.yelp_api_key, businesses.yelp_api_key),
	updated_at = EXCLUDED.updated_at
RETURNING *",
	)
	.bind(business.business_id.as_str())
	.bind(business.email.as_str())
	.bind(business.business_name.as_str())
	.bind(business.phone.as_deref())
	.bind(business.website_url.as_deref())
	.bind(business.address.as_deref())
	.bind(business.yelp_api_key.as_deref())
	.bind(business.created_at)
	.bind(business.updated_at)
	.fetch_one(executor)
	.await?;

	Ok(stored)
}

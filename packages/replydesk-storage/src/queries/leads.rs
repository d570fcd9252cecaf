use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	models::{Lead, LeadStats},
};

pub async fn insert_lead<'e, E>(executor: E, lead: &Lead) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO leads (
	lead_id,
	business_id,
	customer_name,
	email,
	phone,
	message,
	status,
	source,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
	)
	.bind(lead.lead_id)
	.bind(lead.business_id.as_str())
	.bind(lead.customer_name.as_str())
	.bind(lead.email.as_str())
	.bind(lead.phone.as_deref())
	.bind(lead.message.as_str())
	.bind(lead.status.as_str())
	.bind(lead.source.as_str())
	.bind(lead.created_at)
	.bind(lead.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_lead<'e, E>(executor: E, lead_id: Uuid) -> Result<Option<Lead>>
where
	E: PgExecutor<'e>,
{
	let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE lead_id = $1")
		.bind(lead_id)
		.fetch_optional(executor)
		.await?;

	Ok(lead)
}

pub async fn get_business_lead<'e, E>(
	executor: E,
	business_id: &str,
	lead_id: Uuid,
) -> Result<Option<Lead>>
where
	E: PgExecutor<'e>,
{
	let lead =
		sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE lead_id = $1 AND business_id = $2")
			.bind(lead_id)
			.bind(business_id)
			.fetch_optional(executor)
			.await?;

	Ok(lead)
}

/// Newest first. `status` narrows the listing when given.
pub async fn list_leads<'e, E>(
	executor: E,
	business_id: &str,
	status: Option<&str>,
) -> Result<Vec<Lead>>
where
	E: PgExecutor<'e>,
{
	let leads = sqlx::query_as::<_, Lead>(
		"\
SELECT *
FROM leads
WHERE business_id = $1
	AND ($2::text IS NULL OR status = $2)
ORDER BY created_at DESC, lead_id",
	)
	.bind(business_id)
	.bind(status)
	.fetch_all(executor)
	.await?;

	Ok(leads)
}

/// Moves a `NEW` lead to `RESPONDED`; any other status is kept. Returns the current row.
pub async fn mark_responded<'e, E>(
	executor: E,
	lead_id: Uuid,
	now: OffsetDateTime,
) -> Result<Option<Lead>>
where
	E: PgExecutor<'e>,
{
	let lead = sqlx::query_as::<_, Lead>(
		"\
UPDATE leads
SET
	status = CASE WHEN status = 'NEW' THEN 'RESPONDED' ELSE status END,
	updated_at = CASE WHEN status = 'NEW' THEN $2 ELSE updated_at END
WHERE lead_id = $1
RETURNING *",
	)
	.bind(lead_id)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(lead)
}

/// Compare-and-set on the status column. `None` means the row no longer holds `expected`.
pub async fn update_lead_status<'e, E>(
	executor: E,
	lead_id: Uuid,
	expected: &str,
	next: &str,
	now: OffsetDateTime,
) -> Result<Option<Lead>>
where
	E: PgExecutor<'e>,
{
	let lead = sqlx::query_as::<_, Lead>(
		"\
UPDATE leads
SET status = $3, updated_at = $4
WHERE lead_id = $1 AND status = $2
RETURNING *",
	)
	.bind(lead_id)
	.bind(expected)
	.bind(next)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(lead)
}

pub async fn lead_stats<'e, E>(executor: E, business_id: &str) -> Result<LeadStats>
where
	E: PgExecutor<'e>,
{
	let stats = sqlx::query_as::<_, LeadStats>(
		"\
SELECT
	count(*) AS total_leads,
	count(*) FILTER (WHERE l.status <> 'NEW') AS replied_leads,
	count(*) FILTER (WHERE l.status = 'CLOSED') AS closed_leads,
	avg(EXTRACT(EPOCH FROM (r.first_reply_at - l.created_at)))::float8 AS avg_response_secs
FROM leads l
LEFT JOIN LATERAL (
	SELECT min(m.created_at) AS first_reply_at
	FROM conversations c
	JOIN messages m ON m.conversation_id = c.conversation_id
	WHERE c.lead_id = l.lead_id AND m.sender <> 'CUSTOMER'
) r ON TRUE
WHERE l.business_id = $1",
	)
	.bind(business_id)
	.fetch_one(executor)
	.await?;

	Ok(stats)
}

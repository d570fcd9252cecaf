use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::Template};

pub async fn insert_template<'e, E>(executor: E, template: &Template) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO templates (
	template_id,
	business_id,
	name,
	content,
	category,
	is_active,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(template.template_id)
	.bind(template.business_id.as_str())
	.bind(template.name.as_str())
	.bind(template.content.as_str())
	.bind(template.category.as_str())
	.bind(template.is_active)
	.bind(template.created_at)
	.bind(template.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Newest first, active and inactive alike.
pub async fn list_templates<'e, E>(executor: E, business_id: &str) -> Result<Vec<Template>>
where
	E: PgExecutor<'e>,
{
	let templates = sqlx::query_as::<_, Template>(
		"\
SELECT *
FROM templates
WHERE business_id = $1
ORDER BY created_at DESC, template_id",
	)
	.bind(business_id)
	.fetch_all(executor)
	.await?;

	Ok(templates)
}

/// Active templates only, oldest first, as fed to reply prompts.
pub async fn list_active_templates<'e, E>(executor: E, business_id: &str) -> Result<Vec<Template>>
where
	E: PgExecutor<'e>,
{
	let templates = sqlx::query_as::<_, Template>(
		"\
SELECT *
FROM templates
WHERE business_id = $1 AND is_active
ORDER BY created_at, template_id",
	)
	.bind(business_id)
	.fetch_all(executor)
	.await?;

	Ok(templates)
}

pub async fn get_template<'e, E>(
	executor: E,
	business_id: &str,
	template_id: Uuid,
) -> Result<Option<Template>>
where
	E: PgExecutor<'e>,
{
	let template = sqlx::query_as::<_, Template>(
		"SELECT * FROM templates WHERE template_id = $1 AND business_id = $2",
	)
	.bind(template_id)
	.bind(business_id)
	.fetch_optional(executor)
	.await?;

	Ok(template)
}

pub async fn update_template<'e, E>(executor: E, template: &Template) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE templates
SET
	name = $3,
	content = $4,
	category = $5,
	is_active = $6,
	updated_at = $7
WHERE template_id = $1 AND business_id = $2",
	)
	.bind(template.template_id)
	.bind(template.business_id.as_str())
	.bind(template.name.as_str())
	.bind(template.content.as_str())
	.bind(template.category.as_str())
	.bind(template.is_active)
	.bind(template.updated_at)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

pub async fn delete_template<'e, E>(executor: E, business_id: &str, template_id: Uuid) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM templates WHERE template_id = $1 AND business_id = $2")
		.bind(template_id)
		.bind(business_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}

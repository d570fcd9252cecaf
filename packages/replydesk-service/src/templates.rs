use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, ReplydeskService, Result, require_text};
use replydesk_storage::{
	models::Template,
	queries::{businesses, templates},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
	pub id: Uuid,
	pub name: String,
	pub content: String,
	pub category: String,
	pub is_active: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Template> for TemplateView {
	fn from(template: Template) -> Self {
		Self {
			id: template.template_id,
			name: template.name,
			content: template.content,
			category: template.category,
			is_active: template.is_active,
			created_at: template.created_at,
			updated_at: template.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
	pub name: String,
	pub content: String,
	pub category: String,
	#[serde(default)]
	pub is_active: Option<bool>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub is_active: Option<bool>,
}

impl ReplydeskService {
	pub async fn list_templates(&self, business_id: &str) -> Result<Vec<TemplateView>> {
		let rows = templates::list_templates(&self.db.pool, business_id).await?;

		Ok(rows.into_iter().map(TemplateView::from).collect())
	}

	pub async fn create_template(
		&self,
		business_id: &str,
		req: CreateTemplateRequest,
	) -> Result<TemplateView> {
		require_text("name", &req.name)?;
		require_text("content", &req.content)?;
		require_text("category", &req.category)?;

		if businesses::get_business(&self.db.pool, business_id).await?.is_none() {
			return Err(Error::NotFound { message: "Business is not connected.".to_string() });
		}

		let now = OffsetDateTime::now_utc();
		let template = Template {
			template_id: Uuid::new_v4(),
			business_id: business_id.to_string(),
			name: req.name.trim().to_string(),
			content: req.content,
			category: req.category.trim().to_string(),
			is_active: req.is_active.unwrap_or(true),
			created_at: now,
			updated_at: now,
		};

		templates::insert_template(&self.db.pool, &template).await?;

		tracing::info!(template_id = %template.template_id, business_id, "Template created.");

		Ok(template.into())
	}

	pub async fn update_template(
		&self,
		business_id: &str,
		template_id: Uuid,
		req: UpdateTemplateRequest,
	) -> Result<TemplateView> {
		let mut template = templates::get_template(&self.db.pool, business_id, template_id)
			.await?
			.ok_or_else(not_found)?;

		if let Some(name) = req.name {
			require_text("name", &name)?;

			template.name = name.trim().to_string();
		}
		if let Some(content) = req.content {
			require_text("content", &content)?;

			template.content = content;
		}
		if let Some(category) = req.category {
			require_text("category", &category)?;

			template.category = category.trim().to_string();
		}
		if let Some(is_active) = req.is_active {
			template.is_active = is_active;
		}

		template.updated_at = OffsetDateTime::now_utc();

		if templates::update_template(&self.db.pool, &template).await? == 0 {
			return Err(not_found());
		}

		Ok(template.into())
	}

	pub async fn delete_template(&self, business_id: &str, template_id: Uuid) -> Result<()> {
		if templates::delete_template(&self.db.pool, business_id, template_id).await? == 0 {
			return Err(not_found());
		}

		tracing::info!(%template_id, business_id, "Template deleted.");

		Ok(())
	}
}

fn not_found() -> Error {
	Error::NotFound { message: "Template not found.".to_string() }
}

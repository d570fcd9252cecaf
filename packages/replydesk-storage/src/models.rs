use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Business {
	pub business_id: String,
	pub email: String,
	pub business_name: String,
	pub phone: Option<String>,
	pub website_url: Option<String>,
	pub address: Option<String>,
	pub yelp_api_key: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Lead {
	pub lead_id: Uuid,
	pub business_id: String,
	pub customer_name: String,
	pub email: String,
	pub phone: Option<String>,
	pub message: String,
	pub status: String,
	pub source: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Conversation {
	pub conversation_id: Uuid,
	pub lead_id: Uuid,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Message {
	pub message_id: Uuid,
	pub conversation_id: Uuid,
	pub content: String,
	pub sender: String,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Template {
	pub template_id: Uuid,
	pub business_id: String,
	pub name: String,
	pub content: String,
	pub category: String,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct LeadStats {
	pub total_leads: i64,
	pub replied_leads: i64,
	pub closed_leads: i64,
	/// Mean seconds from lead creation to its first non-customer message.
	pub avg_response_secs: Option<f64>,
}

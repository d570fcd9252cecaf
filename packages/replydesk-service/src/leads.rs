use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, ReplydeskService, Result, conversations::MessageView, require_text};
use replydesk_domain::lead::{LeadSource, LeadStatus, MessageSender};
use replydesk_storage::{
	models::{Conversation, Lead, Message},
	queries::{businesses, conversations, leads},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadView {
	pub id: Uuid,
	pub business_id: String,
	pub customer_name: String,
	pub email: String,
	pub phone: Option<String>,
	pub message: String,
	pub status: LeadStatus,
	pub source: LeadSource,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl TryFrom<Lead> for LeadView {
	type Error = Error;

	fn try_from(lead: Lead) -> Result<Self> {
		Ok(Self {
			id: lead.lead_id,
			status: lead.status.parse()?,
			source: lead.source.parse()?,
			business_id: lead.business_id,
			customer_name: lead.customer_name,
			email: lead.email,
			phone: lead.phone,
			message: lead.message,
			created_at: lead.created_at,
			updated_at: lead.updated_at,
		})
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualLeadRequest {
	pub customer_name: String,
	pub email: String,
	#[serde(default)]
	pub phone: Option<String>,
	pub message: String,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UpdateLeadStatusRequest {
	pub status: LeadStatus,
}

/// A freshly created lead with its conversation and opening customer message.
pub(crate) struct NewLead {
	pub(crate) lead: Lead,
	pub(crate) conversation: Conversation,
	pub(crate) first_message: Message,
}
impl NewLead {
	pub(crate) fn build(
		business_id: &str,
		customer_name: &str,
		email: &str,
		phone: Option<&str>,
		message: &str,
		source: LeadSource,
		now: OffsetDateTime,
	) -> Self {
		let lead = Lead {
			lead_id: Uuid::new_v4(),
			business_id: business_id.to_string(),
			customer_name: customer_name.trim().to_string(),
			email: email.trim().to_string(),
			phone: phone.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string),
			message: message.to_string(),
			status: LeadStatus::New.as_str().to_string(),
			source: source.as_str().to_string(),
			created_at: now,
			updated_at: now,
		};
		let conversation = Conversation {
			conversation_id: Uuid::new_v4(),
			lead_id: lead.lead_id,
			created_at: now,
			updated_at: now,
		};
		let first_message = Message {
			message_id: Uuid::new_v4(),
			conversation_id: conversation.conversation_id,
			content: message.to_string(),
			sender: MessageSender::Customer.as_str().to_string(),
			created_at: now,
		};

		Self { lead, conversation, first_message }
	}

	/// Writes the lead, its conversation and the customer message as one unit.
	pub(crate) async fn persist(&self, service: &ReplydeskService) -> Result<()> {
		let mut tx = service.db.pool.begin().await?;

		leads::insert_lead(&mut *tx, &self.lead).await?;
		conversations::insert_conversation(&mut *tx, &self.conversation).await?;
		conversations::insert_message(&mut *tx, &self.first_message).await?;

		tx.commit().await?;

		Ok(())
	}
}

impl ReplydeskService {
	pub async fn list_leads(
		&self,
		business_id: &str,
		status: Option<LeadStatus>,
	) -> Result<Vec<LeadView>> {
		let rows =
			leads::list_leads(&self.db.pool, business_id, status.map(LeadStatus::as_str)).await?;

		rows.into_iter().map(LeadView::try_from).collect()
	}

	pub async fn get_lead(&self, business_id: &str, lead_id: Uuid) -> Result<LeadView> {
		self.require_lead(business_id, lead_id).await?.try_into()
	}

	/// Records a lead entered from the dashboard. No reply is drafted.
	pub async fn create_manual_lead(
		&self,
		business_id: &str,
		req: ManualLeadRequest,
	) -> Result<LeadView> {
		require_text("customerName", &req.customer_name)?;
		require_text("email", &req.email)?;
		require_text("message", &req.message)?;

		if businesses::get_business(&self.db.pool, business_id).await?.is_none() {
			return Err(Error::NotFound { message: "Business is not connected.".to_string() });
		}

		let created = NewLead::build(
			business_id,
			&req.customer_name,
			&req.email,
			req.phone.as_deref(),
			&req.message,
			LeadSource::Manual,
			OffsetDateTime::now_utc(),
		);

		created.persist(self).await?;

		tracing::info!(lead_id = %created.lead.lead_id, business_id, "Manual lead created.");

		created.lead.try_into()
	}

	pub async fn update_lead_status(
		&self,
		business_id: &str,
		lead_id: Uuid,
		req: UpdateLeadStatusRequest,
	) -> Result<LeadView> {
		let lead = self.require_lead(business_id, lead_id).await?;
		let current: LeadStatus = lead.status.parse()?;
		let Some(next) = current.transition(req.status)? else {
			return lead.try_into();
		};
		let updated = leads::update_lead_status(
			&self.db.pool,
			lead_id,
			current.as_str(),
			next.as_str(),
			OffsetDateTime::now_utc(),
		)
		.await?
		.ok_or_else(|| Error::Conflict {
			message: "Lead status changed concurrently; reload and retry.".to_string(),
		})?;

		tracing::info!(%lead_id, from = %current, to = %next, "Lead status updated.");

		updated.try_into()
	}

	/// Drafts a fresh AI reply for an existing lead and records it like the webhook does.
	pub async fn reply_to_lead(&self, business_id: &str, lead_id: Uuid) -> Result<MessageView> {
		let lead = self.require_lead(business_id, lead_id).await?;
		let conversation = conversations::get_lead_conversation(&self.db.pool, lead_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Conversation not found.".to_string() })?;
		let content = self.generate_reply(lead_id, &lead.message).await?;
		let (_, message) = self.record_reply(&conversation, MessageSender::Ai, content).await?;

		Ok(message)
	}

	pub(crate) async fn require_lead(&self, business_id: &str, lead_id: Uuid) -> Result<Lead> {
		leads::get_business_lead(&self.db.pool, business_id, lead_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Lead not found.".to_string() })
	}

	/// Appends a reply to the conversation and moves a `NEW` lead to `RESPONDED` in one
	/// transaction.
	pub(crate) async fn record_reply(
		&self,
		conversation: &Conversation,
		sender: MessageSender,
		content: String,
	) -> Result<(LeadView, MessageView)> {
		let now = OffsetDateTime::now_utc();
		let message = Message {
			message_id: Uuid::new_v4(),
			conversation_id: conversation.conversation_id,
			content,
			sender: sender.as_str().to_string(),
			created_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		conversations::insert_message(&mut *tx, &message).await?;
		conversations::touch_conversation(&mut *tx, conversation.conversation_id, now).await?;

		let lead = leads::mark_responded(&mut *tx, conversation.lead_id, now)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Lead not found.".to_string() })?;

		tx.commit().await?;

		Ok((lead.try_into()?, message.try_into()?))
	}
}

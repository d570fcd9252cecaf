use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, LeadView, ReplydeskService, Result, require_text};
use replydesk_domain::lead::MessageSender;
use replydesk_storage::{
	models::{Conversation, Message},
	queries::{conversations, leads},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
	pub id: Uuid,
	pub conversation_id: Uuid,
	pub content: String,
	pub sender: MessageSender,
	#[serde(rename = "timestamp", with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl TryFrom<Message> for MessageView {
	type Error = Error;

	fn try_from(message: Message) -> Result<Self> {
		Ok(Self {
			id: message.message_id,
			conversation_id: message.conversation_id,
			sender: message.sender.parse()?,
			content: message.content,
			created_at: message.created_at,
		})
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
	pub id: Uuid,
	pub lead_id: Uuid,
	pub lead: LeadView,
	pub messages: Vec<MessageView>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PostMessageRequest {
	pub content: String,
}

impl ReplydeskService {
	/// Every conversation of the business with its lead and messages, most recently active
	/// first.
	pub async fn list_conversations(&self, business_id: &str) -> Result<Vec<ConversationView>> {
		let rows = conversations::list_business_conversations(&self.db.pool, business_id).await?;

		if rows.is_empty() {
			return Ok(Vec::new());
		}

		let mut leads_by_id = HashMap::new();

		for lead in leads::list_leads(&self.db.pool, business_id, None).await? {
			leads_by_id.insert(lead.lead_id, LeadView::try_from(lead)?);
		}

		let ids = rows.iter().map(|row| row.conversation_id).collect::<Vec<_>>();
		let mut messages_by_conversation: HashMap<Uuid, Vec<MessageView>> = HashMap::new();

		for message in conversations::list_messages_for(&self.db.pool, &ids).await? {
			messages_by_conversation
				.entry(message.conversation_id)
				.or_default()
				.push(message.try_into()?);
		}

		let mut out = Vec::with_capacity(rows.len());

		for row in rows {
			let Some(lead) = leads_by_id.remove(&row.lead_id) else {
				continue;
			};
			let messages = messages_by_conversation.remove(&row.conversation_id).unwrap_or_default();

			out.push(conversation_view(row, lead, messages));
		}

		Ok(out)
	}

	pub async fn get_conversation(
		&self,
		business_id: &str,
		conversation_id: Uuid,
	) -> Result<ConversationView> {
		let row = self.require_conversation(business_id, conversation_id).await?;
		let lead = self.require_lead(business_id, row.lead_id).await?.try_into()?;
		let messages = conversations::list_messages(&self.db.pool, conversation_id)
			.await?
			.into_iter()
			.map(MessageView::try_from)
			.collect::<Result<Vec<_>>>()?;

		Ok(conversation_view(row, lead, messages))
	}

	/// Appends a message written by the business owner. A `NEW` lead becomes `RESPONDED`.
	pub async fn post_business_message(
		&self,
		business_id: &str,
		conversation_id: Uuid,
		req: PostMessageRequest,
	) -> Result<MessageView> {
		require_text("content", &req.content)?;

		let row = self.require_conversation(business_id, conversation_id).await?;
		let (_, message) = self.record_reply(&row, MessageSender::Business, req.content).await?;

		tracing::info!(%conversation_id, "Business reply recorded.");

		Ok(message)
	}

	async fn require_conversation(
		&self,
		business_id: &str,
		conversation_id: Uuid,
	) -> Result<Conversation> {
		conversations::get_business_conversation(&self.db.pool, business_id, conversation_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Conversation not found.".to_string() })
	}
}

fn conversation_view(
	row: Conversation,
	lead: LeadView,
	messages: Vec<MessageView>,
) -> ConversationView {
	ConversationView {
		id: row.conversation_id,
		lead_id: row.lead_id,
		lead,
		messages,
		created_at: row.created_at,
		updated_at: row.updated_at,
	}
}

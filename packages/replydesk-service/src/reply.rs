use uuid::Uuid;

use crate::{Error, ReplydeskService, Result};
use replydesk_domain::{
	lead::MessageSender,
	prompt::{self, ChatMessage, HistoryEntry, ReplyPrompt},
};
use replydesk_storage::{
	models::Message,
	queries::{businesses, conversations, leads, templates},
};

impl ReplydeskService {
	/// Asks the language model for a reply to `message` in the context of the lead's business,
	/// active templates and conversation so far.
	///
	/// Nothing is written. Model failures surface as [`Error::Provider`].
	pub async fn generate_reply(&self, lead_id: Uuid, message: &str) -> Result<String> {
		let messages = self.reply_messages(lead_id, message).await?;

		let reply = self.providers.completion.complete(&self.cfg.providers.llm, &messages).await;

		reply.map_err(|err| {
			let detail = match err {
				Error::Provider { message } => message,
				other => other.to_string(),
			};

			Error::Provider { message: format!("Failed to generate AI response: {detail}") }
		})
	}

	pub(crate) async fn reply_messages(
		&self,
		lead_id: Uuid,
		message: &str,
	) -> Result<Vec<ChatMessage>> {
		let lead = leads::get_lead(&self.db.pool, lead_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Lead not found.".to_string() })?;
		let business = businesses::get_business(&self.db.pool, &lead.business_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Business not found.".to_string() })?;
		let stored = match conversations::get_lead_conversation(&self.db.pool, lead_id).await? {
			Some(conversation) =>
				conversations::list_messages(&self.db.pool, conversation.conversation_id).await?,
			None => Vec::new(),
		};
		let active = templates::list_active_templates(&self.db.pool, &lead.business_id).await?;
		let history = stored.iter().map(history_entry).collect::<Result<Vec<_>>>()?;
		let template_texts = active.iter().map(|row| row.content.as_str()).collect::<Vec<_>>();

		Ok(prompt::build_reply_messages(&ReplyPrompt {
			business_name: &business.business_name,
			templates: &template_texts,
			history: &history,
			latest: message,
		}))
	}
}

fn history_entry(row: &Message) -> Result<HistoryEntry<'_>> {
	Ok(HistoryEntry { sender: row.sender.parse::<MessageSender>()?, content: &row.content })
}

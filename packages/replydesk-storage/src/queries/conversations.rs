use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{Conversation, Message},
};

/// A lead holds at most one conversation; a second insert is a [`Error::Conflict`].
pub async fn insert_conversation<'e, E>(executor: E, conversation: &Conversation) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO conversations (conversation_id, lead_id, created_at, updated_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(conversation.conversation_id)
	.bind(conversation.lead_id)
	.bind(conversation.created_at)
	.bind(conversation.updated_at)
	.execute(executor)
	.await
	.map_err(|err| match err {
		sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => Error::Conflict(
			format!("Lead {} already has a conversation.", conversation.lead_id),
		),
		other => Error::Sqlx(other),
	})?;

	Ok(())
}

pub async fn get_lead_conversation<'e, E>(executor: E, lead_id: Uuid) -> Result<Option<Conversation>>
where
	E: PgExecutor<'e>,
{
	let conversation =
		sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE lead_id = $1")
			.bind(lead_id)
			.fetch_optional(executor)
			.await?;

	Ok(conversation)
}

pub async fn get_business_conversation<'e, E>(
	executor: E,
	business_id: &str,
	conversation_id: Uuid,
) -> Result<Option<Conversation>>
where
	E: PgExecutor<'e>,
{
	let conversation = sqlx::query_as::<_, Conversation>(
		"\
SELECT c.*
FROM conversations c
JOIN leads l ON l.lead_id = c.lead_id
WHERE c.conversation_id = $1 AND l.business_id = $2",
	)
	.bind(conversation_id)
	.bind(business_id)
	.fetch_optional(executor)
	.await?;

	Ok(conversation)
}

/// Most recently active first, by `updated_at`.
pub async fn list_business_conversations<'e, E>(
	executor: E,
	business_id: &str,
) -> Result<Vec<Conversation>>
where
	E: PgExecutor<'e>,
{
	let conversations = sqlx::query_as::<_, Conversation>(
		"\
SELECT c.*
FROM conversations c
JOIN leads l ON l.lead_id = c.lead_id
WHERE l.business_id = $1
ORDER BY c.updated_at DESC, c.conversation_id",
	)
	.bind(business_id)
	.fetch_all(executor)
	.await?;

	Ok(conversations)
}

pub async fn touch_conversation<'e, E>(
	executor: E,
	conversation_id: Uuid,
	now: OffsetDateTime,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query("UPDATE conversations SET updated_at = $2 WHERE conversation_id = $1")
		.bind(conversation_id)
		.bind(now)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn insert_message<'e, E>(executor: E, message: &Message) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO messages (message_id, conversation_id, content, sender, created_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(message.message_id)
	.bind(message.conversation_id)
	.bind(message.content.as_str())
	.bind(message.sender.as_str())
	.bind(message.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Oldest first; insertion order breaks timestamp ties.
pub async fn list_messages<'e, E>(executor: E, conversation_id: Uuid) -> Result<Vec<Message>>
where
	E: PgExecutor<'e>,
{
	let messages = sqlx::query_as::<_, Message>(
		"\
SELECT message_id, conversation_id, content, sender, created_at
FROM messages
WHERE conversation_id = $1
ORDER BY created_at, seq",
	)
	.bind(conversation_id)
	.fetch_all(executor)
	.await?;

	Ok(messages)
}

/// Messages of several conversations, grouped by conversation and oldest first within each.
pub async fn list_messages_for<'e, E>(
	executor: E,
	conversation_ids: &[Uuid],
) -> Result<Vec<Message>>
where
	E: PgExecutor<'e>,
{
	let messages = sqlx::query_as::<_, Message>(
		"\
SELECT message_id, conversation_id, content, sender, created_at
FROM messages
WHERE conversation_id = ANY($1)
ORDER BY conversation_id, created_at, seq",
	)
	.bind(conversation_ids)
	.fetch_all(executor)
	.await?;

	Ok(messages)
}

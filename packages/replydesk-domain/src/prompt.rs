use serde::{Deserialize, Serialize};

use crate::lead::MessageSender;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
	System,
	User,
	Assistant,
}
impl From<MessageSender> for ChatRole {
	fn from(sender: MessageSender) -> Self {
		if sender.is_reply() { Self::Assistant } else { Self::User }
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: ChatRole,
	pub content: String,
}
impl ChatMessage {
	pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
		Self { role, content: content.into() }
	}
}

/// One stored message of the lead's conversation, oldest first.
#[derive(Clone, Copy, Debug)]
pub struct HistoryEntry<'a> {
	pub sender: MessageSender,
	pub content: &'a str,
}

pub struct ReplyPrompt<'a> {
	pub business_name: &'a str,
	/// Contents of the business's active templates.
	pub templates: &'a [&'a str],
	pub history: &'a [HistoryEntry<'a>],
	pub latest: &'a str,
}

pub fn system_instruction(business_name: &str, templates: &[&str]) -> String {
	format!(
		"You are a professional customer service representative for {business_name}. \
		 Use the following response templates as guidance: {}",
		templates.join("\n")
	)
}

/// Assembles the completion request: system instruction, prior history, then the latest
/// customer message.
///
/// The latest message is usually already stored. History is cut at the last customer entry with
/// the same text so the model sees only what preceded the message being answered, and the
/// message itself is sent once, last.
pub fn build_reply_messages(prompt: &ReplyPrompt<'_>) -> Vec<ChatMessage> {
	let history = prompt
		.history
		.iter()
		.rposition(|entry| {
			entry.sender == MessageSender::Customer && entry.content == prompt.latest
		})
		.map_or(prompt.history, |idx| &prompt.history[..idx]);
	let mut messages = Vec::with_capacity(history.len() + 2);

	messages.push(ChatMessage::new(
		ChatRole::System,
		system_instruction(prompt.business_name, prompt.templates),
	));
	messages.extend(
		history.iter().map(|entry| ChatMessage::new(entry.sender.into(), entry.content)),
	);
	messages.push(ChatMessage::new(ChatRole::User, prompt.latest));

	messages
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn system_instruction_joins_templates_by_newline() {
		let text = system_instruction("Acme Plumbing", &["Hi there!", "Thanks for reaching out."]);

		assert!(text.starts_with(
			"You are a professional customer service representative for Acme Plumbing."
		));
		assert!(text.ends_with("guidance: Hi there!\nThanks for reaching out."));
	}

	#[test]
	fn maps_senders_to_chat_roles() {
		assert_eq!(ChatRole::from(MessageSender::Customer), ChatRole::User);
		assert_eq!(ChatRole::from(MessageSender::Ai), ChatRole::Assistant);
		assert_eq!(ChatRole::from(MessageSender::Business), ChatRole::Assistant);
	}
}

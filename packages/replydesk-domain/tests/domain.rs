use replydesk_domain::{
	lead::{LeadSource, LeadStatus, MessageSender, TransitionError},
	prompt::{self, ChatRole, HistoryEntry, ReplyPrompt},
	signature::{self, SignatureError},
};

#[test]
fn lead_status_follows_reply_then_close() {
	assert_eq!(LeadStatus::New.transition(LeadStatus::Responded), Ok(Some(LeadStatus::Responded)));
	assert_eq!(LeadStatus::Responded.transition(LeadStatus::Closed), Ok(Some(LeadStatus::Closed)));
	assert_eq!(LeadStatus::New.transition(LeadStatus::Closed), Ok(Some(LeadStatus::Closed)));
	assert_eq!(LeadStatus::Responded.transition(LeadStatus::Responded), Ok(None));
	assert_eq!(
		LeadStatus::Closed.transition(LeadStatus::Responded),
		Err(TransitionError::Illegal { from: LeadStatus::Closed, to: LeadStatus::Responded })
	);
}

#[test]
fn enums_serialize_as_screaming_case() {
	assert_eq!(serde_json::to_value(LeadStatus::Responded).expect("serialize"), "RESPONDED");
	assert_eq!(serde_json::to_value(LeadSource::Yelp).expect("serialize"), "YELP");
	assert_eq!(serde_json::to_value(MessageSender::Ai).expect("serialize"), "AI");

	let status: LeadStatus = serde_json::from_str("\"CLOSED\"").expect("deserialize");

	assert_eq!(status, LeadStatus::Closed);
}

#[test]
fn reply_prompt_orders_system_history_then_latest() {
	let templates = ["Greet warmly.", "Offer a booking link."];
	let history = [
		HistoryEntry { sender: MessageSender::Customer, content: "Are you open Sunday?" },
		HistoryEntry { sender: MessageSender::Ai, content: "Yes, from 10 to 4." },
	];
	let messages = prompt::build_reply_messages(&ReplyPrompt {
		business_name: "Jane's Salon",
		templates: &templates,
		history: &history,
		latest: "Do you have weekend slots?",
	});

	assert_eq!(messages.len(), 4);
	assert_eq!(messages[0].role, ChatRole::System);
	assert!(messages[0].content.contains("Jane's Salon"));
	assert!(messages[0].content.contains("Greet warmly.\nOffer a booking link."));
	assert_eq!(messages[1].role, ChatRole::User);
	assert_eq!(messages[1].content, "Are you open Sunday?");
	assert_eq!(messages[2].role, ChatRole::Assistant);
	assert_eq!(messages[3].role, ChatRole::User);
	assert_eq!(messages[3].content, "Do you have weekend slots?");
}

#[test]
fn reply_prompt_does_not_repeat_stored_latest_message() {
	let history =
		[HistoryEntry { sender: MessageSender::Customer, content: "Do you have weekend slots?" }];
	let messages = prompt::build_reply_messages(&ReplyPrompt {
		business_name: "Jane's Salon",
		templates: &[],
		history: &history,
		latest: "Do you have weekend slots?",
	});

	assert_eq!(messages.len(), 2);
	assert_eq!(messages[1].role, ChatRole::User);
	assert_eq!(messages[1].content, "Do you have weekend slots?");
}

#[test]
fn reply_prompt_for_answered_lead_stops_before_its_message() {
	let history = [
		HistoryEntry { sender: MessageSender::Customer, content: "Hi, quick question." },
		HistoryEntry { sender: MessageSender::Ai, content: "Sure, ask away." },
		HistoryEntry { sender: MessageSender::Customer, content: "Do you have weekend slots?" },
		HistoryEntry { sender: MessageSender::Ai, content: "Saturday 10am is open." },
		HistoryEntry { sender: MessageSender::Business, content: "Sunday works too." },
	];
	let messages = prompt::build_reply_messages(&ReplyPrompt {
		business_name: "Jane's Salon",
		templates: &[],
		history: &history,
		latest: "Do you have weekend slots?",
	});
	let contents = messages.iter().skip(1).map(|m| m.content.as_str()).collect::<Vec<_>>();

	assert_eq!(
		contents,
		["Hi, quick question.", "Sure, ask away.", "Do you have weekend slots?"]
	);
	assert_eq!(messages.last().map(|m| m.role), Some(ChatRole::User));
	assert_eq!(
		messages.iter().filter(|m| m.content == "Do you have weekend slots?").count(),
		1
	);
}

#[test]
fn chat_messages_serialize_with_lowercase_roles() {
	let messages = prompt::build_reply_messages(&ReplyPrompt {
		business_name: "Acme",
		templates: &[],
		history: &[],
		latest: "Hello",
	});
	let json = serde_json::to_value(&messages).expect("serialize");

	assert_eq!(json[0]["role"], "system");
	assert_eq!(json[1]["role"], "user");
	assert_eq!(json[1]["content"], "Hello");
}

#[test]
fn signature_round_trips_and_rejects_tampering() {
	let body = br#"{"businessId":"b1","customerData":{"name":"Jane"}}"#;
	let good = signature::sign("shared-secret", body);

	assert_eq!(good.len(), 64);
	assert_eq!(signature::verify("shared-secret", body, Some(good.as_str())), Ok(()));
	assert_eq!(
		signature::verify("other-secret", body, Some(good.as_str())),
		Err(SignatureError::Mismatch)
	);
	assert_eq!(
		signature::verify("shared-secret", b"{\"businessId\":\"b2\"}", Some(good.as_str())),
		Err(SignatureError::Mismatch)
	);
}

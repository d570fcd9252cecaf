//! Yelp webhook intake: lead creation followed by an automatic AI reply.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{LeadView, ReplydeskService, Result, leads::NewLead, require_text};
use replydesk_domain::lead::{LeadSource, MessageSender};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YelpWebhookRequest {
	pub business_id: String,
	pub customer_data: WebhookCustomer,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WebhookCustomer {
	pub name: String,
	pub email: String,
	pub message: String,
	#[serde(default)]
	pub phone: Option<String>,
}

impl ReplydeskService {
	/// Runs the intake pipeline for one inbound lead.
	///
	/// The lead, its conversation and the customer message are committed before the model is
	/// called. When the model fails the lead stays `NEW` with only the customer message and the
	/// error is returned. On success the AI message is stored and the lead becomes `RESPONDED`.
	pub async fn process_yelp_lead(&self, req: &YelpWebhookRequest) -> Result<LeadView> {
		require_text("businessId", &req.business_id)?;
		require_text("customerData.name", &req.customer_data.name)?;
		require_text("customerData.email", &req.customer_data.email)?;
		require_text("customerData.message", &req.customer_data.message)?;

		let customer = &req.customer_data;
		let created = NewLead::build(
			req.business_id.trim(),
			&customer.name,
			&customer.email,
			customer.phone.as_deref(),
			&customer.message,
			LeadSource::Yelp,
			OffsetDateTime::now_utc(),
		);

		created.persist(self).await?;

		let lead_id = created.lead.lead_id;

		tracing::info!(%lead_id, business_id = %created.lead.business_id, "Lead received from Yelp.");

		let reply = match self.generate_reply(lead_id, &customer.message).await {
			Ok(reply) => reply,
			Err(err) => {
				tracing::error!(error = %err, %lead_id, "AI reply failed. Lead left as NEW.");

				return Err(err);
			},
		};
		let (lead, _) = self.record_reply(&created.conversation, MessageSender::Ai, reply).await?;

		tracing::info!(%lead_id, "AI reply recorded.");

		Ok(lead)
	}
}

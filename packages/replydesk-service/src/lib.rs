pub mod businesses;
pub mod conversations;
pub mod intake;
pub mod leads;
pub mod metrics;
pub mod reply;
pub mod session;
pub mod templates;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use businesses::{BusinessView, ConnectBusinessRequest};
pub use conversations::{ConversationView, MessageView, PostMessageRequest};
pub use error::{Error, Result};
pub use intake::{WebhookCustomer, YelpWebhookRequest};
pub use leads::{LeadView, ManualLeadRequest, UpdateLeadStatusRequest};
pub use metrics::BusinessMetrics;
pub use templates::{CreateTemplateRequest, TemplateView, UpdateTemplateRequest};

use replydesk_config::{Auth, Config, LlmProviderConfig};
use replydesk_domain::prompt::ChatMessage;
use replydesk_providers::{completion, session::SessionUser};
use replydesk_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Produces the reply text for an assembled chat request.
pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, Result<String>>;
}

/// Resolves a dashboard access token to its user.
pub trait SessionProvider
where
	Self: Send + Sync,
{
	fn fetch_user<'a>(
		&'a self,
		cfg: &'a Auth,
		access_token: &'a str,
	) -> BoxFuture<'a, Result<SessionUser>>;
}

#[derive(Clone)]
pub struct Providers {
	pub completion: Arc<dyn CompletionProvider>,
	pub session: Arc<dyn SessionProvider>,
}
impl Providers {
	pub fn new(completion: Arc<dyn CompletionProvider>, session: Arc<dyn SessionProvider>) -> Self {
		Self { completion, session }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { completion: Arc::new(DefaultProviders), session: Arc::new(DefaultProviders) }
	}
}

pub struct ReplydeskService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl ReplydeskService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}

struct DefaultProviders;
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(completion::complete(cfg, messages).await?) })
	}
}

impl SessionProvider for DefaultProviders {
	fn fetch_user<'a>(
		&'a self,
		cfg: &'a Auth,
		access_token: &'a str,
	) -> BoxFuture<'a, Result<SessionUser>> {
		Box::pin(async move { Ok(replydesk_providers::session::fetch_user(cfg, access_token).await?) })
	}
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidRequest { message: format!("{field} must not be empty.") });
	}

	Ok(())
}

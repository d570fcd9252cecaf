use std::sync::Arc;

use crate::rate_limit::FixedWindow;
use replydesk_service::ReplydeskService;
use replydesk_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ReplydeskService>,
	pub rate_limit: Arc<FixedWindow>,
}
impl AppState {
	pub async fn new(config: replydesk_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(ReplydeskService::new(config, db)))
	}

	pub fn from_service(service: ReplydeskService) -> Self {
		let rate_limit = FixedWindow::from_config(&service.cfg.security.rate_limit);

		Self { service: Arc::new(service), rate_limit: Arc::new(rate_limit) }
	}
}

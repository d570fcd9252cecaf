use crate::{Error, ReplydeskService, Result};
use replydesk_providers::session::SessionUser;

impl ReplydeskService {
	/// Resolves a bearer token to the signed-in user. The user id is the business id every
	/// dashboard operation is scoped to.
	pub async fn authenticate(&self, access_token: &str) -> Result<SessionUser> {
		let token = access_token.trim();

		if token.is_empty() {
			return Err(Error::Unauthorized { message: "Missing access token.".to_string() });
		}

		let user = self.providers.session.fetch_user(&self.cfg.auth, token).await?;

		tracing::debug!(user_id = %user.user_id, "Session resolved.");

		Ok(user)
	}
}

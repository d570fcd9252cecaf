//! Process-wide fixed-window request limiter.

use std::{
	sync::Mutex,
	time::{Duration, Instant},
};

use axum::{
	body::Body,
	extract::State,
	http::{Request, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
};

use crate::{routes, state::AppState};
use replydesk_config::RateLimit;

pub struct FixedWindow {
	max_requests: u32,
	window: Duration,
	current: Mutex<Window>,
}
impl FixedWindow {
	pub fn new(max_requests: u32, window: Duration) -> Self {
		let current = Mutex::new(Window { started: Instant::now(), count: 0 });

		Self { max_requests, window, current }
	}

	pub fn from_config(cfg: &RateLimit) -> Self {
		Self::new(cfg.max_requests, Duration::from_secs(cfg.window_secs))
	}

	/// Counts one request at `now`. Returns `false` once the window's budget is spent.
	pub fn try_acquire_at(&self, now: Instant) -> bool {
		let mut current = match self.current.lock() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		};

		if now.saturating_duration_since(current.started) >= self.window {
			*current = Window { started: now, count: 0 };
		}
		if current.count >= self.max_requests {
			return false;
		}

		current.count += 1;

		true
	}

	pub fn try_acquire(&self) -> bool {
		self.try_acquire_at(Instant::now())
	}
}

struct Window {
	started: Instant,
	count: u32,
}

pub async fn limit_requests(
	State(state): State<AppState>,
	req: Request<Body>,
	next: Next,
) -> Response {
	if !state.rate_limit.try_acquire() {
		tracing::warn!(path = %req.uri().path(), "Request rejected by rate limiter.");

		return routes::json_error(
			StatusCode::TOO_MANY_REQUESTS,
			"RATE_LIMITED",
			"Too many requests, please try again later.",
			None,
		)
		.into_response();
	}

	next.run(req).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_after_budget_until_window_elapses() {
		let limiter = FixedWindow::new(2, Duration::from_secs(60));
		let start = Instant::now();

		assert!(limiter.try_acquire_at(start));
		assert!(limiter.try_acquire_at(start + Duration::from_secs(1)));
		assert!(!limiter.try_acquire_at(start + Duration::from_secs(2)));
		assert!(!limiter.try_acquire_at(start + Duration::from_secs(59)));
		assert!(limiter.try_acquire_at(start + Duration::from_secs(61)));
	}

	#[test]
	fn rejected_requests_do_not_extend_the_window() {
		let limiter = FixedWindow::new(1, Duration::from_secs(10));
		let start = Instant::now();

		assert!(limiter.try_acquire_at(start));

		for offset in 1..10 {
			assert!(!limiter.try_acquire_at(start + Duration::from_secs(offset)));
		}

		assert!(limiter.try_acquire_at(start + Duration::from_secs(10)));
	}
}

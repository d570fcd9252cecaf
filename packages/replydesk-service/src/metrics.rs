use serde::{Deserialize, Serialize};

use crate::{ReplydeskService, Result};
use replydesk_storage::{models::LeadStats, queries::leads};

/// Dashboard summary. Rates are percentages and the response time is in minutes, each rounded
/// to one decimal place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
	pub total_leads: i64,
	pub response_rate: f64,
	pub average_response_time: f64,
	pub conversion_rate: f64,
}
impl From<&LeadStats> for BusinessMetrics {
	fn from(stats: &LeadStats) -> Self {
		if stats.total_leads <= 0 {
			return Self {
				total_leads: 0,
				response_rate: 0.0,
				average_response_time: 0.0,
				conversion_rate: 0.0,
			};
		}

		let total = stats.total_leads as f64;

		Self {
			total_leads: stats.total_leads,
			response_rate: round1(stats.replied_leads as f64 * 100.0 / total),
			average_response_time: round1(stats.avg_response_secs.unwrap_or(0.0).max(0.0) / 60.0),
			conversion_rate: round1(stats.closed_leads as f64 * 100.0 / total),
		}
	}
}

impl ReplydeskService {
	pub async fn metrics(&self, business_id: &str) -> Result<BusinessMetrics> {
		let stats = leads::lead_stats(&self.db.pool, business_id).await?;

		Ok(BusinessMetrics::from(&stats))
	}
}

fn round1(value: f64) -> f64 {
	(value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stats(total: i64, replied: i64, closed: i64, avg_secs: Option<f64>) -> LeadStats {
		LeadStats {
			total_leads: total,
			replied_leads: replied,
			closed_leads: closed,
			avg_response_secs: avg_secs,
		}
	}

	#[test]
	fn no_leads_yields_zeroes() {
		let metrics = BusinessMetrics::from(&stats(0, 0, 0, None));

		assert_eq!(metrics.total_leads, 0);
		assert_eq!(metrics.response_rate, 0.0);
		assert_eq!(metrics.average_response_time, 0.0);
		assert_eq!(metrics.conversion_rate, 0.0);
	}

	#[test]
	fn rates_are_percentages_of_all_leads() {
		let metrics = BusinessMetrics::from(&stats(3, 2, 1, Some(90.0)));

		assert_eq!(metrics.total_leads, 3);
		assert_eq!(metrics.response_rate, 66.7);
		assert_eq!(metrics.conversion_rate, 33.3);
		assert_eq!(metrics.average_response_time, 1.5);
	}

	#[test]
	fn missing_replies_count_as_zero_minutes() {
		let metrics = BusinessMetrics::from(&stats(2, 0, 0, None));

		assert_eq!(metrics.response_rate, 0.0);
		assert_eq!(metrics.average_response_time, 0.0);
	}
}

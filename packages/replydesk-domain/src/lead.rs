use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
	#[error("Lead status cannot change from {from} to {to}.")]
	Illegal { from: LeadStatus, to: LeadStatus },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown {kind} value {value:?}.")]
pub struct ParseEnumError {
	pub kind: &'static str,
	pub value: String,
}

/// Lifecycle of a lead.
///
/// `NEW` leads become `RESPONDED` once a reply (automated or from the business) is recorded.
/// `CLOSED` is set by the business and is terminal. Nothing returns a lead to `NEW`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
	New,
	Responded,
	Closed,
}
impl LeadStatus {
	pub const ALL: [Self; 3] = [Self::New, Self::Responded, Self::Closed];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::New => "NEW",
			Self::Responded => "RESPONDED",
			Self::Closed => "CLOSED",
		}
	}

	pub fn can_transition_to(self, next: Self) -> bool {
		matches!(
			(self, next),
			(Self::New, Self::Responded) | (Self::New, Self::Closed) | (Self::Responded, Self::Closed)
		)
	}

	/// Returns `Ok(None)` when `next` equals the current status.
	pub fn transition(self, next: Self) -> Result<Option<Self>, TransitionError> {
		if self == next {
			return Ok(None);
		}
		if !self.can_transition_to(next) {
			return Err(TransitionError::Illegal { from: self, to: next });
		}

		Ok(Some(next))
	}
}
impl fmt::Display for LeadStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for LeadStatus {
	type Err = ParseEnumError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"NEW" => Ok(Self::New),
			"RESPONDED" => Ok(Self::Responded),
			"CLOSED" => Ok(Self::Closed),
			_ => Err(ParseEnumError { kind: "lead status", value: value.to_string() }),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadSource {
	Yelp,
	Manual,
}
impl LeadSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Yelp => "YELP",
			Self::Manual => "MANUAL",
		}
	}
}
impl fmt::Display for LeadSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for LeadSource {
	type Err = ParseEnumError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"YELP" => Ok(Self::Yelp),
			"MANUAL" => Ok(Self::Manual),
			_ => Err(ParseEnumError { kind: "lead source", value: value.to_string() }),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageSender {
	Customer,
	Ai,
	Business,
}
impl MessageSender {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Customer => "CUSTOMER",
			Self::Ai => "AI",
			Self::Business => "BUSINESS",
		}
	}

	/// Anything not written by the customer counts as a reply.
	pub fn is_reply(self) -> bool {
		!matches!(self, Self::Customer)
	}
}
impl fmt::Display for MessageSender {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for MessageSender {
	type Err = ParseEnumError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"CUSTOMER" => Ok(Self::Customer),
			"AI" => Ok(Self::Ai),
			"BUSINESS" => Ok(Self::Business),
			_ => Err(ParseEnumError { kind: "message sender", value: value.to_string() }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nothing_returns_to_new() {
		for from in LeadStatus::ALL {
			if from == LeadStatus::New {
				continue;
			}

			assert_eq!(
				from.transition(LeadStatus::New),
				Err(TransitionError::Illegal { from, to: LeadStatus::New })
			);
		}
	}

	#[test]
	fn closed_is_terminal() {
		assert!(!LeadStatus::Closed.can_transition_to(LeadStatus::Responded));
		assert_eq!(LeadStatus::Closed.transition(LeadStatus::Closed), Ok(None));
	}

	#[test]
	fn parses_round_trip_strings() {
		for status in LeadStatus::ALL {
			assert_eq!(status.as_str().parse::<LeadStatus>(), Ok(status));
		}

		assert!("new".parse::<LeadStatus>().is_err());
		assert_eq!("AI".parse::<MessageSender>(), Ok(MessageSender::Ai));
		assert_eq!("MANUAL".parse::<LeadSource>(), Ok(LeadSource::Manual));
	}
}

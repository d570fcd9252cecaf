//! Shared-secret signatures for inbound webhooks.
//!
//! The platform signs the raw request body with HMAC-SHA256 and sends the lowercase hex digest
//! in a header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
	#[error("Signature header is missing.")]
	Missing,
	#[error("Signature is not valid hex.")]
	Malformed,
	#[error("Signature does not match the payload.")]
	Mismatch,
}

pub fn sign(secret: &str, body: &[u8]) -> String {
	hex::encode(mac(secret, body).finalize().into_bytes())
}

/// Checks `signature` against the body in constant time.
pub fn verify(secret: &str, body: &[u8], signature: Option<&str>) -> Result<(), SignatureError> {
	let signature = signature.map(str::trim).filter(|value| !value.is_empty());
	let Some(signature) = signature else {
		return Err(SignatureError::Missing);
	};
	let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
	let expected = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;

	mac(secret, body).verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
}

fn mac(secret: &str, body: &[u8]) -> HmacSha256 {
	// HMAC accepts keys of any length.
	let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
		.unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));

	mac.update(body);

	mac
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_prefixed_signature() {
		let body = br#"{"businessId":"b1"}"#;
		let signature = format!("sha256={}", sign("secret", body));

		assert_eq!(verify("secret", body, Some(signature.as_str())), Ok(()));
	}

	#[test]
	fn rejects_missing_and_blank() {
		assert_eq!(verify("secret", b"{}", None), Err(SignatureError::Missing));
		assert_eq!(verify("secret", b"{}", Some("  ")), Err(SignatureError::Missing));
	}

	#[test]
	fn rejects_non_hex() {
		assert_eq!(verify("secret", b"{}", Some("not-hex")), Err(SignatureError::Malformed));
	}
}

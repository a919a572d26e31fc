use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::{Error, Result};

/// The header and payload of a token, decoded without checking anything.
///
/// Useful for seeing why a token was rejected. Never trust the contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
	pub header: serde_json::Value,
	pub payload: serde_json::Value,
}

impl Inspection {
	/// The claimed signing algorithm, if the header names one.
	pub fn algorithm(&self) -> Option<&str> {
		self.header.get("alg")?.as_str()
	}
}

/// Split a compact token and decode its first two segments.
pub fn inspect(token: &str) -> Result<Inspection> {
	let mut parts = token.trim().split('.');
	let (Some(header), Some(payload), Some(_signature), None) = (parts.next(), parts.next(), parts.next(), parts.next())
	else {
		return Err(Error::InvalidToken("expected three dot-separated segments".to_string()));
	};

	Ok(Inspection {
		header: segment("header", header)?,
		payload: segment("payload", payload)?,
	})
}

fn segment(name: &str, encoded: &str) -> Result<serde_json::Value> {
	let raw = URL_SAFE_NO_PAD
		.decode(encoded)
		.map_err(|err| Error::InvalidToken(format!("{name} is not base64url: {err}")))?;

	serde_json::from_slice(&raw).map_err(|err| Error::InvalidToken(format!("{name} is not JSON: {err}")))
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;
	use crate::{Claims, Codec, Config};

	#[test]
	fn any_secret() {
		let codec = Codec::new(&Config::new("some-secret-nobody-else-knows!!!", "X", "Y"));
		let claims = Claims::sample("X", "Y").valid_for(1_000, Duration::from_secs(60));
		let token = codec.generate(&claims).unwrap();

		let inspection = inspect(&token).unwrap();
		assert_eq!(inspection.algorithm(), Some("HS256"));
		assert_eq!(inspection.payload["userId"], "test-user-id-123");
		assert_eq!(inspection.payload["iss"], "X");
		assert_eq!(inspection.payload["exp"], 1_060);
	}

	#[test]
	fn segment_count() {
		for token in ["", "abc", "a.b", "a.b.c.d"] {
			assert!(matches!(inspect(token), Err(Error::InvalidToken(_))), "accepted {token:?}");
		}
	}

	#[test]
	fn not_json() {
		let header = URL_SAFE_NO_PAD.encode(b"not json");
		let token = format!("{header}.e30.sig");
		assert!(matches!(inspect(&token), Err(Error::InvalidToken(_))));
	}

	#[test]
	fn surrounding_whitespace() {
		let token = "  eyJhbGciOiJub25lIn0.e30.  \n";
		let inspection = inspect(token).unwrap();
		assert_eq!(inspection.algorithm(), Some("none"));
		assert_eq!(inspection.payload, serde_json::json!({}));
	}
}

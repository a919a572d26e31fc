use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Placeholder secret used when none is configured. Only good for local tests.
pub const DEFAULT_SECRET: &str = "your-jwt-secret-key-min-32-characters-long";
pub const DEFAULT_ISSUER: &str = "saas-scaffolding";
pub const DEFAULT_AUDIENCE: &str = "microservices";

/// HS256 keys shorter than this are accepted but weak.
pub const MIN_SECRET_LEN: usize = 32;

/// The settings both sides of a token exchange must agree on.
///
/// Loaded once at startup and then only borrowed.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
	/// Shared HMAC secret.
	pub secret: String,

	/// Expected `iss` claim.
	pub issuer: String,

	/// Expected `aud` claim.
	pub audience: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			secret: DEFAULT_SECRET.to_string(),
			issuer: DEFAULT_ISSUER.to_string(),
			audience: DEFAULT_AUDIENCE.to_string(),
		}
	}
}

impl Config {
	pub fn new(secret: impl Into<String>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
		Self {
			secret: secret.into(),
			issuer: issuer.into(),
			audience: audience.into(),
		}
	}

	pub fn is_default_secret(&self) -> bool {
		self.secret == DEFAULT_SECRET
	}

	/// Fail with [`Error::UnconfiguredSecret`] if the placeholder secret is still in use.
	pub fn require_secret(&self) -> Result<()> {
		if self.is_default_secret() {
			return Err(Error::UnconfiguredSecret);
		}
		Ok(())
	}

	/// The secret with everything but the last 8 characters hidden.
	pub fn masked_secret(&self) -> String {
		let count = self.secret.chars().count();
		if count <= 8 {
			return "***".to_string();
		}

		let tail: String = self.secret.chars().skip(count - 8).collect();
		format!("{}...{}", "*".repeat(20), tail)
	}
}

// Never print the secret, even at trace level.
impl std::fmt::Debug for Config {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Config")
			.field("secret", &self.masked_secret())
			.field("issuer", &self.issuer)
			.field("audience", &self.audience)
			.finish()
	}
}

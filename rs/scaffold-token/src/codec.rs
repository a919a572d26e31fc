use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{Claims, Config, Error, MIN_SECRET_LEN, Result};

/// The current UTC time in seconds since the Unix epoch.
pub fn now() -> u64 {
	jsonwebtoken::get_current_timestamp()
}

/// Signs and verifies tokens for one [`Config`].
///
/// The algorithm is pinned to HS256; tokens using anything else are rejected.
pub struct Codec {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
	issuer: String,
	audience: String,
}

impl Codec {
	pub fn new(config: &Config) -> Self {
		if config.secret.len() < MIN_SECRET_LEN {
			tracing::warn!(
				len = config.secret.len(),
				min = MIN_SECRET_LEN,
				"secret is shorter than recommended for HS256"
			);
		}

		// Signature and structure only. Time, issuer and audience are checked
		// by hand against the caller's clock, so each failure keeps its own
		// variant and a fixed order.
		let mut validation = Validation::new(Algorithm::HS256);
		validation.validate_exp = false;
		validation.validate_nbf = false;
		validation.validate_aud = false;
		validation.required_spec_claims.clear();

		Self {
			encoding: EncodingKey::from_secret(config.secret.as_bytes()),
			decoding: DecodingKey::from_secret(config.secret.as_bytes()),
			validation,
			issuer: config.issuer.clone(),
			audience: config.audience.clone(),
		}
	}

	/// Sign the claims exactly as given.
	pub fn generate(&self, claims: &Claims) -> Result<String> {
		jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
			.map_err(|err| Error::Encode(err.to_string()))
	}

	/// Validate against the current UTC time.
	pub fn validate(&self, token: &str) -> Result<Claims> {
		self.validate_at(token, now())
	}

	/// Validate as if the current time were `now` seconds since the Unix epoch.
	///
	/// Checks run in order: signature, not-before, expiry, issuer, audience.
	/// The first failure wins. A token used before its `nbf` is an [`Error::InvalidToken`].
	pub fn validate_at(&self, token: &str, now: u64) -> Result<Claims> {
		let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
			.inspect_err(|err| tracing::debug!(%err, "token rejected"))?
			.claims;

		if let Some(nbf) = claims.not_before.filter(|_| claims.is_immature(now)) {
			return Err(Error::InvalidToken(format!("token is not valid before {nbf}")));
		}

		if claims.is_expired(now) {
			return Err(Error::Expired {
				expires_at: claims.expires_at,
			});
		}

		if claims.issuer.as_deref() != Some(self.issuer.as_str()) {
			return Err(Error::InvalidIssuer {
				expected: self.issuer.clone(),
				found: claims.issuer,
			});
		}

		if !claims.audience.as_ref().is_some_and(|aud| aud.contains(&self.audience)) {
			return Err(Error::InvalidAudience {
				expected: self.audience.clone(),
				found: claims.audience.map(|aud| aud.to_string()),
			});
		}

		tracing::debug!(user_id = ?claims.user_id, exp = claims.expires_at, "token accepted");

		Ok(claims)
	}
}

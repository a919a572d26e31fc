use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single grant carried in a token, displayed as `resource.action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
	pub resource: String,
	pub action: String,
}

impl Permission {
	pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			resource: resource.into(),
			action: action.into(),
		}
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.resource, self.action)
	}
}

/// The `aud` claim, either a single recipient or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
	Single(String),
	Many(Vec<String>),
}

impl Audience {
	/// True if `audience` is the recipient, or one of them.
	pub fn contains(&self, audience: &str) -> bool {
		match self {
			Self::Single(single) => single == audience,
			Self::Many(many) => many.iter().any(|aud| aud == audience),
		}
	}
}

impl From<String> for Audience {
	fn from(audience: String) -> Self {
		Self::Single(audience)
	}
}

impl From<&str> for Audience {
	fn from(audience: &str) -> Self {
		Self::Single(audience.to_string())
	}
}

impl fmt::Display for Audience {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Single(single) => write!(f, "{single}"),
			Self::Many(many) => write!(f, "[{}]", many.join(", ")),
		}
	}
}

/// The payload of a service token.
///
/// Identity fields are optional: a token from another issuer may leave any of
/// them out, and a missing field stays missing rather than being defaulted.
/// Claims that this struct doesn't know about are kept in [`Claims::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub organization_id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub organization_slug: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,

	/// In the order the issuer listed them.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub permissions: Vec<Permission>,

	#[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
	pub issuer: Option<String>,

	#[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
	pub audience: Option<Audience>,

	/// Seconds since the Unix epoch.
	#[serde(
		rename = "iat",
		default,
		deserialize_with = "numeric_date::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub issued_at: Option<u64>,

	/// Seconds since the Unix epoch. The token is rejected while `now < not_before`.
	#[serde(
		rename = "nbf",
		default,
		deserialize_with = "numeric_date::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub not_before: Option<u64>,

	/// Seconds since the Unix epoch. The token is rejected once `now >= expires_at`.
	#[serde(rename = "exp", deserialize_with = "numeric_date::required")]
	pub expires_at: u64,

	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl Claims {
	/// An empty payload bound to the given issuer and audience.
	///
	/// The expiry is zero until [`Claims::valid_for`] is called.
	pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
		Self {
			user_id: None,
			email: None,
			organization_id: None,
			organization_slug: None,
			role: None,
			permissions: Vec::new(),
			issuer: Some(issuer.into()),
			audience: Some(Audience::Single(audience.into())),
			issued_at: None,
			not_before: None,
			expires_at: 0,
			extra: BTreeMap::new(),
		}
	}

	/// The fixed test identity: an owner of `test-org` with a handful of grants.
	pub fn sample(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
		Self {
			user_id: Some("test-user-id-123".to_string()),
			email: Some("test@example.com".to_string()),
			organization_id: Some("test-org-id-456".to_string()),
			organization_slug: Some("test-org".to_string()),
			role: Some("owner".to_string()),
			permissions: vec![
				Permission::new("organization", "read"),
				Permission::new("organization", "update"),
				Permission::new("users", "read"),
				Permission::new("users", "create"),
			],
			..Self::new(issuer, audience)
		}
	}

	/// Stamp the token as issued at `now` and expiring `ttl` later.
	pub fn valid_for(mut self, now: u64, ttl: Duration) -> Self {
		self.issued_at = Some(now);
		self.expires_at = now.saturating_add(ttl.as_secs());
		self
	}

	/// Time left before the token expires, zero if it already has.
	pub fn expires_in(&self, now: u64) -> Duration {
		Duration::from_secs(self.expires_at.saturating_sub(now))
	}

	pub fn is_expired(&self, now: u64) -> bool {
		now >= self.expires_at
	}

	pub fn is_immature(&self, now: u64) -> bool {
		self.not_before.is_some_and(|nbf| now < nbf)
	}
}

/// Interpret a JSON number as whole seconds since the Unix epoch.
///
/// Fractions are truncated and anything before the epoch becomes zero,
/// the same reading other JWT libraries give a NumericDate.
pub fn numeric_date(value: &serde_json::Value) -> Option<u64> {
	let number = value.as_number()?;
	if let Some(secs) = number.as_u64() {
		return Some(secs);
	}
	if number.is_i64() {
		return Some(0);
	}

	// `as` saturates, so huge values clamp to u64::MAX.
	number.as_f64().filter(|secs| secs.is_finite()).map(|secs| secs.max(0.0) as u64)
}

mod numeric_date {
	use serde::de::{Deserializer, Error};
	use serde::Deserialize;

	fn seconds<E: Error>(number: serde_json::Number) -> Result<u64, E> {
		let value = serde_json::Value::Number(number);
		super::numeric_date(&value).ok_or_else(|| E::custom(format!("invalid NumericDate: {value}")))
	}

	pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
		seconds(serde_json::Number::deserialize(deserializer)?)
	}

	pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
		Option::<serde_json::Number>::deserialize(deserializer)?
			.map(seconds)
			.transpose()
	}
}

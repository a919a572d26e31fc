//! Human-readable output. Everything goes to stdout, failures included.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use scaffold_token::{Claims, Config, Error};
use serde::Serialize;

const WIDTH: usize = 70;

pub fn banner(w: &mut impl Write, title: &str) -> io::Result<()> {
	writeln!(w, "{}", "=".repeat(WIDTH))?;
	writeln!(w, "{title}")?;
	writeln!(w, "{}", "=".repeat(WIDTH))?;
	writeln!(w)
}

pub fn section(w: &mut impl Write, title: &str) -> io::Result<()> {
	writeln!(w, "{title}")?;
	writeln!(w, "{}", "-".repeat(WIDTH))
}

pub fn closing(w: &mut impl Write, message: &str) -> io::Result<()> {
	writeln!(w, "{}", "=".repeat(WIDTH))?;
	writeln!(w, "{message}")?;
	writeln!(w, "{}", "=".repeat(WIDTH))
}

pub fn configuration(w: &mut impl Write, config: &Config) -> io::Result<()> {
	writeln!(w, "Configuration:")?;
	writeln!(w, "  JWT_SECRET: {}", config.masked_secret())?;
	writeln!(w, "  JWT_ISSUER: {}", config.issuer)?;
	writeln!(w, "  JWT_AUDIENCE: {}", config.audience)?;
	writeln!(w)
}

/// Shown whenever the placeholder secret is in use.
pub fn default_secret(w: &mut impl Write, strict: bool) -> io::Result<()> {
	writeln!(w, "⚠️  WARNING: JWT_SECRET not configured!")?;
	if strict {
		writeln!(w, "   Set JWT_SECRET environment variable before testing")?;
		writeln!(w)?;
		writeln!(w, "   Example:")?;
		writeln!(w, "   export JWT_SECRET='your-actual-secret-key'")?;
		writeln!(w, "   scaffold-token validate <token>")?;
	} else {
		writeln!(w, "   Set JWT_SECRET environment variable to test with real tokens")?;
		writeln!(w)?;
		writeln!(w, "   For this test, using default secret (will only work with test tokens)")?;
	}
	writeln!(w)
}

pub fn usage(w: &mut impl Write) -> io::Result<()> {
	writeln!(w, "Usage:")?;
	writeln!(w, "  scaffold-token generate            # Generate and test token")?;
	writeln!(w, "  scaffold-token validate <token>    # Validate provided token")?;
	writeln!(w, "  scaffold-token inspect <token>     # Decode without verifying")?;
	writeln!(w)?;
	writeln!(w, "Example:")?;
	writeln!(w, "  scaffold-token validate 'eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...'")?;
	writeln!(w)?;
	writeln!(w, "To get a token, make a POST request to /api/microservices/token")?;
	writeln!(w, "from an authenticated session in the web app.")?;
	writeln!(w)
}

/// One line naming the failure, with the expected value where there is one.
pub fn failure(w: &mut impl Write, err: &Error) -> io::Result<()> {
	match err {
		Error::Expired { expires_at } => writeln!(w, "❌ Token expired at {}", timestamp(*expires_at)),
		Error::InvalidIssuer { expected, found } => {
			writeln!(w, "❌ Invalid issuer. Expected: {expected}")?;
			writeln!(w, "   Found: {}", or_absent(found.as_deref()))
		}
		Error::InvalidAudience { expected, found } => {
			writeln!(w, "❌ Invalid audience. Expected: {expected}")?;
			writeln!(w, "   Found: {}", or_absent(found.as_deref()))
		}
		Error::InvalidToken(reason) => writeln!(w, "❌ Invalid token: {reason}"),
		Error::MissingArgument => writeln!(w, "❌ No token provided"),
		Error::UnconfiguredSecret => writeln!(w, "❌ Refusing to validate with the default secret"),
		Error::Encode(reason) => writeln!(w, "❌ Failed to generate token: {reason}"),
	}
}

pub fn payload(w: &mut impl Write, claims: &Claims) -> io::Result<()> {
	section(w, "Token Payload:")?;
	json(w, claims)?;
	writeln!(w)
}

pub fn json(w: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
	serde_json::to_writer_pretty(&mut *w, value).map_err(io::Error::other)?;
	writeln!(w)
}

/// The identity fields by name, the grants, and how long the token has left.
pub fn extracted(w: &mut impl Write, claims: &Claims, now: u64) -> io::Result<()> {
	section(w, "Extracted Information:")?;
	writeln!(w, "  User ID: {}", or_absent(claims.user_id.as_deref()))?;
	writeln!(w, "  Email: {}", or_absent(claims.email.as_deref()))?;
	writeln!(w, "  Organization ID: {}", or_absent(claims.organization_id.as_deref()))?;
	writeln!(w, "  Organization Slug: {}", or_absent(claims.organization_slug.as_deref()))?;
	writeln!(w, "  Role: {}", or_absent(claims.role.as_deref()))?;
	writeln!(w, "  Permissions: {} permissions", claims.permissions.len())?;
	writeln!(w)?;

	if !claims.permissions.is_empty() {
		writeln!(w, "Permissions:")?;
		for permission in &claims.permissions {
			writeln!(w, "  - {permission}")?;
		}
		writeln!(w)?;
	}

	writeln!(w, "  Expires: {}", timestamp(claims.expires_at))?;
	writeln!(
		w,
		"  Time remaining: {}",
		humantime::format_duration(claims.expires_in(now))
	)?;
	writeln!(w)
}

fn or_absent(value: Option<&str>) -> &str {
	value.unwrap_or("not present")
}

/// Seconds since the epoch rendered in UTC.
pub fn timestamp(secs: u64) -> String {
	i64::try_from(secs)
		.ok()
		.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
		.map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
		.unwrap_or_else(|| format!("{secs} (out of range)"))
}

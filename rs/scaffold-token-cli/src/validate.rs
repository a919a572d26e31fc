use std::io::Write;

use clap::Args;
use scaffold_token::{Codec, Config, Error};

use crate::report;

#[derive(Args, Clone, Debug, Default)]
pub struct ValidateArgs {
	/// The compact JWT to check.
	pub token: Option<String>,

	/// Refuse to run with the placeholder secret.
	#[arg(long)]
	pub strict: bool,
}

/// Validate a token issued elsewhere against the configured secret, issuer and audience.
pub fn run(config: &Config, args: &ValidateArgs, now: u64, w: &mut impl Write) -> anyhow::Result<()> {
	report::banner(w, "JWT Validation Test")?;

	if config.is_default_secret() {
		tracing::warn!(strict = args.strict, "using the default secret");
		report::default_secret(w, args.strict)?;
	}

	if args.strict {
		if let Err(err) = config.require_secret() {
			report::failure(w, &err)?;
			return Err(err.into());
		}
	}

	let Some(token) = args.token.as_deref() else {
		let err = Error::MissingArgument;
		report::failure(w, &err)?;
		writeln!(w)?;
		report::usage(w)?;
		return Err(err.into());
	};

	report::configuration(w, config)?;
	report::section(w, "Validating token...")?;

	match Codec::new(config).validate_at(token.trim(), now) {
		Ok(claims) => {
			writeln!(w, "✅ Token is valid!")?;
			writeln!(w)?;
			report::payload(w, &claims)?;
			report::extracted(w, &claims, now)?;
			report::closing(w, "✅ Hello World - JWT validation working correctly!")?;
			Ok(())
		}
		Err(err) => {
			report::failure(w, &err)?;
			writeln!(w)?;
			report::closing(w, "❌ Token validation failed")?;
			Err(err.into())
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use scaffold_token::{Claims, Permission};

	use super::*;

	const NOW: u64 = 1_700_000_000;

	fn config() -> Config {
		Config::new("s".repeat(32), "X", "Y")
	}

	fn token(config: &Config, claims: &Claims) -> String {
		Codec::new(config).generate(claims).unwrap()
	}

	fn claims() -> Claims {
		Claims {
			user_id: Some("u1".to_string()),
			email: Some("a@b.com".to_string()),
			role: Some("owner".to_string()),
			permissions: vec![Permission::new("organization", "read")],
			..Claims::new("X", "Y").valid_for(NOW, Duration::from_secs(3600))
		}
	}

	fn validate(config: &Config, args: ValidateArgs) -> (anyhow::Result<()>, String) {
		let mut out = Vec::new();
		let res = run(config, &args, NOW + 1, &mut out);
		(res, String::from_utf8(out).unwrap())
	}

	fn kind(res: &anyhow::Result<()>) -> Option<&Error> {
		res.as_ref().err()?.downcast_ref::<Error>()
	}

	#[test]
	fn valid() {
		let config = config();
		let args = ValidateArgs {
			token: Some(token(&config, &claims())),
			strict: true,
		};

		let (res, out) = validate(&config, args);
		assert!(res.is_ok(), "{out}");
		assert!(out.contains("✅ Token is valid!"));
		assert!(out.contains("  JWT_ISSUER: X\n"));
		assert!(out.contains("  Email: a@b.com\n"));
		assert!(out.contains("  Organization Slug: not present\n"));
		assert!(out.contains("  - organization.read\n"));
		assert!(out.contains("  Time remaining: 59m 59s\n"));
	}

	#[test]
	fn surrounding_whitespace() {
		let config = config();
		let args = ValidateArgs {
			token: Some(format!("  {}\n", token(&config, &claims()))),
			strict: false,
		};

		let (res, _) = validate(&config, args);
		assert!(res.is_ok());
	}

	#[test]
	fn missing_token() {
		let (res, out) = validate(&config(), ValidateArgs::default());
		assert_eq!(kind(&res), Some(&Error::MissingArgument));
		assert!(out.contains("Usage:"));
	}

	#[test]
	fn strict_default_secret() {
		let config = Config::default();
		let args = ValidateArgs {
			token: Some(token(&config, &claims())),
			strict: true,
		};

		let (res, out) = validate(&config, args);
		assert_eq!(kind(&res), Some(&Error::UnconfiguredSecret));
		assert!(out.contains("WARNING: JWT_SECRET not configured!"));
		assert!(!out.contains("Validating token..."));
	}

	#[test]
	fn lenient_default_secret() {
		let config = Config::default();
		let claims = Claims::sample(&config.issuer, &config.audience).valid_for(NOW, Duration::from_secs(3600));
		let args = ValidateArgs {
			token: Some(token(&config, &claims)),
			strict: false,
		};

		let (res, out) = validate(&config, args);
		assert!(res.is_ok(), "{out}");
		assert!(out.contains("WARNING: JWT_SECRET not configured!"));
	}

	#[test]
	fn wrong_secret() {
		let config = config();
		let args = ValidateArgs {
			token: Some(token(&Config::new("t".repeat(32), "X", "Y"), &claims())),
			strict: true,
		};

		let (res, out) = validate(&config, args);
		assert!(matches!(kind(&res), Some(Error::InvalidToken(_))));
		assert!(out.contains("❌ Invalid token:"));
		assert!(out.contains("❌ Token validation failed"));
	}

	#[test]
	fn expired() {
		let config = config();
		let claims = Claims {
			expires_at: NOW - 10,
			..claims()
		};
		let args = ValidateArgs {
			token: Some(token(&config, &claims)),
			strict: true,
		};

		let (res, out) = validate(&config, args);
		assert_eq!(
			kind(&res),
			Some(&Error::Expired {
				expires_at: NOW - 10
			})
		);
		assert!(out.contains("❌ Token expired at 2023-11-14 22:13:10 UTC"));
	}

	#[test]
	fn wrong_issuer() {
		let config = config();
		let args = ValidateArgs {
			token: Some(token(&config, &claims())),
			strict: true,
		};
		let expecting = Config::new(config.secret.clone(), "auth.example.com", "Y");

		let (res, out) = validate(&expecting, args);
		assert!(matches!(kind(&res), Some(Error::InvalidIssuer { .. })));
		assert!(out.contains("❌ Invalid issuer. Expected: auth.example.com\n   Found: X\n"));
	}

	#[test]
	fn wrong_audience() {
		let config = config();
		let args = ValidateArgs {
			token: Some(token(&config, &claims())),
			strict: true,
		};
		let expecting = Config::new(config.secret.clone(), "X", "billing");

		let (res, out) = validate(&expecting, args);
		assert!(matches!(kind(&res), Some(Error::InvalidAudience { .. })));
		assert!(out.contains("❌ Invalid audience. Expected: billing\n"));
	}
}

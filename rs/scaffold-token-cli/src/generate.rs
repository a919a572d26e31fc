use std::io::Write;
use std::time::Duration;

use clap::Args;
use scaffold_token::{Claims, Codec, Config, Permission};

use crate::report;

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
	/// How long the token stays valid, e.g. `30m` or `1h`.
	#[arg(long, default_value = "1h", value_parser = humantime::parse_duration)]
	pub ttl: Duration,

	#[arg(long)]
	pub user_id: Option<String>,

	#[arg(long)]
	pub email: Option<String>,

	#[arg(long)]
	pub organization_id: Option<String>,

	#[arg(long)]
	pub organization_slug: Option<String>,

	#[arg(long)]
	pub role: Option<String>,

	/// A grant as `resource:action`. Repeat for more; replaces the sample grants.
	#[arg(long = "permission", value_name = "RESOURCE:ACTION", value_parser = parse_permission)]
	pub permissions: Vec<Permission>,
}

impl Default for GenerateArgs {
	fn default() -> Self {
		Self {
			ttl: Duration::from_secs(3600),
			user_id: None,
			email: None,
			organization_id: None,
			organization_slug: None,
			role: None,
			permissions: Vec::new(),
		}
	}
}

impl GenerateArgs {
	/// The sample identity with any overrides applied, valid from `now`.
	pub fn claims(&self, config: &Config, now: u64) -> Claims {
		let mut claims = Claims::sample(&config.issuer, &config.audience);

		let overrides = [
			(&mut claims.user_id, &self.user_id),
			(&mut claims.email, &self.email),
			(&mut claims.organization_id, &self.organization_id),
			(&mut claims.organization_slug, &self.organization_slug),
			(&mut claims.role, &self.role),
		];
		for (field, value) in overrides {
			if value.is_some() {
				*field = value.clone();
			}
		}

		if !self.permissions.is_empty() {
			claims.permissions = self.permissions.clone();
		}

		claims.valid_for(now, self.ttl)
	}
}

fn parse_permission(s: &str) -> Result<Permission, String> {
	match s.split_once(':') {
		Some((resource, action)) if !resource.is_empty() && !action.is_empty() => Ok(Permission::new(resource, action)),
		_ => Err(format!("expected RESOURCE:ACTION, got {s:?}")),
	}
}

/// Sign a test token and immediately validate it with the same settings.
pub fn run(config: &Config, args: &GenerateArgs, now: u64, w: &mut impl Write) -> anyhow::Result<()> {
	report::banner(w, "JWT Validation Test - Complete Flow")?;

	if config.is_default_secret() {
		tracing::warn!("using the default secret");
		report::default_secret(w, false)?;
	}

	let codec = Codec::new(config);

	report::section(w, "Generating test token...")?;
	let claims = args.claims(config, now);
	let token = match codec.generate(&claims) {
		Ok(token) => token,
		Err(err) => {
			report::failure(w, &err)?;
			return Err(err.into());
		}
	};
	tracing::info!(ttl = %humantime::format_duration(args.ttl), "generated token");

	writeln!(w, "✅ Test token generated:")?;
	writeln!(w, "{token}")?;
	writeln!(w)?;

	report::section(w, "Validating test token...")?;
	match codec.validate_at(&token, now) {
		Ok(claims) => {
			writeln!(w, "✅ Token validation successful!")?;
			writeln!(w)?;
			report::payload(w, &claims)?;
			report::extracted(w, &claims, now)?;
			report::closing(w, "✅ Hello World - JWT generation and validation working!")?;
			Ok(())
		}
		Err(err) => {
			report::failure(w, &err)?;
			writeln!(w, "❌ Token validation failed")?;
			Err(err.into())
		}
	}
}

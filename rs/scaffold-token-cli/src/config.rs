use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use scaffold_token::Config;

/// Where the shared settings come from.
///
/// Flags and environment variables override the file, which overrides the built-in defaults.
#[derive(Args, Clone, Default)]
pub struct ConfigArgs {
	/// TOML file with `secret`, `issuer` and `audience` keys.
	#[arg(long = "config", value_name = "PATH", env = "JWT_CONFIG", global = true)]
	pub file: Option<PathBuf>,

	/// Shared HMAC secret.
	#[arg(long, env = "JWT_SECRET", hide_env_values = true, global = true)]
	pub secret: Option<String>,

	/// Expected `iss` claim.
	#[arg(long, env = "JWT_ISSUER", global = true)]
	pub issuer: Option<String>,

	/// Expected `aud` claim.
	#[arg(long, env = "JWT_AUDIENCE", global = true)]
	pub audience: Option<String>,
}

impl ConfigArgs {
	pub fn load(&self) -> anyhow::Result<Config> {
		let config = match &self.file {
			Some(path) => {
				let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
				toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?
			}
			None => Config::default(),
		};

		let config = self.apply(config);
		tracing::debug!(?config, "loaded config");

		Ok(config)
	}

	fn apply(&self, mut config: Config) -> Config {
		if let Some(secret) = &self.secret {
			config.secret = secret.clone();
		}
		if let Some(issuer) = &self.issuer {
			config.issuer = issuer.clone();
		}
		if let Some(audience) = &self.audience {
			config.audience = audience.clone();
		}
		config
	}
}

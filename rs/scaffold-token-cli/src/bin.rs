mod config;
mod generate;
mod inspect;
mod log;
mod report;
mod validate;

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use config::ConfigArgs;
use generate::GenerateArgs;
use inspect::InspectArgs;
use validate::ValidateArgs;

/// Generate and validate the service tokens shared between the web app and its microservices.
///
/// With no subcommand, a sample token is generated and validated.
#[derive(Parser, Clone)]
#[command(version)]
pub struct Cli {
	#[command(flatten)]
	log: log::Log,

	#[command(flatten)]
	config: ConfigArgs,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Clone)]
pub enum Command {
	/// Generate a sample token and validate it straight away.
	Generate(GenerateArgs),

	/// Validate a token against the configured secret, issuer and audience.
	Validate(ValidateArgs),

	/// Decode a token without verifying it.
	Inspect(InspectArgs),
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	cli.log.init();

	let mut stdout = std::io::stdout().lock();
	match run(cli, &mut stdout) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			// Token failures have already been reported.
			if err.downcast_ref::<scaffold_token::Error>().is_none() {
				let _ = writeln!(stdout, "❌ {err:#}");
			}
			ExitCode::FAILURE
		}
	}
}

fn run(cli: Cli, w: &mut impl Write) -> anyhow::Result<()> {
	let config = cli.config.load()?;
	let now = scaffold_token::now();

	match cli.command.unwrap_or_else(|| Command::Generate(GenerateArgs::default())) {
		Command::Generate(args) => generate::run(&config, &args, now, w),
		Command::Validate(args) => validate::run(&config, &args, now, w),
		Command::Inspect(args) => inspect::run(&args, now, w),
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn verify_cli() {
		Cli::command().debug_assert();
	}

	#[test]
	fn no_subcommand() {
		let cli = Cli::try_parse_from(["scaffold-token"]).unwrap();
		assert!(cli.command.is_none());
	}

	#[test]
	fn validate_args() {
		let cli = Cli::try_parse_from(["scaffold-token", "validate", "--strict", "abc.def.ghi"]).unwrap();
		let Some(Command::Validate(args)) = cli.command else {
			panic!("expected validate");
		};
		assert!(args.strict);
		assert_eq!(args.token.as_deref(), Some("abc.def.ghi"));
	}

	#[test]
	fn global_config_flags() {
		let cli = Cli::try_parse_from(["scaffold-token", "validate", "--issuer", "auth.example.com", "tok"]).unwrap();
		assert_eq!(cli.config.issuer.as_deref(), Some("auth.example.com"));
	}

	#[test]
	fn generate_args() {
		let cli = Cli::try_parse_from([
			"scaffold-token",
			"generate",
			"--ttl",
			"30m",
			"--permission",
			"users:read",
			"--permission",
			"users:delete",
		])
		.unwrap();
		let Some(Command::Generate(args)) = cli.command else {
			panic!("expected generate");
		};
		assert_eq!(args.ttl, std::time::Duration::from_secs(1800));
		assert_eq!(args.permissions.len(), 2);
	}

	#[test]
	fn bad_permission() {
		assert!(Cli::try_parse_from(["scaffold-token", "generate", "--permission", "users"]).is_err());
	}

	#[test]
	fn round_trip() {
		let secret = "s".repeat(32);
		let cli = Cli::try_parse_from(["scaffold-token", "--secret", secret.as_str()]).unwrap();
		let mut out = Vec::new();
		run(cli, &mut out).unwrap();

		let out = String::from_utf8(out).unwrap();
		assert!(out.contains("✅ Token validation successful!"));
	}
}

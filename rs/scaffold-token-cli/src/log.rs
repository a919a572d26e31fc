use clap::Args;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Diagnostic logging, kept on stderr so it never interleaves with the report.
#[derive(Args, Clone, Debug)]
pub struct Log {
	/// The level filter to use.
	#[arg(id = "log-level", long = "log-level", env = "SCAFFOLD_LOG", default_value = "warn", global = true)]
	pub level: tracing::Level,
}

impl Log {
	pub fn init(&self) {
		// RUST_LOG directives still win over the flag.
		let filter = EnvFilter::builder()
			.with_default_directive(LevelFilter::from_level(self.level).into())
			.from_env_lossy();

		tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_writer(std::io::stderr)
			.with_target(false)
			.init();
	}
}

use std::io::Write;

use clap::Args;
use scaffold_token::Error;

use crate::report;

#[derive(Args, Clone, Debug, Default)]
pub struct InspectArgs {
	/// The compact JWT to decode.
	pub token: Option<String>,
}

/// Print the header and payload without checking the signature or any claim.
pub fn run(args: &InspectArgs, now: u64, w: &mut impl Write) -> anyhow::Result<()> {
	report::banner(w, "JWT Inspection (signature NOT verified)")?;

	let Some(token) = args.token.as_deref() else {
		let err = Error::MissingArgument;
		report::failure(w, &err)?;
		writeln!(w)?;
		report::usage(w)?;
		return Err(err.into());
	};

	let inspection = match scaffold_token::inspect(token) {
		Ok(inspection) => inspection,
		Err(err) => {
			report::failure(w, &err)?;
			return Err(err.into());
		}
	};

	report::section(w, "Header:")?;
	report::json(w, &inspection.header)?;
	writeln!(w)?;

	report::section(w, "Payload:")?;
	report::json(w, &inspection.payload)?;
	writeln!(w)?;

	if inspection.algorithm() != Some("HS256") {
		writeln!(w, "⚠️  Algorithm is {:?}, only HS256 is accepted", inspection.algorithm())?;
	}

	let Some(raw) = inspection.payload.get("exp") else {
		writeln!(w, "  Expires: not present")?;
		return Ok(());
	};

	match (raw.as_u64(), scaffold_token::numeric_date(raw)) {
		(Some(exp), _) if exp > now => writeln!(w, "  Expires: {}", report::timestamp(exp))?,
		(Some(exp), _) => writeln!(w, "  Expired: {}", report::timestamp(exp))?,
		(None, Some(exp)) => writeln!(w, "  Expires: {raw} (read as {})", report::timestamp(exp))?,
		(None, None) => writeln!(w, "  Expires: {raw} (not a NumericDate)")?,
	}

	Ok(())
}

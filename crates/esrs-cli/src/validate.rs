//! # Validate Subcommand
//!
//! Assembles and validates a report, printing every diagnostic. Exits with
//! code 2 when any error is found.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use esrs_ixbrl::{check, Diagnostics};
use esrs_taxonomy::Profile;

use crate::input::{load_policy, load_report, DEFAULT_PROFILE};
use crate::EXIT_REJECTED;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Report file (YAML, or JSON by extension).
    pub report: PathBuf,

    /// Disclosure profile label.
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: Profile,

    /// Generation policy file (YAML).
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Print diagnostics as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<u8> {
    let diagnostics = diagnose(args)?;
    let stdout = std::io::stdout();
    write_diagnostics(&diagnostics, args.json, &mut stdout.lock())?;
    Ok(if diagnostics.has_errors() {
        EXIT_REJECTED
    } else {
        0
    })
}

/// Load, assemble, and validate the report named in `args`.
pub fn diagnose(args: &ValidateArgs) -> anyhow::Result<Diagnostics> {
    let report = load_report(&args.report)?;
    let policy = load_policy(args.policy.as_deref())?;
    let (_, diagnostics) = check(&report, args.profile, &policy)
        .with_context(|| format!("cannot assemble {}", args.report.display()))?;
    Ok(diagnostics)
}

/// Render diagnostics as text or pretty JSON.
pub fn write_diagnostics(
    diagnostics: &Diagnostics,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, diagnostics)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{diagnostics}")?;
    }
    Ok(())
}

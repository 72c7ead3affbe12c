//! # Generate Subcommand
//!
//! Builds the filing and writes `<stem>.xhtml` and `<stem>.facts.json` into
//! the output directory. The manifest goes to stdout as JSON. A rejected
//! report writes nothing and exits with code 2.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use esrs_core::Timestamp;
use esrs_ixbrl::{generate, Filing, GenerateError};
use esrs_taxonomy::Profile;

use crate::input::{load_policy, load_report, DEFAULT_PROFILE};
use crate::EXIT_REJECTED;

/// Arguments for the generate subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Report file (YAML, or JSON by extension).
    pub report: PathBuf,

    /// Disclosure profile label.
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: Profile,

    /// Generation policy file (YAML).
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Generation time recorded in the filing (UTC, `Z` suffix).
    #[arg(long)]
    pub generated_at: Timestamp,

    /// Directory for the generated files.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<u8> {
    let report = load_report(&args.report)?;
    let policy = load_policy(args.policy.as_deref())?;

    let filing = match generate(&report, args.profile, &policy, args.generated_at) {
        Ok(filing) => filing,
        Err(GenerateError::Rejected(diagnostics)) => {
            eprintln!("{diagnostics}");
            return Ok(EXIT_REJECTED);
        }
        Err(e) => return Err(e).context("generation failed"),
    };

    for warning in &filing.diagnostics.warnings {
        eprintln!("warning[{}]: {warning}", warning.code());
    }
    let (xhtml, facts) = write_filing(&filing, &args.report, &args.out_dir)?;
    tracing::info!(
        xhtml = %xhtml.display(),
        facts = %facts.display(),
        "filing written"
    );
    println!("{}", serde_json::to_string_pretty(&filing.manifest)?);
    Ok(0)
}

/// Write the two artifacts, named after the report's file stem.
pub fn write_filing(
    filing: &Filing,
    report: &Path,
    out_dir: &Path,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let stem = report
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;

    let xhtml = out_dir.join(format!("{stem}.xhtml"));
    let facts = out_dir.join(format!("{stem}.facts.json"));
    std::fs::write(&xhtml, &filing.xhtml)
        .with_context(|| format!("cannot write {}", xhtml.display()))?;
    std::fs::write(&facts, &filing.fact_json)
        .with_context(|| format!("cannot write {}", facts.display()))?;
    Ok((xhtml, facts))
}

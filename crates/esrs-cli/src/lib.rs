//! # esrs-cli: ESRS Filing Command-Line Interface
//!
//! A thin `esrs` binary over `esrs-ixbrl`.
//!
//! ## Subcommands
//!
//! - `generate`: assemble, validate, and write `<stem>.xhtml` and
//!   `<stem>.facts.json`, printing the manifest
//! - `validate`: print diagnostics for a report
//! - `catalog`: list the concept catalog
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | The command failed (I/O, parse, or build error) |
//! | 2 | Validation rejected the report |
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `esrs-ixbrl`; no tagging logic lives here.
//! - Artifacts go to files or stdout; logs go to stderr.

pub mod catalog;
pub mod generate;
pub mod input;
pub mod validate;

use clap::{Parser, Subcommand};

/// Exit code for a report rejected by validation.
pub const EXIT_REJECTED: u8 = 2;

/// ESRS sustainability report to Inline XBRL.
#[derive(Parser, Debug)]
#[command(name = "esrs", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// The subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an Inline XBRL filing from a report.
    Generate(generate::GenerateArgs),
    /// Validate a report without writing a filing.
    Validate(validate::ValidateArgs),
    /// List the concept catalog.
    Catalog(catalog::CatalogArgs),
}

impl Cli {
    /// The tracing filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Run the parsed command and return its exit code.
pub fn run(cli: &Cli) -> anyhow::Result<u8> {
    match &cli.command {
        Commands::Generate(args) => generate::run_generate(args),
        Commands::Validate(args) => validate::run_validate(args),
        Commands::Catalog(args) => catalog::run_catalog(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "esrs",
            "generate",
            "report.yaml",
            "--profile",
            "ESRS Set 1 2023-12-31",
            "--generated-at",
            "2025-03-31T12:00:00Z",
            "--out-dir",
            "out",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.profile, esrs_taxonomy::Profile::EsrsSet1_2023);
        assert_eq!(args.out_dir, std::path::PathBuf::from("out"));
        assert!(args.policy.is_none());
    }

    #[test]
    fn test_generate_requires_generated_at() {
        assert!(Cli::try_parse_from(["esrs", "generate", "report.yaml"]).is_err());
    }

    #[test]
    fn test_rejects_local_time() {
        let err = Cli::try_parse_from([
            "esrs",
            "generate",
            "report.yaml",
            "--generated-at",
            "2025-03-31T12:00:00+02:00",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_unknown_profile() {
        let err = Cli::try_parse_from(["esrs", "validate", "r.yaml", "--profile", "GRI 2021"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_default_profile_is_e1() {
        let cli = Cli::try_parse_from(["esrs", "validate", "r.yaml", "--json"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.profile, esrs_taxonomy::Profile::EsrsE1_2023);
        assert!(args.json);
    }

    #[test]
    fn test_verbosity_levels() {
        let level = |argv: &[&str]| Cli::try_parse_from(argv).unwrap().log_level();
        assert_eq!(level(&["esrs", "catalog"]), "warn");
        assert_eq!(level(&["esrs", "-v", "catalog"]), "info");
        assert_eq!(level(&["esrs", "catalog", "-vv"]), "debug");
        assert_eq!(level(&["esrs", "-vvvv", "catalog"]), "trace");
    }
}

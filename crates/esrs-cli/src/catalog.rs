//! # Catalog Subcommand
//!
//! Lists every report field with its concept, kind, and cardinality. With
//! `--profile`, a `required` column shows what that profile demands.

use std::io::Write;

use clap::Args;
use serde::Serialize;

use esrs_taxonomy::{Catalog, Profile};

/// Arguments for the catalog subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Mark the concepts this profile requires.
    #[arg(long)]
    pub profile: Option<Profile>,

    /// Print the catalog as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One listed concept.
#[derive(Debug, Serialize)]
pub struct CatalogRow {
    /// Report field name.
    pub field: &'static str,
    /// Concept QName.
    pub concept: String,
    /// Data kind.
    pub kind: String,
    /// Declared cardinality.
    pub cardinality: String,
    /// Disclosure requirement, e.g. `E1-6`.
    pub disclosure: &'static str,
    /// Whether the selected profile requires the concept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Execute the catalog subcommand.
pub fn run_catalog(args: &CatalogArgs) -> anyhow::Result<u8> {
    let catalog = Catalog::global()?;
    let stdout = std::io::stdout();
    write_catalog(catalog, args, &mut stdout.lock())?;
    Ok(0)
}

/// The rows for `catalog`, in catalog order.
pub fn rows(catalog: &Catalog, profile: Option<Profile>) -> Vec<CatalogRow> {
    catalog
        .concepts()
        .iter()
        .map(|c| CatalogRow {
            field: c.field,
            concept: c.qname.to_string(),
            kind: c.kind.to_string(),
            cardinality: c.cardinality.to_string(),
            disclosure: c.disclosure,
            required: profile.map(|p| catalog.is_mandatory(c, p)),
        })
        .collect()
}

/// Render the catalog as a table or JSON.
pub fn write_catalog(
    catalog: &Catalog,
    args: &CatalogArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rows = rows(catalog, args.profile);
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "# {}", catalog.version())?;
    for row in &rows {
        let required = match row.required {
            Some(true) => "  required",
            _ => "",
        };
        writeln!(
            out,
            "{:<32} {:<70} {:<10} {:<11} {}{}",
            row.field, row.concept, row.kind, row.cardinality, row.disclosure, required
        )?;
    }
    Ok(())
}

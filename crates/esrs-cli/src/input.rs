//! # Input Loading
//!
//! Reads report and policy files for the subcommands. Reports ending in
//! `.json` are parsed as JSON; everything else as YAML.

use std::path::Path;

use anyhow::Context;

use esrs_ixbrl::{GenerationPolicy, ReportModel};

/// Label of the default profile.
pub const DEFAULT_PROFILE: &str = "ESRS E1 2023-12-31";

/// Read and parse a report file.
pub fn load_report(path: &Path) -> anyhow::Result<ReportModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read report {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let report = if is_json {
        ReportModel::from_json_str(&text)
    } else {
        ReportModel::from_yaml_str(&text)
    };
    let report = report.with_context(|| format!("cannot parse report {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        metrics = report.metrics.len(),
        "report loaded"
    );
    Ok(report)
}

/// Load the policy at `path`, or the default policy.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<GenerationPolicy> {
    match path {
        Some(path) => GenerationPolicy::load(path)
            .with_context(|| format!("cannot load policy {}", path.display())),
        None => Ok(GenerationPolicy::default()),
    }
}

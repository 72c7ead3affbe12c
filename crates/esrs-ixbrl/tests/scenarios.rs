//! Integration tests: end-to-end generation of ESRS filings.
//!
//! Covers the reference scenarios (consistent climate report, missing
//! total, sum mismatch, scaled monetary amount, refusal to serialize), the
//! determinism of the XHTML writer, the structure of the emitted XHTML, and
//! agreement between the XHTML and JSON fact forms.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use esrs_core::{QName, ReportingEntity, Timestamp};
use esrs_ixbrl::{
    assemble, extract_facts, fact_records, facts_from, generate, to_fact_json, to_ixbrl_xhtml, validate,
    Diagnostic, Document, Fact, FactValue, GenerateError, GenerationPolicy, ReportModel,
    SerializeError,
};
use esrs_taxonomy::{Profile, SectionId};
use proptest::prelude::*;
use rust_decimal::Decimal;

const IX: &str = "http://www.xbrl.org/2013/inlineXBRL";
const XBRLI: &str = "http://www.xbrl.org/2003/instance";
const XHTML: &str = "http://www.w3.org/1999/xhtml";

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn q(s: &str) -> QName {
    s.parse().unwrap()
}

fn at() -> Timestamp {
    Timestamp::parse("2025-03-31T12:00:00Z").unwrap()
}

/// Scope 1 + Scope 2 (market) + Scope 3 with a consistent total.
fn climate_report() -> ReportModel {
    ReportModel::new(
        ReportingEntity::lei("529900T8BM49AURSDO55").unwrap(),
        "Acme Industrials SE",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
    .with_metric("scope1", d("120.5"))
    .with_metric("scope2_market", d("60.0"))
    .with_metric("scope3", d("300.0"))
    .with_metric("total_ghg", d("480.5"))
}

fn build(report: &ReportModel) -> Document {
    assemble(report, Profile::EsrsE1_2023, &GenerationPolicy::default()).unwrap()
}

fn sorted(mut facts: Vec<Fact>) -> Vec<Fact> {
    facts.sort_by(|a, b| {
        (&a.concept, &a.context_ref, &a.unit_ref).cmp(&(&b.concept, &b.context_ref, &b.unit_ref))
    });
    facts
}

// ── Scenario A: consistent totals ──

#[test]
fn test_scenario_a_validates_clean() {
    let doc = build(&climate_report());
    let diags = validate(&doc, Profile::EsrsE1_2023);
    assert!(diags.errors.is_empty(), "{diags}");
    assert!(diags.warnings.is_empty(), "{diags}");

    assert_eq!(doc.registry.unit_count(), 1);
    let (tco2e, unit) = doc.registry.units().next().unwrap();
    assert_eq!(unit.label(), "tCO2e");
    let referencing = doc
        .facts()
        .filter(|f| f.unit_ref.as_ref() == Some(tco2e))
        .count();
    assert_eq!(referencing, 4);
}

#[test]
fn test_scenario_a_stated_total_exceeds_tolerance() {
    // 500.5 against components summing to 480.5 is 4.16% off.
    let doc = build(&climate_report().with_metric("total_ghg", d("500.5")));
    let diags = validate(&doc, Profile::EsrsE1_2023);
    assert_eq!(diags.errors.len(), 1);
    match &diags.errors[0] {
        Diagnostic::SumMismatch { diff, .. } => assert_eq!(*diff, d("0.041623")),
        other => panic!("unexpected {other:?}"),
    }
}

// ── Scenario B: missing mandatory total ──

#[test]
fn test_scenario_b_missing_total() {
    let doc = build(&climate_report().without("total_ghg"));
    let diags = validate(&doc, Profile::EsrsE1_2023);
    assert_eq!(
        diags.errors,
        vec![Diagnostic::MissingMandatoryConcept {
            concept: q("esrs:TotalGHGEmissions")
        }]
    );
}

// ── Scenario C: sum mismatch ──

#[test]
fn test_scenario_c_sum_mismatch() {
    let doc = build(&climate_report().with_metric("total_ghg", d("520.0")));
    let diags = validate(&doc, Profile::EsrsE1_2023);
    assert_eq!(diags.errors.len(), 1);
    match &diags.errors[0] {
        Diagnostic::SumMismatch {
            expected,
            actual,
            diff,
            ..
        } => {
            assert_eq!(*expected, d("480.5"));
            assert_eq!(*actual, d("520.0"));
            assert!(*diff > d("0.082") && *diff < d("0.083"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ── Scenario D: monetary amount in millions ──

#[test]
fn test_scenario_d_millions() {
    let report = climate_report().with_metric("net_revenue", d("123456789.50"));
    let doc = assemble(&report, Profile::EsrsE1_2023, &GenerationPolicy::in_millions()).unwrap();
    let revenue = doc
        .facts()
        .find(|f| f.concept == q("esrs:NetRevenue"))
        .unwrap();
    assert_eq!(
        revenue.value,
        FactValue::Numeric {
            literal: d("123.46"),
            decimals: 2,
            scale: 6
        }
    );
    assert_eq!(
        doc.registry.unit(revenue.unit_ref.as_ref().unwrap()).unwrap().to_string(),
        "iso4217:EUR"
    );
}

// ── Scenario E: refusal to serialize ──

#[test]
fn test_scenario_e_refuses_with_errors() {
    let doc = build(&climate_report().without("total_ghg"));
    let diags = validate(&doc, Profile::EsrsE1_2023);
    assert_eq!(diags.errors.len(), 1);

    assert!(matches!(
        to_ixbrl_xhtml(&doc, &diags, at()),
        Err(SerializeError::NotValidated { .. })
    ));
    assert!(matches!(
        to_fact_json(&doc, &diags),
        Err(SerializeError::NotValidated { .. })
    ));
}

#[test]
fn test_refuses_stale_diagnostics() {
    let mut doc = build(&climate_report());
    let diags = validate(&doc, Profile::EsrsE1_2023);
    doc.entity_name.push_str(" (restated)");
    assert!(matches!(
        to_ixbrl_xhtml(&doc, &diags, at()),
        Err(SerializeError::NotValidated { .. })
    ));
}

#[test]
fn test_refuses_other_profile() {
    let doc = build(&climate_report());
    let mut diags = validate(&doc, Profile::EsrsE1_2023);
    diags.profile = Profile::EsrsSet1_2023;
    assert!(matches!(
        to_fact_json(&doc, &diags),
        Err(SerializeError::NotValidated { .. })
    ));
}

#[test]
fn test_generate_rejects_with_diagnostics() {
    let err = generate(
        &climate_report().without("total_ghg"),
        Profile::EsrsE1_2023,
        &GenerationPolicy::default(),
        at(),
    )
    .unwrap_err();
    match err {
        GenerateError::Rejected(diags) => assert_eq!(diags.errors.len(), 1),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_generate_build_error() {
    let err = generate(
        &climate_report().with_metric("scope_five", Decimal::ONE),
        Profile::EsrsE1_2023,
        &GenerationPolicy::default(),
        at(),
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::Build(_)));
}

// ── Determinism ──

#[test]
fn test_generate_is_byte_identical() {
    let policy = GenerationPolicy::default();
    let a = generate(&climate_report(), Profile::EsrsE1_2023, &policy, at()).unwrap();
    let b = generate(&climate_report(), Profile::EsrsE1_2023, &policy, at()).unwrap();
    assert_eq!(a.xhtml, b.xhtml);
    assert_eq!(a.fact_json, b.fact_json);
    assert_eq!(a.manifest, b.manifest);
}

#[test]
fn test_generated_at_is_the_only_clock() {
    let policy = GenerationPolicy::default();
    let a = generate(&climate_report(), Profile::EsrsE1_2023, &policy, at()).unwrap();
    let later = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
    let b = generate(&climate_report(), Profile::EsrsE1_2023, &policy, later).unwrap();

    assert_eq!(a.fact_json, b.fact_json);
    assert_eq!(a.manifest.document_digest, b.manifest.document_digest);
    let differing: Vec<_> = a
        .xhtml
        .lines()
        .zip(b.xhtml.lines())
        .filter(|(x, y)| x != y)
        .collect();
    assert_eq!(differing.len(), 1);
    assert!(differing[0].0.contains("generated-at"));
}

// ── XHTML structure ──

#[test]
fn test_xhtml_structure() {
    let report = climate_report()
        .with_metric("headcount", Decimal::from(1250))
        .with_exclusion("scope3_cat15", "Financed emissions are not material.")
        .with_narrative(SectionId::Climate, "Figures follow the GHG Protocol.");
    let filing = generate(
        &report,
        Profile::EsrsE1_2023,
        &GenerationPolicy::default(),
        at(),
    )
    .unwrap();
    let xml = roxmltree::Document::parse(&filing.xhtml).unwrap();

    let count = |ns: &str, name: &str| {
        xml.descendants()
            .filter(|n| n.has_tag_name((ns, name)))
            .count()
    };
    assert_eq!(count(XHTML, "head"), 1);
    assert_eq!(count(XHTML, "title"), 1);
    assert_eq!(count(IX, "header"), 1);
    assert_eq!(count(IX, "hidden"), 1);
    assert_eq!(count(IX, "references"), 1);
    assert_eq!(count(XBRLI, "context"), 2);
    assert_eq!(count(XBRLI, "unit"), 2);
    assert_eq!(count(IX, "nonFraction"), 5);
    assert_eq!(count(IX, "nonNumeric"), 3);

    let contexts: Vec<&str> = xml
        .descendants()
        .filter(|n| n.has_tag_name((XBRLI, "context")))
        .filter_map(|n| n.attribute("id"))
        .collect();
    let units: Vec<&str> = xml
        .descendants()
        .filter(|n| n.has_tag_name((XBRLI, "unit")))
        .filter_map(|n| n.attribute("id"))
        .collect();
    for fact in xml
        .descendants()
        .filter(|n| n.has_tag_name((IX, "nonFraction")))
    {
        assert!(contexts.contains(&fact.attribute("contextRef").unwrap()));
        assert!(units.contains(&fact.attribute("unitRef").unwrap()));
        assert!(fact.attribute("decimals").is_some());
        assert_eq!(fact.attribute("scale"), Some("0"));
        assert_eq!(fact.attribute("format"), Some("ixt:num-dot-decimal"));
    }

    let ids: Vec<&str> = xml
        .descendants()
        .filter(|n| n.has_tag_name((IX, "nonFraction")) || n.has_tag_name((IX, "nonNumeric")))
        .filter_map(|n| n.attribute("id"))
        .collect();
    let expected: Vec<String> = (1..=8).map(|i| format!("f-{i}")).collect();
    assert_eq!(ids, expected);

    let meta = xml
        .descendants()
        .find(|n| n.has_tag_name((XHTML, "meta")) && n.attribute("name") == Some("generated-at"))
        .unwrap();
    assert_eq!(meta.attribute("content"), Some("2025-03-31T12:00:00Z"));

    let schema_ref = xml
        .descendants()
        .find(|n| n.tag_name().name() == "schemaRef")
        .unwrap();
    assert_eq!(
        schema_ref.attribute(("http://www.w3.org/1999/xlink", "href")),
        Some(Profile::EsrsE1_2023.entry_point())
    );

    let sections: Vec<&str> = xml
        .descendants()
        .filter(|n| n.has_tag_name((XHTML, "section")))
        .filter_map(|n| n.attribute("id"))
        .collect();
    assert_eq!(sections, vec!["general", "climate", "social"]);

    assert!(filing.xhtml.contains("Disclosures omitted"));
    assert!(filing.xhtml.contains("Financed emissions are not material."));
    assert!(filing.xhtml.contains("Figures follow the GHG Protocol."));
}

#[test]
fn test_negative_amount_uses_sign_attribute() {
    let report = climate_report().with_metric("net_revenue", d("-4500.25"));
    let filing = generate(
        &report,
        Profile::EsrsE1_2023,
        &GenerationPolicy::default(),
        at(),
    )
    .unwrap();
    let xml = roxmltree::Document::parse(&filing.xhtml).unwrap();
    let revenue = xml
        .descendants()
        .find(|n| n.attribute("name") == Some("esrs:NetRevenue"))
        .unwrap();
    assert_eq!(revenue.attribute("sign"), Some("-"));
    assert_eq!(revenue.text(), Some("4,500.25"));
}

#[test]
fn test_text_is_escaped_and_round_trips() {
    let text = "Suppliers <Tier 1> & \"key\" partners";
    let report = climate_report().with_metric("transition_plan", text);
    let filing = generate(
        &report,
        Profile::EsrsE1_2023,
        &GenerationPolicy::default(),
        at(),
    )
    .unwrap();
    let facts = extract_facts(&filing.xhtml).unwrap();
    let plan = facts
        .iter()
        .find(|f| f.concept == q("esrs:TransitionPlanForClimateChangeMitigation"))
        .unwrap();
    assert_eq!(plan.value, FactValue::NonNumeric(text.to_string()));
}

// ── Fact forms agree ──

#[test]
fn test_xhtml_and_json_agree() {
    let report = climate_report()
        .with_metric("net_revenue", d("123456789.50"))
        .with_metric("ghg_intensity", d("0.0000039"))
        .with_metric("renewable_share", d("34.5"));
    let doc = build(&report);
    let diags = validate(&doc, Profile::EsrsE1_2023);
    assert!(diags.is_clean(), "{diags}");

    let xhtml = to_ixbrl_xhtml(&doc, &diags, at()).unwrap();
    let json = to_fact_json(&doc, &diags).unwrap();
    let from_xhtml = extract_facts(&xhtml).unwrap();
    let from_json = facts_from(&json).unwrap();
    let original: Vec<Fact> = doc.facts().cloned().collect();

    assert_eq!(from_xhtml, original);
    assert_eq!(from_json, original);
}

#[test]
fn test_fact_json_shape() {
    let doc = build(&climate_report());
    let diags = validate(&doc, Profile::EsrsE1_2023);
    let json = to_fact_json(&doc, &diags).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 7);

    let scope1 = records
        .iter()
        .find(|r| r["concept"] == "esrs:GrossScope1GHGEmissions")
        .unwrap();
    assert_eq!(scope1["value"], "120.500");
    assert_eq!(scope1["decimals"], 3);
    assert_eq!(scope1["scale"], 0);
    assert_eq!(scope1["unit"], "u-tCO2e");
    assert!(!json.contains('\n'));
}

// ── Fixtures ──

#[test]
fn test_fixture_report_generates() {
    let root = repo_root();
    let report =
        ReportModel::from_yaml_str(&std::fs::read_to_string(root.join("fixtures/acme-2024.yaml")).unwrap())
            .unwrap();
    let policy = GenerationPolicy::load(&root.join("fixtures/millions.yaml")).unwrap();

    let filing = generate(&report, Profile::EsrsE1_2023, &policy, at()).unwrap();
    assert!(filing.diagnostics.is_clean(), "{}", filing.diagnostics);
    assert_eq!(filing.manifest.fact_count, 15);
    assert_eq!(filing.manifest.taxonomy_version, Profile::EsrsE1_2023.taxonomy_version());

    let doc = assemble(&report, Profile::EsrsE1_2023, &policy).unwrap();
    assert_eq!(doc.registry.context_count(), 1);
    assert_eq!(doc.registry.unit_count(), 5);
    assert_eq!(
        doc.exclusions.get(&q("esrs:EnergyConsumptionFromNuclearSources")).map(String::as_str),
        Some("No nuclear energy is purchased.")
    );

    let records = fact_records(&doc);
    let share = records
        .iter()
        .find(|r| r.concept == "esrs:PercentageOfRenewableSourcesInTotalEnergyConsumption")
        .unwrap();
    assert_eq!(share.value, "34.50");
    assert_eq!(share.decimals, Some(2));
}

#[test]
fn test_fixture_set1_profile_reports_gaps() {
    let root = repo_root();
    let report =
        ReportModel::from_yaml_str(&std::fs::read_to_string(root.join("fixtures/acme-2024.yaml")).unwrap())
            .unwrap();
    let err = generate(
        &report,
        Profile::EsrsSet1_2023,
        &GenerationPolicy::default(),
        at(),
    )
    .unwrap_err();
    let GenerateError::Rejected(diags) = err else {
        panic!("expected rejection");
    };
    let missing: BTreeMap<String, &str> = diags
        .errors
        .iter()
        .map(|e| match e {
            Diagnostic::MissingMandatoryConcept { concept } => (concept.to_string(), e.code()),
            other => (other.to_string(), other.code()),
        })
        .collect();
    assert_eq!(missing.len(), 3);
    assert!(missing.values().all(|c| *c == "MissingMandatoryConcept"));
    assert!(missing.contains_key("esrs:NumberOfEmployeesHeadCount"));
}

// ── Properties ──

fn mass() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000, 0u32..=3).prop_map(|(m, s)| Decimal::new(m, s))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fact_json_round_trip(
        scope1 in mass(),
        scope2 in mass(),
        scope3 in mass(),
        revenue in -10_000_000_000i64..10_000_000_000,
        plan in "[A-Za-z0-9&<>\"' ]{0,30}[A-Za-z]",
    ) {
        let report = climate_report()
            .with_metric("scope1", scope1)
            .with_metric("scope2_market", scope2)
            .with_metric("scope3", scope3)
            .with_metric("total_ghg", scope1 + scope2 + scope3)
            .with_metric("net_revenue", Decimal::new(revenue, 2))
            .with_metric("transition_plan", plan.as_str());
        let doc = build(&report);
        let diags = validate(&doc, Profile::EsrsE1_2023);
        prop_assert!(!diags.has_errors(), "{}", diags);

        let json = to_fact_json(&doc, &diags).unwrap();
        let xhtml = to_ixbrl_xhtml(&doc, &diags, at()).unwrap();
        let original = sorted(doc.facts().cloned().collect());
        prop_assert_eq!(sorted(facts_from(&json).unwrap()), original.clone());
        prop_assert_eq!(sorted(extract_facts(&xhtml).unwrap()), original);
    }
}

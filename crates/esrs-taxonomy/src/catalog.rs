//! # Concept Catalog
//!
//! Static table mapping semantic field names to taxonomy concepts, plus the
//! aggregate (summation) relationships the validator checks.
//!
//! ## Invariants
//!
//! - Every field name and every QName appears at most once.
//! - Every concept lives in the `esrs` namespace.
//! - Numeric kinds carry a measure; `Text` and `Date` carry none.
//! - `Conditional` concepts name a trigger field that exists; no other
//!   cardinality names one.
//! - Summation totals and components resolve to numeric concepts sharing one
//!   measure.
//!
//! The table is checked once when [`Catalog::builtin`] runs; a violation is a
//! defect in this file and is reported as [`CatalogError::InvalidEntry`]
//! rather than a panic. The catalog tests pin the built table as valid.
//!
//! ## Lookups
//!
//! [`Catalog::lookup`] is the only way a report field becomes a concept.
//! There is no fuzzy match or silent skip: an unmapped field is
//! [`CatalogError::UnknownField`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use serde::Serialize;

use esrs_core::{QName, Unit};

use crate::concept::{Cardinality, Concept, ConceptKind, Measure, PeriodType, Source};
use crate::error::CatalogError;
use crate::profile::{Profile, TAXONOMY_VERSION};
use crate::section::{SectionId, Standard};

// ── Static table ────────────────────────────────────────────────────

struct ConceptDef {
    field: &'static str,
    qname: &'static str,
    label: &'static str,
    kind: ConceptKind,
    cardinality: Cardinality,
    period_type: PeriodType,
    measure: Measure,
    standard: Standard,
    disclosure: &'static str,
    source: Source,
    hidden: bool,
    trigger: Option<&'static str>,
}

struct SummationDef {
    name: &'static str,
    total: &'static str,
    components: &'static [&'static str],
}

const BLANK: ConceptDef = ConceptDef {
    field: "",
    qname: "",
    label: "",
    kind: ConceptKind::Text,
    cardinality: Cardinality::Optional,
    period_type: PeriodType::Duration,
    measure: Measure::None,
    standard: Standard::General,
    disclosure: "BP-1",
    source: Source::Report,
    hidden: false,
    trigger: None,
};

const HEADER: ConceptDef = ConceptDef {
    cardinality: Cardinality::Mandatory,
    source: Source::Header,
    ..BLANK
};

const GHG: ConceptDef = ConceptDef {
    kind: ConceptKind::Mass,
    measure: Measure::Simple("utr:tCO2e"),
    standard: Standard::E1,
    disclosure: "E1-6",
    ..BLANK
};

const ENERGY: ConceptDef = ConceptDef {
    kind: ConceptKind::Energy,
    measure: Measure::Simple("utr:MWh"),
    standard: Standard::E1,
    disclosure: "E1-5",
    ..BLANK
};

const TONNES: Measure = Measure::Simple("utr:t");
const PURE: Measure = Measure::Simple("xbrli:pure");

static CONCEPTS: &[ConceptDef] = &[
    // General information
    ConceptDef {
        field: "entity_name",
        qname: "esrs:NameOfReportingEntity",
        label: "Name of the reporting undertaking",
        ..HEADER
    },
    ConceptDef {
        field: "reporting_period_start",
        qname: "esrs:ReportingPeriodStartDate",
        label: "Reporting period start date",
        kind: ConceptKind::Date,
        hidden: true,
        ..HEADER
    },
    ConceptDef {
        field: "reporting_period_end",
        qname: "esrs:ReportingPeriodEndDate",
        label: "Reporting period end date",
        kind: ConceptKind::Date,
        hidden: true,
        ..HEADER
    },
    ConceptDef {
        field: "basis_for_preparation",
        qname: "esrs:BasisForPreparationOfSustainabilityStatement",
        label: "Basis for preparation of the sustainability statement",
        ..BLANK
    },
    // E1 climate change
    ConceptDef {
        field: "transition_plan",
        qname: "esrs:TransitionPlanForClimateChangeMitigation",
        label: "Transition plan for climate change mitigation",
        standard: Standard::E1,
        disclosure: "E1-1",
        ..BLANK
    },
    ConceptDef {
        field: "energy_fossil",
        qname: "esrs:EnergyConsumptionFromFossilSources",
        label: "Energy consumption from fossil sources",
        ..ENERGY
    },
    ConceptDef {
        field: "energy_nuclear",
        qname: "esrs:EnergyConsumptionFromNuclearSources",
        label: "Energy consumption from nuclear sources",
        ..ENERGY
    },
    ConceptDef {
        field: "energy_renewable",
        qname: "esrs:EnergyConsumptionFromRenewableSources",
        label: "Energy consumption from renewable sources",
        ..ENERGY
    },
    ConceptDef {
        field: "energy_total",
        qname: "esrs:EnergyConsumptionRelatedToOwnOperations",
        label: "Total energy consumption related to own operations",
        cardinality: Cardinality::Mandatory,
        ..ENERGY
    },
    ConceptDef {
        field: "renewable_share",
        qname: "esrs:PercentageOfRenewableSourcesInTotalEnergyConsumption",
        label: "Share of renewable sources in total energy consumption",
        kind: ConceptKind::Percentage,
        measure: PURE,
        ..ENERGY
    },
    ConceptDef {
        field: "scope1",
        qname: "esrs:GrossScope1GHGEmissions",
        label: "Gross Scope 1 GHG emissions",
        cardinality: Cardinality::Mandatory,
        ..GHG
    },
    ConceptDef {
        field: "scope2_location",
        qname: "esrs:GrossLocationBasedScope2GHGEmissions",
        label: "Gross location-based Scope 2 GHG emissions",
        ..GHG
    },
    ConceptDef {
        field: "scope2_market",
        qname: "esrs:GrossMarketBasedScope2GHGEmissions",
        label: "Gross market-based Scope 2 GHG emissions",
        cardinality: Cardinality::Mandatory,
        ..GHG
    },
    ConceptDef {
        field: "scope3",
        qname: "esrs:GrossScope3GHGEmissions",
        label: "Gross Scope 3 GHG emissions",
        cardinality: Cardinality::Mandatory,
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat01",
        qname: "esrs:GrossScope3GHGEmissionsPurchasedGoodsAndServices",
        label: "Scope 3 category 1: Purchased goods and services",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat02",
        qname: "esrs:GrossScope3GHGEmissionsCapitalGoods",
        label: "Scope 3 category 2: Capital goods",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat03",
        qname: "esrs:GrossScope3GHGEmissionsFuelAndEnergyRelatedActivities",
        label: "Scope 3 category 3: Fuel and energy-related activities",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat04",
        qname: "esrs:GrossScope3GHGEmissionsUpstreamTransportationAndDistribution",
        label: "Scope 3 category 4: Upstream transportation and distribution",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat05",
        qname: "esrs:GrossScope3GHGEmissionsWasteGeneratedInOperations",
        label: "Scope 3 category 5: Waste generated in operations",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat06",
        qname: "esrs:GrossScope3GHGEmissionsBusinessTravel",
        label: "Scope 3 category 6: Business travel",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat07",
        qname: "esrs:GrossScope3GHGEmissionsEmployeeCommuting",
        label: "Scope 3 category 7: Employee commuting",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat08",
        qname: "esrs:GrossScope3GHGEmissionsUpstreamLeasedAssets",
        label: "Scope 3 category 8: Upstream leased assets",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat09",
        qname: "esrs:GrossScope3GHGEmissionsDownstreamTransportationAndDistribution",
        label: "Scope 3 category 9: Downstream transportation and distribution",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat10",
        qname: "esrs:GrossScope3GHGEmissionsProcessingOfSoldProducts",
        label: "Scope 3 category 10: Processing of sold products",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat11",
        qname: "esrs:GrossScope3GHGEmissionsUseOfSoldProducts",
        label: "Scope 3 category 11: Use of sold products",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat12",
        qname: "esrs:GrossScope3GHGEmissionsEndOfLifeTreatmentOfSoldProducts",
        label: "Scope 3 category 12: End-of-life treatment of sold products",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat13",
        qname: "esrs:GrossScope3GHGEmissionsDownstreamLeasedAssets",
        label: "Scope 3 category 13: Downstream leased assets",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat14",
        qname: "esrs:GrossScope3GHGEmissionsFranchises",
        label: "Scope 3 category 14: Franchises",
        ..GHG
    },
    ConceptDef {
        field: "scope3_cat15",
        qname: "esrs:GrossScope3GHGEmissionsInvestments",
        label: "Scope 3 category 15: Investments",
        ..GHG
    },
    ConceptDef {
        field: "total_ghg",
        qname: "esrs:TotalGHGEmissions",
        label: "Total GHG emissions (market-based)",
        cardinality: Cardinality::Mandatory,
        ..GHG
    },
    ConceptDef {
        field: "total_ghg_location",
        qname: "esrs:TotalGHGEmissionsLocationBased",
        label: "Total GHG emissions (location-based)",
        ..GHG
    },
    ConceptDef {
        field: "net_revenue",
        qname: "esrs:NetRevenue",
        label: "Net revenue used to calculate GHG intensity",
        kind: ConceptKind::Monetary,
        measure: Measure::ReportCurrency,
        ..GHG
    },
    ConceptDef {
        field: "ghg_intensity",
        qname: "esrs:GHGEmissionsIntensityPerNetRevenue",
        label: "GHG emissions intensity per net revenue",
        kind: ConceptKind::Intensity,
        cardinality: Cardinality::Conditional,
        measure: Measure::PerReportCurrency("utr:tCO2e"),
        trigger: Some("net_revenue"),
        ..GHG
    },
    // E2 pollution
    ConceptDef {
        field: "nox_emissions",
        qname: "esrs:EmissionsToAirOfNitrogenOxides",
        label: "Emissions to air of nitrogen oxides (NOx)",
        kind: ConceptKind::Mass,
        measure: TONNES,
        standard: Standard::E2,
        disclosure: "E2-4",
        ..BLANK
    },
    ConceptDef {
        field: "sox_emissions",
        qname: "esrs:EmissionsToAirOfSulphurOxides",
        label: "Emissions to air of sulphur oxides (SOx)",
        kind: ConceptKind::Mass,
        measure: TONNES,
        standard: Standard::E2,
        disclosure: "E2-4",
        ..BLANK
    },
    // E3 water and marine resources
    ConceptDef {
        field: "water_policy",
        qname: "esrs:PoliciesRelatedToWaterAndMarineResources",
        label: "Policies related to water and marine resources",
        standard: Standard::E3,
        disclosure: "E3-1",
        ..BLANK
    },
    ConceptDef {
        field: "water_consumption",
        qname: "esrs:TotalWaterConsumption",
        label: "Total water consumption",
        kind: ConceptKind::Volume,
        measure: Measure::Simple("utr:m3"),
        standard: Standard::E3,
        disclosure: "E3-4",
        ..BLANK
    },
    // E4 biodiversity and ecosystems
    ConceptDef {
        field: "sites_near_biodiversity_areas",
        qname: "esrs:NumberOfSitesInOrNearBiodiversitySensitiveAreas",
        label: "Number of sites in or near biodiversity-sensitive areas",
        kind: ConceptKind::Count,
        measure: PURE,
        standard: Standard::E4,
        disclosure: "E4-5",
        ..BLANK
    },
    // E5 resource use and circular economy
    ConceptDef {
        field: "waste_total",
        qname: "esrs:TotalAmountOfWasteGenerated",
        label: "Total amount of waste generated",
        kind: ConceptKind::Mass,
        measure: TONNES,
        standard: Standard::E5,
        disclosure: "E5-5",
        ..BLANK
    },
    ConceptDef {
        field: "waste_hazardous",
        qname: "esrs:TotalAmountOfHazardousWaste",
        label: "Total amount of hazardous waste",
        kind: ConceptKind::Mass,
        measure: TONNES,
        standard: Standard::E5,
        disclosure: "E5-5",
        ..BLANK
    },
    // S1 own workforce
    ConceptDef {
        field: "headcount",
        qname: "esrs:NumberOfEmployeesHeadCount",
        label: "Total number of employees (head count)",
        kind: ConceptKind::Count,
        cardinality: Cardinality::Mandatory,
        period_type: PeriodType::Instant,
        measure: PURE,
        standard: Standard::S1,
        disclosure: "S1-6",
        ..BLANK
    },
    ConceptDef {
        field: "fatalities",
        qname: "esrs:NumberOfFatalitiesAsResultOfWorkRelatedInjuriesAndIllHealth",
        label: "Number of fatalities from work-related injuries and ill health",
        kind: ConceptKind::Count,
        measure: PURE,
        standard: Standard::S1,
        disclosure: "S1-14",
        ..BLANK
    },
    ConceptDef {
        field: "gender_pay_gap",
        qname: "esrs:GenderPayGap",
        label: "Gender pay gap",
        kind: ConceptKind::Percentage,
        measure: PURE,
        standard: Standard::S1,
        disclosure: "S1-16",
        ..BLANK
    },
    // S2 to S4
    ConceptDef {
        field: "value_chain_workers_policy",
        qname: "esrs:PoliciesRelatedToValueChainWorkers",
        label: "Policies related to value chain workers",
        standard: Standard::S2,
        disclosure: "S2-1",
        ..BLANK
    },
    ConceptDef {
        field: "affected_communities_policy",
        qname: "esrs:PoliciesRelatedToAffectedCommunities",
        label: "Policies related to affected communities",
        standard: Standard::S3,
        disclosure: "S3-1",
        ..BLANK
    },
    ConceptDef {
        field: "consumers_policy",
        qname: "esrs:PoliciesRelatedToConsumersAndEndUsers",
        label: "Policies related to consumers and end-users",
        standard: Standard::S4,
        disclosure: "S4-1",
        ..BLANK
    },
    // G1 business conduct
    ConceptDef {
        field: "anti_corruption_policy",
        qname: "esrs:PoliciesOnPreventionAndDetectionOfCorruptionAndBribery",
        label: "Policies on prevention and detection of corruption and bribery",
        cardinality: Cardinality::Mandatory,
        standard: Standard::G1,
        disclosure: "G1-1",
        ..BLANK
    },
    ConceptDef {
        field: "corruption_convictions",
        qname: "esrs:NumberOfConvictionsForViolationOfAntiCorruptionAndAntiBriberyLaws",
        label: "Number of convictions for violation of anti-corruption and anti-bribery laws",
        kind: ConceptKind::Count,
        cardinality: Cardinality::Mandatory,
        measure: PURE,
        standard: Standard::G1,
        disclosure: "G1-4",
        ..BLANK
    },
    ConceptDef {
        field: "corruption_fines",
        qname: "esrs:AmountOfFinesForViolationOfAntiCorruptionAndAntiBriberyLaws",
        label: "Amount of fines for violation of anti-corruption and anti-bribery laws",
        kind: ConceptKind::Monetary,
        measure: Measure::ReportCurrency,
        standard: Standard::G1,
        disclosure: "G1-4",
        ..BLANK
    },
];

static SUMMATIONS: &[SummationDef] = &[
    SummationDef {
        name: "total GHG emissions (market-based)",
        total: "total_ghg",
        components: &["scope1", "scope2_market", "scope3"],
    },
    SummationDef {
        name: "total GHG emissions (location-based)",
        total: "total_ghg_location",
        components: &["scope1", "scope2_location", "scope3"],
    },
    SummationDef {
        name: "gross Scope 3 GHG emissions",
        total: "scope3",
        components: &[
            "scope3_cat01",
            "scope3_cat02",
            "scope3_cat03",
            "scope3_cat04",
            "scope3_cat05",
            "scope3_cat06",
            "scope3_cat07",
            "scope3_cat08",
            "scope3_cat09",
            "scope3_cat10",
            "scope3_cat11",
            "scope3_cat12",
            "scope3_cat13",
            "scope3_cat14",
            "scope3_cat15",
        ],
    },
    SummationDef {
        name: "total energy consumption",
        total: "energy_total",
        components: &["energy_fossil", "energy_nuclear", "energy_renewable"],
    },
];

// ── Catalog ─────────────────────────────────────────────────────────

/// An aggregate relationship: `total == Σ components`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summation {
    /// Human name used in diagnostics.
    pub name: &'static str,
    /// The aggregate concept.
    pub total: QName,
    /// The concepts that add up to it.
    pub components: Vec<QName>,
}

/// The process-wide concept catalog for one taxonomy release.
#[derive(Debug)]
pub struct Catalog {
    concepts: Vec<Concept>,
    by_field: BTreeMap<&'static str, usize>,
    by_qname: BTreeMap<QName, usize>,
    summations: Vec<Summation>,
}

static GLOBAL: OnceLock<Result<Catalog, CatalogError>> = OnceLock::new();

impl Catalog {
    /// Build the catalog from the built-in table.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidEntry`] when the static table violates one of
    /// the module invariants.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self::from_defs(CONCEPTS, SUMMATIONS)?;
        tracing::debug!(
            concepts = catalog.len(),
            summations = catalog.summations.len(),
            version = TAXONOMY_VERSION,
            "built concept catalog"
        );
        Ok(catalog)
    }

    /// The shared catalog, built on first use.
    pub fn global() -> Result<&'static Catalog, CatalogError> {
        GLOBAL
            .get_or_init(Catalog::builtin)
            .as_ref()
            .map_err(Clone::clone)
    }

    fn from_defs(defs: &[ConceptDef], sums: &[SummationDef]) -> Result<Self, CatalogError> {
        let mut concepts = Vec::with_capacity(defs.len());
        let mut by_field = BTreeMap::new();
        let mut by_qname = BTreeMap::new();

        for (index, def) in defs.iter().enumerate() {
            let concept = build_concept(def)?;
            if by_field.insert(def.field, index).is_some() {
                return Err(invalid(def.field, "duplicate field name"));
            }
            if by_qname.insert(concept.qname.clone(), index).is_some() {
                return Err(invalid(def.field, format!("duplicate qname {}", def.qname)));
            }
            concepts.push(concept);
        }

        for concept in &concepts {
            if let Some(trigger) = concept.trigger {
                if !by_field.contains_key(trigger) {
                    return Err(invalid(
                        concept.field,
                        format!("trigger {trigger:?} is not a catalog field"),
                    ));
                }
            }
        }

        let mut summations = Vec::with_capacity(sums.len());
        for def in sums {
            summations.push(build_summation(def, &concepts, &by_field)?);
        }

        Ok(Self {
            concepts,
            by_field,
            by_qname,
            summations,
        })
    }

    /// Resolve a report field to its concept.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownField`] when no concept is mapped to `field`.
    pub fn lookup(&self, field: &str) -> Result<&Concept, CatalogError> {
        self.by_field
            .get(field)
            .map(|&i| &self.concepts[i])
            .ok_or_else(|| CatalogError::UnknownField {
                field: field.to_string(),
            })
    }

    /// Resolve a concept by its qualified name.
    pub fn by_qname(&self, qname: &QName) -> Option<&Concept> {
        self.by_qname.get(qname).map(|&i| &self.concepts[i])
    }

    /// All concepts in table order.
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Concepts rendered in `section`, in table order.
    pub fn in_section(&self, section: SectionId) -> impl Iterator<Item = &Concept> {
        self.concepts
            .iter()
            .filter(move |c| c.section() == section)
    }

    /// Whether `concept` must be reported (or excluded) under `profile`.
    pub fn is_mandatory(&self, concept: &Concept, profile: Profile) -> bool {
        concept.cardinality == Cardinality::Mandatory && profile.covers(concept.disclosure)
    }

    /// The concepts `profile` requires.
    pub fn mandatory_concepts(&self, profile: Profile) -> BTreeSet<QName> {
        self.concepts
            .iter()
            .filter(|c| self.is_mandatory(c, profile))
            .map(|c| c.qname.clone())
            .collect()
    }

    /// `Conditional` concepts paired with the concept that triggers them.
    pub fn conditional_concepts(&self) -> impl Iterator<Item = (&Concept, &Concept)> {
        self.concepts.iter().filter_map(move |c| {
            let trigger = c.trigger?;
            let index = self.by_field.get(trigger)?;
            Some((c, &self.concepts[*index]))
        })
    }

    /// Aggregate relationships checked by the validator.
    pub fn summations(&self) -> &[Summation] {
        &self.summations
    }

    /// The taxonomy release this catalog was built for.
    pub fn version(&self) -> &'static str {
        TAXONOMY_VERSION
    }

    /// Number of concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Whether the catalog has no concepts.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidEntry {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn build_concept(def: &ConceptDef) -> Result<Concept, CatalogError> {
    let qname: QName = def
        .qname
        .parse()
        .map_err(|e| invalid(def.field, format!("{e}")))?;
    if qname.prefix() != "esrs" {
        return Err(invalid(def.field, "concept must be in the esrs namespace"));
    }

    let measure_ok = match (def.kind, def.measure) {
        (ConceptKind::Text | ConceptKind::Date, Measure::None) => true,
        (ConceptKind::Monetary, Measure::ReportCurrency) => true,
        (ConceptKind::Intensity, Measure::PerReportCurrency(m)) => Unit::simple(m).is_ok(),
        (
            ConceptKind::Mass
            | ConceptKind::Energy
            | ConceptKind::Volume
            | ConceptKind::Percentage
            | ConceptKind::Count,
            Measure::Simple(m),
        ) => Unit::simple(m).is_ok(),
        _ => false,
    };
    if !measure_ok {
        return Err(invalid(
            def.field,
            format!("measure {:?} does not fit kind {}", def.measure, def.kind),
        ));
    }

    if (def.cardinality == Cardinality::Conditional) != def.trigger.is_some() {
        return Err(invalid(
            def.field,
            "a trigger is required for, and only for, conditional concepts",
        ));
    }

    Ok(Concept {
        field: def.field,
        qname,
        label: def.label,
        kind: def.kind,
        cardinality: def.cardinality,
        period_type: def.period_type,
        measure: def.measure,
        standard: def.standard,
        disclosure: def.disclosure,
        source: def.source,
        hidden: def.hidden,
        trigger: def.trigger,
    })
}

fn build_summation(
    def: &SummationDef,
    concepts: &[Concept],
    by_field: &BTreeMap<&'static str, usize>,
) -> Result<Summation, CatalogError> {
    let resolve = |field: &str| -> Result<&Concept, CatalogError> {
        by_field
            .get(field)
            .map(|&i| &concepts[i])
            .ok_or_else(|| invalid(def.total, format!("summation member {field:?} is unknown")))
    };

    let total = resolve(def.total)?;
    if !total.kind.is_numeric() {
        return Err(invalid(def.total, "summation total must be numeric"));
    }
    let mut components = Vec::with_capacity(def.components.len());
    for field in def.components {
        let component = resolve(field)?;
        if component.measure != total.measure {
            return Err(invalid(
                def.total,
                format!("component {field:?} has a different measure"),
            ));
        }
        components.push(component.qname.clone());
    }
    if components.is_empty() {
        return Err(invalid(def.total, "summation has no components"));
    }

    Ok(Summation {
        name: def.name,
        total: total.qname.clone(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static Catalog {
        Catalog::global().unwrap()
    }

    fn q(s: &str) -> QName {
        s.parse().unwrap()
    }

    // ── Table integrity ──

    #[test]
    fn test_builtin_table_is_valid() {
        let built = Catalog::builtin().unwrap();
        assert_eq!(built.len(), CONCEPTS.len());
        assert_eq!(built.summations().len(), SUMMATIONS.len());
    }

    #[test]
    fn test_fields_and_qnames_unique() {
        let fields: BTreeSet<_> = catalog().concepts().iter().map(|c| c.field).collect();
        let qnames: BTreeSet<_> = catalog().concepts().iter().map(|c| c.qname.clone()).collect();
        assert_eq!(fields.len(), catalog().len());
        assert_eq!(qnames.len(), catalog().len());
    }

    #[test]
    fn test_every_section_has_concepts() {
        for section in SectionId::template() {
            assert!(
                catalog().in_section(*section).next().is_some(),
                "section {section} is empty"
            );
        }
    }

    #[test]
    fn test_fifteen_scope3_categories() {
        let cats = catalog()
            .concepts()
            .iter()
            .filter(|c| c.field.starts_with("scope3_cat"))
            .count();
        assert_eq!(cats, 15);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let defs = [
            ConceptDef { field: "a", qname: "esrs:A", ..BLANK },
            ConceptDef { field: "a", qname: "esrs:B", ..BLANK },
        ];
        let err = Catalog::from_defs(&defs, &[]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry { ref field, .. } if field == "a"));
    }

    #[test]
    fn test_duplicate_qname_rejected() {
        let defs = [
            ConceptDef { field: "a", qname: "esrs:A", ..BLANK },
            ConceptDef { field: "b", qname: "esrs:A", ..BLANK },
        ];
        assert!(Catalog::from_defs(&defs, &[]).is_err());
    }

    #[test]
    fn test_dangling_trigger_rejected() {
        let defs = [ConceptDef {
            field: "a",
            qname: "esrs:A",
            cardinality: Cardinality::Conditional,
            trigger: Some("missing"),
            ..BLANK
        }];
        assert!(Catalog::from_defs(&defs, &[]).is_err());
    }

    #[test]
    fn test_measure_kind_mismatch_rejected() {
        let defs = [ConceptDef {
            field: "a",
            qname: "esrs:A",
            kind: ConceptKind::Mass,
            ..BLANK
        }];
        assert!(Catalog::from_defs(&defs, &[]).is_err());
    }

    #[test]
    fn test_non_esrs_namespace_rejected() {
        let defs = [ConceptDef { field: "a", qname: "xbrli:A", ..BLANK }];
        assert!(Catalog::from_defs(&defs, &[]).is_err());
    }

    #[test]
    fn test_summation_with_unknown_member_rejected() {
        let defs = [ConceptDef { field: "t", qname: "esrs:T", ..GHG }];
        let sums = [SummationDef {
            name: "t",
            total: "t",
            components: &["nope"],
        }];
        assert!(Catalog::from_defs(&defs, &sums).is_err());
    }

    // ── Lookup ──

    #[test]
    fn test_lookup_known_field() {
        let concept = catalog().lookup("total_ghg").unwrap();
        assert_eq!(concept.qname, q("esrs:TotalGHGEmissions"));
        assert_eq!(concept.kind, ConceptKind::Mass);
        assert_eq!(concept.section(), SectionId::Climate);
    }

    #[test]
    fn test_lookup_unknown_field_fails() {
        let err = catalog().lookup("scope4").unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownField {
                field: "scope4".to_string()
            }
        );
    }

    #[test]
    fn test_by_qname_matches_lookup() {
        for concept in catalog().concepts() {
            assert_eq!(catalog().by_qname(&concept.qname), Some(concept));
        }
    }

    // ── Profiles ──

    #[test]
    fn test_e1_mandatory_set() {
        let expected: BTreeSet<QName> = [
            "esrs:NameOfReportingEntity",
            "esrs:ReportingPeriodStartDate",
            "esrs:ReportingPeriodEndDate",
            "esrs:GrossScope1GHGEmissions",
            "esrs:GrossMarketBasedScope2GHGEmissions",
            "esrs:GrossScope3GHGEmissions",
            "esrs:TotalGHGEmissions",
        ]
        .into_iter()
        .map(q)
        .collect();
        assert_eq!(catalog().mandatory_concepts(Profile::EsrsE1_2023), expected);
    }

    #[test]
    fn test_set1_adds_energy_social_governance() {
        let e1 = catalog().mandatory_concepts(Profile::EsrsE1_2023);
        let set1 = catalog().mandatory_concepts(Profile::EsrsSet1_2023);
        assert!(e1.is_subset(&set1));
        let extra: BTreeSet<_> = set1.difference(&e1).cloned().collect();
        let expected: BTreeSet<QName> = [
            "esrs:EnergyConsumptionRelatedToOwnOperations",
            "esrs:NumberOfEmployeesHeadCount",
            "esrs:PoliciesOnPreventionAndDetectionOfCorruptionAndBribery",
            "esrs:NumberOfConvictionsForViolationOfAntiCorruptionAndAntiBriberyLaws",
        ]
        .into_iter()
        .map(q)
        .collect();
        assert_eq!(extra, expected);
    }

    #[test]
    fn test_conditional_intensity_triggered_by_revenue() {
        let pairs: Vec<_> = catalog()
            .conditional_concepts()
            .map(|(c, t)| (c.field, t.field))
            .collect();
        assert_eq!(pairs, vec![("ghg_intensity", "net_revenue")]);
    }

    // ── Units ──

    #[test]
    fn test_units_resolve_for_currency() {
        let scope1 = catalog().lookup("scope1").unwrap();
        assert_eq!(scope1.unit("EUR").unwrap().unwrap().to_string(), "utr:tCO2e");
        let revenue = catalog().lookup("net_revenue").unwrap();
        assert_eq!(revenue.unit("USD").unwrap().unwrap().to_string(), "iso4217:USD");
        let intensity = catalog().lookup("ghg_intensity").unwrap();
        assert_eq!(
            intensity.unit("EUR").unwrap().unwrap().to_string(),
            "utr:tCO2e/iso4217:EUR"
        );
        let text = catalog().lookup("transition_plan").unwrap();
        assert_eq!(text.unit("EUR").unwrap(), None);
    }

    #[test]
    fn test_market_based_total_summation() {
        let rule = &catalog().summations()[0];
        assert_eq!(rule.total, q("esrs:TotalGHGEmissions"));
        assert_eq!(
            rule.components,
            vec![
                q("esrs:GrossScope1GHGEmissions"),
                q("esrs:GrossMarketBasedScope2GHGEmissions"),
                q("esrs:GrossScope3GHGEmissions"),
            ]
        );
    }

    #[test]
    fn test_version_matches_profiles() {
        for p in Profile::all() {
            assert_eq!(catalog().version(), p.taxonomy_version());
        }
    }
}

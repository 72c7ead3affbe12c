//! # esrs-taxonomy: ESRS Concept Catalog
//!
//! The process-wide, read-only description of what can be reported:
//!
//! - **Sections** (`section.rs`): the fixed template order of the
//!   sustainability statement and the ESRS standards that feed each section.
//!
//! - **Concepts** (`concept.rs`): a taxonomy element with the data kind,
//!   cardinality, period type, and measure the encoder needs.
//!
//! - **Catalog** (`catalog.rs`): the static field → concept table and the
//!   summation rules (e.g. total GHG = Scope 1 + Scope 2 + Scope 3).
//!
//! - **Profiles** (`profile.rs`): which disclosure requirements are in
//!   scope, and so which concepts are mandatory.
//!
//! ## Crate Policy
//!
//! - Depends only on `esrs-core` internally.
//! - Tables are `'static`; the catalog is built once and shared without
//!   locking.

pub mod catalog;
pub mod concept;
pub mod error;
pub mod profile;
pub mod section;

pub use catalog::{Catalog, Summation};
pub use concept::{Cardinality, Concept, ConceptKind, Measure, PeriodType, Source};
pub use error::CatalogError;
pub use profile::{Profile, TAXONOMY_ENTRY_POINT, TAXONOMY_VERSION};
pub use section::{SectionId, Standard, SECTION_COUNT};

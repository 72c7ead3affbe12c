//! # esrs-core: Foundational Types for iXBRL Sustainability Filings
//!
//! The leaf crate of the workspace. It defines the value types every other
//! crate builds on: qualified names, the reporting entity, periods, units,
//! the registry id newtypes, the injected `generated_at` timestamp, and the
//! canonical-bytes/digest pair used to fingerprint documents.
//!
//! ## Key Design Principles
//!
//! 1. **Validated constructors.** `QName`, `ReportingEntity::lei`,
//!    `Period::duration`, and `Timestamp::parse` reject malformed input.
//!    Deserialization routes through the same checks.
//!
//! 2. **Structural ids.** `ContextId` and `UnitId` are derived from the
//!    period or unit they name, so equal structure means equal id.
//!
//! 3. **`CanonicalBytes` newtype.** All fingerprints flow through
//!    `CanonicalBytes::new()`, which rejects floats. Decimal amounts travel
//!    as strings.
//!
//! 4. **UTC-only timestamps.** `Timestamp` is UTC with Z suffix and seconds
//!    precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `esrs-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod period;
pub mod qname;
pub mod temporal;
pub mod unit;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{ContextId, ReportingEntity, UnitId, LEI_SCHEME};
pub use period::Period;
pub use qname::{namespace_uri, QName, NAMESPACES};
pub use temporal::Timestamp;
pub use unit::Unit;

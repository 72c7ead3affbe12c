//! # Qualified Names
//!
//! `QName` names taxonomy concepts and unit measures (`esrs:TotalGHGEmissions`,
//! `iso4217:EUR`, `xbrli:pure`). Prefixes are resolved against a fixed
//! namespace table; a name with an unknown prefix cannot be constructed, so
//! every `QName` that reaches the serializer has a namespace declaration in
//! the emitted document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The namespace table. Order is the order of `xmlns` declarations in
/// serialized documents.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("xhtml", "http://www.w3.org/1999/xhtml"),
    ("ix", "http://www.xbrl.org/2013/inlineXBRL"),
    ("ixt", "http://www.xbrl.org/inlineXBRL/transformation/2020-02-12"),
    ("xbrli", "http://www.xbrl.org/2003/instance"),
    ("link", "http://www.xbrl.org/2003/linkbase"),
    ("xlink", "http://www.w3.org/1999/xlink"),
    ("iso4217", "http://www.xbrl.org/2003/iso4217"),
    ("utr", "http://www.xbrl.org/2009/utr"),
    ("esrs", "https://xbrl.efrag.org/taxonomy/esrs/2023-12-22"),
];

/// Look up the namespace URI bound to `prefix`.
pub fn namespace_uri(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

/// A prefixed XML name whose prefix is bound in [`NAMESPACES`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    prefix: String,
    local: String,
}

impl QName {
    /// Build a qualified name from its parts.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnknownPrefix`] when `prefix` is not in the namespace
    /// table; [`CoreError::MalformedQName`] when `local` is empty or not an
    /// XML name.
    pub fn new(prefix: &str, local: &str) -> Result<Self, CoreError> {
        let full = format!("{prefix}:{local}");
        if namespace_uri(prefix).is_none() {
            return Err(CoreError::UnknownPrefix {
                prefix: prefix.to_string(),
                qname: full,
            });
        }
        if !is_ncname(local) {
            return Err(CoreError::MalformedQName(full));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            local: local.to_string(),
        })
    }

    /// Build a name from parts known to be valid at compile time.
    pub(crate) fn known(prefix: &'static str, local: &'static str) -> Self {
        Self {
            prefix: prefix.to_string(),
            local: local.to_string(),
        }
    }

    /// The namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The local part.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// The namespace URI the prefix is bound to.
    pub fn namespace(&self) -> &'static str {
        namespace_uri(&self.prefix).unwrap_or_default()
    }
}

/// Whether `s` is a non-colonized XML name (simplified to ASCII).
fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl FromStr for QName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => Self::new(prefix, local),
            _ => Err(CoreError::MalformedQName(s.to_string())),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

impl Serialize for QName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

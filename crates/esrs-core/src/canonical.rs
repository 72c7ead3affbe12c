//! # Canonical Serialization: JCS Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes that are
//! digested or compared for equality across the workspace: document
//! fingerprints, the fact-extraction JSON artifact, and filing manifests.
//!
//! ## Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which rejects floating
//! point numbers before RFC 8785 (JCS) serialization. Fact values are
//! `rust_decimal::Decimal` and serialize as strings, so a float reaching this
//! function means a value escaped the decimal pipeline. Rejecting it here
//! keeps `0.1 + 0.2`-style artifacts out of every filing artifact.
//!
//! After coercion, serialization uses `serde_jcs`: sorted keys, compact
//! separators, deterministic byte sequence.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numeric values are integers; decimals travel as strings.
/// - Serialization uses sorted keys with compact separators (RFC 8785).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if JCS
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_json_value(value)?;
        let bytes = serialize_canonical(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into a UTF-8 string. JCS output is always valid UTF-8.
    pub fn into_string(self) -> String {
        String::from_utf8(self.0).unwrap_or_default()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively check a JSON value tree for floats.
///
/// 1. `null`, `bool`, `string`, integer: pass through unchanged.
/// 2. float (not representable as i64/u64): rejected with `FloatRejected`.
/// 3. `object` and `array`: recursed.
fn coerce_json_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785).
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        let data = serde_json::json!({"value": "1.00", "concept": "esrs:X", "decimals": 2});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"concept":"esrs:X","decimals":2,"value":"1.00"}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"amount": 120.5});
        let result = CanonicalBytes::new(&data);
        match result.unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 120.5),
            other => panic!("Expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"facts": [{"value": 3.25}]});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_decimal_string_accepted() {
        let data = serde_json::json!({"amount": "123.46"});
        let cb = CanonicalBytes::new(&data).expect("decimal strings pass");
        assert_eq!(cb.as_bytes(), br#"{"amount":"123.46"}"#);
    }

    #[test]
    fn test_negative_integer() {
        let data = serde_json::json!({"scale": -3});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"scale":-3}"#);
    }

    #[test]
    fn test_null_passthrough() {
        let data = serde_json::json!({"unit": null});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"unit":null}"#);
    }

    #[test]
    fn test_empty_array() {
        let data: Vec<u8> = Vec::new();
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), b"[]");
        assert!(!cb.is_empty());
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"text": "CH\u{2084} und N\u{2082}O"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = cb.into_string();
        assert!(s.contains('\u{2084}'));
    }
}

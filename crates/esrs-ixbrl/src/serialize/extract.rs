//! # Fact Extraction
//!
//! Reads emitted XHTML back into facts. Only `ix:nonFraction` and
//! `ix:nonNumeric` elements are facts; everything else is skipped. The
//! displayed text is decoded with the inverse of the writer's formatting:
//! commas removed, `sign="-"` applied.

use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rust_decimal::Decimal;

use esrs_core::{ContextId, QName, UnitId};

use crate::error::SerializeError;
use crate::fact::{Fact, FactValue};

const NON_FRACTION: &[u8] = b"ix:nonFraction";
const NON_NUMERIC: &[u8] = b"ix:nonNumeric";

#[derive(Debug, Default)]
struct Open {
    numeric: bool,
    name: Option<String>,
    context: Option<String>,
    unit: Option<String>,
    decimals: Option<String>,
    scale: Option<String>,
    negative: bool,
    text: String,
}

/// Extract the facts of an Inline XBRL document, in document order.
///
/// # Errors
///
/// - [`SerializeError::Xml`] if the input is not well-formed.
/// - [`SerializeError::InvalidFact`] for a fact element with missing or
///   unparseable attributes or content.
pub fn extract_facts(xhtml: &str) -> Result<Vec<Fact>, SerializeError> {
    let mut reader = Reader::from_str(xhtml);
    let mut buf = Vec::new();
    let mut facts = Vec::new();
    let mut open: Option<Open> = None;

    let xml = |e: &dyn std::fmt::Display| SerializeError::Xml(e.to_string());

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let tag = e.name();
                let numeric = tag.as_ref() == NON_FRACTION;
                if numeric || tag.as_ref() == NON_NUMERIC {
                    if open.is_some() {
                        return Err(invalid(tag.as_ref(), "nested fact element"));
                    }
                    open = Some(read_attributes(e, numeric)?);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(fact) = open.as_mut() {
                    fact.text.push_str(&e.unescape().map_err(|e| xml(&e))?);
                }
            }
            Ok(Event::End(ref e)) => {
                let tag = e.name();
                if tag.as_ref() == NON_FRACTION || tag.as_ref() == NON_NUMERIC {
                    if let Some(fact) = open.take() {
                        facts.push(finish(fact)?);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml(&e)),
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(facts = facts.len(), "facts extracted");
    Ok(facts)
}

fn read_attributes(e: &BytesStart<'_>, numeric: bool) -> Result<Open, SerializeError> {
    let element = element_name(numeric);
    let mut open = Open {
        numeric,
        ..Open::default()
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|e| invalid(element.as_bytes(), &e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| invalid(element.as_bytes(), &e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"name" => open.name = Some(value),
            b"contextRef" => open.context = Some(value),
            b"unitRef" => open.unit = Some(value),
            b"decimals" => open.decimals = Some(value),
            b"scale" => open.scale = Some(value),
            b"sign" => open.negative = value == "-",
            _ => {}
        }
    }
    Ok(open)
}

fn finish(open: Open) -> Result<Fact, SerializeError> {
    let element = element_name(open.numeric).as_bytes();
    let required = |v: Option<String>, attr: &str| {
        v.ok_or_else(|| invalid(element, &format!("missing {attr} attribute")))
    };

    let name = required(open.name, "name")?;
    let concept = QName::from_str(&name).map_err(|e| invalid(element, &e.to_string()))?;
    let context_ref = ContextId(required(open.context, "contextRef")?);

    if !open.numeric {
        return Ok(Fact {
            concept,
            context_ref,
            unit_ref: None,
            value: FactValue::NonNumeric(open.text),
        });
    }

    let unit_ref = UnitId(required(open.unit, "unitRef")?);
    let decimals = parse_i8(required(open.decimals, "decimals")?, element)?;
    let scale = parse_i8(open.scale.unwrap_or_else(|| "0".to_string()), element)?;
    let digits: String = open.text.chars().filter(|c| *c != ',').collect();
    let mut literal = Decimal::from_str(digits.trim())
        .map_err(|e| invalid(element, &format!("{:?}: {e}", open.text)))?;
    if open.negative {
        literal.set_sign_negative(true);
    }

    Ok(Fact {
        concept,
        context_ref,
        unit_ref: Some(unit_ref),
        value: FactValue::Numeric {
            literal,
            decimals,
            scale,
        },
    })
}

fn parse_i8(value: String, element: &[u8]) -> Result<i8, SerializeError> {
    value
        .parse()
        .map_err(|_| invalid(element, &format!("{value:?} is not a small integer")))
}

fn element_name(numeric: bool) -> &'static str {
    if numeric {
        "ix:nonFraction"
    } else {
        "ix:nonNumeric"
    }
}

fn invalid(element: &[u8], reason: &str) -> SerializeError {
    SerializeError::InvalidFact {
        element: String::from_utf8_lossy(element).into_owned(),
        reason: reason.to_string(),
    }
}

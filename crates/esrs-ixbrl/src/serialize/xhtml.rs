//! # Inline XBRL Writer
//!
//! Renders a document as XHTML with embedded `ix:` facts. Layout:
//!
//! ```text
//! html
//! ├── head            meta charset, meta generated-at, title
//! └── body
//!     ├── div[display:none]
//!     │   └── ix:header
//!     │       ├── ix:hidden       hidden facts
//!     │       ├── ix:references   link:schemaRef → profile entry point
//!     │       └── ix:resources    contexts, then units, each sorted by id
//!     ├── h1              entity name
//!     └── section*        h2, narrative, facts, "Disclosures omitted"
//! ```
//!
//! Elements are written through `quick_xml::Writer`, so escaping and nesting
//! are correct by construction. Fact ids are `f-1`, `f-2`, ... in document
//! order.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_decimal::Decimal;

use esrs_core::{Period, QName, Timestamp, Unit, NAMESPACES};
use esrs_taxonomy::{Catalog, ConceptKind, SectionId};

use crate::document::{Block, Document};
use crate::error::SerializeError;
use crate::fact::{Fact, FactValue};
use crate::registry::Context;
use crate::validate::Diagnostics;

use super::ensure_validated;

const NUM_FORMAT: &str = "ixt:num-dot-decimal";
const DATE_FORMAT: &str = "ixt:date-year-month-day";

/// Render `doc` as an Inline XBRL XHTML document.
///
/// `generated_at` is written to `<meta name="generated-at">` and is the only
/// input besides `doc` that affects the output.
///
/// # Errors
///
/// - [`SerializeError::NotValidated`] unless `diagnostics` authorizes `doc`.
/// - [`SerializeError::Xml`] if the writer fails.
pub fn to_ixbrl_xhtml(
    doc: &Document,
    diagnostics: &Diagnostics,
    generated_at: Timestamp,
) -> Result<String, SerializeError> {
    ensure_validated(doc, diagnostics)?;

    let mut out = XhtmlWriter {
        writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        catalog: Catalog::global().ok(),
        next_id: 0,
    };
    out.document(doc, generated_at)?;

    let bytes = out.writer.into_inner();
    tracing::debug!(bytes = bytes.len(), facts = out.next_id, "xhtml written");
    String::from_utf8(bytes).map_err(|e| SerializeError::Xml(e.to_string()))
}

/// The text shown for a numeric literal: absolute value, thousands grouped
/// with commas, fraction digits kept. The sign is carried by `sign="-"`.
pub fn display_literal(literal: Decimal) -> String {
    let text = literal.abs().to_string();
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

struct XhtmlWriter {
    writer: Writer<Vec<u8>>,
    catalog: Option<&'static Catalog>,
    next_id: usize,
}

impl XhtmlWriter {
    // ── Primitives ──

    fn event(&mut self, event: Event<'_>) -> Result<(), SerializeError> {
        self.writer
            .write_event(event)
            .map_err(|e| SerializeError::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(tag))
    }

    fn end(&mut self, name: &str) -> Result<(), SerializeError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(tag))
    }

    fn text(&mut self, text: &str) -> Result<(), SerializeError> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), SerializeError> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    fn label(&self, concept: &QName) -> String {
        self.catalog
            .and_then(|c| c.by_qname(concept))
            .map(|c| c.label.to_string())
            .unwrap_or_else(|| concept.local().to_string())
    }

    // ── Document ──

    fn document(&mut self, doc: &Document, generated_at: Timestamp) -> Result<(), SerializeError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let xmlns: Vec<(String, &str)> = NAMESPACES
            .iter()
            .map(|(prefix, uri)| {
                let attr = if *prefix == "xhtml" {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{prefix}")
                };
                (attr, *uri)
            })
            .collect();
        let mut html: Vec<(&str, &str)> = xmlns.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        html.push(("xml:lang", "en"));
        self.start("html", &html)?;

        self.head(doc, generated_at)?;

        self.start("body", &[])?;
        self.header(doc)?;
        self.element("h1", &[], &doc.entity_name)?;
        for section in &doc.sections {
            self.start("section", &[("id", section.id.as_str())])?;
            self.element("h2", &[], &section.heading)?;
            for block in &section.blocks {
                match block {
                    Block::Narrative { text } => self.element("p", &[], text)?,
                    Block::Fact(fact) => self.visible_fact(doc, fact)?,
                }
            }
            self.omissions(doc, section.id)?;
            self.end("section")?;
        }
        self.end("body")?;
        self.end("html")
    }

    fn head(&mut self, doc: &Document, generated_at: Timestamp) -> Result<(), SerializeError> {
        self.start("head", &[])?;
        self.empty(
            "meta",
            &[
                ("http-equiv", "Content-Type"),
                ("content", "text/html; charset=UTF-8"),
            ],
        )?;
        let stamp = generated_at.to_iso8601();
        self.empty("meta", &[("name", "generated-at"), ("content", stamp.as_str())])?;
        let title = format!(
            "{} sustainability statement {}",
            doc.entity_name, doc.period
        );
        self.element("title", &[], &title)?;
        self.end("head")
    }

    // ── ix:header ──

    fn header(&mut self, doc: &Document) -> Result<(), SerializeError> {
        self.start("div", &[("style", "display:none")])?;
        self.start("ix:header", &[])?;

        self.start("ix:hidden", &[])?;
        for fact in &doc.hidden {
            self.fact(fact)?;
        }
        self.end("ix:hidden")?;

        self.start("ix:references", &[])?;
        self.empty(
            "link:schemaRef",
            &[
                ("xlink:type", "simple"),
                ("xlink:href", doc.profile.entry_point()),
            ],
        )?;
        self.end("ix:references")?;

        self.start("ix:resources", &[])?;
        for context in doc.registry.contexts() {
            self.context(context)?;
        }
        for (id, unit) in doc.registry.units() {
            self.unit(id.as_str(), unit)?;
        }
        self.end("ix:resources")?;

        self.end("ix:header")?;
        self.end("div")
    }

    fn context(&mut self, context: &Context) -> Result<(), SerializeError> {
        self.start("xbrli:context", &[("id", context.id.as_str())])?;
        self.start("xbrli:entity", &[])?;
        self.element(
            "xbrli:identifier",
            &[("scheme", context.entity.scheme.as_str())],
            &context.entity.identifier,
        )?;
        self.end("xbrli:entity")?;
        self.start("xbrli:period", &[])?;
        match context.period {
            Period::Instant(date) => {
                self.element("xbrli:instant", &[], &date.to_string())?;
            }
            Period::Duration { start, end } => {
                self.element("xbrli:startDate", &[], &start.to_string())?;
                self.element("xbrli:endDate", &[], &end.to_string())?;
            }
        }
        self.end("xbrli:period")?;
        self.end("xbrli:context")
    }

    fn unit(&mut self, id: &str, unit: &Unit) -> Result<(), SerializeError> {
        self.start("xbrli:unit", &[("id", id)])?;
        match unit {
            Unit::Simple(measure) => {
                self.element("xbrli:measure", &[], &measure.to_string())?;
            }
            Unit::Ratio {
                numerator,
                denominator,
            } => {
                self.start("xbrli:divide", &[])?;
                self.start("xbrli:unitNumerator", &[])?;
                self.element("xbrli:measure", &[], &numerator.to_string())?;
                self.end("xbrli:unitNumerator")?;
                self.start("xbrli:unitDenominator", &[])?;
                self.element("xbrli:measure", &[], &denominator.to_string())?;
                self.end("xbrli:unitDenominator")?;
                self.end("xbrli:divide")?;
            }
        }
        self.end("xbrli:unit")
    }

    // ── Facts ──

    fn visible_fact(&mut self, doc: &Document, fact: &Fact) -> Result<(), SerializeError> {
        self.start("p", &[("class", "fact")])?;
        let label = self.label(&fact.concept);
        self.element("span", &[("class", "label")], &label)?;
        self.text(": ")?;
        self.fact(fact)?;
        if let Some(unit) = self.unit_label(doc, fact) {
            self.text(" ")?;
            self.element("span", &[("class", "unit")], &unit)?;
        }
        self.end("p")
    }

    fn unit_label(&self, doc: &Document, fact: &Fact) -> Option<String> {
        let unit = doc.registry.unit(fact.unit_ref.as_ref()?)?;
        let kind = self
            .catalog
            .and_then(|c| c.by_qname(&fact.concept))
            .map(|c| c.kind);
        let mut label = match kind {
            Some(ConceptKind::Percentage) => "%".to_string(),
            _ => unit.label(),
        };
        if let FactValue::Numeric { scale, .. } = fact.value {
            match scale {
                3 => label.insert_str(0, "thousand "),
                6 => label.insert_str(0, "million "),
                9 => label.insert_str(0, "billion "),
                _ => {}
            }
        }
        Some(label)
    }

    fn fact(&mut self, fact: &Fact) -> Result<(), SerializeError> {
        self.next_id += 1;
        let id = format!("f-{}", self.next_id);
        let name = fact.concept.to_string();
        let context = fact.context_ref.as_str();

        match &fact.value {
            FactValue::Numeric {
                literal,
                decimals,
                scale,
            } => {
                let unit = fact
                    .unit_ref
                    .as_ref()
                    .ok_or_else(|| SerializeError::InvalidFact {
                        element: name.clone(),
                        reason: "numeric fact has no unit".to_string(),
                    })?
                    .as_str();
                let decimals = decimals.to_string();
                let scale = scale.to_string();
                let mut attrs = vec![
                    ("id", id.as_str()),
                    ("name", name.as_str()),
                    ("contextRef", context),
                    ("unitRef", unit),
                    ("decimals", decimals.as_str()),
                    ("scale", scale.as_str()),
                    ("format", NUM_FORMAT),
                ];
                if literal.is_sign_negative() && !literal.is_zero() {
                    attrs.push(("sign", "-"));
                }
                self.element("ix:nonFraction", &attrs, &display_literal(*literal))
            }
            FactValue::NonNumeric(text) => {
                let is_date = self
                    .catalog
                    .and_then(|c| c.by_qname(&fact.concept))
                    .is_some_and(|c| c.kind == ConceptKind::Date);
                let mut attrs = vec![
                    ("id", id.as_str()),
                    ("name", name.as_str()),
                    ("contextRef", context),
                ];
                if is_date {
                    attrs.push(("format", DATE_FORMAT));
                }
                self.element("ix:nonNumeric", &attrs, text)
            }
        }
    }

    // ── Exclusions ──

    fn omissions(&mut self, doc: &Document, section: SectionId) -> Result<(), SerializeError> {
        let Some(catalog) = self.catalog else {
            return Ok(());
        };
        let here: Vec<(&QName, &String)> = doc
            .exclusions
            .iter()
            .filter(|(q, _)| catalog.by_qname(q).is_some_and(|c| c.section() == section))
            .collect();
        if here.is_empty() {
            return Ok(());
        }

        self.start("div", &[("class", "omitted")])?;
        self.element("h3", &[], "Disclosures omitted")?;
        self.start("ul", &[])?;
        for (concept, reason) in here {
            self.start("li", &[])?;
            let label = self.label(concept);
            self.element("span", &[("class", "label")], &label)?;
            self.text(": ")?;
            self.text(reason)?;
            self.end("li")?;
        }
        self.end("ul")?;
        self.end("div")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_display_literal_groups_thousands() {
        assert_eq!(display_literal(d("123.46")), "123.46");
        assert_eq!(display_literal(d("1234567.5")), "1,234,567.5");
        assert_eq!(display_literal(d("100000")), "100,000");
        assert_eq!(display_literal(d("0.000")), "0.000");
    }

    #[test]
    fn test_display_literal_drops_sign() {
        assert_eq!(display_literal(d("-4500.25")), "4,500.25");
    }
}

//! XML (HTTP POST) encoding of the Execute request.
//!
//! Walks an already-parsed [`Document`] using namespace-qualified lookups
//! against three namespaces: the document's own (taken from the root element),
//! OWS and XLink (taken from the [`ParserConfig`]).

use crate::config::ParserConfig;
use crate::dom::{Document, Element};
use crate::errors::{ParseError, ParseResult};
use crate::types::{
    BoundingBox, ComplexValue, DataInput, Header, InputValue, LiteralValue, OutputSpec,
    Reference, ReferenceMethod, Request, ResponseDocument, ResponseForm,
};
use crate::validation::{flag, language_or_default, optional, required, RequestValidator, Validator};

/// Parse an Execute document into a [`Request`].
pub fn parse_document(document: &Document, config: &ParserConfig) -> ParseResult<Request> {
    let root = document.root();
    let parser = XmlParser::new(root, config);
    let request = parser.parse_root(root)?;
    RequestValidator::new().validate(request)
}

/// Parse raw XML bytes into a [`Request`].
pub fn parse_bytes(bytes: &[u8], config: &ParserConfig) -> ParseResult<Request> {
    let document = Document::from_bytes(bytes)?;
    parse_document(&document, config)
}

/// Per-call view of the active namespaces. Holds no mutable state.
struct XmlParser<'a> {
    wps: &'a str,
    ows: &'a str,
    xlink: &'a str,
    config: &'a ParserConfig,
}

impl<'a> XmlParser<'a> {
    fn new(root: &'a Element, config: &'a ParserConfig) -> Self {
        let wps = root.namespace.as_deref().unwrap_or("");
        if wps != config.wps_namespace {
            log::warn!(
                "Execute document namespace '{}' differs from configured '{}'",
                wps,
                config.wps_namespace
            );
        }
        Self {
            wps,
            ows: &config.ows_namespace,
            xlink: &config.xlink_namespace,
            config,
        }
    }

    fn parse_root(&self, root: &Element) -> ParseResult<Request> {
        let version = required(root.attribute_ns(self.wps, "version"), "version")?;

        let identifier = root
            .first_descendant_ns(self.ows, "Identifier")
            .map(|e| e.direct_text().trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ParseError::missing("Identifier"))?;

        let language = language_or_default(
            root.attribute_ns(self.wps, "language"),
            &self.config.default_language,
        );

        let mut request = Request::new(version, identifier, language);

        if let Some(inputs) = root.child_ns(self.wps, "DataInputs") {
            request.data_inputs = self.parse_data_inputs(inputs)?;
        }
        if let Some(form) = root.child_ns(self.wps, "ResponseForm") {
            request.response_form = self.parse_response_form(form)?;
        }

        log::debug!(
            "Parsed XML Execute request for '{}' with {} input(s)",
            request.identifier,
            request.data_inputs.len()
        );
        Ok(request)
    }

    /// Text of the OWS `Identifier` child, if present and non-blank.
    fn identifier_of(&self, node: &Element) -> Option<String> {
        node.child_ns(self.ows, "Identifier")
            .map(|e| e.direct_text().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    // ============================================================================================
    // DATA INPUTS
    // ============================================================================================

    fn parse_data_inputs(&self, node: &Element) -> ParseResult<Vec<DataInput>> {
        let mut inputs = Vec::new();
        for input in node.children_ns(self.wps, "Input") {
            if let Some(parsed) = self.parse_input(input)? {
                inputs.push(parsed);
            }
        }
        Ok(inputs)
    }

    /// `Ok(None)` means the input was dropped (non-strict bounding-box
    /// mismatch).
    fn parse_input(&self, node: &Element) -> ParseResult<Option<DataInput>> {
        let identifier = self
            .identifier_of(node)
            .ok_or_else(|| ParseError::no_applicable_code("Identifier for input not set"))?;

        let value = if let Some(reference) = node.child_ns(self.wps, "Reference") {
            Some(InputValue::Reference(self.parse_reference(reference)?))
        } else if let Some(data) = node.child_ns(self.wps, "Data") {
            self.parse_data(data, &identifier)?
        } else {
            return Err(ParseError::invalid(identifier));
        };

        Ok(value.map(|value| DataInput::new(identifier, value)))
    }

    fn parse_data(&self, node: &Element, identifier: &str) -> ParseResult<Option<InputValue>> {
        if let Some(complex) = node.child_ns(self.wps, "ComplexData") {
            return Ok(Some(InputValue::ComplexValue(parse_complex(complex))));
        }
        if let Some(literal) = node.child_ns(self.wps, "LiteralData") {
            return Ok(Some(InputValue::LiteralValue(parse_literal(literal))));
        }
        if let Some(bbox) = node.child_ns(self.wps, "BoundingBoxData") {
            return match self.parse_bbox(bbox)? {
                Some(parsed) => Ok(Some(InputValue::BoundingBox(parsed))),
                None if self.config.strict_bounding_box => Err(ParseError::invalid(identifier)),
                None => {
                    log::warn!(
                        "Dropping bounding box input '{}': expected 4 corner coordinates",
                        identifier
                    );
                    Ok(None)
                }
            };
        }
        Err(ParseError::invalid(identifier))
    }

    fn parse_reference(&self, node: &Element) -> ParseResult<Reference> {
        let href = required(node.attribute_ns(self.xlink, "href"), "'href'")?;

        let method = match optional(node.attribute_ns(self.wps, "method")) {
            Some(m) => ReferenceMethod::parse(&m)?,
            None => ReferenceMethod::GET,
        };

        let header = match node.child_ns(self.wps, "Header") {
            Some(header) => Some(self.parse_header(header)?),
            None => None,
        };

        let body = node.child_ns(self.wps, "Body").and_then(inline_payload);

        let body_reference = node
            .child_ns(self.wps, "BodyReference")
            .and_then(|b| optional(b.attribute_ns(self.xlink, "href")));

        Ok(Reference {
            href,
            method,
            header,
            body,
            body_reference,
            mime_type: optional(node.attribute_any("mimeType")),
            encoding: optional(node.attribute_any("encoding")),
            schema: optional(node.attribute_any("schema")),
        })
    }

    fn parse_header(&self, node: &Element) -> ParseResult<Header> {
        Ok(Header {
            key: required(node.attribute_ns(self.wps, "key"), "Header")?,
            value: required(node.attribute_ns(self.wps, "value"), "Header")?,
        })
    }

    /// `Ok(None)` when the corners do not add up to exactly 4 coordinates.
    fn parse_bbox(&self, node: &Element) -> ParseResult<Option<BoundingBox>> {
        let crs = optional(node.attribute_ns(self.ows, "crs")).unwrap_or_default();

        let dimensions = match optional(node.attribute_ns(self.ows, "dimensions")) {
            Some(d) => d
                .trim()
                .parse::<u32>()
                .map_err(|_| ParseError::invalid("dimensions"))?,
            None => 2,
        };

        let mut coords: Vec<String> = Vec::new();
        for corner in ["LowerCorner", "UpperCorner"] {
            if let Some(c) = node.child_ns(self.ows, corner) {
                coords.extend(c.direct_text().split_whitespace().map(str::to_string));
            }
        }

        let value: Option<[String; 4]> = coords.try_into().ok();
        Ok(value.map(|value| BoundingBox {
            crs,
            dimensions,
            value,
        }))
    }

    // ============================================================================================
    // RESPONSE FORM
    // ============================================================================================

    fn parse_response_form(&self, node: &Element) -> ParseResult<ResponseForm> {
        let mut form = ResponseForm::default();

        if let Some(doc) = node.child_ns(self.wps, "ResponseDocument") {
            let mut outputs = Vec::new();
            for output in doc.children_ns(self.wps, "Output") {
                outputs.push(self.parse_output(output)?);
            }
            form.response_document = ResponseDocument {
                store_execute_response: flag(doc.attribute_ns(self.wps, "storeExecuteResponse")),
                lineage: flag(doc.attribute_ns(self.wps, "lineage")),
                status: flag(doc.attribute_ns(self.wps, "status")),
                outputs,
            };
        } else if let Some(raw) = node.child_ns(self.wps, "RawDataOutput") {
            let output = self.parse_output(raw)?;
            form.raw_data_output.insert(output.identifier.clone(), output);
        }

        Ok(form)
    }

    fn parse_output(&self, node: &Element) -> ParseResult<OutputSpec> {
        let identifier = self
            .identifier_of(node)
            .ok_or_else(|| ParseError::missing("Identifier"))?;

        Ok(OutputSpec {
            identifier,
            mime_type: optional(node.attribute_any("mimeType")),
            encoding: optional(node.attribute_any("encoding")),
            schema: optional(node.attribute_any("schema")),
            uom: optional(node.attribute_ns(self.wps, "uom")),
            as_reference: flag(node.attribute_ns(self.wps, "asReference")),
        })
    }
}

/// Text/CDATA content if there is any, else the markup of the first child
/// element.
fn inline_payload(node: &Element) -> Option<String> {
    let text = node.direct_text();
    if !text.trim().is_empty() {
        return Some(text);
    }
    node.first_child_element().map(Element::to_xml)
}

fn parse_complex(node: &Element) -> ComplexValue {
    ComplexValue {
        value: inline_payload(node).unwrap_or_default(),
        mime_type: optional(node.attribute_any("mimeType")),
        encoding: optional(node.attribute_any("encoding")),
        schema: optional(node.attribute_any("schema")),
    }
}

fn parse_literal(node: &Element) -> LiteralValue {
    LiteralValue {
        value: node.direct_text(),
        data_type: optional(node.attribute_any("dataType")),
        uom: optional(node.attribute_any("uom")),
    }
}

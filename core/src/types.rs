//! # WPS EXECUTE DATA MODEL
//!
//! Normalized, encoding-independent representation of an Execute request.
//! Both the XML and the KVP front ends produce exactly these types.

use crate::errors::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Service name carried by every parsed request.
pub const SERVICE: &str = "wps";
/// Operation name carried by every parsed request.
pub const REQUEST: &str = "execute";

/// **EXECUTE REQUEST**
///
/// Created fresh per incoming operation and handed to the execution engine.
/// After a successful parse `version`, `identifier` and `language` are
/// non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Always [`SERVICE`].
    pub service: String,
    /// Always [`REQUEST`].
    pub request: String,
    /// Requested protocol version.
    pub version: String,
    /// Process to invoke.
    pub identifier: String,
    /// Explicit language or the configured default.
    pub language: String,
    /// Inputs in request order. Empty when the request has none.
    pub data_inputs: Vec<DataInput>,
    /// Requested response form; both sub-containers are always present.
    pub response_form: ResponseForm,
}

impl Request {
    /// New request with empty inputs and a default response form.
    pub fn new(
        version: impl Into<String>,
        identifier: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            service: SERVICE.to_string(),
            request: REQUEST.to_string(),
            version: version.into(),
            identifier: identifier.into(),
            language: language.into(),
            data_inputs: Vec::new(),
            response_form: ResponseForm::default(),
        }
    }

    /// Look up an input by identifier.
    pub fn input(&self, identifier: &str) -> Option<&DataInput> {
        self.data_inputs.iter().find(|i| i.identifier == identifier)
    }
}

/// One data input, keyed by its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInput {
    /// Input identifier; uniqueness is not enforced here.
    pub identifier: String,
    /// Typed payload.
    pub value: InputValue,
}

impl DataInput {
    /// Pair an identifier with its payload.
    pub fn new(identifier: impl Into<String>, value: InputValue) -> Self {
        Self {
            identifier: identifier.into(),
            value,
        }
    }

    /// Variant tag, as named on the wire.
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }
}

/// Payload variants of a data input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputValue {
    /// Scalar value.
    LiteralValue(LiteralValue),
    /// Inline structured content.
    ComplexValue(ComplexValue),
    /// Content to be fetched from a URL.
    Reference(Reference),
    /// Spatial extent.
    BoundingBox(BoundingBox),
}

impl InputValue {
    /// Variant tag, as named on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::LiteralValue(_) => "LiteralValue",
            Self::ComplexValue(_) => "ComplexValue",
            Self::Reference(_) => "Reference",
            Self::BoundingBox(_) => "BoundingBox",
        }
    }
}

/// Scalar input with optional type and unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralValue {
    pub value: String,
    pub data_type: Option<String>,
    pub uom: Option<String>,
}

/// Inline complex input. `value` is either raw text or serialized markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexValue {
    pub value: String,
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub schema: Option<String>,
}

/// HTTP method used to resolve a [`Reference`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceMethod {
    #[default]
    GET,
    POST,
}

impl ReferenceMethod {
    /// Parse the wire value case-insensitively. Anything but GET or POST is
    /// `InvalidParameterValue("method")`.
    pub fn parse(value: &str) -> ParseResult<Self> {
        match value.to_uppercase().as_str() {
            "GET" => Ok(Self::GET),
            "POST" => Ok(Self::POST),
            _ => Err(ParseError::invalid("method")),
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
        }
    }
}

impl fmt::Display for ReferenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single HTTP header sent when resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// Input passed by reference.
///
/// `body` and `body_reference` are independently optional; at most one is
/// meaningful to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub href: String,
    pub method: ReferenceMethod,
    pub header: Option<Header>,
    pub body: Option<String>,
    pub body_reference: Option<String>,
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub schema: Option<String>,
}

/// Bounding-box input: lower corner then upper corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub crs: String,
    pub dimensions: u32,
    pub value: [String; 4],
}

impl BoundingBox {
    /// Lower corner coordinates.
    pub fn lower_corner(&self) -> &[String] {
        &self.value[..2]
    }

    /// Upper corner coordinates.
    pub fn upper_corner(&self) -> &[String] {
        &self.value[2..]
    }
}

/// **RESPONSE FORM**
///
/// Both containers are always present. At most one is meaningful per request
/// but the wire formats do not enforce that, so neither does the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseForm {
    pub response_document: ResponseDocument,
    /// Output identifier to formatting. The XML encoding allows one entry.
    pub raw_data_output: BTreeMap<String, OutputSpec>,
}

impl ResponseForm {
    /// True when neither a document output nor a raw output was requested.
    pub fn is_empty(&self) -> bool {
        self.response_document.outputs.is_empty() && self.raw_data_output.is_empty()
    }
}

/// Response document settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDocument {
    pub store_execute_response: bool,
    pub lineage: bool,
    pub status: bool,
    pub outputs: Vec<OutputSpec>,
}

/// Formatting requested for one output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub identifier: String,
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub schema: Option<String>,
    pub uom: Option<String>,
    pub as_reference: bool,
}

impl OutputSpec {
    /// Output with no formatting attributes.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constants() {
        let req = Request::new("1.0.0", "buffer", "en");
        assert_eq!(req.service, "wps");
        assert_eq!(req.request, "execute");
        assert!(req.data_inputs.is_empty());
        assert!(req.response_form.is_empty());
    }

    #[test]
    fn test_bbox_corners() {
        let bbox = BoundingBox {
            crs: "EPSG:4326".to_string(),
            dimensions: 2,
            value: ["1".into(), "2".into(), "3".into(), "4".into()],
        };
        assert_eq!(bbox.lower_corner(), &["1".to_string(), "2".to_string()]);
        assert_eq!(bbox.upper_corner(), &["3".to_string(), "4".to_string()]);
    }

    #[test]
    fn test_input_serializes_with_type_tag() {
        let input = DataInput::new(
            "size",
            InputValue::LiteralValue(LiteralValue {
                value: "10".to_string(),
                ..LiteralValue::default()
            }),
        );
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["value"]["type"], "LiteralValue");
        assert_eq!(json["value"]["value"], "10");
        assert_eq!(input.type_name(), "LiteralValue");
    }

    #[test]
    fn test_reference_method_default() {
        assert_eq!(ReferenceMethod::default(), ReferenceMethod::GET);
        assert_eq!(ReferenceMethod::POST.to_string(), "POST");
        assert_eq!(ReferenceMethod::parse("post").unwrap(), ReferenceMethod::POST);
        assert_eq!(
            ReferenceMethod::parse("PUT").unwrap_err(),
            ParseError::invalid("method")
        );
    }
}

//! KVP (HTTP GET) encoding of the Execute request.
//!
//! `DataInputs`, `ResponseDocument` and `RawDataOutput` share one compact
//! grammar:
//!
//! ```text
//! key[=value][@attr=value]*[;key[=value][@attr=value]*]*
//! ```
//!
//! Attribute keys are lower-cased and the values `true`/`false` (any case)
//! become booleans.

use crate::config::ParserConfig;
use crate::errors::{ParseError, ParseResult};
use crate::types::{
    ComplexValue, DataInput, InputValue, LiteralValue, OutputSpec, Reference, ReferenceMethod,
    Request, REQUEST, SERVICE,
};
use crate::validation::{flag, is_true, language_or_default, required, RequestValidator, Validator};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Attribute value after boolean coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvpValue {
    Bool(bool),
    Text(String),
}

impl KvpValue {
    fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else {
            Self::Text(raw.to_string())
        }
    }

    /// String form; booleans render as `true`/`false`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Boolean form; only `Bool(true)` is true.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => is_true(s),
        }
    }
}

/// One `;`-separated entry of the compact grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvpEntry {
    pub identifier: String,
    /// `None` when the value part starts with `@` (or the key carried the
    /// attributes directly).
    pub value: Option<String>,
    pub attributes: BTreeMap<String, KvpValue>,
}

impl KvpEntry {
    /// Attribute by lower-case name.
    pub fn attribute(&self, name: &str) -> Option<&KvpValue> {
        self.attributes.get(name)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.attribute(name)
            .map(KvpValue::as_text)
            .filter(|s| !s.is_empty())
    }

    fn flag(&self, name: &str) -> bool {
        self.attribute(name).map(KvpValue::as_bool).unwrap_or(false)
    }

    fn warn_unknown(&self, known: &[&str]) {
        for key in self.attributes.keys() {
            if !known.contains(&key.as_str()) {
                log::warn!("Ignoring unknown attribute '{}' on '{}'", key, self.identifier);
            }
        }
    }
}

/// Parse a compact-grammar parameter value. `parameter` names the KVP
/// parameter in errors.
pub fn parse_compact(input: &str, parameter: &str) -> ParseResult<Vec<KvpEntry>> {
    let mut entries = Vec::new();

    for raw in input.split(';') {
        // The key ends at the first '=', or at an earlier '@' when the
        // attributes hang directly off the key.
        let (key, rest) = match (raw.find('='), raw.find('@')) {
            (Some(eq), Some(at)) if at < eq => (&raw[..at], &raw[at..]),
            (Some(eq), _) => (&raw[..eq], &raw[eq + 1..]),
            (None, Some(at)) => (&raw[..at], &raw[at..]),
            (None, None) => (raw, ""),
        };
        let key = key.trim();

        if key.is_empty() && rest.is_empty() {
            continue;
        }

        let (value, attributes) = match rest.find('@') {
            Some(0) => (None, &rest[1..]),
            Some(at) => (Some(rest[..at].to_string()), &rest[at + 1..]),
            None => (Some(rest.to_string()), ""),
        };

        let mut entry = KvpEntry {
            identifier: key.to_string(),
            value,
            attributes: BTreeMap::new(),
        };

        for segment in attributes.split('@').filter(|s| !s.is_empty()) {
            let (attr_key, attr_value) = segment
                .split_once('=')
                .ok_or_else(|| ParseError::invalid(parameter))?;
            entry
                .attributes
                .insert(attr_key.to_lowercase(), KvpValue::coerce(attr_value));
        }

        entries.push(entry);
    }

    Ok(entries)
}

/// Parse decoded query parameters into a [`Request`]. Keys are matched
/// case-insensitively.
pub fn parse_params(params: &HashMap<String, String>, config: &ParserConfig) -> ParseResult<Request> {
    let params = normalize_keys(params);
    let get = |name: &str| params.get(name).copied();

    if let Some(service) = get("service") {
        if !service.eq_ignore_ascii_case(SERVICE) {
            return Err(ParseError::invalid("service"));
        }
    }
    if let Some(request) = get("request") {
        if !request.eq_ignore_ascii_case(REQUEST) {
            return Err(ParseError::invalid("request"));
        }
    }

    let version = required(get("version"), "version")?;
    let identifier = required(get("identifier"), "Identifier")?;
    let language = get("language").map(str::to_lowercase);
    let language = language_or_default(language.as_deref(), &config.default_language);

    let mut request = Request::new(version, identifier, language);

    if let Some(inputs) = get("datainputs") {
        request.data_inputs = parse_compact(inputs, "DataInputs")?
            .into_iter()
            .map(into_data_input)
            .collect::<ParseResult<_>>()?;
    }

    let form = &mut request.response_form;
    if let Some(outputs) = get("responsedocument") {
        form.response_document.outputs = parse_compact(outputs, "ResponseDocument")?
            .into_iter()
            .map(into_output)
            .collect();
    }
    if let Some(raw) = get("rawdataoutput") {
        for output in parse_compact(raw, "RawDataOutput")?.into_iter().map(into_output) {
            form.raw_data_output.insert(output.identifier.clone(), output);
        }
    }
    form.response_document.store_execute_response = flag(get("storeexecuteresponse"));
    form.response_document.lineage = flag(get("lineage"));
    form.response_document.status = flag(get("status"));

    log::debug!(
        "Parsed KVP Execute request for '{}' with {} input(s)",
        request.identifier,
        request.data_inputs.len()
    );
    RequestValidator::new().validate(request)
}

const REFERENCE_ATTRS: &[&str] = &[
    "xlink:href",
    "href",
    "method",
    "body",
    "bodyreference",
    "mimetype",
    "encoding",
    "schema",
];
const COMPLEX_ATTRS: &[&str] = &["mimetype", "encoding", "schema"];
const LITERAL_ATTRS: &[&str] = &["datatype", "uom"];
const OUTPUT_ATTRS: &[&str] = &["mimetype", "encoding", "schema", "uom", "asreference"];

/// Type a generic entry: an `href` makes it a reference, any complex
/// formatting attribute a complex value, anything else a literal.
fn into_data_input(entry: KvpEntry) -> ParseResult<DataInput> {
    if entry.identifier.is_empty() {
        return Err(ParseError::no_applicable_code("Identifier for input not set"));
    }

    let href = entry.text("xlink:href").or_else(|| entry.text("href"));
    let value = if let Some(href) = href {
        entry.warn_unknown(REFERENCE_ATTRS);
        let method = match entry.text("method") {
            Some(m) => ReferenceMethod::parse(&m)?,
            None => ReferenceMethod::GET,
        };
        InputValue::Reference(Reference {
            href,
            method,
            header: None,
            body: entry.text("body"),
            body_reference: entry.text("bodyreference"),
            mime_type: entry.text("mimetype"),
            encoding: entry.text("encoding"),
            schema: entry.text("schema"),
        })
    } else if COMPLEX_ATTRS.iter().any(|a| entry.attribute(a).is_some()) {
        entry.warn_unknown(COMPLEX_ATTRS);
        InputValue::ComplexValue(ComplexValue {
            value: entry.value.clone().unwrap_or_default(),
            mime_type: entry.text("mimetype"),
            encoding: entry.text("encoding"),
            schema: entry.text("schema"),
        })
    } else {
        entry.warn_unknown(LITERAL_ATTRS);
        InputValue::LiteralValue(LiteralValue {
            value: entry.value.clone().unwrap_or_default(),
            data_type: entry.text("datatype"),
            uom: entry.text("uom"),
        })
    };

    Ok(DataInput::new(entry.identifier, value))
}

/// Lower-case every key. When two keys collide (`DataInputs` and
/// `datainputs`) the one that sorts first wins, independent of hash order.
fn normalize_keys(params: &HashMap<String, String>) -> BTreeMap<String, &str> {
    let mut sorted: Vec<(&String, &String)> = params.iter().collect();
    sorted.sort();

    let mut normalized = BTreeMap::new();
    for (key, value) in sorted {
        let lowered = key.to_ascii_lowercase();
        if normalized.contains_key(&lowered) {
            log::warn!("Ignoring repeated parameter '{}'", key);
            continue;
        }
        normalized.insert(lowered, value.as_str());
    }
    normalized
}

fn into_output(entry: KvpEntry) -> OutputSpec {
    entry.warn_unknown(OUTPUT_ATTRS);
    OutputSpec {
        mime_type: entry.text("mimetype"),
        encoding: entry.text("encoding"),
        schema: entry.text("schema"),
        uom: entry.text("uom"),
        as_reference: entry.flag("asreference"),
        identifier: entry.identifier,
    }
}

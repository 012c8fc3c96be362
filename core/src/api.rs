//! Flat re-export surface.

pub use crate::config::ParserConfig;
pub use crate::dom::{Document, Element};
pub use crate::errors::{ParseError, ParseResult};
pub use crate::request::{
    parse_compact, parse_kvp_execute, parse_query_string, parse_xml_execute, ExecuteParser,
    KvpEntry, KvpValue,
};
pub use crate::types::{
    BoundingBox, ComplexValue, DataInput, Header, InputValue, LiteralValue, OutputSpec,
    Reference, ReferenceMethod, Request, ResponseDocument, ResponseForm,
};
pub use crate::validation::{RequestValidator, Validator};

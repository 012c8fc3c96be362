//! Execute request front ends.
//!
//! Two independent producers of the same [`Request`]: the XML (POST) parser
//! and the KVP (GET) parser. Neither keeps state between calls.

pub mod kvp;
pub mod query;
pub mod xml;

pub use kvp::{parse_compact, KvpEntry, KvpValue};
pub use query::parse_query_string;

use crate::config::ParserConfig;
use crate::dom::Document;
use crate::errors::ParseResult;
use crate::types::Request;
use std::collections::HashMap;

/// Parse an XML Execute request body.
pub fn parse_xml_execute(body: &[u8], config: &ParserConfig) -> ParseResult<Request> {
    xml::parse_bytes(body, config)
}

/// Parse decoded KVP parameters.
pub fn parse_kvp_execute(
    params: &HashMap<String, String>,
    config: &ParserConfig,
) -> ParseResult<Request> {
    kvp::parse_params(params, config)
}

/// **EXECUTE PARSER**
///
/// Owns a [`ParserConfig`] and exposes every entry point. Immutable, so a
/// single instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ExecuteParser {
    config: ParserConfig,
}

impl ExecuteParser {
    /// Parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a POST body.
    pub fn parse_xml(&self, body: &[u8]) -> ParseResult<Request> {
        parse_xml_execute(body, &self.config)
    }

    /// Parse an already-built document tree.
    pub fn parse_document(&self, document: &Document) -> ParseResult<Request> {
        xml::parse_document(document, &self.config)
    }

    /// Parse decoded GET parameters.
    pub fn parse_kvp(&self, params: &HashMap<String, String>) -> ParseResult<Request> {
        parse_kvp_execute(params, &self.config)
    }

    /// Parse a raw, still percent-encoded query string.
    pub fn parse_query(&self, query: &str) -> ParseResult<Request> {
        self.parse_kvp(&parse_query_string(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExecuteParser>();
    }

    #[test]
    fn test_parse_query() {
        let parser = ExecuteParser::new(ParserConfig::default().with_default_language("fr"));
        let req = parser
            .parse_query("service=WPS&request=Execute&version=1.0.0&identifier=buffer&DataInputs=size%3D10")
            .unwrap();
        assert_eq!(req.identifier, "buffer");
        assert_eq!(req.language, "fr");
        assert_eq!(req.data_inputs[0].identifier, "size");
    }

    #[test]
    fn test_parse_xml() {
        let body = br#"<wps:Execute version="1.0.0" xmlns:wps="http://www.opengis.net/wps/1.0.0"
            xmlns:ows="http://www.opengis.net/ows/1.1"><ows:Identifier>buffer</ows:Identifier></wps:Execute>"#;
        let req = ExecuteParser::default().parse_xml(body).unwrap();
        assert_eq!(req.identifier, "buffer");
    }

    #[test]
    fn test_parse_xml_not_well_formed() {
        let err = ExecuteParser::default().parse_xml(b"<wps:Execute").unwrap_err();
        assert_eq!(err.code(), "NoApplicableCode");
    }
}

//! Parser configuration context.

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};

/// WPS 1.0.0 namespace.
pub const WPS_NAMESPACE: &str = "http://www.opengis.net/wps/1.0.0";
/// OWS 1.1 namespace.
pub const OWS_NAMESPACE: &str = "http://www.opengis.net/ows/1.1";
/// XLink namespace.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
/// Language assumed when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// **PARSER CONFIGURATION**
///
/// Process-wide settings consumed by both front ends. Parsers only ever borrow
/// it, so one instance can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Language used when the request carries none.
    pub default_language: String,

    /// Expected document namespace. The XML parser takes the namespace from
    /// the root element; this value is only used to warn on mismatch.
    pub wps_namespace: String,

    /// Namespace of `Identifier`, `LowerCorner`, `UpperCorner`.
    pub ows_namespace: String,

    /// Namespace of `href` attributes.
    pub xlink_namespace: String,

    /// Reject bounding boxes whose corner count is not 4 instead of dropping
    /// the input.
    pub strict_bounding_box: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            wps_namespace: WPS_NAMESPACE.to_string(),
            ows_namespace: OWS_NAMESPACE.to_string(),
            xlink_namespace: XLINK_NAMESPACE.to_string(),
            strict_bounding_box: false,
        }
    }
}

impl ParserConfig {
    /// Configuration with WPS 1.0.0 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| {
            ParseError::no_applicable_code(format!("Invalid parser configuration: {}", e))
        })
    }

    /// Override the default language.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Override the OWS namespace.
    pub fn with_ows_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.ows_namespace = namespace.into();
        self
    }

    /// Override the XLink namespace.
    pub fn with_xlink_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.xlink_namespace = namespace.into();
        self
    }

    /// Toggle strict bounding-box handling.
    pub fn with_strict_bounding_box(mut self, strict: bool) -> Self {
        self.strict_bounding_box = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.default_language, "en");
        assert_eq!(cfg.ows_namespace, OWS_NAMESPACE);
        assert_eq!(cfg.xlink_namespace, XLINK_NAMESPACE);
        assert!(!cfg.strict_bounding_box);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = ParserConfig::from_json(r#"{"default_language": "de"}"#).unwrap();
        assert_eq!(cfg.default_language, "de");
        assert_eq!(cfg.wps_namespace, WPS_NAMESPACE);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = ParserConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), "NoApplicableCode");
    }

    #[test]
    fn test_builder() {
        let cfg = ParserConfig::new()
            .with_default_language("fr")
            .with_strict_bounding_box(true);
        assert_eq!(cfg.default_language, "fr");
        assert!(cfg.strict_bounding_box);
    }
}

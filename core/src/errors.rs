//! Error taxonomy shared by both request encodings.
//!
//! Each variant corresponds to an OWS exception code so the transport layer can
//! map a failure straight into an ExceptionReport.

use thiserror::Error;

/// Failure while turning a wire request into a [`crate::types::Request`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A mandatory field is absent or empty.
    #[error("MissingParameterValue: {0}")]
    MissingParameterValue(String),

    /// A field is present but its value cannot be accepted.
    #[error("InvalidParameterValue: {0}")]
    InvalidParameterValue(String),

    /// Structural malformation not covered by the other two kinds.
    #[error("NoApplicableCode: {0}")]
    NoApplicableCode(String),
}

impl ParseError {
    /// Shorthand for [`ParseError::MissingParameterValue`].
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameterValue(name.into())
    }

    /// Shorthand for [`ParseError::InvalidParameterValue`].
    pub fn invalid(name: impl Into<String>) -> Self {
        Self::InvalidParameterValue(name.into())
    }

    /// Shorthand for [`ParseError::NoApplicableCode`].
    pub fn no_applicable_code(message: impl Into<String>) -> Self {
        Self::NoApplicableCode(message.into())
    }

    /// OWS `exceptionCode` for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameterValue(_) => "MissingParameterValue",
            Self::InvalidParameterValue(_) => "InvalidParameterValue",
            Self::NoApplicableCode(_) => "NoApplicableCode",
        }
    }

    /// OWS `locator`: the offending parameter name, or a message for
    /// `NoApplicableCode`.
    pub fn locator(&self) -> &str {
        match self {
            Self::MissingParameterValue(s)
            | Self::InvalidParameterValue(s)
            | Self::NoApplicableCode(s) => s,
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::NoApplicableCode(format!("Malformed XML: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::NoApplicableCode(format!("Malformed XML attribute: {}", err))
    }
}

/// Result alias used throughout the parsers.
pub type ParseResult<T> = Result<T, ParseError>;

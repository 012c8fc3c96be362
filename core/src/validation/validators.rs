//! # CONCRETE VALIDATORS

use super::Validator;
use crate::errors::{ParseError, ParseResult};
use crate::types::{InputValue, OutputSpec, Request, REQUEST, SERVICE};

// ================================================================================================
// REQUEST VALIDATOR - post-parse shape contract
// ================================================================================================

/// **REQUEST VALIDATOR**
///
/// Re-checks the invariants every successfully parsed request must satisfy.
/// Both front ends run their result through it, which is what keeps the XML
/// and KVP paths from drifting apart.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    _private: (),
}

impl RequestValidator {
    /// **CONSTRUCTOR**
    pub fn new() -> Self {
        Self::default()
    }

    fn check_output(output: &OutputSpec) -> ParseResult<()> {
        if output.identifier.is_empty() {
            return Err(ParseError::missing("Identifier"));
        }
        Ok(())
    }
}

impl Validator for RequestValidator {
    type Input = Request;
    type Output = Request;

    fn validate(&self, input: Self::Input) -> ParseResult<Self::Output> {
        // **STEP 1**: Constant fields
        if input.service != SERVICE {
            return Err(ParseError::invalid("service"));
        }
        if input.request != REQUEST {
            return Err(ParseError::invalid("request"));
        }

        // **STEP 2**: Mandatory scalars
        if input.version.is_empty() {
            return Err(ParseError::missing("version"));
        }
        if input.identifier.is_empty() {
            return Err(ParseError::missing("Identifier"));
        }
        if input.language.is_empty() {
            return Err(ParseError::missing("language"));
        }

        // **STEP 3**: Inputs
        for data_input in &input.data_inputs {
            if data_input.identifier.is_empty() {
                return Err(ParseError::no_applicable_code(
                    "Identifier for input not set",
                ));
            }
            if let InputValue::Reference(reference) = &data_input.value {
                if reference.href.is_empty() {
                    return Err(ParseError::missing("'href'"));
                }
            }
        }

        // **STEP 4**: Outputs
        for output in &input.response_form.response_document.outputs {
            Self::check_output(output)?;
        }
        for (key, output) in &input.response_form.raw_data_output {
            Self::check_output(output)?;
            if key != &output.identifier {
                return Err(ParseError::invalid(key.clone()));
            }
        }

        Ok(input)
    }
}

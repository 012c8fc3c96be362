//! # REQUEST VALIDATION
//!
//! Normalization helpers shared by both front ends, and the `Validator` trait
//! used to hold every parsed [`crate::types::Request`] to the same shape
//! contract regardless of encoding.
//!
//! ## USAGE
//!
//! ```rust
//! use wps_execute::types::Request;
//! use wps_execute::validation::{RequestValidator, Validator};
//!
//! let request = Request::new("1.0.0", "buffer", "en");
//! let request = RequestValidator::new().validate(request).unwrap();
//! assert_eq!(request.identifier, "buffer");
//! ```

use crate::errors::{ParseError, ParseResult};

pub mod validators;

pub use validators::RequestValidator;

/// **CORE VALIDATOR TRAIT**
///
/// Takes ownership of the input and returns it (or a refinement of it) once
/// it has been checked.
pub trait Validator {
    /// Data accepted by this validator.
    type Input;

    /// Data returned on success.
    type Output;

    /// Check `input`. Must not panic; every failure is a [`ParseError`].
    fn validate(&self, input: Self::Input) -> ParseResult<Self::Output>;
}

/// `true` only for a case-insensitive match of `"true"`; anything else,
/// including `"yes"` or `"1"`, is `false`.
pub fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Boolean flag from an optional wire value, defaulting to `false`.
pub fn flag(value: Option<&str>) -> bool {
    value.map(is_true).unwrap_or(false)
}

/// Optional field: an empty string on the wire is the same as absence.
pub fn optional(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Mandatory field: absent or empty raises `MissingParameterValue(name)`.
pub fn required(value: Option<&str>, name: &str) -> ParseResult<String> {
    optional(value).ok_or_else(|| ParseError::missing(name))
}

/// Requested language, or the configured default when absent or empty.
pub fn language_or_default(value: Option<&str>, default: &str) -> String {
    optional(value).unwrap_or_else(|| default.to_string())
}

//! # WPS EXECUTE REQUEST PARSER
//!
//! Parses an OGC WPS 1.0.0 `Execute` request, submitted either as an XML
//! document (HTTP POST) or as KVP query parameters (HTTP GET), into a single
//! normalized [`types::Request`].
//!
//! **ARCHITECTURE**: two independent front ends (`request::xml`,
//! `request::kvp`) producing one data model, held to the same shape contract
//! by `validation::RequestValidator`.
//!
//! ```rust
//! use wps_execute::api::*;
//!
//! let parser = ExecuteParser::new(ParserConfig::default());
//! let request = parser
//!     .parse_query("service=WPS&request=Execute&version=1.0.0&identifier=buffer&datainputs=size=10")
//!     .unwrap();
//! assert_eq!(request.identifier, "buffer");
//! ```

pub mod api;
pub mod config;
pub mod dom;
pub mod errors;
pub mod request;
pub mod types;
pub mod validation;

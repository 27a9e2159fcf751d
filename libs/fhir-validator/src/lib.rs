//! Validator adapter for FHIR JSON payloads.
//!
//! A request carries a payload (inline JSON, base64 text, raw bytes or a file
//! path) plus a few typed parameters. The [`Validator`] gates on the declared
//! content type, resolves the payload to text, hands it to a
//! [`ResourceParser`] and returns a [`ValidationReport`] with ordered findings.
//!
//! ```no_run
//! use fhirgate_validator::{ValidationRequest, Validator};
//!
//! let validator = Validator::default_json();
//! let request = ValidationRequest::new()
//!     .with_content(r#"{"resourceType":"Patient","id":"example"}"#)
//!     .with_ig("http://hl7.org/fhir/us/core/ImplementationGuide/hl7.fhir.us.core");
//!
//! let report = validator.validate(&request);
//! println!("{}", report.result());
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod gate;
pub mod messages;
pub mod parser;
pub mod report;
pub mod request;
mod validator;

pub use config::{ValidatorConfig, ValidatorConfigBuilder};
pub use content::{classify, resolve, ContentKind};
pub use error::{ClassificationError, ConfigError, ParseError, RequestError, ValidateError};
pub use gate::FHIR_JSON_CONTENT_TYPE;
pub use messages::{MessageCatalog, MessageFormatter, MessageKey};
pub use parser::{ParserFn, ResourceParser};
pub use report::{Finding, ReportBuilder, Severity, TestResult, ValidationReport};
pub use request::{ParamValue, ValidationRequest};
pub use validator::Validator;

pub use fhirgate_format::{JsonResourceParser, ParsedResource};

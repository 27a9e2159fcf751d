use std::path::PathBuf;

use thiserror::Error;

use crate::messages::MessageKey;
use crate::request::{PARAM_CONTENT_TO_VALIDATE, PARAM_CONTENT_TYPE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("locale tag must not be blank")]
    EmptyLocale,

    #[error("unknown message key '{key}' in catalog for locale '{locale}'")]
    UnknownMessageKey { locale: String, key: String },
}

/// The payload could not be turned into text.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("missing content: contentToValidate is required")]
    Missing,

    #[error("failed to read file '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported value for contentToValidate: {0}")]
    UnsupportedValue(&'static str),
}

/// Diagnostic returned by a resource parser that rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

impl ParseError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self(diagnostic.into())
    }

    pub fn diagnostic(&self) -> &str {
        &self.0
    }
}

impl From<fhirgate_format::FormatError> for ParseError {
    fn from(err: fhirgate_format::FormatError) -> Self {
        Self(err.to_string())
    }
}

/// The host envelope could not be read as a parameter mapping.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("validation request must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every way a single validation can fail.
///
/// Each variant maps to exactly one ERROR finding in the report.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("unsupported content type: {0}")]
    GateRejection(String),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ValidateError {
    /// Name of the input parameter the finding is attached to.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::GateRejection(_) => PARAM_CONTENT_TYPE,
            Self::Classification(_) | Self::Parse(_) | Self::Unexpected(_) => {
                PARAM_CONTENT_TO_VALIDATE
            }
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::GateRejection(_) => MessageKey::UnsupportedContentType,
            Self::Parse(_) => MessageKey::ContentParse,
            Self::Classification(_) | Self::Unexpected(_) => MessageKey::ContentProcessing,
        }
    }

    /// The single argument substituted into the message template.
    pub fn message_argument(&self) -> String {
        match self {
            Self::GateRejection(content_type) => content_type.clone(),
            Self::Classification(err) => err.to_string(),
            Self::Parse(err) => err.diagnostic().to_string(),
            Self::Unexpected(message) => message.clone(),
        }
    }
}

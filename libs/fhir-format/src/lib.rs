//! FHIR R4 JSON resource parsing.
//!
//! The parser is deliberately shallow: it accepts any well-formed JSON object
//! whose `resourceType` names an R4 resource. Element-level structure and
//! terminology are not checked here.
//! - The root must be a JSON object.
//! - `resourceType` must be a string naming a known R4 resource.
//! - `id`, when present, must be a string.

mod resource_types;

use serde_json::Value;
use thiserror::Error;

pub use resource_types::is_known_resource_type;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object for the resource")]
    ExpectedObject,
    #[error("missing resourceType property")]
    MissingResourceType,
    #[error("unknown resource type '{0}'")]
    UnknownResourceType(String),
    #[error("resource id must be a string")]
    InvalidId,
}

/// A resource accepted by [`parse_resource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResource {
    pub resource_type: String,
    pub id: Option<String>,
    pub content: Value,
}

/// Parse a FHIR JSON payload into a [`ParsedResource`].
pub fn parse_resource(input: &str) -> Result<ParsedResource, FormatError> {
    let content: Value = serde_json::from_str(input)?;
    let obj = content.as_object().ok_or(FormatError::ExpectedObject)?;

    let resource_type = obj
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or(FormatError::MissingResourceType)?;
    if !is_known_resource_type(resource_type) {
        return Err(FormatError::UnknownResourceType(resource_type.to_string()));
    }

    let id = match obj.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => return Err(FormatError::InvalidId),
    };

    Ok(ParsedResource {
        resource_type: resource_type.to_string(),
        id,
        content,
    })
}

/// Stateless handle around [`parse_resource`].
///
/// Holds no state, so one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResourceParser;

impl JsonResourceParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, input: &str) -> Result<ParsedResource, FormatError> {
        parse_resource(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_patient() {
        let json = r#"
        {
            "resourceType": "Patient",
            "id": "pat-1",
            "active": true,
            "name": [
                { "family": "Everyman", "given": ["Adam"] }
            ]
        }
        "#;

        let resource = parse_resource(json).expect("parse failed");
        assert_eq!(resource.resource_type, "Patient");
        assert_eq!(resource.id.as_deref(), Some("pat-1"));
        assert_eq!(resource.content["name"][0]["family"], "Everyman");
    }

    #[test]
    fn id_is_optional() {
        let resource = parse_resource(r#"{"resourceType":"Observation"}"#).unwrap();
        assert_eq!(resource.resource_type, "Observation");
        assert!(resource.id.is_none());
    }

    #[test]
    fn rejects_missing_comma_with_position() {
        let err = parse_resource(r#"{"resourceType":"Patient" "id":"x"}"#).unwrap_err();
        assert!(matches!(err, FormatError::Json(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn rejects_non_object_roots() {
        assert!(matches!(
            parse_resource("[1, 2]").unwrap_err(),
            FormatError::ExpectedObject
        ));
        assert!(matches!(
            parse_resource(r#""Patient""#).unwrap_err(),
            FormatError::ExpectedObject
        ));
    }

    #[test]
    fn rejects_missing_or_non_string_resource_type() {
        assert!(matches!(
            parse_resource(r#"{"id":"x"}"#).unwrap_err(),
            FormatError::MissingResourceType
        ));
        assert!(matches!(
            parse_resource(r#"{"resourceType":7}"#).unwrap_err(),
            FormatError::MissingResourceType
        ));
    }

    #[test]
    fn rejects_unknown_resource_type() {
        let err = parse_resource(r#"{"resourceType":"Pateint"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown resource type 'Pateint'");
    }

    #[test]
    fn rejects_numeric_id() {
        assert!(matches!(
            parse_resource(r#"{"resourceType":"Patient","id":42}"#).unwrap_err(),
            FormatError::InvalidId
        ));
    }
}

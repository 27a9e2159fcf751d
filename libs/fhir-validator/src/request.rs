//! Validation request: an ordered mapping of parameter names to values.

use serde_json::Value;

use crate::error::RequestError;

pub const PARAM_CONTENT_TO_VALIDATE: &str = "contentToValidate";
pub const PARAM_CONTENT_TYPE: &str = "contentType";
pub const PARAM_IG: &str = "ig";
pub const PARAM_PROFILE: &str = "profile";
pub const PARAM_DOMAIN: &str = "domain";
pub const PARAM_VALIDATION_TYPE: &str = "validationType";
pub const PARAM_LOCALE: &str = "locale";

/// A single parameter value as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Bytes(Vec<u8>),
    /// Any other structured value (number, object, ...).
    Json(Value),
}

impl ParamValue {
    /// Render the value as text for string-typed parameters.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Json(value) => value.to_string(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Json(Value::Null) => "null",
            Self::Json(Value::Bool(_)) => "boolean",
            Self::Json(Value::Number(_)) => "number",
            Self::Json(Value::String(_)) => "string",
            Self::Json(Value::Array(_)) => "array",
            Self::Json(Value::Object(_)) => "object",
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Array(items) => match byte_array(&items) {
                Some(bytes) => Self::Bytes(bytes),
                None => Self::Json(Value::Array(items)),
            },
            other => Self::Json(other),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for ParamValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Arrays of integers in 0..=255 carry raw bytes in JSON envelopes.
fn byte_array(items: &[Value]) -> Option<Vec<u8>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationRequest {
    params: Vec<(String, ParamValue)>,
}

impl ValidationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from a JSON envelope of `{ "<name>": <value>, ... }`.
    ///
    /// `null` members are treated as absent.
    pub fn from_json(value: Value) -> Result<Self, RequestError> {
        let obj = match value {
            Value::Object(obj) => obj,
            other => return Err(RequestError::NotAnObject(ParamValue::Json(other).kind())),
        };

        let mut request = Self::new();
        for (name, value) in obj {
            if value.is_null() {
                continue;
            }
            request.insert(name, ParamValue::from_json(value));
        }
        Ok(request)
    }

    pub fn from_json_str(input: &str) -> Result<Self, RequestError> {
        Self::from_json(serde_json::from_str(input)?)
    }

    /// Set a parameter, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_content(self, content: impl Into<ParamValue>) -> Self {
        self.with(PARAM_CONTENT_TO_VALIDATE, content)
    }

    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with(PARAM_CONTENT_TYPE, content_type.into())
    }

    pub fn with_ig(self, ig: impl Into<String>) -> Self {
        self.with(PARAM_IG, ig.into())
    }

    pub fn with_profile(self, profile: impl Into<String>) -> Self {
        self.with(PARAM_PROFILE, profile.into())
    }

    pub fn with_locale(self, locale: impl Into<String>) -> Self {
        self.with(PARAM_LOCALE, locale.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).map(ParamValue::as_text)
    }

    pub fn content(&self) -> Option<&ParamValue> {
        self.get(PARAM_CONTENT_TO_VALIDATE)
    }

    pub fn content_type(&self) -> Option<String> {
        self.get_text(PARAM_CONTENT_TYPE)
    }

    pub fn ig(&self) -> Option<String> {
        self.get_text(PARAM_IG)
    }

    pub fn profile(&self) -> Option<String> {
        self.get_text(PARAM_PROFILE)
    }

    pub fn domain(&self) -> Option<String> {
        self.get_text(PARAM_DOMAIN)
    }

    pub fn validation_type(&self) -> Option<String> {
        self.get_text(PARAM_VALIDATION_TYPE)
    }

    pub fn locale(&self) -> Option<String> {
        self.get_text(PARAM_LOCALE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

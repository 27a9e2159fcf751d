//! Content resolution: turn an ambiguous payload into the text to parse.
//!
//! Branches are tried in a fixed priority order and the first match wins:
//! 1. raw bytes are decoded as UTF-8
//! 2. a string that decodes as base64 is replaced by its decoded bytes
//! 3. a string that looks like a path (`/`, `\` or a `.json` suffix) is read from disk
//! 4. any other string is taken literally
//!
//! Bytes from every branch are decoded the same way: invalid UTF-8
//! sequences become U+FFFD rather than failing resolution.
//!
//! A literal JSON payload made only of base64 alphabet characters is decoded
//! as base64 by step 2. The order is kept as-is for compatibility with
//! existing callers.

use std::fs;
use std::path::Path;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::ClassificationError;
use crate::request::ParamValue;

/// Standard alphabet; padding optional, non-zero trailing bits tolerated.
///
/// Partial padding (`YQ=`) is also accepted, which is looser than a strict
/// RFC 4648 decoder that only takes `YQ==` or `YQ`.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// How a string payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Base64,
    FilePath,
    Literal,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base64 => write!(f, "base64"),
            Self::FilePath => write!(f, "file-path"),
            Self::Literal => write!(f, "literal"),
        }
    }
}

/// Decide which branch a string payload takes, without touching the filesystem.
pub fn classify(text: &str) -> ContentKind {
    if BASE64.decode(text).is_ok() {
        ContentKind::Base64
    } else if looks_like_path(text) {
        ContentKind::FilePath
    } else {
        ContentKind::Literal
    }
}

fn looks_like_path(text: &str) -> bool {
    text.contains('/') || text.contains('\\') || text.ends_with(".json")
}

/// Resolve the `contentToValidate` value into canonical UTF-8 text.
pub fn resolve(content: Option<&ParamValue>) -> Result<String, ClassificationError> {
    let content = content.ok_or(ClassificationError::Missing)?;

    match content {
        ParamValue::Bytes(bytes) => {
            tracing::debug!(len = bytes.len(), "Resolving raw byte content");
            Ok(decode_utf8(bytes))
        }
        ParamValue::Text(text) => resolve_text(text),
        ParamValue::Json(_) => Err(ClassificationError::UnsupportedValue(content.kind())),
    }
}

fn resolve_text(text: &str) -> Result<String, ClassificationError> {
    if let Ok(decoded) = BASE64.decode(text) {
        tracing::debug!(kind = %ContentKind::Base64, len = decoded.len(), "Resolved content");
        return Ok(decode_utf8(&decoded));
    }

    if looks_like_path(text) {
        tracing::debug!(kind = %ContentKind::FilePath, path = text, "Reading content from file");
        return read_file(Path::new(text));
    }

    tracing::debug!(kind = %ContentKind::Literal, len = text.len(), "Resolved content");
    Ok(text.to_string())
}

fn read_file(path: &Path) -> Result<String, ClassificationError> {
    let bytes = fs::read(path).map_err(|source| ClassificationError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_utf8(&bytes))
}

fn decode_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PATIENT: &str = r#"{"resourceType":"Patient","id":"example"}"#;

    #[test]
    fn missing_content_fails() {
        assert!(matches!(resolve(None), Err(ClassificationError::Missing)));
    }

    #[test]
    fn raw_bytes_decode_directly() {
        let value = ParamValue::Bytes(PATIENT.as_bytes().to_vec());
        assert_eq!(resolve(Some(&value)).unwrap(), PATIENT);
    }

    #[test]
    fn invalid_utf8_resolves_identically_on_every_branch() {
        // Latin-1 'Å' (0xC5) is not valid UTF-8.
        let mut payload = br#"{"resourceType":"Patient","name":[{"family":""#.to_vec();
        payload.push(0xc5);
        payload.extend_from_slice(br#"ngstr"}]}"#);

        let from_bytes = resolve(Some(&ParamValue::Bytes(payload.clone()))).unwrap();

        let encoded = base64::engine::general_purpose::STANDARD.encode(&payload);
        let from_base64 = resolve(Some(&ParamValue::Text(encoded))).unwrap();

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(&payload).unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let from_file = resolve(Some(&ParamValue::Text(path))).unwrap();

        assert!(from_bytes.contains('\u{FFFD}'));
        assert_eq!(from_bytes, from_base64);
        assert_eq!(from_bytes, from_file);
    }

    #[test]
    fn base64_text_is_decoded() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(PATIENT);
        assert_eq!(classify(&encoded), ContentKind::Base64);
        let value = ParamValue::Text(encoded);
        assert_eq!(resolve(Some(&value)).unwrap(), PATIENT);
    }

    #[test]
    fn unpadded_base64_is_accepted() {
        // "ab" encodes to "YWI=".
        assert_eq!(resolve(Some(&ParamValue::Text("YWI".into()))).unwrap(), "ab");
    }

    #[test]
    fn partial_padding_is_tolerated() {
        assert_eq!(classify("YQ="), ContentKind::Base64);
        assert_eq!(resolve(Some(&ParamValue::Text("YQ=".into()))).unwrap(), "a");
    }

    #[test]
    fn base64_alphabet_literal_is_decoded_not_taken_literally() {
        // Known limitation: valid base64 always wins over the literal reading.
        assert_eq!(classify("true"), ContentKind::Base64);
        let resolved = resolve(Some(&ParamValue::Text("true".into()))).unwrap();
        assert_ne!(resolved, "true");
    }

    #[test]
    fn json_literal_stays_literal() {
        assert_eq!(classify(PATIENT), ContentKind::Literal);
        let value = ParamValue::Text(PATIENT.to_string());
        assert_eq!(resolve(Some(&value)).unwrap(), PATIENT);
    }

    #[test]
    fn path_like_strings_are_read_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(PATIENT.as_bytes()).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert_eq!(classify(&path), ContentKind::FilePath);
        assert_eq!(resolve(Some(&ParamValue::Text(path))).unwrap(), PATIENT);
    }

    #[test]
    fn json_suffix_without_separator_is_a_path() {
        assert_eq!(classify("patient.json"), ContentKind::FilePath);
        assert_eq!(classify(r"dir\patient"), ContentKind::FilePath);
    }

    #[test]
    fn unreadable_file_reports_cause() {
        let value = ParamValue::Text("/definitely/not/here/patient.json".into());
        match resolve(Some(&value)) {
            Err(ClassificationError::Unreadable { path, source }) => {
                assert_eq!(path, Path::new("/definitely/not/here/patient.json"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected unreadable file error, got {other:?}"),
        }
    }

    #[test]
    fn structured_values_are_unsupported() {
        let value = ParamValue::Json(serde_json::json!({"resourceType": "Patient"}));
        assert!(matches!(
            resolve(Some(&value)),
            Err(ClassificationError::UnsupportedValue("object"))
        ));
    }
}

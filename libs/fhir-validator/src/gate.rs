//! Content-type gate, evaluated before any content is resolved.

pub const FHIR_JSON_CONTENT_TYPE: &str = "application/fhir+json";

/// The declared content type, or the FHIR JSON default when none was given.
pub fn effective_content_type(declared: Option<&str>) -> &str {
    declared.unwrap_or(FHIR_JSON_CONTENT_TYPE)
}

/// Accept any content type starting with `application/fhir+json`.
///
/// Parameters such as `; charset=utf-8` are tolerated by the prefix match.
pub fn accept(content_type: &str) -> bool {
    content_type.starts_with(FHIR_JSON_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_content_type_defaults_to_fhir_json() {
        assert_eq!(effective_content_type(None), "application/fhir+json");
        assert!(accept(effective_content_type(None)));
    }

    #[test]
    fn prefix_match_tolerates_parameters() {
        assert!(accept("application/fhir+json"));
        assert!(accept("application/fhir+json; charset=utf-8"));
        assert!(accept("application/fhir+json;fhirVersion=4.0"));
    }

    #[test]
    fn other_types_are_rejected() {
        assert!(!accept("text/plain"));
        assert!(!accept("application/json"));
        assert!(!accept("application/fhir+xml"));
        assert!(!accept(" application/fhir+json"));
        assert!(!accept("APPLICATION/FHIR+JSON"));
        assert!(!accept(""));
    }

    #[test]
    fn declared_empty_string_is_not_defaulted() {
        assert_eq!(effective_content_type(Some("")), "");
        assert!(!accept(effective_content_type(Some(""))));
    }
}

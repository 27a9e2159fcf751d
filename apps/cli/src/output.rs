use std::fmt::Write as _;

use fhirgate_validator::ValidationReport;

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

pub fn render(report: &ValidationReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.to_json())?),
        OutputFormat::Text => Ok(render_text(report, "")),
    }
}

/// `Result: SUCCESS` followed by one `TYPE: message @ location` line per finding.
pub fn render_text(report: &ValidationReport, indent: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{indent}Result: {}", report.result());
    for finding in report.findings() {
        let _ = writeln!(
            out,
            "{indent}{}: {} @ {}",
            finding.severity, finding.message, finding.location
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhirgate_validator::{ValidationRequest, Validator};

    const PATIENT: &str = r#"{"resourceType":"Patient","id":"example"}"#;

    #[test]
    fn text_lists_findings_with_locations() {
        let report = Validator::default_json().validate(
            &ValidationRequest::new()
                .with_content(PATIENT)
                .with_ig("http://example.org/ig"),
        );

        let text = render_text(&report, "");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Result: SUCCESS");
        assert_eq!(
            lines[1],
            "INFO: JSON successfully parsed as valid FHIR resource @ contentToValidate:0:0"
        );
        assert_eq!(
            lines[2],
            "INFO: Implementation Guide specified: http://example.org/ig @ ig:0:0"
        );
    }

    #[test]
    fn json_output_is_the_report_document() {
        let report = Validator::default_json().validate(
            &ValidationRequest::new()
                .with_content(PATIENT)
                .with_content_type("text/plain"),
        );

        let rendered = render(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["result"], "FAILURE");
        assert_eq!(value["findings"][0]["location"], "contentType:0:0");
    }
}

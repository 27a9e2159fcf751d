//! Built-in demonstration scenarios.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use base64::engine::general_purpose;
use base64::Engine;
use fhirgate_validator::{
    MessageFormatter, ResourceParser, TestResult, ValidationReport, ValidationRequest, Validator,
};

use crate::output::{render_text, OutputFormat};

const SAMPLE_PATIENT: &str = r#"{"resourceType":"Patient","id":"example","name":[{"family":"Doe","given":["John"]}],"gender":"male","birthDate":"1980-01-01"}"#;
const SAMPLE_MALFORMED: &str = r#"{"resourceType":"Patient","id":"example","invalidField":{"nested":"value""missingComma":true}}"#;
const US_CORE_IG: &str = "http://hl7.org/fhir/us/core/ImplementationGuide/hl7.fhir.us.core";
const US_CORE_PATIENT: &str = "http://hl7.org/fhir/us/core/StructureDefinition/us-core-patient";

pub struct DemoScenario {
    pub name: &'static str,
    pub request: ValidationRequest,
    pub expected: TestResult,
}

/// Sample Patient written to a temporary `.json` file for the file-path scenario.
pub fn write_sample_file() -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("fhirgate-demo-patient-")
        .suffix(".json")
        .tempfile()
        .context("Failed to create demo sample file")?;
    file.write_all(SAMPLE_PATIENT.as_bytes())
        .context("Failed to write demo sample file")?;
    Ok(file)
}

pub fn scenarios(sample_file: &Path) -> Vec<DemoScenario> {
    let json = |content: String| {
        ValidationRequest::new()
            .with_content(content)
            .with_content_type("application/fhir+json")
    };

    vec![
        DemoScenario {
            name: "File Path",
            request: ValidationRequest::new()
                .with_content(sample_file.to_string_lossy().into_owned()),
            expected: TestResult::Success,
        },
        DemoScenario {
            name: "Raw JSON",
            request: json(SAMPLE_PATIENT.to_string()),
            expected: TestResult::Success,
        },
        DemoScenario {
            name: "Base64",
            request: json(general_purpose::STANDARD.encode(SAMPLE_PATIENT)),
            expected: TestResult::Success,
        },
        DemoScenario {
            name: "IG+Profile",
            request: json(SAMPLE_PATIENT.to_string())
                .with_ig(US_CORE_IG)
                .with_profile(US_CORE_PATIENT),
            expected: TestResult::Success,
        },
        DemoScenario {
            name: "Invalid Type",
            request: ValidationRequest::new()
                .with_content(SAMPLE_PATIENT)
                .with_content_type("text/plain"),
            expected: TestResult::Failure,
        },
        DemoScenario {
            name: "Invalid JSON",
            request: json(SAMPLE_MALFORMED.to_string()),
            expected: TestResult::Failure,
        },
    ]
}

/// Run every scenario, print the reports and return them in order.
pub fn run<P, M>(
    validator: &Validator<P, M>,
    format: OutputFormat,
) -> anyhow::Result<Vec<(DemoScenario, ValidationReport)>>
where
    P: ResourceParser,
    M: MessageFormatter,
{
    let sample = write_sample_file()?;
    let results: Vec<_> = scenarios(sample.path())
        .into_iter()
        .map(|scenario| {
            let report = validator.validate(&scenario.request);
            if report.result() != scenario.expected {
                tracing::warn!(
                    scenario = scenario.name,
                    expected = %scenario.expected,
                    actual = %report.result(),
                    "Demo scenario produced an unexpected result"
                );
            }
            (scenario, report)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let documents: Vec<_> = results
                .iter()
                .map(|(scenario, report)| {
                    serde_json::json!({ "scenario": scenario.name, "report": report.to_json() })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }
        OutputFormat::Text => {
            println!("=== FHIR JSON validator demo ===");
            for (i, (scenario, report)) in results.iter().enumerate() {
                println!();
                println!("{}. {}", i + 1, scenario.name);
                print!("{}", render_text(report, "   "));
            }
            println!();
            println!("=== Demo completed ===");
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_meets_its_expectation() {
        let sample = write_sample_file().unwrap();
        let validator = Validator::default_json();
        for scenario in scenarios(sample.path()) {
            let report = validator.validate(&scenario.request);
            assert_eq!(report.result(), scenario.expected, "{}", scenario.name);
        }
    }

    #[test]
    fn ig_and_profile_scenario_reports_three_infos() {
        let sample = write_sample_file().unwrap();
        let scenario = scenarios(sample.path())
            .into_iter()
            .find(|s| s.name == "IG+Profile")
            .unwrap();
        let report = Validator::default_json().validate(&scenario.request);
        assert_eq!(report.info_count(), 3);
    }

    #[test]
    fn file_path_scenario_reads_the_sample_file() {
        let sample = write_sample_file().unwrap();
        let scenario = scenarios(sample.path())
            .into_iter()
            .find(|s| s.name == "File Path")
            .unwrap();

        let path = sample.path().to_string_lossy().into_owned();
        assert_eq!(
            fhirgate_validator::classify(&path),
            fhirgate_validator::ContentKind::FilePath
        );
        let report = Validator::default_json().validate(&scenario.request);
        assert_eq!(report.result(), TestResult::Success);
    }
}

//! Test assertion reports: an overall result plus ordered findings.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    Success,
    Failure,
}

impl std::fmt::Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
        }
    }
}

/// One reported fact, attached to an input parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub location: String,
}

impl Finding {
    pub fn info(parameter: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            location: location_for(parameter),
        }
    }

    pub fn error(parameter: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: location_for(parameter),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `<paramName>:0:0`; no line or column tracking exists.
pub fn location_for(parameter: &str) -> String {
    format!("{parameter}:0:0")
}

/// Result of a single validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    result: TestResult,
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn result(&self) -> TestResult {
        self.result
    }

    pub fn is_success(&self) -> bool {
        self.result == TestResult::Success
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn first(&self) -> Option<&Finding> {
        self.findings.first()
    }

    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    pub fn info_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "result": self.result,
            "findings": self.findings,
        })
    }
}

/// Append-only report under construction.
///
/// The result is set once, by [`succeed`](Self::succeed) or
/// [`fail`](Self::fail), which consume the builder. A report holding an
/// ERROR finding is always a FAILURE, whichever of the two is called.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    findings: Vec<Finding>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) -> &mut Self {
        self.findings.push(finding);
        self
    }

    pub fn info(&mut self, parameter: &str, message: impl Into<String>) -> &mut Self {
        self.push(Finding::info(parameter, message))
    }

    pub fn error(&mut self, parameter: &str, message: impl Into<String>) -> &mut Self {
        self.push(Finding::error(parameter, message))
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    /// SUCCESS, unless an ERROR finding was recorded.
    pub fn succeed(self) -> ValidationReport {
        let result = if self.has_errors() {
            tracing::warn!("ERROR finding present, reporting FAILURE instead of SUCCESS");
            TestResult::Failure
        } else {
            TestResult::Success
        };
        self.finish(result)
    }

    pub fn fail(self) -> ValidationReport {
        debug_assert!(self.has_errors(), "FAILURE report without an ERROR finding");
        self.finish(TestResult::Failure)
    }

    fn finish(self, result: TestResult) -> ValidationReport {
        ValidationReport {
            result,
            findings: self.findings,
        }
    }
}

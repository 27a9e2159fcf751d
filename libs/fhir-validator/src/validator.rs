use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use fhirgate_format::{JsonResourceParser, ParsedResource};

use crate::content;
use crate::error::{ConfigError, ValidateError};
use crate::gate;
use crate::messages::{self, MessageCatalog, MessageFormatter, MessageKey, DEFAULT_LOCALE};
use crate::parser::ResourceParser;
use crate::report::{ReportBuilder, ValidationReport};
use crate::request::{ValidationRequest, PARAM_CONTENT_TO_VALIDATE, PARAM_IG, PARAM_PROFILE};
use crate::ValidatorConfig;

/// Reusable validator - owns the parser and message formatter.
///
/// Holds no per-request state; a single instance can serve concurrent
/// callers when the parser and formatter can.
pub struct Validator<P: ResourceParser, M: MessageFormatter = MessageCatalog> {
    parser: P,
    formatter: M,
    default_locale: String,
}

impl Validator<JsonResourceParser> {
    /// FHIR R4 JSON parser with the built-in English messages.
    pub fn default_json() -> Self {
        Self::new(JsonResourceParser::new())
    }
}

impl<P: ResourceParser> Validator<P> {
    pub fn new(parser: P) -> Self {
        Self::with_formatter(parser, MessageCatalog::new())
    }

    pub fn from_config(config: &ValidatorConfig, parser: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.catalog()?;
        Ok(Self::with_formatter(parser, catalog).with_default_locale(&config.default_locale))
    }
}

impl<P: ResourceParser, M: MessageFormatter> Validator<P, M> {
    pub fn with_formatter(parser: P, formatter: M) -> Self {
        Self {
            parser,
            formatter,
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Validate one request. Every failure is reported, never returned.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationReport {
        let locale = request
            .locale()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.default_locale.clone());

        let span = tracing::info_span!(
            "validate",
            locale = %locale,
            domain = request.domain().as_deref(),
            validation_type = request.validation_type().as_deref(),
            ig = request.ig().as_deref(),
            profile = request.profile().as_deref(),
        );
        let _enter = span.enter();

        let report = ValidationRun::new(&self.parser, &self.formatter, request, locale).execute();

        tracing::info!(
            result = %report.result(),
            findings = report.findings().len(),
            "Validation finished"
        );
        report
    }

    pub fn validate_batch(&self, requests: &[ValidationRequest]) -> Vec<ValidationReport> {
        requests.iter().map(|r| self.validate(r)).collect()
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn formatter(&self) -> &M {
        &self.formatter
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

/// Short-lived validation execution: GATE -> RESOLVE -> PARSE
struct ValidationRun<'a, P, M> {
    parser: &'a P,
    formatter: &'a M,
    request: &'a ValidationRequest,
    locale: String,
    report: ReportBuilder,
}

impl<'a, P: ResourceParser, M: MessageFormatter> ValidationRun<'a, P, M> {
    fn new(
        parser: &'a P,
        formatter: &'a M,
        request: &'a ValidationRequest,
        locale: String,
    ) -> Self {
        Self {
            parser,
            formatter,
            request,
            locale,
            report: ReportBuilder::new(),
        }
    }

    fn execute(self) -> ValidationReport {
        match self.check() {
            Ok(resource) => self.succeed(&resource),
            Err(err) => self.fail(err),
        }
    }

    fn check(&self) -> Result<ParsedResource, ValidateError> {
        let declared = self.request.content_type();
        let content_type = gate::effective_content_type(declared.as_deref());
        if !gate::accept(content_type) {
            return Err(ValidateError::GateRejection(content_type.to_string()));
        }

        let text = content::resolve(self.request.content())?;
        self.parse(&text)
    }

    fn parse(&self, text: &str) -> Result<ParsedResource, ValidateError> {
        match catch_unwind(AssertUnwindSafe(|| self.parser.parse(text))) {
            Ok(parsed) => Ok(parsed?),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(error = %message, "Resource parser panicked");
                Err(ValidateError::Unexpected(message))
            }
        }
    }

    fn succeed(mut self, resource: &ParsedResource) -> ValidationReport {
        tracing::debug!(
            resource_type = %resource.resource_type,
            id = resource.id.as_deref(),
            "Resource parsed"
        );

        let parsed = self.message(MessageKey::ContentParsed, &[]);
        self.report.info(PARAM_CONTENT_TO_VALIDATE, parsed);

        if let Some(ig) = non_blank(self.request.ig()) {
            let message = self.message(MessageKey::IgSpecified, &[ig.as_str()]);
            self.report.info(PARAM_IG, message);
        }
        if let Some(profile) = non_blank(self.request.profile()) {
            let message = self.message(MessageKey::ProfileSpecified, &[profile.as_str()]);
            self.report.info(PARAM_PROFILE, message);
        }

        self.report.succeed()
    }

    fn fail(mut self, err: ValidateError) -> ValidationReport {
        tracing::debug!(error = %err, parameter = err.parameter(), "Validation failed");

        let argument = err.message_argument();
        let message = self.message(err.message_key(), &[argument.as_str()]);
        self.report.error(err.parameter(), message);
        self.report.fail()
    }

    /// Format through the injected formatter; a panicking formatter
    /// degrades to the built-in default message.
    fn message(&self, key: MessageKey, args: &[&str]) -> String {
        catch_unwind(AssertUnwindSafe(|| {
            self.formatter.format(&self.locale, key, args)
        }))
        .unwrap_or_else(|payload| {
            tracing::warn!(
                key = %key,
                error = %panic_message(payload.as_ref()),
                "Message formatter panicked, using default message"
            );
            messages::render(key.default_template(), args)
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

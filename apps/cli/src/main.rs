//! # fhirgate
//!
//! Command-line host for the FHIR JSON validator adapter.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fhirgate_validator::request::{PARAM_DOMAIN, PARAM_VALIDATION_TYPE};
use fhirgate_validator::{
    JsonResourceParser, TestResult, ValidationReport, ValidationRequest, Validator,
    ValidatorConfig,
};

mod demo;
mod logging;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "fhirgate")]
#[command(about = "Validate FHIR JSON resources and print test assertion reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate inline JSON, base64 text or a file path
    Validate(ValidateArgs),
    /// Validate a JSON request envelope of named parameters
    Request(RequestArgs),
    /// Run the built-in demonstration scenarios
    Demo(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// YAML configuration (default locale, message catalogs)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ValidateArgs {
    /// Resource content: JSON text, base64 text or a path to a .json file
    #[arg(required_unless_present = "stdin")]
    content: Option<String>,

    /// Read raw content bytes from stdin
    #[arg(long, conflicts_with = "content")]
    stdin: bool,

    #[arg(long)]
    content_type: Option<String>,

    /// Implementation Guide URL (advisory)
    #[arg(long)]
    ig: Option<String>,

    /// Profile URL (advisory)
    #[arg(long)]
    profile: Option<String>,

    #[arg(long)]
    locale: Option<String>,

    #[arg(long)]
    domain: Option<String>,

    #[arg(long)]
    validation_type: Option<String>,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args)]
struct RequestArgs {
    /// JSON object of request parameters
    file: PathBuf,

    #[command(flatten)]
    report: ReportArgs,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Validate(args) => validate(args),
        Commands::Request(args) => request(args),
        Commands::Demo(args) => run_demo(args),
    }
}

fn build_validator(config: Option<&Path>) -> Result<Validator<JsonResourceParser>> {
    let Some(path) = config else {
        return Ok(Validator::default_json());
    };

    let config = ValidatorConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    tracing::info!(
        config = %path.display(),
        default_locale = %config.default_locale,
        "Loaded validator configuration"
    );
    Validator::from_config(&config, JsonResourceParser::new())
        .context("Invalid validator configuration")
}

fn validate(args: ValidateArgs) -> Result<ExitCode> {
    let validator = build_validator(args.report.config.as_deref())?;

    let mut request = ValidationRequest::new();
    if args.stdin {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read content from stdin")?;
        request = request.with_content(bytes);
    } else if let Some(content) = args.content {
        request = request.with_content(content);
    }
    if let Some(content_type) = args.content_type {
        request = request.with_content_type(content_type);
    }
    if let Some(ig) = args.ig {
        request = request.with_ig(ig);
    }
    if let Some(profile) = args.profile {
        request = request.with_profile(profile);
    }
    if let Some(locale) = args.locale {
        request = request.with_locale(locale);
    }
    if let Some(domain) = args.domain {
        request = request.with(PARAM_DOMAIN, domain);
    }
    if let Some(validation_type) = args.validation_type {
        request = request.with(PARAM_VALIDATION_TYPE, validation_type);
    }

    let report = validator.validate(&request);
    emit(&report, OutputFormat::from_flag(args.report.json))
}

fn request(args: RequestArgs) -> Result<ExitCode> {
    let validator = build_validator(args.report.config.as_deref())?;

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read request file {}", args.file.display()))?;
    let request = ValidationRequest::from_json_str(&text)
        .with_context(|| format!("Invalid request envelope in {}", args.file.display()))?;

    let report = validator.validate(&request);
    emit(&report, OutputFormat::from_flag(args.report.json))
}

fn run_demo(args: ReportArgs) -> Result<ExitCode> {
    let validator = build_validator(args.config.as_deref())?;
    let results = demo::run(&validator, OutputFormat::from_flag(args.json))?;

    let unexpected = results
        .iter()
        .filter(|(scenario, report)| report.result() != scenario.expected)
        .count();
    Ok(if unexpected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn emit(report: &ValidationReport, format: OutputFormat) -> Result<ExitCode> {
    print!("{}", output::render(report, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(match report.result() {
        TestResult::Success => ExitCode::SUCCESS,
        TestResult::Failure => ExitCode::FAILURE,
    })
}

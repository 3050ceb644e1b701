//! `novella-validate` entry point.

use std::io::Write;
use std::process::ExitCode;

use novella_validator::config::{LogFormat, ReportFormat, ValidatorConfig};
use novella_validator::error::AppError;
use novella_validator::report::ValidationReport;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Read configuration from environment.
    let config = match ValidatorConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing subscriber. Logs go to stderr; stdout carries the report.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    tracing::info!(content_dir = %config.content_dir.display(), "Validating Novella content");

    let report = match novella_validator::run(&config) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = print_report(&report, config.report_format) {
        tracing::error!("{err}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "Validation finished"
    );
    novella_validator::exit_status(&report)
}

fn print_report(report: &ValidationReport, format: ReportFormat) -> Result<(), AppError> {
    let mut out = std::io::stdout().lock();
    match format {
        ReportFormat::Text => report.write_text(&mut out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, report).map_err(std::io::Error::from)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

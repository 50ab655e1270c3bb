use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use fstab_language_server::catalog::load_catalog;
use fstab_language_server::config::{CheckArgs, Config, OutputFormat};
use fstab_language_server::report::{Report, validate_document_with};
use fstab_language_server::validation::Severity;

/// One checked input in JSON output
#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    #[serde(flatten)]
    report: &'a Report,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("fstab-check: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every input was valid
fn run() -> Result<bool> {
    let args = CheckArgs::parse();
    let config = Config::from_common(args.common.clone())?;
    config.init_logging();

    let (catalog, issues) = load_catalog(&config.catalog_sources());
    for issue in &issues {
        eprintln!(
            "fstab-check: ignoring catalog {}: {:#}",
            issue.path.display(),
            issue.error
        );
    }

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = read_input(path)?;
        reports.push((display_name(path), validate_document_with(&text, &catalog)));
    }

    let all_valid = reports.iter().all(|(_, report)| report.overall_valid);

    match args.format {
        OutputFormat::Json => {
            let files: Vec<FileReport<'_>> = reports
                .iter()
                .map(|(path, report)| FileReport {
                    path: path.clone(),
                    report,
                })
                .collect();
            let json = serde_json::to_string_pretty(&files).context("Failed to encode report")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for (path, report) in &reports {
                print_text(path, report, args.quiet);
            }
        }
    }

    Ok(all_valid)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn print_text(path: &str, report: &Report, quiet: bool) {
    for entry in &report.entries {
        for diagnostic in entry.diagnostics() {
            if quiet && diagnostic.severity == Severity::Suggestion {
                continue;
            }
            println!(
                "{}:{}: {}: {} [{}]",
                path, diagnostic.line, diagnostic.severity, diagnostic.message, diagnostic.rule
            );
        }
    }

    println!(
        "{}: {} entries, {} errors, {} warnings, {} suggestions: {}",
        path,
        report.total_entries,
        report.error_count,
        report.warning_count,
        report.suggestion_count(),
        if report.overall_valid { "valid" } else { "invalid" }
    );
}

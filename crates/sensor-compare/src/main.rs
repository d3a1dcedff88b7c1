mod bootstrap;
mod output;

use std::io;

use anyhow::Result;
use compare_core::error::CompareError;
use compare_core::settings::Settings;
use compare_data::analysis::{analyze_datasets, ComparisonReport};
use compare_data::reader::discover_sources;
use compare_ui::app::{restore_terminal, App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| settings.is_interactive().then(bootstrap::default_log_file));
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("sensor-compare v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Output: {}, View: {}, Theme: {}",
        settings.output,
        settings.view,
        settings.theme
    );

    if settings.paths.is_empty() {
        if settings.clear {
            eprintln!("Saved configuration cleared.");
            return Ok(());
        }
        anyhow::bail!("No input given: pass one or more CSV files or directories");
    }

    let (sources, discovery_warnings) = discover_sources(&settings.paths);
    let batch = analyze_datasets(&sources).with_warnings(discovery_warnings);

    if !settings.is_interactive() {
        for warning in &batch.warnings {
            eprintln!("warning: skipped {}", warning);
        }
    }

    let warnings = batch.warnings.clone();
    match batch.build_report() {
        Ok(report) => {
            tracing::info!(
                "Report ready: {} row(s) from {} reading(s) in {} dataset(s), {} skipped",
                report.metadata.rows_aggregated,
                report.metadata.readings_parsed,
                report.metadata.datasets_loaded,
                report.metadata.datasets_skipped
            );
            present(&settings, report).await
        }
        Err(CompareError::EmptyResult) if settings.is_interactive() => {
            tracing::warn!("No dataset produced any daily summaries");
            let app = App::new(&settings.theme, ViewMode::from_name(&settings.view));
            run_until_ctrl_c(app.run_no_data(warnings)).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Dispatch on `--output`.
async fn present(settings: &Settings, report: ComparisonReport) -> Result<()> {
    match settings.output.as_str() {
        "json" => output::write_json(&report, io::stdout().lock()),
        "csv" => output::write_csv(&report, io::stdout().lock()),
        _ => {
            let app = App::new(&settings.theme, ViewMode::from_name(&settings.view));
            run_until_ctrl_c(app.run(report)).await
        }
    }
}

/// Run a TUI loop, also listening for Ctrl+C at the OS level so that a signal
/// received outside raw mode still restores the terminal.
async fn run_until_ctrl_c(ui: impl std::future::Future<Output = io::Result<()>>) -> Result<()> {
    tokio::select! {
        result = ui => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            restore_terminal()?;
        }
    }
    Ok(())
}


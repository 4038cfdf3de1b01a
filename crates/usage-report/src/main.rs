mod bootstrap;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use chrono::Local;
use usage_core::settings::Settings;
use usage_runtime::session::ReportSession;
use usage_ui::app::App;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = Settings::load();

    if let Err(e) = bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<()> {
    tracing::info!("usage-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Format: {}, Theme: {}", settings.format, settings.theme);

    let config = settings.report_config(Local::now().date_naive())?;
    let report = ReportSession::run(&config).await?;

    for skipped in &report.skipped {
        eprintln!(
            "Warning: skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }

    if let Some(path) = settings.export.as_deref() {
        report.document().write_json(path)?;
        eprintln!("Report written to {}", path.display());
    }

    match settings.format.as_str() {
        "json" => println!("{}", output::render_json(&report)?),
        "text" => println!("{}", output::render_text(&report)),
        _ => App::for_report(&settings.theme, &report).run_report(&report)?,
    }

    Ok(())
}

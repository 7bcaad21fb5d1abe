//! CLI entry point for the accident report.
//!
//! Provides subcommands for serving the report page over HTTP, computing a
//! report once from the command line, and appending headline statistics to
//! a CSV log.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use accident_report::{
    analyzers::aggregate::compute_report,
    config::AppConfig,
    loader::load_dataset,
    output::{append_record, print_json, print_pretty},
    render::render_page,
    server,
};
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "accident_report")]
#[command(about = "Summary statistics and charts for a traffic accident dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the report page on every request
    Serve {
        /// Path, .gz path, or URL of the accident CSV (overrides DATA_SOURCE)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        data: Option<String>,

        /// Address to listen on (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Compute the report once and log it
    Report {
        /// Path, .gz path, or URL of the accident CSV (overrides DATA_SOURCE)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        data: Option<String>,

        /// How to log the report
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Also write the rendered HTML page to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Append the headline statistics to a CSV file
    Summary {
        /// Path, .gz path, or URL of the accident CSV (overrides DATA_SOURCE)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        data: Option<String>,

        /// CSV file to append results to
        #[arg(short, long, default_value = "summary.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = AppConfig::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("accident_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, bind } => {
            let config = config.with_overrides(data, bind);
            // Loaded once; every request reads this snapshot.
            let dataset = Arc::new(load_dataset(&config.data_source).await?);
            server::serve(&config.bind_addr, dataset).await?;
        }
        Commands::Report { data, format, html } => {
            let config = config.with_overrides(data, None);
            let dataset = load_dataset(&config.data_source).await?;
            let report = compute_report(&dataset)?;

            match format {
                Format::Pretty => print_pretty(&report),
                Format::Json => print_json(&report)?,
            }

            if let Some(path) = html {
                std::fs::write(&path, render_page(&report)?)?;
                info!(path = %path.display(), "Report page written");
            }
        }
        Commands::Summary { data, output } => {
            let config = config.with_overrides(data, None);
            let dataset = load_dataset(&config.data_source).await?;
            let report = compute_report(&dataset)?;

            append_record(&output, &report.summary(Utc::now()))?;
            info!(
                path = %output.display(),
                total = report.total_accidents,
                "Summary row appended"
            );
        }
    }

    Ok(())
}

use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use configuration::error::ConfigError;
use configuration::{init_logging, load_config, Config};
use core_types::ReportKind;
use database::{sql_for, ChunkedFetcher, DbError, DbRepository};
use exporter::{run_export, ExportError, ExportOptions};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

/// The main entry point for the OSPOS analytics exporter.
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {e}");
            return ExitCode::from(1);
        }
    };

    // Keep the guard alive so file logs are flushed on exit.
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::from(1);
        }
    };

    // Execute the appropriate command
    let result = match cli.command.unwrap_or_default() {
        Commands::Export(args) => handle_export(args, config).await,
        Commands::Reports(args) => handle_reports(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("❌ {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Exports OSPOS sales analytics into a static script for the dashboard.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every report and write the data bundle (the default).
    Export(ExportArgs),
    /// List the report catalog, or print one report's SQL.
    Reports(ReportsArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Export(ExportArgs::default())
    }
}

#[derive(Args, Default)]
struct ExportArgs {
    /// Overrides `export.output_path`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Overrides `export.chunk_size`.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Args)]
struct ReportsArgs {
    /// A report name such as `sales_data`.
    name: Option<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Handles the orchestration of a single export run.
async fn handle_export(args: ExportArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(output) = args.output {
        config.export.output_path = output;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.export.chunk_size = chunk_size;
    }
    config.validate()?;

    let chunk_size = NonZeroUsize::new(config.export.chunk_size).ok_or_else(|| {
        ConfigError::ValidationError("export.chunk_size must be at least 1".to_string())
    })?;

    let fetcher = ChunkedFetcher::new(chunk_size);
    let repository = DbRepository::connect(&config.database, fetcher).await?;

    let options = ExportOptions {
        output_path: config.export.output_path.clone(),
        bundle_identifier: config.export.bundle_identifier.clone(),
    };
    let summary = run_export(repository, &options).await?;

    for (report, rows) in &summary.row_counts {
        tracing::debug!(report = %report, rows, "Report summary");
    }
    tracing::info!(
        path = %summary.output_path.display(),
        bytes = summary.bytes_written,
        "Export complete"
    );
    Ok(())
}

fn handle_reports(args: ReportsArgs) -> anyhow::Result<()> {
    match args.name {
        Some(name) => {
            let report: ReportKind = name.parse()?;
            println!("{}", sql_for(report).trim());
        }
        None => {
            let mut table = Table::new();
            table.set_header(vec!["Report", "Columns"]);
            for report in ReportKind::ALL {
                table.add_row(vec![report.name().to_string(), report.columns().join(", ")]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Maps a fatal error to a distinct process exit code.
fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<ExportError>() {
        e.exit_code()
    } else if let Some(e) = err.downcast_ref::<DbError>() {
        e.exit_code()
    } else {
        // Configuration problems and unknown report names.
        1
    }
}

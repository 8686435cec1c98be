use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowwatch::{DataSource, FileSource, Report, Settings};

#[derive(Parser, Debug)]
#[command(name = "flowwatch")]
#[command(about = "Collision risk and delivery health diagnostics for messaging flows")]
struct Args {
    /// Path to the dataset JSON file (flows and metric snapshots)
    #[arg(short, long, default_value = "dataset.json")]
    file: PathBuf,

    /// Path to a TOML settings file (thresholds, targets, summary cut-offs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the report as JSON to this path instead of printing it
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Number of top conflicts to list
    #[arg(short, long)]
    top: Option<usize>,

    /// Only list conflicts involving this flow id
    #[arg(long)]
    flow: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(top) = args.top {
        settings.summary.top = top;
    }

    let mut source = FileSource::new(&args.file);
    let supply = source
        .fetch()
        .with_context(|| format!("failed to load {}", args.file.display()))?
        .validate();
    info!(
        "loaded {} flows and {} snapshots ({} rejected)",
        supply.flows.len(),
        supply.metrics.len(),
        supply.rejected.len()
    );

    let report = match args.flow.as_deref() {
        Some(flow_id) => Report::for_flow(source.description(), &supply, &settings, flow_id),
        None => Report::build(source.description(), &supply, &settings),
    };

    if let Some(export_path) = args.export {
        report.export(&export_path)?;
        println!("Exported report to: {}", export_path.display());
        return Ok(());
    }

    print!("{}", report.render_text());
    Ok(())
}

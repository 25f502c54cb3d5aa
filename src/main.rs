use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use codeatlas::core::{AnalyzerConfig, CodebaseAnalyzer, FileScanner};
use codeatlas::formatters::JsonCompactFormatter;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "codeatlas",
    version,
    author = "codeatlas developers",
    about = "Extracts symbols and the import graph of a repository for documentation"
)]
struct Cli {
    /// Repository directory to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "codeatlas.json")]
    output: PathBuf,

    /// Maximum number of extraction threads
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// How many entries to keep in the component and dependency rankings
    #[arg(long, value_name = "N", default_value_t = 10)]
    top: usize,

    /// Embed every file's source text in the output
    #[arg(long)]
    include_source: bool,

    /// Follow symbolic links while listing files
    #[arg(long)]
    follow_links: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input,
        output,
        jobs,
        top,
        include_source,
        follow_links,
        pretty,
    } = cli;

    let start_time = Instant::now();
    info!("Input: {}", input.display());
    info!("Output: {}", output.display());

    let files = FileScanner::new()
        .follow_links(follow_links)
        .scan_directory(&input)?;
    info!("Found {} files", files.len());

    let mut config = AnalyzerConfig::default().with_top(top);
    if let Some(jobs) = jobs {
        config = config.with_max_workers(jobs);
    }

    let analysis = CodebaseAnalyzer::with_config(config).analyze(&files)?;
    for path in &analysis.failed_files {
        info!("Degraded record: {}", path.display());
    }

    JsonCompactFormatter::new()
        .with_source(include_source)
        .with_pretty(pretty)
        .format_to_file(&analysis, &output)?;

    info!(
        "Wrote {} ({} files, {} graph nodes) in {:.2}s",
        output.display(),
        analysis.records.len(),
        analysis.graph.node_count(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

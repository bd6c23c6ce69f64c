//! CLI binary for webhound.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use webhound::{OutputFormat, Pipeline, ProgressRenderer, WebhoundConfig, report};
use webhound_search::SearchFilters;

/// Webhound: search several engines at once and flag forums, news and social links.
#[derive(Parser, Debug, Default)]
#[command(name = "webhound", version, about)]
struct Cli {
    /// Search query. Prompted for when omitted.
    query: Vec<String>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Engines to search (comma separated). Defaults to every configured engine.
    #[arg(short, long = "engine", value_delimiter = ',')]
    engines: Vec<String>,

    /// Result pages per engine.
    #[arg(long)]
    pages: Option<usize>,

    /// Concurrent fetches per engine.
    #[arg(long)]
    workers: Option<usize>,

    /// Per-attempt timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Attempts per page, including the first.
    #[arg(long)]
    attempts: Option<u32>,

    /// Restrict results by age: day, week, month or year.
    #[arg(long)]
    date_range: Option<String>,

    /// Two-letter language code.
    #[arg(long)]
    language: Option<String>,

    /// Two-letter country code.
    #[arg(long)]
    country: Option<String>,

    /// JSON detection config (categories, platforms, entities).
    #[arg(short, long)]
    detection: Option<PathBuf>,

    /// Append raw result pages to this file.
    #[arg(long)]
    page_log: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Hide progress bars.
    #[arg(long)]
    no_progress: bool,

    /// Console log level for webhound (overridden by RUST_LOG).
    #[arg(long)]
    log_level: Option<String>,

    /// List configured engines and exit.
    #[arg(long)]
    list_engines: bool,
}

impl Cli {
    /// Fold command-line overrides into the loaded config.
    fn apply(&self, config: &mut WebhoundConfig) {
        if !self.engines.is_empty() {
            config.search.engines = self.engines.clone();
        }
        if let Some(pages) = self.pages {
            config.search.pages = pages;
        }
        if let Some(workers) = self.workers {
            config.search.workers_per_engine = workers;
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_seconds = timeout;
        }
        if let Some(attempts) = self.attempts {
            config.fetch.max_attempts = attempts;
        }
        if let Some(ref path) = self.detection {
            config.detection.config = Some(path.clone());
        }
        if let Some(ref path) = self.page_log {
            config.output.page_log = Some(path.clone());
        }
        if self.json {
            config.output.format = OutputFormat::Json;
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
    }

    fn filters(&self) -> SearchFilters {
        SearchFilters::from_raw(
            self.date_range.as_deref(),
            self.language.as_deref(),
            self.country.as_deref(),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = WebhoundConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let _log_guard = webhound::logging::init_logging(&config.logging)?;

    if cli.list_engines {
        for target in config.registry()?.iter() {
            println!("{:<12} {}", target.name, target.url_template);
        }
        return Ok(());
    }

    let query = match cli.query.join(" ").trim() {
        "" => prompt_query()?,
        joined => joined.to_owned(),
    };
    if query.is_empty() {
        anyhow::bail!("no search query given");
    }

    let mut pipeline = Pipeline::from_config(&config)?;
    if !cli.no_progress && std::io::stderr().is_terminal() {
        let renderer = Arc::new(ProgressRenderer::new());
        pipeline = pipeline.with_progress(renderer.callback());
    }

    info!(engines = ?config.search.engines, "starting search");
    let search_report = pipeline
        .run(&query, &config.search.engines, &cli.filters())
        .await;

    let rendered = report::render(&search_report, config.output.format)?;
    print!("{rendered}");
    std::io::stdout().flush().context("writing report")?;
    Ok(())
}

/// Ask for the query on stdin.
fn prompt_query() -> anyhow::Result<String> {
    print!("Enter your search query: ");
    std::io::stdout().flush().context("writing prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading query")?;
    Ok(line.trim().to_owned())
}

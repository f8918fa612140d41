use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use careers_scraper::config::SiteConfig;
use careers_scraper::error::RejectReason;
use careers_scraper::extract::{self, listing};
use careers_scraper::fetch::Fetcher;
use careers_scraper::normalize;
use careers_scraper::pipeline;
use careers_scraper::publish;
use careers_scraper::render::raw_json;
use careers_scraper::summary::RunSummary;

#[derive(Parser)]
#[command(name = "careers_scraper", about = "Job board scraper and careers site generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the board, render all formats, publish the site
    Run {
        /// Max postings to process (default: all listed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Override the configured minimum valid records
        #[arg(long)]
        min_jobs: Option<usize>,
        /// Override the configured output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Re-render all formats from a previously published feeds/jobs.json
    Render {
        /// Raw record dump from a prior run
        input: PathBuf,
        /// Override the configured output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Extract one saved posting snapshot and dump the raw result
    Extract {
        /// HTML file to extract from
        file: PathBuf,
        /// Canonical posting URL (id derivation, link rendering)
        #[arg(long, default_value = "")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { limit, min_jobs, out } => {
            let mut cfg = SiteConfig::load()?;
            if let Some(min) = min_jobs {
                cfg.min_jobs = min;
            }
            if let Some(dir) = out {
                cfg.output_dir = dir.to_string_lossy().into_owned();
            }
            run(&cfg, limit).await
        }
        Commands::Render { input, out } => {
            let mut cfg = SiteConfig::load()?;
            if let Some(dir) = out {
                cfg.output_dir = dir.to_string_lossy().into_owned();
            }
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let records = raw_json::parse(&raw).context("input is not a raw record dump")?;
            println!("Re-rendering {} records from {}", records.len(), input.display());

            let mut summary = RunSummary::default();
            summary.normalized = records.len();
            pipeline::check_threshold(records.len(), cfg.min_jobs)?;
            let artifacts = pipeline::render_artifacts(&records, &cfg, &mut summary);
            publish::publish(&artifacts, std::path::Path::new(&cfg.output_dir))?;
            summary.print();
            Ok(())
        }
        Commands::Extract { file, url } => {
            let cfg = SiteConfig::load()?;
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let listed = careers_scraper::model::ListedJob {
                title: String::new(),
                url,
                location: String::new(),
                employment_type: String::new(),
            };
            let raw = extract::extract_posting(&html, &listed)
                .map_err(|e| anyhow::anyhow!("extraction rejected: {e}"))?;
            let record = normalize::normalize(&raw, &cfg, Utc::now())
                .map_err(|e| anyhow::anyhow!("normalization rejected: {e}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(cfg: &SiteConfig, limit: Option<usize>) -> anyhow::Result<()> {
    let fetcher = Fetcher::new(&cfg.snapshot_dir)?;
    let mut summary = RunSummary::default();
    let scraped_at = Utc::now();

    info!(board = %cfg.board_url, "fetching job board");
    let board_html = fetcher
        .fetch(&cfg.board_url)
        .await
        .context("job board fetch failed")?;

    let mut listed = listing::parse(&board_html, &cfg.board_url, &cfg.protected_phrases);
    if let Some(n) = limit {
        listed.truncate(n);
    }
    summary.listed = listed.len();
    println!("Found {} postings on the board", listed.len());

    let mut records = Vec::new();
    for job in &listed {
        let html = match fetcher.fetch(&job.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %job.url, error = %e, "posting fetch failed, skipping");
                summary.reject(&job.url, "fetch", RejectReason::Fetch, e.to_string());
                continue;
            }
        };
        summary.fetched += 1;

        let raw = match extract::extract_posting(&html, job) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(url = %job.url, error = %e, "extraction rejected posting");
                summary.reject(&job.url, "extract", (&e).into(), e.to_string());
                continue;
            }
        };
        summary.extracted += 1;

        match normalize::normalize(&raw, cfg, scraped_at) {
            Ok(record) => {
                summary.normalized += 1;
                records.push(record);
            }
            Err(e) => {
                warn!(url = %job.url, error = %e, "normalization rejected posting");
                summary.reject(&job.url, "normalize", RejectReason::InvalidSectionSet, e.to_string());
            }
        }
    }

    let records = normalize::dedup(records, &mut summary);
    pipeline::check_threshold(records.len(), cfg.min_jobs)?;

    let artifacts = pipeline::render_artifacts(&records, cfg, &mut summary);
    publish::publish(&artifacts, std::path::Path::new(&cfg.output_dir))?;

    summary.print();
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

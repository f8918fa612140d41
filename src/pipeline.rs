use tracing::{error, info};

use crate::config::SiteConfig;
use crate::error::{RejectReason, RunError};
use crate::model::JobRecord;
use crate::publish::Artifact;
use crate::render::{aggregator, pages, raw_json, rss, schema_org};
use crate::summary::RunSummary;

pub const RSS_PATH: &str = "feeds/jobs.rss";
pub const AGGREGATOR_PATH: &str = "feeds/indeed.xml";
pub const SCHEMA_PATH: &str = "feeds/google-jobs.json";
pub const RAW_JSON_PATH: &str = "feeds/jobs.json";
pub const INDEX_PATH: &str = "index.html";

/// Abort before rendering anything when too few records survived; previous
/// artifacts stay live rather than publishing a near-empty set.
pub fn check_threshold(valid: usize, min: usize) -> Result<(), RunError> {
    if valid < min {
        return Err(RunError::InsufficientData { valid, min });
    }
    Ok(())
}

/// Fan out one normalized record list to every output format. Formats are
/// independent pure functions of the same list: a failure in one is logged,
/// recorded, and leaves the others (and that format's previously published
/// file) untouched.
pub fn render_artifacts(
    records: &[JobRecord],
    cfg: &SiteConfig,
    summary: &mut RunSummary,
) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    match raw_json::render(records) {
        Ok(doc) => {
            artifacts.push(Artifact::new(RAW_JSON_PATH, doc));
            summary.published_formats.push("raw-json".into());
        }
        Err(e) => error!(format = "raw-json", error = %e, "format skipped"),
    }

    match rss::render(records, cfg) {
        Ok(doc) => {
            artifacts.push(Artifact::new(RSS_PATH, doc));
            summary.published_formats.push("rss".into());
        }
        Err(e) => error!(format = "rss", error = %e, "format skipped"),
    }

    match aggregator::render(records, cfg) {
        Ok((doc, issues)) => {
            for issue in &issues {
                let url = records
                    .iter()
                    .find(|r| r.id == issue.id)
                    .map(|r| r.url.as_str())
                    .unwrap_or("");
                summary.reject(url, "render", RejectReason::UnmappedEnum, issue.error.to_string());
            }
            artifacts.push(Artifact::new(AGGREGATOR_PATH, doc));
            summary.published_formats.push("aggregator-xml".into());
        }
        Err(e) => error!(format = "aggregator-xml", error = %e, "format skipped"),
    }

    match schema_org::render(records, cfg) {
        Ok(doc) => {
            artifacts.push(Artifact::new(SCHEMA_PATH, doc));
            summary.published_formats.push("schema-json".into());
        }
        Err(e) => error!(format = "schema-json", error = %e, "format skipped"),
    }

    // Detail pages first: a job whose page fails validation is dropped from
    // the HTML site (no card may link to a page we refused to ship), while
    // the feeds above still carry it.
    let mut site_records: Vec<&JobRecord> = Vec::new();
    for record in records {
        match pages::detail(record, cfg) {
            Ok(doc) => {
                artifacts.push(Artifact::new(format!("{}.html", record.id), doc));
                site_records.push(record);
            }
            Err(e) => {
                error!(id = %record.id, error = %e, "detail page rejected");
                summary.reject(&record.url, "render", RejectReason::PageValidation, e.to_string());
            }
        }
    }
    let site_owned: Vec<JobRecord> = site_records.into_iter().cloned().collect();
    artifacts.push(Artifact::new(INDEX_PATH, pages::landing(&site_owned, cfg)));
    summary.published_formats.push("html-pages".into());

    info!(
        formats = summary.published_formats.len(),
        artifacts = artifacts.len(),
        "render fan-out complete"
    );
    artifacts
}

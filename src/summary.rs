use std::collections::BTreeMap;

use crate::error::RejectReason;

/// One dropped posting, with enough context to diagnose without re-running.
#[derive(Debug)]
pub struct Rejection {
    pub url: String,
    pub stage: &'static str,
    pub reason: RejectReason,
    pub detail: String,
}

/// Accounting for a whole run: every posting ends up either published or
/// listed here with a reason. Nothing is silently swallowed.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub listed: usize,
    pub fetched: usize,
    pub extracted: usize,
    pub normalized: usize,
    pub published_formats: Vec<String>,
    pub rejections: Vec<Rejection>,
}

impl RunSummary {
    pub fn reject(&mut self, url: &str, stage: &'static str, reason: RejectReason, detail: String) {
        self.rejections.push(Rejection {
            url: url.to_string(),
            stage,
            reason,
            detail,
        });
    }

    pub fn counts_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.rejections {
            *counts.entry(r.reason.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_reason(&self, reason: RejectReason) -> bool {
        self.rejections.iter().any(|r| r.reason == reason)
    }

    pub fn print(&self) {
        println!("Listed:     {}", self.listed);
        println!("Fetched:    {}", self.fetched);
        println!("Extracted:  {}", self.extracted);
        println!("Normalized: {}", self.normalized);
        println!(
            "Published:  {}",
            if self.published_formats.is_empty() {
                "none".to_string()
            } else {
                self.published_formats.join(", ")
            }
        );
        if !self.rejections.is_empty() {
            println!("Rejected:");
            for (reason, count) in self.counts_by_reason() {
                println!("  {}: {}", reason, count);
            }
            for r in &self.rejections {
                println!("    [{}] {} ({})", r.stage, r.url, r.detail);
            }
        }
    }
}

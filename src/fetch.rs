use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::normalize::slugify;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;

/// Rendered-document source. Rendering itself happens upstream; this side of
/// the boundary only needs "valid rendered HTML in, or an explicit failure".
pub struct Fetcher {
    client: reqwest::Client,
    snapshot_dir: Option<PathBuf>,
}

impl Fetcher {
    /// `snapshot_dir` empty disables diagnostic snapshots.
    pub fn new(snapshot_dir: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let snapshot_dir = if snapshot_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(snapshot_dir))
        };
        Ok(Fetcher {
            client,
            snapshot_dir,
        })
    }

    /// Fetch one rendered document, retrying 429/5xx with exponential
    /// backoff. A successful fetch is also snapshotted when enabled.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut last_err = None;
        for attempt in 0..=MAX_RETRIES {
            match self.fetch_once(url).await {
                Ok(html) => {
                    self.snapshot(url, &html);
                    return Ok(html);
                }
                Err(e) => {
                    let retryable = matches!(
                        &e,
                        FetchError::Status { status, .. }
                            if *status == 429 || *status >= 500
                    );
                    if !retryable || attempt == MAX_RETRIES {
                        return Err(e);
                    }
                    let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        backoff_s = backoff.as_secs_f64(),
                        "retryable fetch failure, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(FetchError::EmptyDocument { url: url.to_string() }))
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyDocument {
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    /// Best-effort raw-HTML snapshot for post-hoc troubleshooting. Never
    /// fails the run.
    fn snapshot(&self, url: &str, html: &str) {
        let Some(dir) = &self.snapshot_dir else {
            return;
        };
        let name = {
            let slug = slugify(url.trim_start_matches("https://").trim_start_matches("http://"));
            format!("{}.html", if slug.is_empty() { "snapshot".to_string() } else { slug })
        };
        let path = dir.join(name);
        if let Err(e) = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, html)) {
            warn!(path = %path.display(), error = %e, "snapshot write failed (ignored)");
            return;
        }
        debug!(path = %path.display(), "snapshot written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_disabled_by_empty_dir() {
        let fetcher = Fetcher::new("").unwrap();
        assert!(fetcher.snapshot_dir.is_none());
        // No-op, must not panic or create anything
        fetcher.snapshot("https://jobs.example.com/job/x", "<html></html>");
    }

    #[test]
    fn snapshot_writes_sluggified_file() {
        let dir = std::env::temp_dir().join(format!("careers_snap_{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        let fetcher = Fetcher::new(dir.to_str().unwrap()).unwrap();
        fetcher.snapshot("https://jobs.example.com/job/corporate-broker", "<html></html>");
        assert!(dir.join("jobs-example-com-job-corporate-broker.html").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}

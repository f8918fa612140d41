use anyhow::{Context, Result};
use serde::Deserialize;

/// Immutable site configuration, loaded once at startup and passed to every
/// renderer explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub company_name: String,
    pub company_url: String,
    pub company_logo: String,
    pub company_description: String,
    /// Rendered job board to scrape.
    pub board_url: String,
    /// Site-root-relative publishing prefix; every internal link starts here.
    pub path_prefix: String,
    pub output_dir: String,
    /// Where raw-HTML snapshots land when enabled; empty disables snapshots.
    pub snapshot_dir: String,
    /// Below this many valid records the whole run aborts unpublished.
    pub min_jobs: usize,
    /// Consumed by the external scheduler, not by this binary.
    pub scrape_interval_minutes: u64,
    /// Location shown when a posting carries none.
    pub default_location: String,
    /// Multi-word phrases that sentence splitting must never break inside.
    pub protected_phrases: Vec<String>,
    /// "Why work here" copy on the landing page: lead paragraphs then values.
    pub culture_intro: Vec<String>,
    pub values: Vec<CompanyValue>,
    pub offices: Vec<Office>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyValue {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Office {
    pub name: String,
    pub text: String,
}

impl SiteConfig {
    /// Optional `careers.toml` beside the binary, overridden by
    /// `CAREERS_`-prefixed environment variables, on top of coded defaults.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("company_name", "Zonos")?
            .set_default("company_url", "https://www.zonos.com")?
            .set_default("company_logo", "https://www.zonos.com/logo.png")?
            .set_default(
                "company_description",
                "Zonos provides scalable technology to simplify the complexities \
                 of international commerce, making it accessible to everyone.",
            )?
            .set_default("board_url", "https://jobs.deel.com/job-boards/zonos")?
            .set_default("path_prefix", "/careers")?
            .set_default("output_dir", "site")?
            .set_default("snapshot_dir", "")?
            .set_default("min_jobs", 1)?
            .set_default("scrape_interval_minutes", 360)?
            .set_default("default_location", "St. George, UT")?
            .set_default(
                "protected_phrases",
                vec!["St. George, Utah", "St. George, UT", "St. George"],
            )?
            .set_default("culture_intro", Vec::<String>::new())?
            .set_default("values", Vec::<String>::new())?
            .set_default("offices", Vec::<String>::new())?
            .add_source(config::File::with_name("careers").required(false))
            .add_source(config::Environment::with_prefix("CAREERS"))
            .build()
            .context("failed to assemble configuration")?;

        settings
            .try_deserialize()
            .context("invalid configuration values")
    }

    /// Absolute path for one detail page, e.g. `/careers/corporate-broker.html`.
    pub fn detail_path(&self, id: &str) -> String {
        format!("{}/{}.html", self.path_prefix.trim_end_matches('/'), id)
    }

    /// Absolute path for the landing page, e.g. `/careers/`.
    pub fn index_path(&self) -> String {
        format!("{}/", self.path_prefix.trim_end_matches('/'))
    }

    /// Canonical public URL for one detail page.
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}{}", self.company_url.trim_end_matches('/'), self.detail_path(id))
    }
}

#[cfg(test)]
pub fn test_config() -> SiteConfig {
    SiteConfig {
        company_name: "Zonos".into(),
        company_url: "https://www.zonos.com".into(),
        company_logo: "https://www.zonos.com/logo.png".into(),
        company_description: "Zonos simplifies cross-border commerce.".into(),
        board_url: "https://jobs.example.com/job-boards/zonos".into(),
        path_prefix: "/careers".into(),
        output_dir: "site".into(),
        snapshot_dir: String::new(),
        min_jobs: 1,
        scrape_interval_minutes: 360,
        default_location: "St. George, UT".into(),
        protected_phrases: vec![
            "St. George, Utah".into(),
            "St. George, UT".into(),
            "St. George".into(),
        ],
        culture_intro: vec!["We create trust in global trade.".into()],
        values: vec![CompanyValue {
            name: "Reach Everyone".into(),
            text: "It's about people.".into(),
        }],
        offices: vec![Office {
            name: "St. George, Utah".into(),
            text: "Tech Ridge, neighboring Zion National Park.".into(),
        }],
    }
}

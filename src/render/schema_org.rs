use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::error::RenderError;
use crate::model::JobRecord;

use super::{schema_employment_type, split_location};

const BULLET_SEP: &str = "; ";

/// schema.org JobPosting JSON-LD, one object per record. serde_json handles
/// all string escaping; output is pretty-printed for stable VCS diffs.
pub fn render(records: &[JobRecord], cfg: &SiteConfig) -> Result<String, RenderError> {
    let postings: Vec<Value> = records.iter().map(|r| job_posting(r, cfg)).collect();
    let mut out = serde_json::to_string_pretty(&postings)?;
    out.push('\n');
    Ok(out)
}

/// One JobPosting object; also embedded in each detail page's head.
pub fn job_posting(record: &JobRecord, cfg: &SiteConfig) -> Value {
    let loc = split_location(&record.location);
    // The record flag survives the display-location default; a remote
    // posting showing the office address is still remote here.
    let remote = record.remote || loc.remote;
    let job_location = if remote {
        json!({
            "@type": "Place",
            "address": { "@type": "PostalAddress", "addressCountry": loc.country }
        })
    } else {
        json!({
            "@type": "Place",
            "address": {
                "@type": "PostalAddress",
                "addressLocality": loc.city,
                "addressRegion": loc.region,
                "addressCountry": loc.country
            }
        })
    };

    let mut posting = json!({
        "@context": "https://schema.org/",
        "@type": "JobPosting",
        "title": record.title,
        "description": record.description_text(BULLET_SEP),
        "identifier": {
            "@type": "PropertyValue",
            "name": cfg.company_name,
            "value": record.id
        },
        "datePosted": record.scraped_at.format("%Y-%m-%d").to_string(),
        "hiringOrganization": {
            "@type": "Organization",
            "name": cfg.company_name,
            "sameAs": cfg.company_url,
            "logo": cfg.company_logo
        },
        "jobLocation": job_location,
        "employmentType": schema_employment_type(&record.employment_type),
        "url": cfg.detail_url(&record.id)
    });

    if remote {
        posting["applicantLocationRequirements"] =
            json!({ "@type": "Country", "name": "US" });
    }
    posting
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::render::testutil::sample_record;

    #[test]
    fn posting_shape() {
        let cfg = test_config();
        let record = sample_record("corporate-broker", "Corporate Broker");
        let v = job_posting(&record, &cfg);
        assert_eq!(v["@type"], "JobPosting");
        assert_eq!(v["title"], "Corporate Broker");
        assert_eq!(v["employmentType"], "FULL_TIME");
        assert_eq!(v["jobLocation"]["address"]["addressLocality"], "St. George");
        assert_eq!(v["jobLocation"]["address"]["addressRegion"], "Utah");
        assert_eq!(v["hiringOrganization"]["name"], "Zonos");
        assert_eq!(v["url"], "https://www.zonos.com/careers/corporate-broker.html");
        assert!(v.get("applicantLocationRequirements").is_none());
    }

    #[test]
    fn remote_posting_gets_country_requirement() {
        let cfg = test_config();
        let mut record = sample_record("x", "X");
        record.location = "Remote".into();
        let v = job_posting(&record, &cfg);
        assert_eq!(v["applicantLocationRequirements"]["@type"], "Country");
        assert!(v["jobLocation"]["address"].get("addressLocality").is_none());
    }

    #[test]
    fn remote_flag_survives_display_location_default() {
        // Normalization shows the office as the display location but keeps
        // the remote flag; the requirement block must still be emitted.
        let cfg = test_config();
        let mut record = sample_record("x", "X");
        record.remote = true;
        record.location = "St. George, UT".into();
        let v = job_posting(&record, &cfg);
        assert_eq!(v["applicantLocationRequirements"]["@type"], "Country");
        assert!(v["jobLocation"]["address"].get("addressLocality").is_none());
    }

    #[test]
    fn unmapped_type_uses_mechanical_transform() {
        let cfg = test_config();
        let mut record = sample_record("x", "X");
        record.employment_type = "Fractional".into();
        let v = job_posting(&record, &cfg);
        assert_eq!(v["employmentType"], "FRACTIONAL");
    }

    #[test]
    fn document_is_array_even_when_empty() {
        let out = render(&[], &test_config()).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn free_text_json_escaped() {
        let cfg = test_config();
        let mut record = sample_record("x", "Quote \" and \\ backslash");
        record.intro = vec!["Line\nbreak".into()];
        let out = render(&[record], &cfg).unwrap();
        // Must stay parseable despite embedded quotes and control chars
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["title"], "Quote \" and \\ backslash");
    }
}

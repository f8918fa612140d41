pub mod aggregator;
pub mod pages;
pub mod raw_json;
pub mod rss;
pub mod schema_org;

use crate::error::RenderError;

/// A per-job problem inside one output format. The job is excluded from that
/// format only; the run and the other formats continue.
#[derive(Debug)]
pub struct RenderIssue {
    pub id: String,
    pub error: RenderError,
}

/// Closed employment-type table for the aggregator XML vocabulary.
/// Unmapped values are an error, never a guess.
pub fn aggregator_job_type(employment_type: &str) -> Option<&'static str> {
    match employment_type.to_lowercase().replace(' ', "-").as_str() {
        "full-time" => Some("fulltime"),
        "part-time" => Some("parttime"),
        "contract" | "contractor" => Some("contract"),
        "internship" | "intern" => Some("internship"),
        "temporary" => Some("temporary"),
        _ => None,
    }
}

/// schema.org employmentType: the same table, with the mechanical
/// uppercase transform as fallback for values outside it.
pub fn schema_employment_type(employment_type: &str) -> String {
    match employment_type.to_lowercase().replace(' ', "-").as_str() {
        "full-time" => "FULL_TIME".into(),
        "part-time" => "PART_TIME".into(),
        "contract" | "contractor" => "CONTRACTOR".into(),
        "internship" | "intern" => "INTERN".into(),
        "temporary" => "TEMPORARY".into(),
        other => other.to_uppercase().replace(['-', ' '], "_"),
    }
}

/// City/region/country split of a display location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationParts {
    pub city: String,
    pub region: String,
    pub country: String,
    pub remote: bool,
}

pub fn split_location(location: &str) -> LocationParts {
    let trimmed = location.trim();
    if trimmed.eq_ignore_ascii_case("remote") || trimmed.eq_ignore_ascii_case("anywhere") {
        return LocationParts {
            city: String::new(),
            region: String::new(),
            country: "US".into(),
            remote: true,
        };
    }
    // "St. George, Utah" -> city before the last comma, region after.
    match trimmed.rsplit_once(',') {
        Some((city, region)) => LocationParts {
            city: city.trim().to_string(),
            region: region.trim().to_string(),
            country: "US".into(),
            remote: false,
        },
        None => LocationParts {
            city: trimmed.to_string(),
            region: String::new(),
            country: "US".into(),
            remote: false,
        },
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{TimeZone, Utc};

    use crate::model::{CanonicalHeading, JobRecord, Section, SectionBody};

    pub fn sample_record(id: &str, title: &str) -> JobRecord {
        JobRecord {
            id: id.into(),
            title: title.into(),
            location: "St. George, Utah".into(),
            remote: false,
            employment_type: "Full-time".into(),
            url: format!("https://jobs.example.com/job/{}", id),
            intro: vec!["Join our brokerage team.".into()],
            sections: CanonicalHeading::ALL
                .iter()
                .map(|h| Section {
                    heading: *h,
                    body: if h.is_bulleted() {
                        SectionBody::Bullets(vec!["Item one".into(), "Item two".into()])
                    } else {
                        SectionBody::Paragraph("Some paragraph text.".into())
                    },
                })
                .collect(),
            scraped_at: Utc.with_ymd_and_hms(2025, 8, 25, 12, 0, 0).unwrap(),
        }
    }
}

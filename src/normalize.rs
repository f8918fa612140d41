use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::warn;

use crate::config::SiteConfig;
use crate::error::{NormalizeError, RejectReason};
use crate::model::{CanonicalHeading, JobRecord, RawPosting, Section, SectionBody};
use crate::summary::RunSummary;

static DEPARTMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*Department\s*[\u{b7}\u{2022}-].*$").unwrap());
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\u{b7}\u{2022}]\s*(Remote|Full[- ]time|Part[- ]time)\s*").unwrap()
});
static TRAILING_DOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{b7}\u{2022}]\s*$").unwrap());
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Strip board metadata riders ("Department · Brokerage", "· Full-time")
/// and collapse whitespace. Pure: identical input, identical output.
pub fn clean_text(raw: &str) -> String {
    let s = DEPARTMENT_RE.replace(raw, "");
    let s = MARKER_RE.replace_all(&s, " ");
    let s = TRAILING_DOT_RE.replace(&s, "");
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stable id from the canonical posting URL: the last path segment, slugged.
/// Same URL always yields the same id; it is the deduplication key.
pub fn derive_id(url: &str, title: &str) -> String {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let trimmed = after_scheme.split(['?', '#']).next().unwrap_or(after_scheme);
    // Path only; the authority is never an id.
    let path = trimmed.split_once('/').map_or("", |(_, p)| p);
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let slug = slugify(segment);
    if slug.is_empty() {
        slugify(title)
    } else {
        slug
    }
}

pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    SLUG_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Convert one raw posting into a canonical record, or reject it.
pub fn normalize(
    raw: &RawPosting,
    cfg: &SiteConfig,
    scraped_at: DateTime<Utc>,
) -> Result<JobRecord, NormalizeError> {
    validate_sections(&raw.sections)?;

    let title = clean_text(&raw.title);
    let cleaned_location = clean_text(&raw.location);
    // Remote-ness is kept as its own flag; the display location falls back
    // to the configured office so pages never show "Remote" as an address.
    let remote = cleaned_location.to_lowercase().contains("remote");
    let location = if cleaned_location.is_empty() || remote {
        cfg.default_location.clone()
    } else {
        cleaned_location
    };
    let employment_type = {
        let cleaned = clean_text(&raw.employment_type);
        if cleaned.is_empty() {
            "Full-time".to_string()
        } else {
            cleaned
        }
    };

    let intro: Vec<String> = raw
        .intro
        .iter()
        .map(|p| clean_text(p))
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case(&title))
        .collect();

    let sections = raw
        .sections
        .iter()
        .map(|s| Section {
            heading: s.heading,
            body: match &s.body {
                SectionBody::Paragraph(p) => SectionBody::Paragraph(clean_text(p)),
                SectionBody::Bullets(items) => SectionBody::Bullets(
                    items
                        .iter()
                        .map(|i| clean_text(i))
                        .filter(|i| !i.is_empty())
                        .collect(),
                ),
            },
        })
        .collect();

    Ok(JobRecord {
        id: derive_id(&raw.url, &title),
        title,
        location,
        remote,
        employment_type,
        url: raw.url.clone(),
        intro,
        sections,
        scraped_at,
    })
}

fn validate_sections(sections: &[Section]) -> Result<(), NormalizeError> {
    if sections.len() != 6 {
        return Err(NormalizeError::InvalidSectionSet(format!(
            "expected 6 sections, found {}",
            sections.len()
        )));
    }
    for (section, expected) in sections.iter().zip(CanonicalHeading::ALL.iter()) {
        if section.heading != *expected {
            return Err(NormalizeError::InvalidSectionSet(format!(
                "expected '{}' at position {}, found '{}'",
                expected.title(),
                expected.position() + 1,
                section.heading.title()
            )));
        }
        if section.body.is_bullets() != expected.is_bulleted() {
            return Err(NormalizeError::InvalidSectionSet(format!(
                "section '{}' must be a {}",
                expected.title(),
                if expected.is_bulleted() { "bullet list" } else { "paragraph" }
            )));
        }
    }
    Ok(())
}

/// Collapse records sharing an id to one. Last-seen wins: later extraction
/// passes carry the more specific detail URL. Order of first appearance is
/// preserved; every collapse is logged and accounted for in the summary.
pub fn dedup(records: Vec<JobRecord>, summary: &mut RunSummary) -> Vec<JobRecord> {
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<JobRecord> = Vec::new();
    for record in records {
        match by_id.get(&record.id) {
            Some(&idx) => {
                warn!(
                    id = %record.id,
                    kept = %record.url,
                    dropped = %out[idx].url,
                    "duplicate posting collapsed (last seen wins)"
                );
                summary.reject(
                    &out[idx].url,
                    "dedup",
                    RejectReason::Duplicate,
                    format!("collapsed into later extraction of '{}'", record.id),
                );
                out[idx] = record;
            }
            None => {
                by_id.insert(record.id.clone(), out.len());
                out.push(record);
            }
        }
    }
    out
}

/// Sentence splitting that never breaks inside a protected phrase
/// ("St. George, Utah" must survive intact). Protected periods are masked
/// before the scan and restored afterwards.
pub fn split_sentences(text: &str, protected: &[String]) -> Vec<String> {
    const MASK: char = '\u{1}';
    let mut masked = text.to_string();
    for phrase in protected {
        if phrase.contains('.') {
            let shielded = phrase.replace('.', &MASK.to_string());
            masked = masked.replace(phrase.as_str(), &shielded);
        }
    }

    let chars: Vec<char> = masked.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i], '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let boundary = j > i + 1 && j < chars.len() && chars[j].is_uppercase();
            if boundary || j >= chars.len() {
                let sentence: String = chars[start..=i].iter().collect();
                let sentence = sentence.trim().replace(MASK, ".");
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    if start < chars.len() {
        let tail: String = chars[start..].iter().collect();
        let tail = tail.trim().replace(MASK, ".");
        if !tail.is_empty() {
            sentences.push(tail);
        }
    }
    sentences
}

/// First `n` sentences, protected phrases intact. Used for feed descriptions
/// and page meta text.
pub fn summarize(text: &str, n: usize, protected: &[String]) -> String {
    split_sentences(text, protected)
        .into_iter()
        .take(n)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn raw_posting() -> RawPosting {
        RawPosting {
            url: "https://jobs.example.com/job/corporate-broker".into(),
            title: "Corporate Broker Department \u{b7} Brokerage".into(),
            location: "St. George, Utah".into(),
            employment_type: "Full-time \u{b7} Remote".into(),
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
        }
    }

    #[test]
    fn title_and_type_cleaned() {
        let record = normalize(&raw_posting(), &test_config(), Utc::now()).unwrap();
        assert_eq!(record.title, "Corporate Broker");
        assert_eq!(record.employment_type, "Full-time");
        assert_eq!(record.location, "St. George, Utah");
        assert!(!record.remote);
    }

    #[test]
    fn remote_location_flagged_and_display_defaulted() {
        let mut raw = raw_posting();
        raw.location = "Remote".into();
        let record = normalize(&raw, &test_config(), Utc::now()).unwrap();
        assert!(record.remote);
        assert_eq!(record.location, "St. George, UT");
    }

    #[test]
    fn id_from_url_segment() {
        assert_eq!(
            derive_id("https://jobs.example.com/job/corporate-broker", "x"),
            "corporate-broker"
        );
        assert_eq!(
            derive_id("https://jobs.example.com/job/corporate-broker?src=feed", "x"),
            "corporate-broker"
        );
        // No usable segment: fall back to the title
        assert_eq!(derive_id("https://jobs.example.com/", "Corporate Broker"), "corporate-broker");
        assert_eq!(derive_id("https://jobs.example.com", "Corporate Broker"), "corporate-broker");
    }

    #[test]
    fn id_deterministic() {
        let a = derive_id("https://jobs.example.com/job/abc", "t");
        let b = derive_id("https://jobs.example.com/job/abc", "other");
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_section_count_rejected() {
        let mut raw = raw_posting();
        raw.sections.pop();
        assert!(matches!(
            normalize(&raw, &test_config(), Utc::now()),
            Err(NormalizeError::InvalidSectionSet(_))
        ));
    }

    #[test]
    fn wrong_body_kind_rejected() {
        let mut raw = raw_posting();
        // "Required" must be a bullet list
        raw.sections[4].body = SectionBody::Paragraph("not a list".into());
        assert!(normalize(&raw, &test_config(), Utc::now()).is_err());
    }

    #[test]
    fn dedup_last_seen_wins() {
        let cfg = test_config();
        let now = Utc::now();
        let mut first = normalize(&raw_posting(), &cfg, now).unwrap();
        first.title = "First Pass".into();
        let second = normalize(&raw_posting(), &cfg, now).unwrap();
        let mut summary = RunSummary::default();
        let out = dedup(vec![first, second.clone()], &mut summary);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, second.title);
        assert!(summary.has_reason(RejectReason::Duplicate));
    }

    #[test]
    fn dedup_whitespace_variants_collapse() {
        let cfg = test_config();
        let now = Utc::now();
        let a = normalize(&raw_posting(), &cfg, now).unwrap();
        let mut raw_b = raw_posting();
        raw_b.title = "Corporate  Broker".into();
        let b = normalize(&raw_b, &cfg, now).unwrap();
        let mut summary = RunSummary::default();
        assert_eq!(dedup(vec![a, b], &mut summary).len(), 1);
    }

    #[test]
    fn protected_phrase_never_split() {
        let protected = vec!["St. George, Utah".to_string()];
        let text = "Our office sits in St. George, Utah. Apply today.";
        let sentences = split_sentences(text, &protected);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Our office sits in St. George, Utah.");
        assert!(sentences[0].contains("St. George, Utah"));
    }

    #[test]
    fn plain_sentences_split() {
        let sentences = split_sentences("One here. Two here. Three.", &[]);
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn summarize_takes_first_sentences() {
        let protected = vec!["St. George, Utah".to_string()];
        let s = summarize(
            "We are in St. George, Utah. We broker. We ship.",
            2,
            &protected,
        );
        assert_eq!(s, "We are in St. George, Utah. We broker.");
    }

    #[test]
    fn normalization_is_pure() {
        let cfg = test_config();
        let now = Utc::now();
        let a = normalize(&raw_posting(), &cfg, now).unwrap();
        let b = normalize(&raw_posting(), &cfg, now).unwrap();
        assert_eq!(a, b);
    }
}

pub mod blocks;
pub mod listing;
pub mod sections;

use crate::error::ExtractError;
use crate::model::{ListedJob, RawPosting};

/// Two-pass pipeline for one rendered posting: html -> blocks -> sections.
///
/// Listing metadata supplies title/location/type; the detail page's own
/// heading wins for the title when the card text was noisy.
pub fn extract_posting(html: &str, listed: &ListedJob) -> Result<RawPosting, ExtractError> {
    let blocks = blocks::classify_document(html);

    let page_title = blocks.iter().find_map(|b| match b {
        blocks::Block::Heading(t) if crate::model::CanonicalHeading::match_text(t).is_none() => {
            Some(t.clone())
        }
        _ => None,
    });

    let split = sections::split_sections(&blocks)?;

    Ok(RawPosting {
        url: listed.url.clone(),
        title: page_title.unwrap_or_else(|| listed.title.clone()),
        location: listed.location.clone(),
        employment_type: listed.employment_type.clone(),
        intro: split.intro,
        sections: split.sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed() -> ListedJob {
        ListedJob {
            title: "Corporate Broker \u{b7} Full-time".into(),
            url: "https://jobs.example.com/job/corporate-broker".into(),
            location: "St. George, Utah".into(),
            employment_type: "Full-time".into(),
        }
    }

    #[test]
    fn fixture_posting_extracts() {
        let html = std::fs::read_to_string("tests/fixtures/corporate-broker.html").unwrap();
        let raw = extract_posting(&html, &listed()).unwrap();
        assert_eq!(raw.title, "Corporate Broker");
        assert_eq!(raw.sections.len(), 6);
        assert!(!raw.intro.is_empty());
    }

    #[test]
    fn missing_section_fixture_rejected() {
        let html = std::fs::read_to_string("tests/fixtures/missing-section.html").unwrap();
        assert!(matches!(
            extract_posting(&html, &listed()),
            Err(ExtractError::MissingSection(_))
        ));
    }
}

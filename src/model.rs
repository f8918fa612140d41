use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six section headings every posting must carry, in publication order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalHeading {
    AboutTheRole,
    WhatYoullWorkOn,
    WhyThisRoleIsDifferent,
    WhatWereLookingFor,
    Required,
    WhatWeOffer,
}

impl CanonicalHeading {
    pub const ALL: [CanonicalHeading; 6] = [
        CanonicalHeading::AboutTheRole,
        CanonicalHeading::WhatYoullWorkOn,
        CanonicalHeading::WhyThisRoleIsDifferent,
        CanonicalHeading::WhatWereLookingFor,
        CanonicalHeading::Required,
        CanonicalHeading::WhatWeOffer,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            CanonicalHeading::AboutTheRole => "About the Role",
            CanonicalHeading::WhatYoullWorkOn => "What You'll Work On",
            CanonicalHeading::WhyThisRoleIsDifferent => "Why This Role is Different",
            CanonicalHeading::WhatWereLookingFor => "What We're Looking For",
            CanonicalHeading::Required => "Required",
            CanonicalHeading::WhatWeOffer => "What We Offer",
        }
    }

    /// Sections rendered as bullet lists; the rest are paragraphs.
    pub fn is_bulleted(&self) -> bool {
        matches!(
            self,
            CanonicalHeading::WhatYoullWorkOn
                | CanonicalHeading::Required
                | CanonicalHeading::WhatWeOffer
        )
    }

    /// Match heading text exactly first, then with normalization (case,
    /// curly apostrophes, collapsed whitespace, trailing punctuation).
    pub fn match_text(text: &str) -> Option<CanonicalHeading> {
        let trimmed = text.trim();
        if let Some(h) = Self::ALL.iter().find(|h| h.title() == trimmed) {
            return Some(*h);
        }
        let normalized = normalize_heading(trimmed);
        Self::ALL
            .iter()
            .find(|h| normalize_heading(h.title()) == normalized)
            .copied()
    }

    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|h| h == self).unwrap_or(0)
    }
}

fn normalize_heading(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' => Some('\''),
            ':' | '.' => None,
            c if c.is_whitespace() => Some(' '),
            c => Some(c.to_ascii_lowercase()),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Section body: lead paragraphs or a flat bullet list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraph(String),
    Bullets(Vec<String>),
}

impl SectionBody {
    pub fn is_bullets(&self) -> bool {
        matches!(self, SectionBody::Bullets(_))
    }

    /// Flatten to plain text; bullets joined with the given delimiter.
    pub fn to_text(&self, bullet_sep: &str) -> String {
        match self {
            SectionBody::Paragraph(p) => p.clone(),
            SectionBody::Bullets(items) => items.join(bullet_sep),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: CanonicalHeading,
    pub body: SectionBody,
}

/// One job as listed on the board index page, before the detail fetch.
#[derive(Debug, Clone)]
pub struct ListedJob {
    pub title: String,
    pub url: String,
    pub location: String,
    pub employment_type: String,
}

/// Raw extraction output for one posting; consumed by the normalizer.
#[derive(Debug, Clone)]
pub struct RawPosting {
    pub url: String,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub intro: Vec<String>,
    pub sections: Vec<Section>,
}

/// Canonical, validated representation of one job posting.
///
/// Field names are a stable contract: the raw JSON feed is the introspection
/// surface other tools parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    /// Display location; the default office stands in for remote postings.
    pub location: String,
    /// The posting advertised itself as remote before the display default
    /// was applied. Feeds that care about remote-ness read this, not
    /// `location`.
    pub remote: bool,
    pub employment_type: String,
    pub url: String,
    pub intro: Vec<String>,
    pub sections: Vec<Section>,
    pub scraped_at: DateTime<Utc>,
}

impl JobRecord {
    /// Intro plus all six sections as one plain-text description.
    pub fn description_text(&self, bullet_sep: &str) -> String {
        let mut parts: Vec<String> = self.intro.clone();
        for section in &self.sections {
            parts.push(section.heading.title().to_string());
            parts.push(section.body.to_text(bullet_sep));
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_heading_match() {
        assert_eq!(
            CanonicalHeading::match_text("What You'll Work On"),
            Some(CanonicalHeading::WhatYoullWorkOn)
        );
    }

    #[test]
    fn normalized_heading_match() {
        // Curly apostrophe, odd case, trailing colon
        assert_eq!(
            CanonicalHeading::match_text("what you\u{2019}ll work on:"),
            Some(CanonicalHeading::WhatYoullWorkOn)
        );
        assert_eq!(
            CanonicalHeading::match_text("WHY THIS ROLE IS DIFFERENT"),
            Some(CanonicalHeading::WhyThisRoleIsDifferent)
        );
    }

    #[test]
    fn unknown_heading_no_match() {
        assert_eq!(CanonicalHeading::match_text("Similar Jobs"), None);
        assert_eq!(CanonicalHeading::match_text(""), None);
    }

    #[test]
    fn three_bulleted_headings() {
        let bulleted: Vec<_> = CanonicalHeading::ALL
            .iter()
            .filter(|h| h.is_bulleted())
            .collect();
        assert_eq!(bulleted.len(), 3);
        // Bulleted entries sit at fixed positions in the canonical order
        let positions: Vec<usize> = bulleted.iter().map(|h| h.position()).collect();
        assert_eq!(positions, vec![1, 4, 5]);
    }
}

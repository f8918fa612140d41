use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::model::ListedJob;

use super::blocks::collapse_ws;

/// Anchor selectors tried in order; the board links every card to a
/// `/job/`-style detail URL, the second form shows up after redesigns.
const CARD_SELECTORS: &[&str] = &[
    "a[href*='/job/']",
    "a[href*='/jobs/']",
    "a[href*='/job-details/']",
];

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4").unwrap());

const TYPE_KEYWORDS: &[&str] = &["full-time", "full time", "part-time", "part time", "contract", "internship", "temporary"];
const LOCATION_KEYWORDS: &[&str] = &["remote", "anywhere", "hybrid", "on-site", "onsite"];

/// Parse the rendered board index into listed jobs. Duplicate hrefs collapse
/// here already; the normalizer still dedups by canonical id later.
///
/// `location_hints` are configured place names ("St. George"); a card
/// fragment containing one is taken as the location, so concrete office
/// fragments survive alongside the remote-style keywords.
pub fn parse(html: &str, board_url: &str, location_hints: &[String]) -> Vec<ListedJob> {
    let doc = Html::parse_document(html);
    let mut jobs: Vec<ListedJob> = Vec::new();

    for sel_str in CARD_SELECTORS {
        let sel = Selector::parse(sel_str).unwrap();
        for anchor in doc.select(&sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let url = absolutize(href, board_url);
            if jobs.iter().any(|j| j.url == url) {
                continue;
            }
            let title = card_title(&anchor);
            if title.len() <= 3 {
                debug!(url = %url, "skipping card with no usable title");
                continue;
            }
            let card_text = collapse_ws(&anchor.text().collect::<String>());
            jobs.push(ListedJob {
                title,
                url,
                location: find_location_fragment(&card_text, location_hints)
                    .unwrap_or_default(),
                employment_type: find_keyword_fragment(&card_text, TYPE_KEYWORDS)
                    .unwrap_or_default(),
            });
        }
        if !jobs.is_empty() {
            break;
        }
    }

    jobs
}

fn card_title(anchor: &ElementRef) -> String {
    if let Some(h) = anchor.select(&TITLE_SELECTOR).next() {
        return collapse_ws(&h.text().collect::<String>());
    }
    // Anchor text up to the first separator dot; the rest is card metadata.
    let text = collapse_ws(&anchor.text().collect::<String>());
    text.split(['\u{b7}', '\u{2022}'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// A configured place name wins; remote-style keywords are the fallback.
fn find_location_fragment(card_text: &str, hints: &[String]) -> Option<String> {
    card_text
        .split(['\u{b7}', '\u{2022}'])
        .map(str::trim)
        .find(|frag| {
            let lower = frag.to_lowercase();
            hints.iter().any(|h| lower.contains(&h.to_lowercase()))
                || LOCATION_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(str::to_string)
}

/// Pull the separator-dot fragment containing one of the keywords, e.g.
/// "· Full-time" out of "Corporate Broker · St. George UT · Full-time".
fn find_keyword_fragment(card_text: &str, keywords: &[&str]) -> Option<String> {
    card_text
        .split(['\u{b7}', '\u{2022}'])
        .map(str::trim)
        .find(|frag| {
            let lower = frag.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .map(str::to_string)
}

fn absolutize(href: &str, board_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    let origin = board_url
        .split('/')
        .take(3)
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", origin.trim_end_matches('/'), href.trim_start_matches('/'))
}

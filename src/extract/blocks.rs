use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Flat, typed view of the posting's content region.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    Bullets(Vec<String>),
}

/// Content-region candidates, most specific first. The board renders the
/// posting body inside a description container; `main`/`body` are the
/// documented fallbacks for markup drift.
const CONTENT_SELECTORS: &[&str] = &[
    "[data-qa='job-description']",
    "div.job-description",
    "article",
    "main",
    "body",
];

/// Application-form and navigation fragments, matched by phrase rather than
/// by position in the document.
const BOILERPLATE_PHRASES: &[&str] = &[
    "apply for this job",
    "apply now",
    "autofill with resume",
    "submit application",
    "first name",
    "last name",
    "email address",
    "phone number",
    "upload resume",
    "powered by",
    "similar jobs",
    "view all jobs",
    "back to all jobs",
    "open main menu",
    "cookie settings",
    "we use cookies",
    "privacy policy",
    "terms of service",
];

static FLOW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6, p, ul, ol").unwrap());
static LI_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static STRONG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong, b").unwrap());

/// Walk the rendered document and classify its content region into blocks.
/// Boilerplate is dropped here; heading recognition happens in `sections`.
pub fn classify_document(html: &str) -> Vec<Block> {
    let doc = Html::parse_document(html);
    let root = content_root(&doc);

    let mut blocks = Vec::new();
    for el in root.select(&FLOW_SELECTOR) {
        // Lists own their items; skip flow elements nested inside one.
        if inside_list(el) {
            continue;
        }
        match el.value().name() {
            "ul" | "ol" => {
                let items: Vec<String> = el
                    .select(&LI_SELECTOR)
                    .map(|li| element_text(&li))
                    .filter(|t| !t.is_empty() && !is_boilerplate(t))
                    .collect();
                if !items.is_empty() {
                    blocks.push(Block::Bullets(items));
                }
            }
            "p" => {
                let text = element_text(&el);
                if text.is_empty() || is_boilerplate(&text) {
                    continue;
                }
                // The board renders section headers as <p><strong>…</strong></p>
                if is_strong_only(&el) {
                    blocks.push(Block::Heading(text));
                } else {
                    blocks.push(Block::Paragraph(text));
                }
            }
            _ => {
                let text = element_text(&el);
                if !text.is_empty() && !is_boilerplate(&text) {
                    blocks.push(Block::Heading(text));
                }
            }
        }
    }
    blocks
}

fn content_root<'a>(doc: &'a Html) -> ElementRef<'a> {
    for sel_str in CONTENT_SELECTORS {
        let sel = Selector::parse(sel_str).unwrap();
        if let Some(el) = doc.select(&sel).next() {
            return el;
        }
    }
    doc.root_element()
}

fn inside_list(el: ElementRef) -> bool {
    el.ancestors().any(|node| {
        ElementRef::wrap(node)
            .map(|a| matches!(a.value().name(), "ul" | "ol"))
            .unwrap_or(false)
    })
}

/// True when the element's visible text comes entirely from <strong>/<b>.
fn is_strong_only(el: &ElementRef) -> bool {
    let total = element_text(el);
    if total.is_empty() || total.len() > 80 {
        return false;
    }
    let strong_text: String = el
        .select(&STRONG_SELECTOR)
        .map(|s| element_text(&s))
        .collect::<Vec<_>>()
        .join(" ");
    !strong_text.is_empty() && collapse_ws(&strong_text) == total
}

fn element_text(el: &ElementRef) -> String {
    collapse_ws(&el.text().collect::<String>())
}

pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_boilerplate(text: &str) -> bool {
    let lower = text.to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|p| lower.contains(p))
}

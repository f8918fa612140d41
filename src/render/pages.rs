use crate::config::SiteConfig;
use crate::error::RenderError;
use crate::model::{JobRecord, SectionBody};
use crate::normalize::summarize;

use super::{escape_html, schema_org};

/// Guard against shipping a truncated detail page: below this many bytes
/// something upstream went wrong even when the counts line up.
const MIN_DETAIL_LEN: usize = 2000;
const META_SENTENCES: usize = 2;

/// Landing page: hero, one card per job with an absolute detail link, then
/// the configured "why work here" block. Self-contained static HTML; every
/// internal link is rooted at the publishing prefix because the hosting
/// layer rewrites paths and breaks relative navigation.
pub fn landing(records: &[JobRecord], cfg: &SiteConfig) -> String {
    let count = records.len();
    let count_label = if count == 1 { "position" } else { "positions" };

    let cards = if records.is_empty() {
        "<div class=\"no-jobs\">\n\
         <p>We don't have any open positions at the moment, but we're always \
         looking for talented individuals!</p>\n\
         <p>Check back soon.</p>\n</div>"
            .to_string()
    } else {
        records.iter().map(|r| job_card(r, cfg)).collect::<Vec<_>>().join("\n")
    };

    let culture: String = cfg
        .culture_intro
        .iter()
        .map(|p| format!("<p>{}</p>", escape_html(p)))
        .collect();
    let values: String = cfg
        .values
        .iter()
        .map(|v| {
            format!(
                "<div class=\"value-card\"><h3>{}</h3><p>{}</p></div>",
                escape_html(&v.name),
                escape_html(&v.text)
            )
        })
        .collect();
    let offices: String = cfg
        .offices
        .iter()
        .map(|o| {
            format!(
                "<div class=\"office\"><h4>{}</h4><p>{}</p></div>",
                escape_html(&o.name),
                escape_html(&o.text)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<meta name=\"description\" content=\"Join the {company} team. {desc}\">\n\
<meta name=\"robots\" content=\"index, follow\">\n\
<title>Careers at {company} - Join Our Team</title>\n\
<link rel=\"canonical\" href=\"{company_url}{index_path}\">\n\
<link rel=\"stylesheet\" href=\"{prefix}/careers.css\">\n\
<meta property=\"og:title\" content=\"Careers at {company}\">\n\
<meta property=\"og:description\" content=\"Join our team. {count} open {count_label}.\">\n\
<meta property=\"og:url\" content=\"{company_url}{index_path}\">\n\
<meta property=\"og:type\" content=\"website\">\n\
</head>\n\
<body>\n\
<header class=\"site-header\">\n\
<a href=\"{company_url}\" class=\"logo\"><img src=\"{logo}\" alt=\"{company}\"></a>\n\
</header>\n\
<main class=\"careers-page\">\n\
<section class=\"hero\">\n\
<h1>Join the {company} Team</h1>\n\
</section>\n\
<section class=\"jobs-section\">\n\
<h2>Open Positions</h2>\n\
<p class=\"job-count\">{count} {count_label} available</p>\n\
<div class=\"jobs-grid\">\n{cards}\n</div>\n\
</section>\n\
<section class=\"company-culture\">\n\
<h2>Building a Great Company</h2>\n\
<div class=\"culture-intro\">{culture}</div>\n\
<div class=\"values-grid\">{values}</div>\n\
<div class=\"offices-grid\">{offices}</div>\n\
</section>\n\
</main>\n\
<footer class=\"site-footer\">\n\
<p>&copy; {company}. All rights reserved.</p>\n\
<nav><a href=\"{company_url}\">Home</a> <a href=\"{index_path}\">Careers</a></nav>\n\
</footer>\n\
</body>\n\
</html>\n",
        company = escape_html(&cfg.company_name),
        desc = escape_html(&cfg.company_description),
        company_url = escape_html(&cfg.company_url),
        logo = escape_html(&cfg.company_logo),
        prefix = cfg.path_prefix.trim_end_matches('/'),
        index_path = cfg.index_path(),
        count = count,
        count_label = count_label,
        cards = cards,
        culture = culture,
        values = values,
        offices = offices,
    )
}

fn job_card(record: &JobRecord, cfg: &SiteConfig) -> String {
    let href = cfg.detail_path(&record.id);
    format!(
        "<article class=\"job-card\">\n\
         <h3><a href=\"{href}\">{title}</a></h3>\n\
         <div class=\"job-card-meta\">\
         <span class=\"location\">{location}</span> \
         <span class=\"type\">{jobtype}</span></div>\n\
         <a href=\"{href}\" class=\"btn btn-secondary\">View Details</a>\n\
         </article>",
        href = href,
        title = escape_html(&record.title),
        location = escape_html(&record.location),
        jobtype = escape_html(&record.employment_type),
    )
}

/// Detail page in fixed order: title/location header, intro paragraphs, the
/// six sections as one heading level plus body each, then an absolute
/// back-link. Validated before being returned; a malformed page is an error,
/// never an artifact.
pub fn detail(record: &JobRecord, cfg: &SiteConfig) -> Result<String, RenderError> {
    let intro_html: String = record
        .intro
        .iter()
        .map(|p| format!("<p>{}</p>\n", escape_html(p)))
        .collect();

    let sections_html: String = record
        .sections
        .iter()
        .map(|s| {
            let body = match &s.body {
                SectionBody::Paragraph(p) => format!("<p>{}</p>", escape_html(p)),
                SectionBody::Bullets(items) => format!(
                    "<ul>{}</ul>",
                    items
                        .iter()
                        .map(|i| format!("<li>{}</li>", escape_html(i)))
                        .collect::<String>()
                ),
            };
            format!(
                "<section class=\"job-section\">\n\
                 <h2 class=\"section-heading\">{}</h2>\n{}\n</section>\n",
                escape_html(s.heading.title()),
                body
            )
        })
        .collect();

    let meta_description = summarize(
        &record.intro.join(" "),
        META_SENTENCES,
        &cfg.protected_phrases,
    );
    // Embedded JSON-LD; "</" is broken up so free text cannot close the script tag.
    let schema = serde_json::to_string_pretty(&schema_org::job_posting(record, cfg))?
        .replace("</", "<\\/");

    let html = format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<meta name=\"description\" content=\"{title} at {company}. {meta_desc}\">\n\
<meta name=\"robots\" content=\"index, follow\">\n\
<title>{title} - Careers at {company}</title>\n\
<link rel=\"canonical\" href=\"{canonical}\">\n\
<link rel=\"stylesheet\" href=\"{prefix}/careers.css\">\n\
<script type=\"application/ld+json\">\n{schema}\n</script>\n\
</head>\n\
<body>\n\
<header class=\"site-header\">\n\
<a href=\"{company_url}\" class=\"logo\"><img src=\"{logo}\" alt=\"{company}\"></a>\n\
<nav><a href=\"{index_path}\">&larr; All Jobs</a></nav>\n\
</header>\n\
<main class=\"job-detail\">\n\
<article>\n\
<header class=\"job-header\">\n\
<h1>{title}</h1>\n\
<div class=\"job-meta\">\
<span class=\"meta-item\">{location}</span> \
<span class=\"meta-item\">{jobtype}</span></div>\n\
<a href=\"{apply_url}\" class=\"btn btn-primary\" target=\"_blank\" rel=\"noopener\">Apply Now</a>\n\
</header>\n\
<div class=\"job-intro\">\n{intro}</div>\n\
{sections}\
<nav class=\"back-link\"><a href=\"{index_path}\">&larr; Back to all openings</a></nav>\n\
</article>\n\
</main>\n\
<footer class=\"site-footer\">\n\
<p>&copy; {company}. All rights reserved.</p>\n\
</footer>\n\
</body>\n\
</html>\n",
        title = escape_html(&record.title),
        company = escape_html(&cfg.company_name),
        meta_desc = escape_html(&meta_description),
        canonical = escape_html(&cfg.detail_url(&record.id)),
        prefix = cfg.path_prefix.trim_end_matches('/'),
        schema = schema,
        company_url = escape_html(&cfg.company_url),
        logo = escape_html(&cfg.company_logo),
        index_path = cfg.index_path(),
        location = escape_html(&record.location),
        jobtype = escape_html(&record.employment_type),
        apply_url = escape_html(&record.url),
        intro = intro_html,
        sections = sections_html,
    );

    validate_detail(&html)?;
    Ok(html)
}

/// Structural checks on the finished page: exactly six section headings,
/// exactly three bullet lists, and a sane minimum size.
fn validate_detail(html: &str) -> Result<(), RenderError> {
    let headings = html.matches("<h2 class=\"section-heading\">").count();
    if headings != 6 {
        return Err(RenderError::ValidationFailed(format!(
            "expected 6 section headings, found {}",
            headings
        )));
    }
    let lists = html.matches("<ul>").count();
    if lists != 3 {
        return Err(RenderError::ValidationFailed(format!(
            "expected 3 bullet lists, found {}",
            lists
        )));
    }
    if html.len() < MIN_DETAIL_LEN {
        return Err(RenderError::ValidationFailed(format!(
            "page too short: {} bytes (minimum {})",
            html.len(),
            MIN_DETAIL_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::model::CanonicalHeading;
    use crate::render::testutil::sample_record;

    #[test]
    fn detail_has_six_headings_in_order() {
        let cfg = test_config();
        let html = detail(&sample_record("corporate-broker", "Corporate Broker"), &cfg).unwrap();
        let mut last = 0;
        for h in CanonicalHeading::ALL {
            let needle = format!(">{}</h2>", escape_html(h.title()));
            let pos = html.find(&needle).unwrap_or_else(|| panic!("missing {}", h.title()));
            assert!(pos > last, "{} out of order", h.title());
            last = pos;
        }
        assert_eq!(html.matches("<ul>").count(), 3);
    }

    #[test]
    fn detail_links_are_absolute() {
        let cfg = test_config();
        let html = detail(&sample_record("corporate-broker", "Corporate Broker"), &cfg).unwrap();
        assert!(html.contains("href=\"/careers/\""));
        assert!(!html.contains("href=\"index.html\""));
    }

    #[test]
    fn detail_location_intact() {
        let cfg = test_config();
        let html = detail(&sample_record("corporate-broker", "Corporate Broker"), &cfg).unwrap();
        assert!(html.contains("St. George, Utah"));
    }

    #[test]
    fn truncated_record_fails_validation() {
        let cfg = test_config();
        let mut record = sample_record("x", "X");
        record.sections.truncate(4);
        assert!(matches!(
            detail(&record, &cfg),
            Err(RenderError::ValidationFailed(_))
        ));
    }

    #[test]
    fn landing_cards_use_absolute_prefix() {
        let cfg = test_config();
        let html = landing(&[sample_record("corporate-broker", "Corporate Broker")], &cfg);
        assert!(html.contains("href=\"/careers/corporate-broker.html\""));
        assert!(html.contains("1 position available"));
    }

    #[test]
    fn landing_empty_state() {
        let cfg = test_config();
        let html = landing(&[], &cfg);
        assert!(html.contains("no-jobs"));
        assert!(html.contains("0 positions available"));
    }

    #[test]
    fn landing_culture_block_from_config() {
        let cfg = test_config();
        let html = landing(&[], &cfg);
        assert!(html.contains("We create trust in global trade."));
        assert!(html.contains("Reach Everyone"));
    }

    #[test]
    fn titles_escaped() {
        let cfg = test_config();
        let html = landing(&[sample_record("x", "Broker <Senior> & Co")], &cfg);
        assert!(html.contains("Broker &lt;Senior&gt; &amp; Co"));
    }

    #[test]
    fn deterministic() {
        let cfg = test_config();
        let record = sample_record("a", "A");
        assert_eq!(detail(&record, &cfg).unwrap(), detail(&record, &cfg).unwrap());
    }
}

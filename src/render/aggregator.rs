use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::warn;

use crate::config::SiteConfig;
use crate::error::RenderError;
use crate::model::JobRecord;

use super::rss::text_el;
use super::{aggregator_job_type, split_location, RenderIssue};

const BULLET_SEP: &str = "; ";

/// Aggregator (Indeed-style) XML: `<source>` root, one `<job>` per record,
/// location split into city/state/country, employment type mapped through a
/// closed vocabulary. A record with an unmapped type is excluded from this
/// format only and reported as an issue; nothing is guessed.
pub fn render(
    records: &[JobRecord],
    cfg: &SiteConfig,
) -> Result<(String, Vec<RenderIssue>), RenderError> {
    let mut issues = Vec::new();
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("source")))?;

    writer.write_event(Event::Start(BytesStart::new("publisher")))?;
    text_el(&mut writer, "name", &cfg.company_name)?;
    writer.write_event(Event::End(BytesEnd::new("publisher")))?;
    text_el(&mut writer, "publisherurl", &cfg.company_url)?;
    if let Some(last) = records.iter().map(|r| r.scraped_at).max() {
        text_el(&mut writer, "lastBuildDate", &last.format("%Y-%m-%d").to_string())?;
    }

    for record in records {
        let Some(job_type) = aggregator_job_type(&record.employment_type) else {
            warn!(
                id = %record.id,
                employment_type = %record.employment_type,
                "employment type not in aggregator vocabulary; job excluded from this feed"
            );
            issues.push(RenderIssue {
                id: record.id.clone(),
                error: RenderError::UnmappedEnum {
                    id: record.id.clone(),
                    employment_type: record.employment_type.clone(),
                },
            });
            continue;
        };

        let loc = split_location(&record.location);
        writer.write_event(Event::Start(BytesStart::new("job")))?;
        text_el(&mut writer, "title", &record.title)?;
        text_el(&mut writer, "date", &record.scraped_at.format("%Y-%m-%d").to_string())?;
        text_el(&mut writer, "referencenumber", &record.id)?;
        text_el(&mut writer, "url", &record.url)?;
        text_el(&mut writer, "company", &cfg.company_name)?;
        text_el(&mut writer, "city", &loc.city)?;
        text_el(&mut writer, "state", &loc.region)?;
        text_el(&mut writer, "country", &loc.country)?;
        text_el(&mut writer, "description", &record.description_text(BULLET_SEP))?;
        text_el(&mut writer, "jobtype", job_type)?;
        writer.write_event(Event::End(BytesEnd::new("job")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("source")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok((String::from_utf8(bytes)?, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::render::testutil::sample_record;

    #[test]
    fn maps_location_and_type() {
        let records = vec![sample_record("corporate-broker", "Corporate Broker")];
        let (xml, issues) = render(&records, &test_config()).unwrap();
        assert!(issues.is_empty());
        assert!(xml.contains("<city>St. George</city>"));
        assert!(xml.contains("<state>Utah</state>"));
        assert!(xml.contains("<country>US</country>"));
        assert!(xml.contains("<jobtype>fulltime</jobtype>"));
        assert!(xml.contains("<referencenumber>corporate-broker</referencenumber>"));
    }

    #[test]
    fn unmapped_type_excluded_with_issue() {
        let mut odd = sample_record("odd", "Odd Role");
        odd.employment_type = "Fractional".into();
        let records = vec![sample_record("ok", "Ok Role"), odd];
        let (xml, issues) = render(&records, &test_config()).unwrap();
        assert_eq!(xml.matches("<job>").count(), 1);
        assert!(!xml.contains("Odd Role"));
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0].error, RenderError::UnmappedEnum { .. }));
    }

    #[test]
    fn empty_input_still_valid() {
        let (xml, issues) = render(&[], &test_config()).unwrap();
        assert!(issues.is_empty());
        assert!(xml.contains("<source>"));
        assert!(!xml.contains("<job>"));
    }

    #[test]
    fn deterministic() {
        let records = vec![sample_record("a", "A")];
        let cfg = test_config();
        assert_eq!(render(&records, &cfg).unwrap().0, render(&records, &cfg).unwrap().0);
    }
}

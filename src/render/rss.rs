use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::SiteConfig;
use crate::error::RenderError;
use crate::model::JobRecord;

const BULLET_SEP: &str = "; ";

/// RSS 2.0 feed: one item per record, required fields
/// title/link/description/pubDate/guid. Valid for any input including the
/// empty list, and byte-deterministic for a fixed record list.
pub fn render(records: &[JobRecord], cfg: &SiteConfig) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_el(&mut writer, "title", &format!("{} Jobs", cfg.company_name))?;
    text_el(&mut writer, "link", &cfg.company_url)?;
    text_el(
        &mut writer,
        "description",
        &format!("Current job openings at {}", cfg.company_name),
    )?;
    text_el(&mut writer, "language", "en-us")?;
    // lastBuildDate tracks the newest record so output stays a pure function
    // of its input; an empty channel simply omits it.
    if let Some(last) = records.iter().map(|r| r.scraped_at).max() {
        text_el(&mut writer, "lastBuildDate", &last.to_rfc2822())?;
    }

    for record in records {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_el(&mut writer, "title", &record.title)?;
        text_el(&mut writer, "link", &record.url)?;
        text_el(&mut writer, "description", &record.description_text(BULLET_SEP))?;
        text_el(&mut writer, "pubDate", &record.scraped_at.to_rfc2822())?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&record.url)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8(bytes)?)
}

pub(super) fn text_el<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

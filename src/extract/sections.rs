use crate::error::ExtractError;
use crate::model::{CanonicalHeading, Section, SectionBody};

use super::blocks::Block;

/// One step of the recognition walk over the block stream.
#[derive(Debug)]
enum Recognized<'a> {
    Heading(CanonicalHeading),
    Body(&'a Block),
}

#[derive(Debug)]
pub struct SectionSplit {
    /// Paragraphs appearing before the first recognized heading.
    pub intro: Vec<String>,
    /// Recognized sections in discovered (already validated) order.
    pub sections: Vec<Section>,
}

/// Split a block stream into intro + the six canonical sections.
///
/// Fails with `MissingSection` when fewer than six canonical headings are
/// recognized, `UnexpectedOrder` when they appear out of canonical order.
/// Nothing is truncated or reordered on violation; the posting is rejected.
pub fn split_sections(blocks: &[Block]) -> Result<SectionSplit, ExtractError> {
    let walk: Vec<Recognized> = blocks
        .iter()
        .map(|b| match recognize_heading(b) {
            Some(h) => Recognized::Heading(h),
            None => Recognized::Body(b),
        })
        .collect();

    let discovered: Vec<CanonicalHeading> = walk
        .iter()
        .filter_map(|r| match r {
            Recognized::Heading(h) => Some(*h),
            Recognized::Body(_) => None,
        })
        .collect();
    validate_order(&discovered)?;

    let mut intro = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<(CanonicalHeading, Vec<&Block>)> = None;

    for step in &walk {
        match step {
            Recognized::Heading(h) => {
                if let Some((heading, body)) = current.take() {
                    sections.push(build_section(heading, &body));
                }
                current = Some((*h, Vec::new()));
            }
            Recognized::Body(block) => match &mut current {
                Some((_, body)) => body.push(block),
                // Before the first recognized heading: paragraphs feed the
                // intro; page title and other headings are not intro text.
                None => {
                    if let Block::Paragraph(text) = block {
                        intro.push(text.clone());
                    }
                }
            },
        }
    }
    if let Some((heading, body)) = current.take() {
        sections.push(build_section(heading, &body));
    }

    Ok(SectionSplit { intro, sections })
}

/// A heading block, or a short paragraph whose whole text is a canonical
/// heading, counts as a recognized header.
fn recognize_heading(block: &Block) -> Option<CanonicalHeading> {
    match block {
        Block::Heading(text) => CanonicalHeading::match_text(text),
        Block::Paragraph(text) if text.len() <= 60 => CanonicalHeading::match_text(text),
        _ => None,
    }
}

fn validate_order(discovered: &[CanonicalHeading]) -> Result<(), ExtractError> {
    for window in discovered.windows(2) {
        let (prev, next) = (window[0], window[1]);
        if next.position() <= prev.position() {
            let expected = CanonicalHeading::ALL[(prev.position() + 1).min(5)];
            return Err(ExtractError::UnexpectedOrder {
                expected,
                found: next,
            });
        }
    }
    if let Some(missing) = CanonicalHeading::ALL
        .iter()
        .find(|h| !discovered.contains(h))
    {
        return Err(ExtractError::MissingSection(*missing));
    }
    Ok(())
}

/// Any bullet markup in the body makes the section a bullet list; otherwise
/// its paragraphs join into one text body. Unrecognized sub-headings inside
/// a body are kept as text rather than lost.
fn build_section(heading: CanonicalHeading, body: &[&Block]) -> Section {
    let mut bullets: Vec<String> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    for block in body {
        match block {
            Block::Bullets(items) => bullets.extend(items.iter().cloned()),
            Block::Paragraph(text) | Block::Heading(text) => paragraphs.push(text.clone()),
        }
    }
    let body = if !bullets.is_empty() {
        SectionBody::Bullets(bullets)
    } else {
        SectionBody::Paragraph(paragraphs.join(" "))
    };
    Section { heading, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(h: CanonicalHeading) -> Block {
        Block::Heading(h.title().to_string())
    }

    fn full_posting_blocks() -> Vec<Block> {
        vec![
            Block::Heading("Corporate Broker".into()),
            Block::Paragraph("Join our brokerage team.".into()),
            heading(CanonicalHeading::AboutTheRole),
            Block::Paragraph("You will broker.".into()),
            heading(CanonicalHeading::WhatYoullWorkOn),
            Block::Bullets(vec!["Clearing entries".into(), "Filing".into()]),
            heading(CanonicalHeading::WhyThisRoleIsDifferent),
            Block::Paragraph("Because it is.".into()),
            heading(CanonicalHeading::WhatWereLookingFor),
            Block::Paragraph("A broker.".into()),
            heading(CanonicalHeading::Required),
            Block::Bullets(vec!["License".into()]),
            heading(CanonicalHeading::WhatWeOffer),
            Block::Bullets(vec!["Benefits".into()]),
        ]
    }

    #[test]
    fn full_posting_splits_into_six() {
        let split = split_sections(&full_posting_blocks()).unwrap();
        assert_eq!(split.intro, vec!["Join our brokerage team.".to_string()]);
        assert_eq!(split.sections.len(), 6);
        let headings: Vec<_> = split.sections.iter().map(|s| s.heading).collect();
        assert_eq!(headings, CanonicalHeading::ALL.to_vec());
        assert_eq!(
            split.sections.iter().filter(|s| s.body.is_bullets()).count(),
            3
        );
    }

    #[test]
    fn missing_heading_rejected() {
        let mut blocks = full_posting_blocks();
        blocks.retain(|b| *b != heading(CanonicalHeading::Required));
        match split_sections(&blocks) {
            Err(ExtractError::MissingSection(h)) => assert_eq!(h, CanonicalHeading::Required),
            other => panic!("expected MissingSection, got {:?}", other),
        }
    }

    #[test]
    fn out_of_order_rejected() {
        let blocks = vec![
            heading(CanonicalHeading::WhatWeOffer),
            heading(CanonicalHeading::AboutTheRole),
        ];
        assert!(matches!(
            split_sections(&blocks),
            Err(ExtractError::UnexpectedOrder { .. })
        ));
    }

    #[test]
    fn heading_rendered_as_short_paragraph_recognized() {
        let mut blocks = full_posting_blocks();
        blocks[2] = Block::Paragraph("About the Role".into());
        let split = split_sections(&blocks).unwrap();
        assert_eq!(split.sections.len(), 6);
    }

    #[test]
    fn intro_excludes_page_title() {
        let split = split_sections(&full_posting_blocks()).unwrap();
        assert!(!split.intro.iter().any(|p| p.contains("Corporate Broker")));
    }
}

//! Flat-XML sidecar encoder (`ComicInfo.xml`)

use super::{join_sorted, sorted_pages, write_opt_element, write_text_element, Encoder};
use crate::error::EncodeError;
use crate::types::{Metadata, PageType};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;

/// Encoder for the flat `ComicInfo.xml` schema
pub struct ComicInfoEncoder;

impl ComicInfoEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ComicInfoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for ComicInfoEncoder {
    fn encode(&self, metadata: &Metadata, writer: &mut dyn Write) -> Result<(), EncodeError> {
        metadata.validate()?;

        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("ComicInfo");
        root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
        root.push_attribute(("xmlns:xsd", "http://www.w3.org/2001/XMLSchema"));
        xml.write_event(Event::Start(root))?;

        if let Some(title) = &metadata.issue.title {
            write_opt_element(&mut xml, "Title", title)?;
        }
        write_text_element(&mut xml, "Series", &metadata.series.title)?;
        write_text_element(&mut xml, "Number", &metadata.issue.number)?;
        write_text_element(&mut xml, "Volume", &metadata.series.volume.to_string())?;

        if let Some(summary) = &metadata.issue.summary {
            write_opt_element(&mut xml, "Summary", summary)?;
        }
        if let Some(notes) = &metadata.notes {
            write_opt_element(&mut xml, "Notes", notes)?;
        }
        if let Some(date) = metadata.issue.cover_date {
            use chrono::Datelike;
            write_text_element(&mut xml, "Year", &date.year().to_string())?;
            write_text_element(&mut xml, "Month", &date.month().to_string())?;
            write_text_element(&mut xml, "Day", &date.day().to_string())?;
        }

        for (tag, role) in crate::decoder::ROLE_COLUMNS {
            let names = metadata
                .issue
                .creators
                .iter()
                .filter(|creator| creator.roles.contains(&role))
                .map(|creator| creator.name.clone());
            write_opt_element(&mut xml, tag, &join_sorted(names))?;
        }

        write_opt_element(&mut xml, "Publisher", &metadata.publisher.title)?;
        if let Some(imprint) = &metadata.publisher.imprint {
            write_opt_element(&mut xml, "Imprint", imprint)?;
        }
        write_opt_element(
            &mut xml,
            "Genre",
            &join_sorted(metadata.issue.genres.iter().map(|genre| genre.to_string())),
        )?;
        if metadata.issue.page_count > 0 {
            write_text_element(&mut xml, "PageCount", &metadata.issue.page_count.to_string())?;
        }
        write_opt_element(&mut xml, "LanguageISO", &metadata.issue.language)?;
        write_text_element(&mut xml, "Format", &metadata.issue.format.to_string())?;
        write_opt_element(
            &mut xml,
            "Characters",
            &join_sorted(metadata.issue.characters.iter().cloned()),
        )?;
        write_opt_element(
            &mut xml,
            "Teams",
            &join_sorted(metadata.issue.teams.iter().cloned()),
        )?;
        write_opt_element(
            &mut xml,
            "Locations",
            &join_sorted(metadata.issue.locations.iter().cloned()),
        )?;
        write_opt_element(
            &mut xml,
            "StoryArc",
            &join_sorted(metadata.issue.story_arcs.iter().map(|arc| arc.title.clone())),
        )?;

        let pages = sorted_pages(metadata);
        if !pages.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("Pages")))?;
            for page in &pages {
                let mut element = BytesStart::new("Page");
                element.push_attribute(("Image", page.index.to_string().as_str()));
                if page.page_type != PageType::Story {
                    element.push_attribute(("Type", page.page_type.to_string().as_str()));
                }
                if page.double_page {
                    element.push_attribute(("DoublePage", "true"));
                }
                if let Some(size) = page.size {
                    element.push_attribute(("ImageSize", size.to_string().as_str()));
                }
                if let Some(width) = page.width {
                    element.push_attribute(("ImageWidth", width.to_string().as_str()));
                }
                if let Some(height) = page.height {
                    element.push_attribute(("ImageHeight", height.to_string().as_str()));
                }
                if let Some(key) = &page.key {
                    element.push_attribute(("Key", key.as_str()));
                }
                if let Some(bookmark) = &page.bookmark {
                    element.push_attribute(("Bookmark", bookmark.as_str()));
                }
                xml.write_event(Event::Empty(element))?;
            }
            xml.write_event(Event::End(BytesEnd::new("Pages")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("ComicInfo")))?;

        writer.write_all(&xml.into_inner())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn format_name(&self) -> &str {
        "ComicInfo"
    }

    fn sidecar_name(&self) -> &str {
        "ComicInfo.xml"
    }
}

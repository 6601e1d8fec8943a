//! Nested-XML sidecar encoder (`MetronInfo.xml`)

use super::{sorted_pages, write_opt_element, write_text_element, Encoder};
use crate::error::EncodeError;
use crate::naming::natural_sort;
use crate::types::{Metadata, PageType, Source};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Encoder for the nested `MetronInfo.xml` schema
pub struct MetronInfoEncoder;

impl MetronInfoEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetronInfoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// The single source whose per-entity ids this file surfaces: the first
/// service, in stable key order, that identified the issue, falling back to
/// the series and then the publisher.
fn primary_source(metadata: &Metadata) -> Option<Source> {
    metadata
        .issue
        .sources
        .keys()
        .chain(metadata.series.sources.keys())
        .chain(metadata.publisher.sources.keys())
        .next()
        .copied()
}

fn resource_start(name: &str, id: Option<i64>) -> BytesStart<'static> {
    let mut element = BytesStart::new(name.to_string());
    if let Some(id) = id {
        element.push_attribute(("id", id.to_string().as_str()));
    }
    element
}

fn write_string_list<W: Write>(
    writer: &mut Writer<W>,
    wrapper: &str,
    child: &str,
    values: impl IntoIterator<Item = String>,
) -> Result<(), EncodeError> {
    let mut values: Vec<String> = values.into_iter().collect();
    if values.is_empty() {
        return Ok(());
    }
    natural_sort(&mut values);
    writer.write_event(Event::Start(BytesStart::new(wrapper.to_string())))?;
    for value in &values {
        write_text_element(writer, child, value)?;
    }
    writer.write_event(Event::End(BytesEnd::new(wrapper.to_string())))?;
    Ok(())
}

impl Encoder for MetronInfoEncoder {
    fn encode(&self, metadata: &Metadata, writer: &mut dyn Write) -> Result<(), EncodeError> {
        metadata.validate()?;

        let primary = primary_source(metadata);
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::Start(BytesStart::new("MetronInfo")))?;

        if let Some(source) = primary {
            let mut id_element = BytesStart::new("ID");
            id_element.push_attribute(("source", source.to_string().as_str()));
            xml.write_event(Event::Start(id_element))?;
            if let Some(id) = metadata.issue.sources.get(&source) {
                xml.write_event(Event::Text(BytesText::new(&id.to_string())))?;
            }
            xml.write_event(Event::End(BytesEnd::new("ID")))?;
        }

        let publisher_id = primary.and_then(|source| metadata.publisher.sources.get(&source));
        xml.write_event(Event::Start(resource_start("Publisher", publisher_id.copied())))?;
        write_text_element(&mut xml, "Name", &metadata.publisher.title)?;
        if let Some(imprint) = &metadata.publisher.imprint {
            write_opt_element(&mut xml, "Imprint", imprint)?;
        }
        xml.write_event(Event::End(BytesEnd::new("Publisher")))?;

        let series_id = primary.and_then(|source| metadata.series.sources.get(&source));
        xml.write_event(Event::Start(resource_start("Series", series_id.copied())))?;
        write_text_element(&mut xml, "Name", &metadata.series.title)?;
        write_text_element(&mut xml, "Volume", &metadata.series.volume.to_string())?;
        write_text_element(&mut xml, "Format", metadata.issue.format.nested_name())?;
        if let Some(year) = metadata.series.start_year {
            write_text_element(&mut xml, "StartYear", &year.to_string())?;
        }
        xml.write_event(Event::End(BytesEnd::new("Series")))?;

        write_text_element(&mut xml, "Number", &metadata.issue.number)?;
        if let Some(title) = &metadata.issue.title {
            write_opt_element(&mut xml, "CollectionTitle", title)?;
        }
        if let Some(summary) = &metadata.issue.summary {
            write_opt_element(&mut xml, "Summary", summary)?;
        }
        if let Some(date) = metadata.issue.cover_date {
            write_text_element(&mut xml, "CoverDate", &date.format("%Y-%m-%d").to_string())?;
        }
        if let Some(date) = metadata.issue.store_date {
            write_text_element(&mut xml, "StoreDate", &date.format("%Y-%m-%d").to_string())?;
        }
        if metadata.issue.page_count > 0 {
            write_text_element(&mut xml, "PageCount", &metadata.issue.page_count.to_string())?;
        }
        write_opt_element(&mut xml, "Language", &metadata.issue.language)?;

        write_string_list(
            &mut xml,
            "Genres",
            "Genre",
            metadata.issue.genres.iter().map(|genre| genre.to_string()),
        )?;
        write_string_list(
            &mut xml,
            "Characters",
            "Character",
            metadata.issue.characters.iter().cloned(),
        )?;
        write_string_list(&mut xml, "Teams", "Team", metadata.issue.teams.iter().cloned())?;
        write_string_list(
            &mut xml,
            "Locations",
            "Location",
            metadata.issue.locations.iter().cloned(),
        )?;

        if !metadata.issue.story_arcs.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("Arcs")))?;
            for arc in &metadata.issue.story_arcs {
                xml.write_event(Event::Start(BytesStart::new("Arc")))?;
                write_text_element(&mut xml, "Name", &arc.title)?;
                if let Some(number) = arc.number {
                    write_text_element(&mut xml, "Number", &number.to_string())?;
                }
                xml.write_event(Event::End(BytesEnd::new("Arc")))?;
            }
            xml.write_event(Event::End(BytesEnd::new("Arcs")))?;
        }

        if !metadata.issue.creators.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("Credits")))?;
            for creator in &metadata.issue.creators {
                xml.write_event(Event::Start(BytesStart::new("Credit")))?;
                write_text_element(&mut xml, "Creator", &creator.name)?;
                xml.write_event(Event::Start(BytesStart::new("Roles")))?;
                for role in &creator.roles {
                    write_text_element(&mut xml, "Role", &role.to_string())?;
                }
                xml.write_event(Event::End(BytesEnd::new("Roles")))?;
                xml.write_event(Event::End(BytesEnd::new("Credit")))?;
            }
            xml.write_event(Event::End(BytesEnd::new("Credits")))?;
        }

        let pages = sorted_pages(metadata);
        if !pages.is_empty() {
            xml.write_event(Event::Start(BytesStart::new("Pages")))?;
            for page in &pages {
                let mut element = BytesStart::new("Page");
                element.push_attribute(("image", page.index.to_string().as_str()));
                if page.page_type != PageType::Story {
                    element.push_attribute(("type", page.page_type.to_string().as_str()));
                }
                if page.double_page {
                    element.push_attribute(("doublePage", "true"));
                }
                if let Some(size) = page.size {
                    element.push_attribute(("size", size.to_string().as_str()));
                }
                if let Some(width) = page.width {
                    element.push_attribute(("width", width.to_string().as_str()));
                }
                if let Some(height) = page.height {
                    element.push_attribute(("height", height.to_string().as_str()));
                }
                if let Some(key) = &page.key {
                    element.push_attribute(("key", key.as_str()));
                }
                if let Some(bookmark) = &page.bookmark {
                    element.push_attribute(("bookmark", bookmark.as_str()));
                }
                xml.write_event(Event::Empty(element))?;
            }
            xml.write_event(Event::End(BytesEnd::new("Pages")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("MetronInfo")))?;

        writer.write_all(&xml.into_inner())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn format_name(&self) -> &str {
        "MetronInfo"
    }

    fn sidecar_name(&self) -> &str {
        "MetronInfo.xml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, Publisher, Series};

    #[test]
    fn surfaces_primary_source_ids() {
        let mut publisher = Publisher::new("DC Comics");
        publisher.add_source(Source::Metron, 3);
        let mut series = Series::new("Sandman");
        series.add_source(Source::Metron, 99);
        series.add_source(Source::Comicvine, 777);
        let mut issue = Issue::new("17");
        issue.add_source(Source::Comicvine, 123);
        let metadata = Metadata::new(publisher, series, issue);

        let mut out = Vec::new();
        MetronInfoEncoder::new().encode(&metadata, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Comicvine sorts first among the issue's sources.
        assert!(text.contains(r#"<ID source="Comicvine">123</ID>"#));
        assert!(text.contains(r#"<Series id="777">"#));
        // The publisher has no Comicvine id, so none is surfaced.
        assert!(text.contains("<Publisher>"));
    }

    #[test]
    fn series_format_uses_nested_vocabulary() {
        let metadata = Metadata::new(
            Publisher::new("DC"),
            Series::new("Watchmen"),
            Issue::new("1"),
        );
        let mut out = Vec::new();
        MetronInfoEncoder::new().encode(&metadata, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<Format>Single Issue</Format>"));
    }
}

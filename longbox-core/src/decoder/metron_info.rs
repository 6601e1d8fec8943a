//! Nested-XML sidecar decoder (`MetronInfo.xml`)
//!
//! Entities are wrapped resource elements carrying an optional numeric `id`
//! attribute. The top-level `ID` element names the primary catalog source;
//! per-entity ids belong to that source. Ids from other sources and free-form
//! notes are not representable in this schema.

use super::{attr_value, parse_int, read_text, skip_element, Decoder};
use crate::error::DecodeError;
use crate::types::{
    Creator, Format, Genre, Issue, Metadata, Page, PageType, Publisher, Role, Series, Source,
    StoryArc,
};
use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;
use std::str::FromStr;

/// Decoder for the nested `MetronInfo.xml` schema
pub struct MetronInfoDecoder;

impl MetronInfoDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetronInfoDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for MetronInfoDecoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<Metadata, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        parse(&bytes)
    }

    fn sidecar_name(&self) -> &str {
        "MetronInfo.xml"
    }
}

fn resource_id(element: &BytesStart<'_>) -> Result<Option<i64>, DecodeError> {
    let Some(raw) = attr_value(element, "id")? else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring non-numeric resource id");
            Ok(None)
        }
    }
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, DecodeError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| DecodeError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

fn parse(bytes: &[u8]) -> Result<Metadata, DecodeError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut in_root = false;

    let mut primary: Option<Source> = None;
    let mut issue_id: Option<i64> = None;
    let mut publisher = Publisher::new("");
    let mut publisher_id: Option<i64> = None;
    let mut series_block = SeriesBlock::default();
    let mut issue = Issue::new("");
    let mut pages = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).to_string();
                if !in_root {
                    if name != "MetronInfo" {
                        return Err(DecodeError::MissingElement("MetronInfo".to_string()));
                    }
                    in_root = true;
                    continue;
                }
                match name.as_str() {
                    "ID" => {
                        let source_name = attr_value(&element, "source")?.ok_or_else(|| {
                            DecodeError::MissingElement("ID/@source".to_string())
                        })?;
                        primary = Some(Source::from_str(&source_name)?);
                        let text = read_text(&mut reader, &mut buf)?;
                        if !text.is_empty() {
                            issue_id = Some(parse_int("issue.id", &text)?);
                        }
                    }
                    "Publisher" => {
                        publisher_id = resource_id(&element)?;
                        parse_publisher(&mut reader, &mut publisher)?;
                    }
                    "Series" => {
                        series_block.id = resource_id(&element)?;
                        parse_series(&mut reader, &mut series_block)?;
                    }
                    "Number" => issue.number = read_text(&mut reader, &mut buf)?,
                    "CollectionTitle" => {
                        let text = read_text(&mut reader, &mut buf)?;
                        if !text.is_empty() {
                            issue.title = Some(text);
                        }
                    }
                    "Summary" => {
                        let text = read_text(&mut reader, &mut buf)?;
                        if !text.is_empty() {
                            issue.summary = Some(text);
                        }
                    }
                    "CoverDate" => {
                        issue.cover_date =
                            Some(parse_date("issue.cover_date", &read_text(&mut reader, &mut buf)?)?);
                    }
                    "StoreDate" => {
                        issue.store_date =
                            Some(parse_date("issue.store_date", &read_text(&mut reader, &mut buf)?)?);
                    }
                    "PageCount" => {
                        issue.page_count =
                            parse_int("issue.page_count", &read_text(&mut reader, &mut buf)?)?;
                    }
                    "Language" => {
                        let text = read_text(&mut reader, &mut buf)?;
                        if !text.is_empty() {
                            issue.language = text;
                        }
                    }
                    "Genres" => {
                        issue.genres = parse_string_list(&mut reader, b"Genre")?
                            .iter()
                            .map(|genre| Genre::parse(genre))
                            .collect();
                    }
                    "Characters" => {
                        issue.characters =
                            parse_string_list(&mut reader, b"Character")?.into_iter().collect();
                    }
                    "Teams" => {
                        issue.teams = parse_string_list(&mut reader, b"Team")?.into_iter().collect();
                    }
                    "Locations" => {
                        issue.locations =
                            parse_string_list(&mut reader, b"Location")?.into_iter().collect();
                    }
                    "Arcs" => issue.story_arcs = parse_arcs(&mut reader)?,
                    "Credits" => {
                        let creators = parse_credits(&mut reader)?;
                        issue.set_creators(creators);
                    }
                    "Pages" => pages = parse_pages(&mut reader)?,
                    _ => skip_element(&mut reader, &mut Vec::new())?,
                }
            }
            Event::Empty(element) => {
                if !in_root && element.name().as_ref() == b"MetronInfo" {
                    in_root = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !in_root {
        return Err(DecodeError::MissingElement("MetronInfo".to_string()));
    }

    let mut series = Series::with_details(
        series_block.title.unwrap_or_default(),
        series_block.volume.unwrap_or(1),
        series_block.start_year,
    )?;
    if let Some(format) = series_block.format {
        issue.format = format;
    }

    match primary {
        Some(source) => {
            if let Some(id) = publisher_id {
                publisher.add_source(source, id);
            }
            if let Some(id) = series_block.id {
                series.add_source(source, id);
            }
            if let Some(id) = issue_id {
                issue.add_source(source, id);
            }
        }
        None => {
            if publisher_id.is_some() || series_block.id.is_some() || issue_id.is_some() {
                tracing::warn!("resource ids present without a primary source, ignoring them");
            }
        }
    }

    let mut metadata = Metadata::new(publisher, series, issue);
    metadata.pages = pages;
    Ok(metadata)
}

#[derive(Default)]
struct SeriesBlock {
    id: Option<i64>,
    title: Option<String>,
    volume: Option<u32>,
    start_year: Option<i32>,
    format: Option<Format>,
}

fn parse_publisher(
    reader: &mut Reader<&[u8]>,
    publisher: &mut Publisher,
) -> Result<(), DecodeError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => match element.name().as_ref() {
                b"Name" => publisher.title = read_text(reader, &mut buf)?,
                b"Imprint" => {
                    let text = read_text(reader, &mut buf)?;
                    if !text.is_empty() {
                        publisher.imprint = Some(text);
                    }
                }
                _ => skip_element(reader, &mut Vec::new())?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_series(
    reader: &mut Reader<&[u8]>,
    block: &mut SeriesBlock,
) -> Result<(), DecodeError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => match element.name().as_ref() {
                b"Name" => block.title = Some(read_text(reader, &mut buf)?),
                b"Volume" => {
                    block.volume =
                        Some(parse_int("series.volume", &read_text(reader, &mut buf)?)?);
                }
                b"StartYear" => {
                    block.start_year =
                        Some(parse_int("series.start_year", &read_text(reader, &mut buf)?)?);
                }
                b"Format" => block.format = Some(Format::parse(&read_text(reader, &mut buf)?)),
                _ => skip_element(reader, &mut Vec::new())?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

/// Collect the text of every child element matching `child`, ignoring ids
fn parse_string_list(
    reader: &mut Reader<&[u8]>,
    child: &[u8],
) -> Result<Vec<String>, DecodeError> {
    let mut buf = Vec::new();
    let mut values = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                if element.name().as_ref() == child {
                    let text = read_text(reader, &mut buf)?;
                    if !text.is_empty() {
                        values.push(text);
                    }
                } else {
                    skip_element(reader, &mut Vec::new())?;
                }
            }
            Event::End(_) => return Ok(values),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_arcs(reader: &mut Reader<&[u8]>) -> Result<Vec<StoryArc>, DecodeError> {
    let mut buf = Vec::new();
    let mut arcs = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                if element.name().as_ref() == b"Arc" {
                    arcs.push(parse_arc(reader)?);
                } else {
                    skip_element(reader, &mut Vec::new())?;
                }
            }
            Event::End(_) => return Ok(arcs),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_arc(reader: &mut Reader<&[u8]>) -> Result<StoryArc, DecodeError> {
    let mut buf = Vec::new();
    let mut arc = StoryArc::new("", None);
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => match element.name().as_ref() {
                b"Name" => arc.title = read_text(reader, &mut buf)?,
                b"Number" => {
                    arc.number = Some(parse_int("story_arc.number", &read_text(reader, &mut buf)?)?);
                }
                _ => skip_element(reader, &mut Vec::new())?,
            },
            Event::End(_) => return Ok(arc),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_credits(reader: &mut Reader<&[u8]>) -> Result<Vec<Creator>, DecodeError> {
    let mut buf = Vec::new();
    let mut creators = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                if element.name().as_ref() == b"Credit" {
                    creators.push(parse_credit(reader)?);
                } else {
                    skip_element(reader, &mut Vec::new())?;
                }
            }
            Event::End(_) => return Ok(creators),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_credit(reader: &mut Reader<&[u8]>) -> Result<Creator, DecodeError> {
    let mut buf = Vec::new();
    let mut creator = Creator::new("", []);
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => match element.name().as_ref() {
                b"Creator" => creator.name = read_text(reader, &mut buf)?,
                b"Roles" => {
                    for role in parse_string_list(reader, b"Role")? {
                        creator.add_role(Role::parse(&role));
                    }
                }
                _ => skip_element(reader, &mut Vec::new())?,
            },
            Event::End(_) => return Ok(creator),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_pages(reader: &mut Reader<&[u8]>) -> Result<Vec<Page>, DecodeError> {
    let mut buf = Vec::new();
    let mut pages = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                if element.name().as_ref() == b"Page" {
                    let page = parse_page(&element)?;
                    skip_element(reader, &mut Vec::new())?;
                    pages.push(page);
                } else {
                    skip_element(reader, &mut Vec::new())?;
                }
            }
            Event::Empty(element) => {
                if element.name().as_ref() == b"Page" {
                    pages.push(parse_page(&element)?);
                }
            }
            Event::End(_) => return Ok(pages),
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_page(element: &BytesStart<'_>) -> Result<Page, DecodeError> {
    let index = attr_value(element, "image")?
        .ok_or_else(|| DecodeError::MissingElement("Page/@image".to_string()))?;
    let mut page = Page::new(parse_int("page.index", &index)?);

    if let Some(raw) = attr_value(element, "type")? {
        page.page_type = PageType::parse(&raw);
    }
    if let Some(raw) = attr_value(element, "doublePage")? {
        page.double_page = raw.eq_ignore_ascii_case("true") || raw == "1";
    }
    if let Some(raw) = attr_value(element, "size")? {
        page.size = Some(parse_int("page.size", &raw)?);
    }
    if let Some(raw) = attr_value(element, "width")? {
        page.width = Some(parse_int("page.width", &raw)?);
    }
    if let Some(raw) = attr_value(element, "height")? {
        page.height = Some(parse_int("page.height", &raw)?);
    }
    page.key = attr_value(element, "key")?;
    page.bookmark = attr_value(element, "bookmark")?;
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> Metadata {
        MetronInfoDecoder::new()
            .decode(&mut xml.as_bytes())
            .expect("decode failed")
    }

    #[test]
    fn decodes_nested_resources() {
        let metadata = decode(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<MetronInfo>
  <ID source="Metron">4821</ID>
  <Publisher id="3"><Name>DC Comics</Name><Imprint>Vertigo</Imprint></Publisher>
  <Series id="99"><Name>Sandman</Name><Volume>2</Volume><Format>Single Issue</Format><StartYear>1989</StartYear></Series>
  <Number>17</Number>
  <CoverDate>1990-07-01</CoverDate>
  <Credits>
    <Credit><Creator id="11">Neil Gaiman</Creator><Roles><Role>Writer</Role></Roles></Credit>
  </Credits>
</MetronInfo>"#,
        );
        assert_eq!(metadata.publisher.title, "DC Comics");
        assert_eq!(metadata.publisher.imprint.as_deref(), Some("Vertigo"));
        assert_eq!(metadata.publisher.sources.get(&Source::Metron), Some(&3));
        assert_eq!(metadata.series.volume, 2);
        assert_eq!(metadata.series.sources.get(&Source::Metron), Some(&99));
        assert_eq!(metadata.issue.sources.get(&Source::Metron), Some(&4821));
        assert_eq!(metadata.issue.format, Format::Series);
        assert_eq!(metadata.issue.creators.len(), 1);
        assert_eq!(metadata.issue.creators[0].roles.len(), 1);
    }

    #[test]
    fn unknown_primary_source_is_fatal() {
        let result = MetronInfoDecoder::new().decode(
            &mut r#"<MetronInfo><ID source="Fan Wiki">1</ID></MetronInfo>"#.as_bytes(),
        );
        assert!(matches!(
            result,
            Err(DecodeError::UnknownSource(name)) if name == "Fan Wiki"
        ));
    }

    #[test]
    fn arcs_carry_numbers() {
        let metadata = decode(
            r#"<MetronInfo><Arcs><Arc><Name>Seasons of Mist</Name><Number>2</Number></Arc></Arcs></MetronInfo>"#,
        );
        assert_eq!(
            metadata.issue.story_arcs,
            vec![StoryArc::new("Seasons of Mist", Some(2))]
        );
    }
}

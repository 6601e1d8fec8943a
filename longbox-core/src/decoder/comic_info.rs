//! Flat-XML sidecar decoder (`ComicInfo.xml`)
//!
//! Every issue-level field is a flat scalar element; multi-valued fields are
//! comma-joined strings. The schema cannot represent store dates, external
//! ids, story-arc numbers or roles outside its seven creator columns.

use super::{attr_value, parse_int, read_text, skip_element, Decoder};
use crate::error::DecodeError;
use crate::naming::natural_cmp;
use crate::types::{
    Creator, Format, Genre, Issue, Metadata, Page, PageType, Publisher, Role, Series, StoryArc,
    MIN_START_YEAR,
};
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

/// The seven creator columns the flat schema supports
pub(crate) const ROLE_COLUMNS: [(&str, Role); 7] = [
    ("Writer", Role::Writer),
    ("Penciller", Role::Penciller),
    ("Inker", Role::Inker),
    ("Colorist", Role::Colourist),
    ("Letterer", Role::Letterer),
    ("CoverArtist", Role::CoverArtist),
    ("Editor", Role::Editor),
];

/// Decoder for the flat `ComicInfo.xml` schema
pub struct ComicInfoDecoder;

impl ComicInfoDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ComicInfoDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ComicInfoDecoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<Metadata, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        parse(&bytes)
    }

    fn sidecar_name(&self) -> &str {
        "ComicInfo.xml"
    }
}

#[derive(Default)]
struct Fields {
    scalars: BTreeMap<String, String>,
    creators: Vec<(Role, String)>,
    pages: Vec<Page>,
}

fn parse(bytes: &[u8]) -> Result<Metadata, DecodeError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut fields = Fields::default();
    let mut in_root = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).to_string();
                if !in_root {
                    if name != "ComicInfo" {
                        return Err(DecodeError::MissingElement("ComicInfo".to_string()));
                    }
                    in_root = true;
                    continue;
                }
                if name == "Pages" {
                    fields.pages = parse_pages(&mut reader)?;
                    continue;
                }
                let text = read_text(&mut reader, &mut buf)?;
                if text.is_empty() {
                    continue;
                }
                if let Some((_, role)) = ROLE_COLUMNS.iter().find(|(tag, _)| *tag == name) {
                    fields.creators.push((*role, text));
                } else {
                    fields.scalars.insert(name, text);
                }
            }
            Event::Empty(element) => {
                if !in_root && element.name().as_ref() == b"ComicInfo" {
                    in_root = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !in_root {
        return Err(DecodeError::MissingElement("ComicInfo".to_string()));
    }
    assemble(fields)
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
            Event::End(_) => break,
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
    Ok(pages)
}

fn parse_page(element: &quick_xml::events::BytesStart<'_>) -> Result<Page, DecodeError> {
    let index = attr_value(element, "Image")?
        .ok_or_else(|| DecodeError::MissingElement("Page/@Image".to_string()))?;
    let mut page = Page::new(parse_int("page.index", &index)?);

    if let Some(raw) = attr_value(element, "Type")? {
        page.page_type = PageType::parse(&raw);
    }
    if let Some(raw) = attr_value(element, "DoublePage")? {
        page.double_page = raw.eq_ignore_ascii_case("true") || raw == "1";
    }
    if let Some(raw) = attr_value(element, "ImageSize")? {
        page.size = Some(parse_int("page.size", &raw)?);
    }
    if let Some(raw) = attr_value(element, "ImageWidth")? {
        page.width = Some(parse_int("page.width", &raw)?);
    }
    if let Some(raw) = attr_value(element, "ImageHeight")? {
        page.height = Some(parse_int("page.height", &raw)?);
    }
    page.key = attr_value(element, "Key")?;
    page.bookmark = attr_value(element, "Bookmark")?;
    Ok(page)
}

fn assemble(fields: Fields) -> Result<Metadata, DecodeError> {
    let scalar = |name: &str| fields.scalars.get(name).map(String::as_str);

    // Legacy files stored the series start year in Volume.
    let mut volume = 1u32;
    let mut start_year = None;
    if let Some(raw) = scalar("Volume") {
        let value: i64 = parse_int("series.volume", raw)?;
        if value > i64::from(MIN_START_YEAR) {
            start_year = Some(value as i32);
        } else if value >= 1 {
            volume = value as u32;
        } else {
            return Err(DecodeError::InvalidValue {
                field: "series.volume",
                value: raw.to_string(),
            });
        }
    }
    let series = Series::with_details(scalar("Series").unwrap_or(""), volume, start_year)?;

    let mut publisher = Publisher::new(scalar("Publisher").unwrap_or(""));
    publisher.imprint = scalar("Imprint").map(str::to_string);

    let mut issue = Issue::new(scalar("Number").unwrap_or(""));
    issue.title = scalar("Title").map(str::to_string);
    issue.format = scalar("Format").map(Format::parse).unwrap_or_default();
    issue.cover_date = cover_date(scalar("Year"), scalar("Month"), scalar("Day"))?;
    if let Some(raw) = scalar("PageCount") {
        issue.page_count = parse_int("issue.page_count", raw)?;
    }
    if let Some(language) = scalar("LanguageISO") {
        issue.language = language.to_string();
    }
    if let Some(raw) = scalar("Genre") {
        issue.genres = super::split_multi(raw)
            .iter()
            .map(|genre| Genre::parse(genre))
            .collect();
    }
    issue.characters = string_set(scalar("Characters"));
    issue.teams = string_set(scalar("Teams"));
    issue.locations = string_set(scalar("Locations"));
    if let Some(raw) = scalar("StoryArc") {
        issue.story_arcs = super::split_multi(raw)
            .into_iter()
            .map(|title| StoryArc::new(title, None))
            .collect();
    }
    issue.summary = scalar("Summary").map(str::to_string);
    issue.set_creators(collect_creators(&fields.creators));

    let mut metadata = Metadata::new(publisher, series, issue);
    metadata.pages = fields.pages;
    metadata.notes = scalar("Notes").map(str::to_string);
    Ok(metadata)
}

fn string_set(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|raw| super::split_multi(raw).into_iter().collect())
        .unwrap_or_default()
}

fn cover_date(
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<Option<NaiveDate>, DecodeError> {
    let Some(year) = year else { return Ok(None) };
    let year: i32 = parse_int("issue.cover_date.year", year)?;
    let month: u32 = month.map(|m| parse_int("issue.cover_date.month", m)).transpose()?.unwrap_or(1);
    let day: u32 = day.map(|d| parse_int("issue.cover_date.day", d)).transpose()?.unwrap_or(1);
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or(DecodeError::InvalidValue {
            field: "issue.cover_date",
            value: format!("{year}-{month}-{day}"),
        })
}

/// Fold the per-role comma-joined columns into per-creator role sets
pub(crate) fn collect_creators(columns: &[(Role, String)]) -> Vec<Creator> {
    let mut by_name: Vec<(String, BTreeSet<Role>)> = Vec::new();
    for (role, joined) in columns {
        for name in super::split_multi(joined) {
            match by_name.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, roles)) => {
                    roles.insert(*role);
                }
                None => {
                    by_name.push((name, BTreeSet::from([*role])));
                }
            }
        }
    }
    by_name.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    by_name
        .into_iter()
        .map(|(name, roles)| Creator { name, roles })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> Metadata {
        ComicInfoDecoder::new()
            .decode(&mut xml.as_bytes())
            .expect("decode failed")
    }

    #[test]
    fn decodes_flat_fields() {
        let metadata = decode(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ComicInfo>
  <Series>Watchmen</Series>
  <Number>1</Number>
  <Publisher>DC Comics</Publisher>
  <Writer>Alan Moore, Dave Gibbons</Writer>
  <Genre>Super-Hero</Genre>
  <PageCount>40</PageCount>
</ComicInfo>"#,
        );
        assert_eq!(metadata.series.title, "Watchmen");
        assert_eq!(metadata.issue.page_count, 40);
        assert_eq!(
            metadata.issue.creators,
            vec![
                Creator::new("Alan Moore", [Role::Writer]),
                Creator::new("Dave Gibbons", [Role::Writer]),
            ]
        );
        assert!(metadata.issue.genres.contains(&Genre::SuperHero));
    }

    #[test]
    fn volume_above_threshold_is_a_start_year() {
        let metadata = decode("<ComicInfo><Series>Watchmen</Series><Volume>1986</Volume></ComicInfo>");
        assert_eq!(metadata.series.volume, 1);
        assert_eq!(metadata.series.start_year, Some(1986));

        let metadata = decode("<ComicInfo><Series>Watchmen</Series><Volume>2</Volume></ComicInfo>");
        assert_eq!(metadata.series.volume, 2);
        assert_eq!(metadata.series.start_year, None);
    }

    #[test]
    fn single_page_still_decodes_as_a_list() {
        let metadata = decode(
            r#"<ComicInfo><Pages><Page Image="0" Type="FrontCover" /></Pages></ComicInfo>"#,
        );
        assert_eq!(metadata.pages.len(), 1);
        assert_eq!(metadata.pages[0].page_type, PageType::FrontCover);
    }

    #[test]
    fn malformed_xml_is_all_or_nothing() {
        let result = ComicInfoDecoder::new().decode(&mut "<ComicInfo><Series>".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_volume() {
        let result =
            ComicInfoDecoder::new().decode(&mut "<ComicInfo><Volume>0</Volume></ComicInfo>".as_bytes());
        assert!(result.is_err());
    }
}

//! Decoders for reading metadata sidecar files into the canonical model
//!
//! Decoding is all-or-nothing: a malformed sidecar yields an error and no
//! partially-populated `Metadata` ever escapes.

mod comic_info;
mod metron_info;
pub(crate) mod native;

pub use comic_info::ComicInfoDecoder;
pub use metron_info::MetronInfoDecoder;
pub use native::NativeDecoder;

pub(crate) use comic_info::ROLE_COLUMNS;

use crate::error::DecodeError;
use crate::types::Metadata;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;

/// Trait for decoding a sidecar format into the canonical model
pub trait Decoder: Send + Sync {
    /// Decode metadata from a reader
    fn decode(&self, reader: &mut dyn Read) -> Result<Metadata, DecodeError>;

    /// Filename this sidecar is stored under inside an archive
    fn sidecar_name(&self) -> &str;
}

/// Get the appropriate decoder for a sidecar filename
pub fn decoder_for_filename(name: &str) -> Option<Box<dyn Decoder>> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    if base.eq_ignore_ascii_case("ComicInfo.xml") {
        Some(Box::new(ComicInfoDecoder::new()))
    } else if base.eq_ignore_ascii_case("MetronInfo.xml") {
        Some(Box::new(MetronInfoDecoder::new()))
    } else if base.eq_ignore_ascii_case("Metadata.json") {
        Some(Box::new(NativeDecoder::new()))
    } else {
        None
    }
}

/// Sidecar filenames in the order they are preferred when an archive carries
/// more than one
pub const SIDECAR_PRIORITY: [&str; 3] = ["Metadata.json", "MetronInfo.xml", "ComicInfo.xml"];

/// Read the text content of the element just opened, up to its end tag
pub(crate) fn read_text(
    reader: &mut Reader<&[u8]>,
    buf: &mut Vec<u8>,
) -> Result<String, DecodeError> {
    let mut content = String::new();
    let mut depth = 0usize;
    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(_) => depth += 1,
            Event::Text(text) => content.push_str(&text.unescape()?),
            Event::CData(data) => content.push_str(&String::from_utf8_lossy(&data)),
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
    Ok(content.trim().to_string())
}

/// Skip everything up to the end tag of the element just opened
pub(crate) fn skip_element(
    reader: &mut Reader<&[u8]>,
    buf: &mut Vec<u8>,
) -> Result<(), DecodeError> {
    let mut depth = 0usize;
    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(());
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(DecodeError::MissingElement(
                    "unexpected end of document".to_string(),
                ))
            }
            _ => {}
        }
    }
}

/// Fetch one attribute of an element by name
pub(crate) fn attr_value(
    element: &BytesStart<'_>,
    name: &str,
) -> Result<Option<String>, DecodeError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| DecodeError::InvalidValue {
            field: "attribute",
            value: err.to_string(),
        })?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value()?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse an integer field, mapping failures to a decode error
pub(crate) fn parse_int<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<T, DecodeError> {
    raw.trim().parse().map_err(|_| DecodeError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

/// Split a comma-joined multi-value field, dropping duplicates and empties
pub(crate) fn split_multi(raw: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() || values.iter().any(|v| v == part) {
            continue;
        }
        values.push(part.to_string());
    }
    crate::naming::natural_sort(&mut values);
    values
}

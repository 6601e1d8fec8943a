//! Encoders for writing the canonical model back out as sidecar files
//!
//! Every encoder checks [`Metadata::validate`] first: a sidecar that could
//! not be placed on disk is never written.

mod comic_info;
mod metron_info;
mod native;

pub use comic_info::ComicInfoEncoder;
pub use metron_info::MetronInfoEncoder;
pub use native::NativeEncoder;

use crate::error::EncodeError;
use crate::naming::natural_sort;
use crate::types::Metadata;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Trait for encoding the canonical model to a sidecar format
pub trait Encoder: Send + Sync {
    /// Encode metadata to a writer
    fn encode(&self, metadata: &Metadata, writer: &mut dyn Write) -> Result<(), EncodeError>;

    /// Human-readable format name
    fn format_name(&self) -> &str;

    /// Filename this sidecar is stored under inside an archive
    fn sidecar_name(&self) -> &str;
}

/// Get an encoder by format name
pub fn encoder_for_format(format: &str) -> Option<Box<dyn Encoder>> {
    match format.to_lowercase().as_str() {
        "comic-info" | "comicinfo" | "comicinfo.xml" => Some(Box::new(ComicInfoEncoder::new())),
        "metron-info" | "metroninfo" | "metroninfo.xml" => {
            Some(Box::new(MetronInfoEncoder::new()))
        }
        "native" | "json" | "metadata.json" => Some(Box::new(NativeEncoder::new())),
        _ => None,
    }
}

/// Write a simple text element
pub(crate) fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    content: &str,
) -> Result<(), EncodeError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(content)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a text element, skipping it entirely when the content is empty
pub(crate) fn write_opt_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    content: &str,
) -> Result<(), EncodeError> {
    if content.is_empty() {
        return Ok(());
    }
    write_text_element(writer, name, content)
}

/// Join multi-valued output in natural order
pub(crate) fn join_sorted(values: impl IntoIterator<Item = String>) -> String {
    let mut values: Vec<String> = values.into_iter().collect();
    natural_sort(&mut values);
    values.join(", ")
}

/// Pages sorted by image index, the order every sidecar lists them in
pub(crate) fn sorted_pages(metadata: &Metadata) -> Vec<crate::types::Page> {
    let mut pages = metadata.pages.clone();
    pages.sort_by_key(|page| page.index);
    pages
}

//! Native JSON sidecar decoder (`Metadata.json`)
//!
//! The canonical model serialised as-is under a `data` key, next to a `meta`
//! envelope recording when and by what the file was written. The only
//! lossless sidecar format.

use super::Decoder;
use crate::error::DecodeError;
use crate::types::Metadata;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// On-disk layout of the native sidecar
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Envelope {
    pub data: Metadata,
    pub meta: MetaEnvelope,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MetaEnvelope {
    /// ISO-8601 timestamp of when the sidecar was generated
    pub date: String,
    pub tool: ToolInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Decoder for the native JSON sidecar
pub struct NativeDecoder;

impl NativeDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for NativeDecoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<Metadata, DecodeError> {
        let envelope: Envelope = serde_json::from_reader(reader)?;
        check_invariants(&envelope.data)?;
        Ok(envelope.data)
    }

    fn sidecar_name(&self) -> &str {
        "Metadata.json"
    }
}

/// The serde derives accept any well-formed JSON; numeric invariants still
/// need the same checks the XML decoders apply.
fn check_invariants(metadata: &Metadata) -> Result<(), DecodeError> {
    use crate::types::{MIN_START_YEAR, MIN_VOLUME};

    if metadata.series.volume < MIN_VOLUME {
        return Err(DecodeError::InvalidValue {
            field: "series.volume",
            value: metadata.series.volume.to_string(),
        });
    }
    if let Some(year) = metadata.series.start_year {
        if year <= MIN_START_YEAR {
            return Err(DecodeError::InvalidValue {
                field: "series.start_year",
                value: year.to_string(),
            });
        }
    }
    Ok(())
}

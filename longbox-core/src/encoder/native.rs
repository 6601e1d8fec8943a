//! Native JSON sidecar encoder (`Metadata.json`)

use super::Encoder;
use crate::decoder::native::{Envelope, MetaEnvelope, ToolInfo};
use crate::error::EncodeError;
use crate::types::Metadata;
use std::io::Write;

/// Name recorded in the sidecar's meta envelope
const TOOL_NAME: &str = "longbox";

/// Encoder for the native JSON sidecar, the only lossless one
pub struct NativeEncoder;

impl NativeEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for NativeEncoder {
    fn encode(&self, metadata: &Metadata, writer: &mut dyn Write) -> Result<(), EncodeError> {
        metadata.validate()?;

        let envelope = Envelope {
            data: metadata.clone(),
            meta: MetaEnvelope {
                date: chrono::Utc::now().to_rfc3339(),
                tool: ToolInfo {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
        };
        serde_json::to_writer_pretty(&mut *writer, &envelope)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn format_name(&self) -> &str {
        "Native"
    }

    fn sidecar_name(&self) -> &str {
        "Metadata.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{Decoder, NativeDecoder};
    use crate::types::{Issue, Publisher, Series};

    #[test]
    fn lossless_round_trip() {
        let metadata = Metadata::new(
            Publisher::new("DC Comics").with_imprint("Vertigo"),
            Series::with_details("Sandman", 2, Some(1989)).unwrap(),
            Issue::new("17").with_title("Calliope"),
        );

        let mut out = Vec::new();
        NativeEncoder::new().encode(&metadata, &mut out).unwrap();
        let decoded = NativeDecoder::new().decode(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, metadata);
    }
}

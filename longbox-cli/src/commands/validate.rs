//! Validate command implementation

use anyhow::{bail, Context, Result};
use longbox_core::archive;
use std::path::Path;

/// Check that an archive carries a decodable, complete metadata sidecar
pub fn validate(path: &Path) -> Result<()> {
    let metadata = archive::read_metadata(path)
        .with_context(|| format!("Failed to decode metadata in {}", path.display()))?;

    let Some(metadata) = metadata else {
        bail!("{} carries no metadata sidecar", path.display());
    };

    if let Err(err) = metadata.validate() {
        bail!("{} has incomplete metadata: {err}", path.display());
    }

    println!(
        "OK: {} #{} ({})",
        metadata.series.title, metadata.issue.number, metadata.issue.format
    );
    Ok(())
}

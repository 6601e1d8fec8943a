//! Organize command implementation

use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use longbox_core::decoder::SIDECAR_PRIORITY;
use longbox_core::encoder::encoder_for_format;
use longbox_core::{archive, naming};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Organize a batch of archives; one failing archive never aborts the rest
pub fn organize(
    archives: &[PathBuf],
    destination: Option<PathBuf>,
    settings: &Settings,
) -> Result<()> {
    let destination = destination
        .or_else(|| settings.destination.clone())
        .context("No destination configured; pass --destination or set one in the settings file")?;

    let mut failures = 0usize;
    for path in archives {
        match organize_one(path, &destination, settings) {
            Ok(target) => println!("{} -> {}", path.display(), target.display()),
            Err(err) => {
                tracing::error!(archive = %path.display(), error = %err, "conversion aborted");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} archives failed", archives.len());
    }
    Ok(())
}

fn organize_one(path: &Path, destination: &Path, settings: &Settings) -> Result<PathBuf> {
    let metadata = archive::read_metadata(path)
        .with_context(|| format!("Failed to read metadata from {}", path.display()))?
        .with_context(|| format!("{} carries no metadata sidecar", path.display()))?;
    metadata
        .validate()
        .context("Metadata is incomplete; fill in the series title and issue number first")?;

    let workdir = tempfile::tempdir().context("Failed to create work directory")?;
    archive::extract(path, workdir.path())
        .with_context(|| format!("Failed to extract {}", path.display()))?;

    // Replace whatever sidecars the archive carried with the configured set.
    remove_sidecars(workdir.path())?;
    for format in &settings.formats {
        let encoder = encoder_for_format(format)
            .with_context(|| format!("Unknown sidecar format: {format}"))?;
        let sidecar = workdir.path().join(encoder.sidecar_name());
        let mut file = File::create(&sidecar)
            .with_context(|| format!("Failed to create {}", sidecar.display()))?;
        encoder
            .encode(&metadata, &mut file)
            .with_context(|| format!("Failed to write {} sidecar", encoder.format_name()))?;
    }

    let target = destination.join(naming::archive_path(&metadata));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    archive::pack(workdir.path(), &target)
        .with_context(|| format!("Failed to repack {}", target.display()))?;

    tracing::info!(from = %path.display(), to = %target.display(), "organized archive");
    Ok(target)
}

fn remove_sidecars(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            remove_sidecars(&path)?;
            continue;
        }
        let is_sidecar = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| {
                SIDECAR_PRIORITY
                    .iter()
                    .any(|sidecar| name.eq_ignore_ascii_case(sidecar))
            })
            .unwrap_or(false);
        if is_sidecar {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

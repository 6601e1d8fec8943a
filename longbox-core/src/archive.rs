//! Comic archive (`.cbz`) handling
//!
//! Extraction and repacking of zip-based comic archives, plus a shortcut for
//! pulling a metadata sidecar straight out of an archive without unpacking
//! the images.

use crate::decoder::{decoder_for_filename, SIDECAR_PRIORITY};
use crate::error::{ArchiveError, LongboxError};
use crate::types::Metadata;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Extract an archive into `dest`, returning the extracted file paths
///
/// Entries that would escape `dest` are skipped with a warning.
pub fn extract(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let mut entries = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!(name = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let out = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut target = File::create(&out)?;
        io::copy(&mut entry, &mut target)?;
        entries.push(out);
    }

    tracing::debug!(archive = %archive.display(), count = entries.len(), "extracted archive");
    Ok(entries)
}

/// Repack a directory as a `.cbz` at `dest`
///
/// Entries are stored in sorted path order so repacking is deterministic.
pub fn pack(dir: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();

    let out = File::create(dest)?;
    let mut writer = ZipWriter::new(BufWriter::new(out));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = relative.to_string_lossy().replace('\\', "/");
        writer.start_file(name, options)?;
        let mut input = File::open(&path)?;
        io::copy(&mut input, &mut writer)?;
    }
    writer.finish()?;

    tracing::debug!(dest = %dest.display(), "packed archive");
    Ok(())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Read the best metadata sidecar an archive carries, if any
///
/// Sidecars are tried in [`SIDECAR_PRIORITY`] order; filename matching is
/// case-insensitive and ignores leading directories.
pub fn read_metadata(archive: &Path) -> Result<Option<Metadata>, LongboxError> {
    let file = File::open(archive).map_err(ArchiveError::Io)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(ArchiveError::Zip)?;

    for sidecar in SIDECAR_PRIORITY {
        let found = zip
            .file_names()
            .find(|name| {
                name.rsplit('/')
                    .next()
                    .is_some_and(|base| base.eq_ignore_ascii_case(sidecar))
            })
            .map(str::to_string);
        let Some(found) = found else { continue };
        let Some(decoder) = decoder_for_filename(sidecar) else {
            continue;
        };

        let mut entry = zip.by_name(&found).map_err(ArchiveError::Zip)?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(ArchiveError::Io)?;
        let metadata = decoder.decode(&mut bytes.as_slice())?;
        tracing::debug!(archive = %archive.display(), sidecar, "read sidecar");
        return Ok(Some(metadata));
    }
    Ok(None)
}

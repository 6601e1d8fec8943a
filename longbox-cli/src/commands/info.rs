//! Info command implementation

use anyhow::{Context, Result};
use longbox_core::archive;
use std::path::Path;

/// Print the metadata stored in an archive
pub fn info(path: &Path, json: bool) -> Result<()> {
    let metadata = archive::read_metadata(path)
        .with_context(|| format!("Failed to read metadata from {}", path.display()))?
        .with_context(|| format!("{} carries no metadata sidecar", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("Publisher: {}", metadata.publisher.title);
    if let Some(imprint) = &metadata.publisher.imprint {
        println!("Imprint:   {imprint}");
    }
    println!("Series:    {}", metadata.series.title);
    println!("Volume:    {}", metadata.series.volume);
    if let Some(year) = metadata.series.start_year {
        println!("Started:   {year}");
    }
    println!("Number:    {}", metadata.issue.number);
    if let Some(title) = &metadata.issue.title {
        println!("Title:     {title}");
    }
    println!("Format:    {}", metadata.issue.format);
    if let Some(date) = metadata.issue.cover_date {
        println!("Cover:     {}", date.format("%Y-%m-%d"));
    }
    if !metadata.issue.creators.is_empty() {
        println!("Creators:");
        for creator in &metadata.issue.creators {
            let roles = creator
                .roles
                .iter()
                .map(|role| role.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {} ({roles})", creator.name);
        }
    }
    if !metadata.issue.genres.is_empty() {
        let genres = metadata
            .issue
            .genres
            .iter()
            .map(|genre| genre.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("Genres:    {genres}");
    }
    if metadata.issue.page_count > 0 {
        println!("Pages:     {}", metadata.issue.page_count);
    }
    Ok(())
}

//! Filesystem naming: slugs, issue filename suffixes, archive paths
//!
//! Pure functions from canonical fields to path fragments. Nothing here
//! touches the filesystem.

use crate::types::{Format, Metadata};
use regex::Regex;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Words kept fully uppercase instead of title-cased
const ACRONYMS: &[&str] = &["DC", "INC", "LLC", "HC", "TP"];

fn scrub_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9& ]+").unwrap())
}

/// Turn free text into a filesystem-safe, human-readable slug
///
/// Characters outside `[A-Za-z0-9& ]` are stripped, whitespace collapses,
/// words are title-cased (acronyms excepted) and joined with hyphens.
pub fn slugify(text: &str) -> String {
    let cleaned = scrub_re().replace_all(text, " ");
    cleaned
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join("-")
}

fn title_case_word(word: &str) -> String {
    if word == "&" {
        return word.to_string();
    }
    let upper = word.to_ascii_uppercase();
    if ACRONYMS.contains(&upper.as_str()) {
        return upper;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Slug for a series directory; the volume tag appears only past volume 1
pub fn series_slug(title: &str, volume: u32) -> String {
    let slug = slugify(title);
    if volume == 1 {
        slug
    } else {
        format!("{slug}-v{volume}")
    }
}

/// Filename suffix for an issue, applied after the series slug
///
/// Collected editions fall back to their numbered form when the number is
/// not the "0" sentinel or no title exists.
pub fn issue_suffix(number: &str, format: Format, title: Option<&str>) -> String {
    let title = title.filter(|t| !t.trim().is_empty());
    match format {
        Format::Annual => format!("-Annual-#{}", pad_number(number, 2)),
        Format::DigitalChapter => format!("-Chapter-#{}", pad_number(number, 2)),
        Format::Hardcover | Format::TradePaperback => {
            let tag = if format == Format::Hardcover { "HC" } else { "TP" };
            match title {
                Some(t) if number == "0" => format!("-{}-{tag}", slugify(t)),
                _ => format!("-#{}-{tag}", pad_number(number, 2)),
            }
        }
        Format::GraphicNovel => match title {
            Some(t) => format!("-{}", slugify(t)),
            None => format!("-#{}", pad_number(number, 2)),
        },
        _ => format!("-#{}", pad_number(number, 3)),
    }
}

/// Relative path an archive is repacked under:
/// `<publisher>/<series>/<series><suffix>.cbz`
///
/// The imprint, when present, stands in for the publisher directory.
pub fn archive_path(metadata: &Metadata) -> PathBuf {
    let publisher = metadata
        .publisher
        .imprint
        .as_deref()
        .filter(|imprint| !imprint.trim().is_empty())
        .unwrap_or(&metadata.publisher.title);
    let series = series_slug(&metadata.series.title, metadata.series.volume);
    let suffix = issue_suffix(
        &metadata.issue.number,
        metadata.issue.format,
        metadata.issue.title.as_deref(),
    );
    PathBuf::from(slugify(publisher))
        .join(&series)
        .join(format!("{series}{suffix}.cbz"))
}

/// Left-pad an issue number with zeros; non-numeric tails are preserved
/// ("1A" pads to "01A")
fn pad_number(number: &str, width: usize) -> String {
    let len = number.chars().count();
    if len >= width {
        number.to_string()
    } else {
        let mut padded = "0".repeat(width - len);
        padded.push_str(number);
        padded
    }
}

/// Human-friendly ordering: case-insensitive, digit runs compared as numbers
///
/// Applied to multi-valued fields at serialisation time so output order is
/// stable regardless of how values were inserted.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let nx = take_digits(&mut left);
                let ny = take_digits(&mut right);
                match cmp_digit_runs(&nx, &ny) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                let (xl, yl) = (x.to_ascii_lowercase(), y.to_ascii_lowercase());
                if xl != yl {
                    return xl.cmp(&yl);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort strings in place with [`natural_cmp`]
pub fn natural_sort(values: &mut [String]) {
    values.sort_by(|a, b| natural_cmp(a, b));
}

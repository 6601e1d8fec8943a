//! Closed vocabularies used throughout the metadata model
//!
//! Each vocabulary accepts the messy strings found in real sidecar files:
//! matching is case- and punctuation-insensitive, a fixed alias table covers
//! legacy spellings, and anything still unrecognised falls back to a sentinel
//! with a warning. `Source` is the exception: source names are merge keys,
//! so an unknown source is a hard error.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalisation key: lowercase, ASCII alphanumerics only.
fn norm_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Publication format of an issue
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Format {
    Annual,
    #[serde(rename = "Digital Chapter")]
    DigitalChapter,
    #[serde(rename = "Graphic Novel")]
    GraphicNovel,
    Hardcover,
    #[serde(rename = "Limited Series")]
    LimitedSeries,
    Omnibus,
    #[serde(rename = "One-Shot")]
    OneShot,
    #[default]
    Series,
    #[serde(rename = "Trade Paperback")]
    TradePaperback,
}

impl Format {
    /// Parse a raw format string, falling back to the default on anything
    /// unrecognised. Neither sidecar schema has an "unknown" format value.
    pub fn parse(raw: &str) -> Self {
        match norm_key(raw).as_str() {
            "annual" => Format::Annual,
            "digitalchapter" | "digital" | "chapter" => Format::DigitalChapter,
            "graphicnovel" | "gn" => Format::GraphicNovel,
            "hardcover" | "hc" => Format::Hardcover,
            "limitedseries" | "miniseries" => Format::LimitedSeries,
            "omnibus" => Format::Omnibus,
            "oneshot" | "1shot" => Format::OneShot,
            "series" | "comic" | "singleissue" | "ongoingseries" => Format::Series,
            "tradepaperback" | "tpb" | "trade" => Format::TradePaperback,
            _ => {
                tracing::warn!(value = raw, "unrecognised format, using default");
                Format::default()
            }
        }
    }

    /// Name used by the nested sidecar schema, which has no plain
    /// "Series"/"Comic" value.
    pub fn nested_name(&self) -> &'static str {
        match self {
            Format::Series => "Single Issue",
            other => other.as_str(),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Format::Annual => "Annual",
            Format::DigitalChapter => "Digital Chapter",
            Format::GraphicNovel => "Graphic Novel",
            Format::Hardcover => "Hardcover",
            Format::LimitedSeries => "Limited Series",
            Format::Omnibus => "Omnibus",
            Format::OneShot => "One-Shot",
            Format::Series => "Series",
            Format::TradePaperback => "Trade Paperback",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creative role on an issue
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Role {
    Writer,
    Penciller,
    Inker,
    Colourist,
    Letterer,
    #[serde(rename = "Cover Artist")]
    CoverArtist,
    Editor,
    Translator,
    Designer,
    Other,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match norm_key(raw).as_str() {
            "writer" | "script" | "plot" | "story" => Role::Writer,
            "penciller" | "penciler" | "pencils" => Role::Penciller,
            "inker" | "inks" => Role::Inker,
            "colourist" | "colorist" | "colours" | "colors" => Role::Colourist,
            "letterer" | "letters" => Role::Letterer,
            "coverartist" | "cover" | "covers" => Role::CoverArtist,
            "editor" | "edits" => Role::Editor,
            "translator" | "translation" => Role::Translator,
            "designer" | "design" => Role::Designer,
            "other" => Role::Other,
            _ => {
                tracing::warn!(value = raw, "unrecognised role");
                Role::Other
            }
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Role::Writer => "Writer",
            Role::Penciller => "Penciller",
            Role::Inker => "Inker",
            Role::Colourist => "Colourist",
            Role::Letterer => "Letterer",
            Role::CoverArtist => "Cover Artist",
            Role::Editor => "Editor",
            Role::Translator => "Translator",
            Role::Designer => "Designer",
            Role::Other => "Other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Story genre
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Genre {
    Adult,
    Crime,
    Espionage,
    Fantasy,
    Historical,
    Horror,
    Humor,
    Manga,
    Parody,
    Romance,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Sport,
    #[serde(rename = "Super-Hero")]
    SuperHero,
    War,
    Western,
    Other,
}

impl Genre {
    pub fn parse(raw: &str) -> Self {
        match norm_key(raw).as_str() {
            "adult" | "mature" => Genre::Adult,
            "crime" => Genre::Crime,
            "espionage" | "spy" => Genre::Espionage,
            "fantasy" => Genre::Fantasy,
            "historical" | "history" => Genre::Historical,
            "horror" => Genre::Horror,
            "humor" | "humour" | "comedy" => Genre::Humor,
            "manga" => Genre::Manga,
            "parody" => Genre::Parody,
            "romance" => Genre::Romance,
            "sciencefiction" | "scifi" => Genre::ScienceFiction,
            "sport" | "sports" => Genre::Sport,
            "superhero" | "superheroes" => Genre::SuperHero,
            "war" => Genre::War,
            "western" => Genre::Western,
            "other" => Genre::Other,
            _ => {
                tracing::warn!(value = raw, "unrecognised genre");
                Genre::Other
            }
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Genre::Adult => "Adult",
            Genre::Crime => "Crime",
            Genre::Espionage => "Espionage",
            Genre::Fantasy => "Fantasy",
            Genre::Historical => "Historical",
            Genre::Horror => "Horror",
            Genre::Humor => "Humor",
            Genre::Manga => "Manga",
            Genre::Parody => "Parody",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Sport => "Sport",
            Genre::SuperHero => "Super-Hero",
            Genre::War => "War",
            Genre::Western => "Western",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a single page image
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PageType {
    FrontCover,
    InnerCover,
    Roundup,
    #[default]
    Story,
    Advertisement,
    Editorial,
    Letters,
    Preview,
    BackCover,
    Other,
    Deleted,
}

impl PageType {
    pub fn parse(raw: &str) -> Self {
        match norm_key(raw).as_str() {
            "frontcover" => PageType::FrontCover,
            "innercover" => PageType::InnerCover,
            "roundup" => PageType::Roundup,
            "story" => PageType::Story,
            "advertisement" | "advert" | "ad" => PageType::Advertisement,
            "editorial" => PageType::Editorial,
            "letters" => PageType::Letters,
            "preview" => PageType::Preview,
            "backcover" => PageType::BackCover,
            "other" => PageType::Other,
            "deleted" => PageType::Deleted,
            _ => {
                tracing::warn!(value = raw, "unrecognised page type");
                PageType::Other
            }
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            PageType::FrontCover => "FrontCover",
            PageType::InnerCover => "InnerCover",
            PageType::Roundup => "Roundup",
            PageType::Story => "Story",
            PageType::Advertisement => "Advertisement",
            PageType::Editorial => "Editorial",
            PageType::Letters => "Letters",
            PageType::Preview => "Preview",
            PageType::BackCover => "BackCover",
            PageType::Other => "Other",
            PageType::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External catalog service
///
/// Source values key the per-entity external id maps and the merge engine's
/// resolution order, so parsing is strict: there is no sentinel fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Source {
    Comicvine,
    #[serde(rename = "Grand Comics Database")]
    GrandComicsDatabase,
    #[serde(rename = "League of Comic Geeks")]
    LeagueOfComicGeeks,
    Marvel,
    Metron,
}

impl Source {
    fn as_str(&self) -> &'static str {
        match self {
            Source::Comicvine => "Comicvine",
            Source::GrandComicsDatabase => "Grand Comics Database",
            Source::LeagueOfComicGeeks => "League of Comic Geeks",
            Source::Marvel => "Marvel",
            Source::Metron => "Metron",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = DecodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match norm_key(raw).as_str() {
            "comicvine" | "cv" => Ok(Source::Comicvine),
            "grandcomicsdatabase" | "gcd" => Ok(Source::GrandComicsDatabase),
            "leagueofcomicgeeks" | "locg" => Ok(Source::LeagueOfComicGeeks),
            "marvel" => Ok(Source::Marvel),
            "metron" => Ok(Source::Metron),
            _ => Err(DecodeError::UnknownSource(raw.to_string())),
        }
    }
}

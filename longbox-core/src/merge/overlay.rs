//! Sparse per-field contributions from one external service
//!
//! An unset field always means "this service had nothing to add", never
//! "clear the field". The fields are a closed set; there is no string-keyed
//! dispatch anywhere in the merge path.

use crate::types::{Creator, Format, Genre, Source, StoryArc};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Publisher fields a service can contribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherPatch {
    /// Id the service assigns to this publisher
    pub id: Option<i64>,
    pub title: Option<String>,
    pub imprint: Option<String>,
}

/// Series fields a service can contribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesPatch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub volume: Option<u32>,
    pub start_year: Option<i32>,
}

/// Issue fields a service can contribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub id: Option<i64>,
    pub number: Option<String>,
    pub title: Option<String>,
    pub format: Option<Format>,
    pub cover_date: Option<NaiveDate>,
    pub store_date: Option<NaiveDate>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub genres: Option<BTreeSet<Genre>>,
    pub characters: Option<BTreeSet<String>>,
    pub teams: Option<BTreeSet<String>>,
    pub locations: Option<BTreeSet<String>>,
    pub creators: Option<Vec<Creator>>,
    pub story_arcs: Option<Vec<StoryArc>>,
    pub summary: Option<String>,
}

/// Everything one consulted service had to contribute for one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub source: Source,
    pub publisher: PublisherPatch,
    pub series: SeriesPatch,
    pub issue: IssuePatch,
}

impl Overlay {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            publisher: PublisherPatch::default(),
            series: SeriesPatch::default(),
            issue: IssuePatch::default(),
        }
    }
}

//! Issue entity

use super::{Creator, Format, Genre, Source, StoryArc};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

fn default_language() -> String {
    "en".to_string()
}

/// A single comic issue
///
/// The issue number is a string: comic numbering is not purely numeric
/// ("1A", "½", "0"). Collection fields have set semantics, so insertion
/// order never affects equality or serialised output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Issue number as printed on the cover
    pub number: String,

    /// Issue or collection title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publication format
    #[serde(default)]
    pub format: Format,

    /// Cover date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_date: Option<NaiveDate>,

    /// Date the issue reached stores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_date: Option<NaiveDate>,

    /// Number of pages, 0 when unknown
    #[serde(default)]
    pub page_count: u32,

    /// ISO 639-1 language code
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub genres: BTreeSet<Genre>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub characters: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub teams: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub locations: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub story_arcs: Vec<StoryArc>,

    /// Plot summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// External ids, keyed by the catalog service they came from
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<Source, i64>,
}

impl Issue {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: None,
            format: Format::default(),
            cover_date: None,
            store_date: None,
            page_count: 0,
            language: default_language(),
            genres: BTreeSet::new(),
            characters: BTreeSet::new(),
            teams: BTreeSet::new(),
            locations: BTreeSet::new(),
            creators: Vec::new(),
            story_arcs: Vec::new(),
            summary: None,
            sources: BTreeMap::new(),
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the creator list, dropping credits with no roles
    pub fn set_creators(&mut self, creators: impl IntoIterator<Item = Creator>) {
        self.creators = creators
            .into_iter()
            .filter(|creator| {
                if creator.roles.is_empty() {
                    tracing::warn!(name = %creator.name, "dropping creator with no roles");
                    false
                } else {
                    true
                }
            })
            .collect();
    }

    /// Record the id this issue has at an external service
    pub fn add_source(&mut self, source: Source, id: i64) {
        self.sources.insert(source, id);
    }
}

impl Default for Issue {
    fn default() -> Self {
        Issue::new("")
    }
}

//! Publisher entity

use super::Source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A comic publisher, optionally with an imprint
///
/// Identity for merge purposes is the title. External ids in `sources` only
/// accumulate across lookups; nothing ever removes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Publisher {
    /// Publisher name
    pub title: String,

    /// Imprint name, when the issue was published under one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imprint: Option<String>,

    /// External ids, keyed by the catalog service they came from
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<Source, i64>,
}

impl Publisher {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            imprint: None,
            sources: BTreeMap::new(),
        }
    }

    /// Set the imprint
    pub fn with_imprint(mut self, imprint: impl Into<String>) -> Self {
        self.imprint = Some(imprint.into());
        self
    }

    /// Record the id this publisher has at an external service
    pub fn add_source(&mut self, source: Source, id: i64) {
        self.sources.insert(source, id);
    }
}

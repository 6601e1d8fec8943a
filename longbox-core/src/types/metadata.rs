//! The aggregate Metadata type, the unit every codec targets

use super::{Issue, Page, Publisher, Series};
use crate::error::EncodeError;
use serde::{Deserialize, Serialize};

/// Everything known about one comic archive
///
/// One instance exists per archive run: decoded from a sidecar (or built
/// fresh), mutated in place by merge passes, then serialised back before the
/// archive is repacked. Nothing persists beyond that.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub publisher: Publisher,
    pub series: Series,
    pub issue: Issue,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,

    /// Free-form notes carried alongside the structured fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Metadata {
    pub fn new(publisher: Publisher, series: Series, issue: Issue) -> Self {
        Self {
            publisher,
            series,
            issue,
            pages: Vec::new(),
            notes: None,
        }
    }

    /// Encode precondition: refuse to write a sidecar that could not be
    /// placed on disk. Callers may prompt the operator and retry.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.series.title.trim().is_empty() {
            return Err(EncodeError::MissingField("series.title"));
        }
        if self.issue.number.trim().is_empty() {
            return Err(EncodeError::MissingField("issue.number"));
        }
        Ok(())
    }
}

//! Series entity

use super::Source;
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Volume numbers start at 1.
pub const MIN_VOLUME: u32 = 1;

/// A start year below this is assumed to be a volume number that leaked into
/// the wrong field; legacy flat sidecars used Volume for both.
pub const MIN_START_YEAR: i32 = 1900;

fn default_volume() -> u32 {
    MIN_VOLUME
}

/// A comic series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Series {
    /// Series name
    pub title: String,

    /// Volume number, at least 1
    #[serde(default = "default_volume")]
    pub volume: u32,

    /// Year the series started, when known; always after 1900
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,

    /// External ids, keyed by the catalog service they came from
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<Source, i64>,
}

impl Series {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            volume: MIN_VOLUME,
            start_year: None,
            sources: BTreeMap::new(),
        }
    }

    /// Create a series with explicit volume and start year, validating both
    pub fn with_details(
        title: impl Into<String>,
        volume: u32,
        start_year: Option<i32>,
    ) -> Result<Self, DecodeError> {
        let mut series = Series::new(title);
        series.set_volume(volume)?;
        if let Some(year) = start_year {
            series.set_start_year(year)?;
        }
        Ok(series)
    }

    pub fn set_volume(&mut self, volume: u32) -> Result<(), DecodeError> {
        if volume < MIN_VOLUME {
            return Err(DecodeError::InvalidValue {
                field: "series.volume",
                value: volume.to_string(),
            });
        }
        self.volume = volume;
        Ok(())
    }

    pub fn set_start_year(&mut self, year: i32) -> Result<(), DecodeError> {
        if year <= MIN_START_YEAR {
            return Err(DecodeError::InvalidValue {
                field: "series.start_year",
                value: year.to_string(),
            });
        }
        self.start_year = Some(year);
        Ok(())
    }

    /// Record the id this series has at an external service
    pub fn add_source(&mut self, source: Source, id: i64) {
        self.sources.insert(source, id);
    }
}

impl Default for Series {
    fn default() -> Self {
        Series::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_must_be_positive() {
        assert!(Series::with_details("Watchmen", 0, None).is_err());
        assert!(Series::with_details("Watchmen", 1, None).is_ok());
    }

    #[test]
    fn start_year_must_be_plausible() {
        assert!(Series::with_details("Watchmen", 1, Some(3)).is_err());
        let series = Series::with_details("Watchmen", 1, Some(1986)).unwrap();
        assert_eq!(series.start_year, Some(1986));
    }
}

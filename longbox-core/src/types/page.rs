//! Page entity

use super::PageType;
use serde::{Deserialize, Serialize};

/// A single page image inside the archive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Zero-based image index within the archive
    pub index: u32,

    /// Kind of page
    #[serde(default)]
    pub page_type: PageType,

    /// Whether the image spans two physical pages
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub double_page: bool,

    /// Image size in bytes, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Image width in pixels, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Image height in pixels, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Free-form key, used by some readers for panel data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Bookmark label, when the page starts a story or chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
}

impl Page {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            page_type: PageType::default(),
            double_page: false,
            size: None,
            width: None,
            height: None,
            key: None,
            bookmark: None,
        }
    }

    pub fn with_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }
}

//! Longbox Core Library
//!
//! This crate provides the canonical comic metadata model and everything
//! that moves it: sidecar codecs (`ComicInfo.xml`, `MetronInfo.xml`,
//! `Metadata.json`), the multi-source reconciliation engine, slugified
//! naming, and `.cbz` archive handling. Every sidecar format decodes into
//! the same [`Metadata`] type and is encoded back from it.

pub mod archive;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod merge;
pub mod naming;
pub mod services;
pub mod types;

pub use error::{ArchiveError, DecodeError, EncodeError, LongboxError, Result};
pub use types::{
    Creator, Format, Genre, Issue, Metadata, Page, PageType, Publisher, Role, Series, Source,
    StoryArc,
};

//! Codec round-trip tests for longbox-core
//!
//! Each sidecar schema can only carry a subset of the canonical model, so
//! the round-trip contract is: decode(encode(m)) == m restricted to the
//! fields that schema represents.
//!
//! Field loss per schema:
//! - ComicInfo.xml: store date, series start year, external id maps,
//!   story-arc numbers, roles outside the seven creator columns
//! - MetronInfo.xml: free-form notes, ids of every source but the primary
//! - Metadata.json: nothing, the native codec is lossless

use chrono::NaiveDate;
use longbox_core::decoder::{ComicInfoDecoder, Decoder, MetronInfoDecoder, NativeDecoder};
use longbox_core::encoder::{ComicInfoEncoder, Encoder, MetronInfoEncoder, NativeEncoder};
use longbox_core::types::{
    Creator, Format, Genre, Issue, Metadata, Page, PageType, Publisher, Role, Series, Source,
    StoryArc,
};

// =============================================================================
// Fixture
// =============================================================================

/// A metadata instance exercising every field the model has
fn sample_metadata() -> Metadata {
    let mut publisher = Publisher::new("DC Comics").with_imprint("Vertigo");
    publisher.add_source(Source::Metron, 3);

    let mut series = Series::with_details("Sandman", 2, Some(1989)).unwrap();
    series.add_source(Source::Metron, 99);
    series.add_source(Source::Comicvine, 777);

    let mut issue = Issue::new("17").with_title("Calliope");
    issue.add_source(Source::Metron, 4821);
    issue.cover_date = NaiveDate::from_ymd_opt(1990, 7, 1);
    issue.store_date = NaiveDate::from_ymd_opt(1990, 5, 15);
    issue.page_count = 24;
    issue.genres = [Genre::Fantasy, Genre::Horror].into_iter().collect();
    issue.characters = ["Dream".to_string(), "Calliope".to_string()]
        .into_iter()
        .collect();
    issue.teams = ["The Endless".to_string()].into_iter().collect();
    issue.locations = ["The Dreaming".to_string()].into_iter().collect();
    issue.set_creators([
        Creator::new("Kelley Jones", [Role::Penciller, Role::Inker]),
        Creator::new("Neil Gaiman", [Role::Writer]),
        Creator::new("Wanda Beck", [Role::Translator]),
    ]);
    issue.story_arcs = vec![StoryArc::new("Dream Country", Some(3))];
    issue.summary = Some("A captive muse is freed.".to_string());

    let mut metadata = Metadata::new(publisher, series, issue);
    metadata.notes = Some("scanned from the original printing".to_string());
    metadata.pages = vec![
        Page::new(0).with_type(PageType::FrontCover),
        {
            let mut page = Page::new(1);
            page.size = Some(412_133);
            page.width = Some(1920);
            page.height = Some(2951);
            page.bookmark = Some("Chapter 1".to_string());
            page
        },
    ];
    metadata
}

fn round_trip(metadata: &Metadata, encoder: &dyn Encoder, decoder: &dyn Decoder) -> Metadata {
    let mut bytes = Vec::new();
    encoder.encode(metadata, &mut bytes).expect("encode failed");
    decoder.decode(&mut bytes.as_slice()).expect("decode failed")
}

// =============================================================================
// Native codec
// =============================================================================

#[test]
fn native_round_trip_is_lossless() {
    let metadata = sample_metadata();
    let decoded = round_trip(&metadata, &NativeEncoder::new(), &NativeDecoder::new());
    assert_eq!(decoded, metadata);
}

// =============================================================================
// Flat codec
// =============================================================================

/// The sample restricted to what the flat schema can represent
fn flat_expected() -> Metadata {
    let mut expected = sample_metadata();
    expected.publisher.sources.clear();
    expected.series.sources.clear();
    expected.series.start_year = None;
    expected.issue.sources.clear();
    expected.issue.store_date = None;
    // Arc numbers are lost; the comma-joined field is sorted on decode.
    expected.issue.story_arcs = vec![StoryArc::new("Dream Country", None)];
    // Roles outside the seven flat columns disappear, and decoding the
    // per-role columns yields creators in natural name order.
    expected.issue.set_creators([
        Creator::new("Kelley Jones", [Role::Penciller, Role::Inker]),
        Creator::new("Neil Gaiman", [Role::Writer]),
    ]);
    expected
}

#[test]
fn flat_round_trip_restricted_to_representable_fields() {
    let metadata = sample_metadata();
    let decoded = round_trip(&metadata, &ComicInfoEncoder::new(), &ComicInfoDecoder::new());
    assert_eq!(decoded, flat_expected());
}

#[test]
fn flat_round_trip_is_stable() {
    // A second pass through the codec changes nothing further.
    let once = round_trip(
        &sample_metadata(),
        &ComicInfoEncoder::new(),
        &ComicInfoDecoder::new(),
    );
    let twice = round_trip(&once, &ComicInfoEncoder::new(), &ComicInfoDecoder::new());
    assert_eq!(once, twice);
}

#[test]
fn flat_decode_end_to_end() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ComicInfo>
  <Series>Watchmen</Series>
  <Number>1</Number>
  <Writer>Alan Moore, Dave Gibbons</Writer>
  <Genre>Super-Hero</Genre>
  <PageCount>40</PageCount>
</ComicInfo>"#;
    let metadata = ComicInfoDecoder::new()
        .decode(&mut xml.as_bytes())
        .expect("decode failed");

    assert_eq!(
        metadata.issue.creators,
        vec![
            Creator::new("Alan Moore", [Role::Writer]),
            Creator::new("Dave Gibbons", [Role::Writer]),
        ]
    );
    assert_eq!(
        metadata.issue.genres,
        [Genre::SuperHero].into_iter().collect()
    );
    assert_eq!(metadata.issue.page_count, 40);
}

#[test]
fn flat_defaults_apply_when_fields_are_absent() {
    let metadata = ComicInfoDecoder::new()
        .decode(&mut "<ComicInfo><Series>X</Series><Number>1</Number></ComicInfo>".as_bytes())
        .expect("decode failed");
    assert_eq!(metadata.issue.page_count, 0);
    assert_eq!(metadata.series.volume, 1);
    assert_eq!(metadata.issue.language, "en");
    assert_eq!(metadata.issue.format, Format::Series);
}

// =============================================================================
// Nested codec
// =============================================================================

/// The sample restricted to what the nested schema can represent
fn nested_expected() -> Metadata {
    let mut expected = sample_metadata();
    expected.notes = None;
    // Metron is the primary source (first of the issue's sources); ids from
    // every other source are lost.
    expected.series.sources.remove(&Source::Comicvine);
    expected
}

#[test]
fn nested_round_trip_restricted_to_representable_fields() {
    let metadata = sample_metadata();
    let decoded = round_trip(
        &metadata,
        &MetronInfoEncoder::new(),
        &MetronInfoDecoder::new(),
    );
    assert_eq!(decoded, nested_expected());
}

#[test]
fn nested_round_trip_keeps_insertion_order_irrelevant() {
    // The same sets built in a different insertion order encode identically.
    let mut reordered = sample_metadata();
    reordered.issue.characters = ["Calliope".to_string(), "Dream".to_string()]
        .into_iter()
        .collect();
    reordered.issue.genres = [Genre::Horror, Genre::Fantasy].into_iter().collect();

    let mut first = Vec::new();
    let mut second = Vec::new();
    MetronInfoEncoder::new()
        .encode(&sample_metadata(), &mut first)
        .unwrap();
    MetronInfoEncoder::new()
        .encode(&reordered, &mut second)
        .unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Encode gate
// =============================================================================

#[test]
fn every_encoder_refuses_incomplete_metadata() {
    let incomplete = Metadata::default();
    let encoders: Vec<Box<dyn Encoder>> = vec![
        Box::new(ComicInfoEncoder::new()),
        Box::new(MetronInfoEncoder::new()),
        Box::new(NativeEncoder::new()),
    ];
    for encoder in encoders {
        let mut out = Vec::new();
        assert!(
            encoder.encode(&incomplete, &mut out).is_err(),
            "{} accepted incomplete metadata",
            encoder.format_name()
        );
        assert!(out.is_empty());
    }
}

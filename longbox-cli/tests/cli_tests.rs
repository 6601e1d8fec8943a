//! Integration tests for the Longbox CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const COMIC_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ComicInfo>
  <Series>Watchmen</Series>
  <Number>1</Number>
  <Publisher>DC Comics</Publisher>
  <Writer>Alan Moore</Writer>
  <Penciller>Dave Gibbons</Penciller>
  <Genre>Super-Hero</Genre>
  <PageCount>40</PageCount>
</ComicInfo>"#;

/// Build a small cbz fixture in `dir`
fn create_test_cbz(dir: &TempDir, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.path().join(name);
    let file = File::create(&path).expect("Failed to create test archive");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (entry_name, bytes) in entries {
        writer
            .start_file(*entry_name, options)
            .expect("Failed to start archive entry");
        writer.write_all(bytes).expect("Failed to write archive entry");
    }
    writer.finish().expect("Failed to finish archive");
    path
}

fn tagged_cbz(dir: &TempDir, name: &str) -> PathBuf {
    create_test_cbz(
        dir,
        name,
        &[
            ("page-000.jpg", b"fake image data"),
            ("ComicInfo.xml", COMIC_INFO.as_bytes()),
        ],
    )
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("organize"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("longbox"));
}

#[test]
fn test_info_json() {
    let dir = TempDir::new().unwrap();
    let archive = tagged_cbz(&dir, "watchmen.cbz");

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args(["info", archive.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alan Moore"))
        .stdout(predicate::str::contains("Watchmen"))
        .stdout(predicate::str::contains("Super-Hero"));
}

#[test]
fn test_info_human_readable() {
    let dir = TempDir::new().unwrap();
    let archive = tagged_cbz(&dir, "watchmen.cbz");

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args(["info", archive.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Series:    Watchmen"))
        .stdout(predicate::str::contains("Number:    1"));
}

#[test]
fn test_info_without_sidecar_fails() {
    let dir = TempDir::new().unwrap();
    let archive = create_test_cbz(&dir, "bare.cbz", &[("page-000.jpg", b"fake")]);

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args(["info", archive.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no metadata sidecar"));
}

#[test]
fn test_validate_success() {
    let dir = TempDir::new().unwrap();
    let archive = tagged_cbz(&dir, "watchmen.cbz");

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args(["validate", archive.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: Watchmen #1"));
}

#[test]
fn test_validate_rejects_incomplete_metadata() {
    let dir = TempDir::new().unwrap();
    let archive = create_test_cbz(
        &dir,
        "untitled.cbz",
        &[(
            "ComicInfo.xml",
            b"<ComicInfo><Number>1</Number></ComicInfo>" as &[u8],
        )],
    );

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args(["validate", archive.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete"));
}

#[test]
fn test_organize_places_archive_under_slug_path() {
    let dir = TempDir::new().unwrap();
    let archive = tagged_cbz(&dir, "watchmen_01.cbz");
    let destination = dir.path().join("library");

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args([
        "organize",
        archive.to_str().unwrap(),
        "--destination",
        destination.to_str().unwrap(),
    ])
    .assert()
    .success();

    let target = destination.join("DC-Comics/Watchmen/Watchmen-#001.cbz");
    assert!(target.exists(), "expected {}", target.display());

    // The repacked archive carries the configured sidecars.
    let mut zip = zip::ZipArchive::new(File::open(&target).unwrap()).unwrap();
    let names: Vec<String> = zip.file_names().map(str::to_string).collect();
    assert!(names.iter().any(|name| name == "ComicInfo.xml"));
    assert!(names.iter().any(|name| name == "MetronInfo.xml"));
    assert!(names.iter().any(|name| name == "Metadata.json"));
    assert!(names.iter().any(|name| name == "page-000.jpg"));
    drop(zip.by_name("Metadata.json").unwrap());
}

#[test]
fn test_organize_requires_a_destination() {
    let dir = TempDir::new().unwrap();
    let archive = tagged_cbz(&dir, "watchmen.cbz");
    let config = dir.path().join("empty.toml");
    std::fs::write(&config, "").unwrap();

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args([
        "organize",
        archive.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No destination configured"));
}

#[test]
fn test_organize_continues_past_bad_archives() {
    let dir = TempDir::new().unwrap();
    let good = tagged_cbz(&dir, "good.cbz");
    let bad = dir.path().join("bad.cbz");
    std::fs::write(&bad, b"not a zip at all").unwrap();
    let destination = dir.path().join("library");

    let mut cmd = Command::cargo_bin("longbox").unwrap();
    cmd.args([
        "organize",
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
        "--destination",
        destination.to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("1 of 2 archives failed"));

    assert!(destination
        .join("DC-Comics/Watchmen/Watchmen-#001.cbz")
        .exists());
}

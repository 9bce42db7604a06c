//! CLI behavior tests over synthetic archives.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const MEMBER_STEM: &str = "US20160148332A1-20160526";

const SCHEMA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<us-patent-application>
  <us-bibliographic-data-application>
    <publication-reference>
      <document-id><doc-number>20160148332</doc-number><kind>A1</kind><date>20160526</date></document-id>
    </publication-reference>
    <application-reference>
      <document-id><doc-number>14947765</doc-number><date>20151120</date></document-id>
    </application-reference>
    <invention-title>Drive Unit</invention-title>
    <inventors>
      <inventor><first-name>Jane</first-name><last-name>Doe</last-name><city>Austin</city><state>TX</state><country>US</country></inventor>
    </inventors>
  </us-bibliographic-data-application>
  <abstract><p>A drive unit with a compact motor arrangement.</p></abstract>
  <description>
    <p num="0001">This disclosure relates to drive units.</p>
  </description>
  <claims>
    <claim num="00001"><claim-text>1. A drive unit comprising a motor.</claim-text></claim>
  </claims>
</us-patent-application>
"#;

/// Build `<root>/archives/2016/I20160526.tar` plus a JSON index for the
/// fixture patent.
fn build_fixture(root: &Path) {
    let year_dir = root.join("archives/2016");
    std::fs::create_dir_all(&year_dir).unwrap();

    let mut zip_writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip_writer
        .start_file(
            format!("{MEMBER_STEM}/{MEMBER_STEM}.XML"),
            SimpleFileOptions::default(),
        )
        .unwrap();
    zip_writer.write_all(SCHEMA_XML.as_bytes()).unwrap();
    let zip_bytes = zip_writer.finish().unwrap().into_inner();

    let mut builder = tar::Builder::new(File::create(year_dir.join("I20160526.tar")).unwrap());
    let mut header = tar::Header::new_gnu();
    header.set_path(format!("{MEMBER_STEM}.ZIP")).unwrap();
    header.set_size(zip_bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, zip_bytes.as_slice()).unwrap();
    builder.finish().unwrap();

    std::fs::write(
        root.join("index.json"),
        format!(
            r#"{{"20160148332": {{"raw_locator": "I20160526.tar/{MEMBER_STEM}", "year": "2016", "title": "Drive Unit"}}}}"#
        ),
    )
    .unwrap();
}

fn priorart() -> Command {
    Command::cargo_bin("priorart").unwrap()
}

#[test]
fn invalid_identifier_fails_before_any_io() {
    priorart()
        .args(["reconstruct", "US"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid patent identifier"));
}

#[test]
fn missing_index_is_reported() {
    priorart()
        .args(["reconstruct", "20160148332", "--archive-root", "/tmp"])
        .env_remove("PRIORART_INDEX")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no patent index configured"));
}

#[test]
fn unknown_patent_is_not_found() {
    let root = TempDir::new().unwrap();
    build_fixture(root.path());

    priorart()
        .args(["reconstruct", "US99999999A1"])
        .env("PRIORART_ARCHIVE_ROOT", root.path().join("archives"))
        .env("PRIORART_SCRATCH_ROOT", root.path().join("scratch"))
        .env("PRIORART_INDEX", root.path().join("index.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in index"));
}

#[test]
fn reconstructs_by_identifier_with_environment_settings() {
    let root = TempDir::new().unwrap();
    build_fixture(root.path());
    let output = root.path().join("out.pdf");

    priorart()
        .args(["reconstruct", "US20160148332A1", "-o"])
        .arg(&output)
        .env("PRIORART_ARCHIVE_ROOT", root.path().join("archives"))
        .env("PRIORART_SCRATCH_ROOT", root.path().join("scratch"))
        .env("PRIORART_INDEX", root.path().join("index.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("out.pdf"));

    let pdf = std::fs::read(&output).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn reconstructs_direct_schema_file_with_default_output_name() {
    let dir = TempDir::new().unwrap();
    let xml_path = dir.path().join("filing.XML");
    std::fs::write(&xml_path, SCHEMA_XML).unwrap();

    priorart()
        .current_dir(dir.path())
        .args(["reconstruct", "filing.XML"])
        .assert()
        .success()
        .stdout(predicate::str::contains("filing_reconstructed.pdf"));

    assert!(dir.path().join("filing_reconstructed.pdf").is_file());
}

#[test]
fn inspect_prints_location_and_member_listing() {
    let root = TempDir::new().unwrap();
    build_fixture(root.path());

    priorart()
        .args(["inspect", "20160148332"])
        .env("PRIORART_ARCHIVE_ROOT", root.path().join("archives"))
        .env("PRIORART_INDEX", root.path().join("index.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("I20160526.tar"))
        .stdout(predicate::str::contains(format!("{MEMBER_STEM}.ZIP")))
        .stdout(predicate::str::contains(format!("{MEMBER_STEM}.XML")));
}

#[test]
fn dump_emits_the_document_model_as_json() {
    let dir = TempDir::new().unwrap();
    let xml_path = dir.path().join("filing.XML");
    std::fs::write(&xml_path, SCHEMA_XML).unwrap();

    priorart()
        .arg("dump")
        .arg(&xml_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"publication_number\": \"20160148332\""))
        .stdout(predicate::str::contains("\"Jane Doe\""));
}

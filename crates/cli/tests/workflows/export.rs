//! `pr export web` and `pr export doc`

use crate::common::FAKE_JPEG;
use crate::pr;
use anyhow::Result;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tempfile::TempDir;

/// Results dir with a region container (figure + table) and a channel container
fn populated() -> Result<TempDir> {
    let work = tempfile::tempdir()?;
    let dir = work.path();
    fs::write(dir.join("chart.jpg"), FAKE_JPEG)?;

    pr!(dir, "init").assert_success()?;
    pr!(dir, "add", "container", "root", "region", "Region").assert_success()?;
    pr!(dir, "add", "container", "root", "channel", "Channel").assert_success()?;
    pr!(dir, "add", "figure", "root.region", "bar", "Chart", "--image", "chart.jpg").assert_success()?;
    pr!(dir, "add", "keyvalue", "root.channel", "freqs", "Freqs", "--pair", "Online=3").assert_success()?;
    Ok(work)
}

fn docx_xml(path: &Path) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(fs::read(path)?))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    Ok(xml)
}

fn data_json(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)?;
    let start = text.find('{').ok_or_else(|| anyhow::anyhow!("no object in {}", text))?;
    let end = text.rfind('}').ok_or_else(|| anyhow::anyhow!("no object in {}", text))?;
    Ok(serde_json::from_str(&text[start..=end])?)
}

#[test]
fn test_web_export() -> Result<()> {
    let work = populated()?;
    let dir = work.path();

    let out = pr!(dir, "export", "web", "site").assert_success()?;
    assert!(out.contains_stdout("1 figures"));

    let site = dir.join("site");
    assert!(site.join("index.html").is_file());
    assert_eq!(fs::read(site.join("results/root.region.bar.jpg"))?, FAKE_JPEG);
    let data = data_json(&site.join("result_data.js"))?;
    assert_eq!(data["requested_roots"], serde_json::json!(["root.region", "root.channel"]));

    // Second export needs --overwrite
    let again = pr!(dir, "export", "web", "site").assert_failure()?;
    assert!(again.contains_stderr("already exists"));
    pr!(dir, "export", "web", "site", "--overwrite", "--root", "root.channel").assert_success()?;
    let data = data_json(&site.join("result_data.js"))?;
    assert_eq!(data["requested_roots"], serde_json::json!(["root.channel"]));
    assert!(!site.join("results/root.region.bar.jpg").exists());
    Ok(())
}

#[test]
fn test_web_export_never_replaces_results_dir() -> Result<()> {
    let work = populated()?;
    let dir = work.path();

    for destination in ["results", "results/.", "."] {
        let failed = pr!(dir, "export", "web", destination, "--overwrite").assert_failure()?;
        assert!(failed.contains_stderr("contains the results directory"));
    }

    assert!(dir.join("results/data.json").is_file());
    assert_eq!(fs::read(dir.join("results/root.region.bar.jpg"))?, FAKE_JPEG);
    pr!(dir, "show", "root.region.bar").assert_success()?;
    Ok(())
}

#[test]
fn test_web_export_open_without_browser() -> Result<()> {
    let work = populated()?;
    let dir = work.path();

    // No browser launcher on PATH: the export still succeeds
    let out = pr!(dir, "export", "web", "site", "--open")
        .env("PATH", dir)
        .assert_success()?;
    assert!(out.contains_stderr("Could not open"));
    assert!(out.contains_stdout("index.html"));
    assert!(dir.join("site/index.html").is_file());
    Ok(())
}

#[test]
fn test_web_export_uses_config_names() -> Result<()> {
    let work = populated()?;
    let dir = work.path();
    pr!(dir, "config", "set", "web.data_file", "data.js").assert_success()?;
    pr!(dir, "config", "set", "web.global_name", "RESULTS").assert_success()?;

    pr!(dir, "export", "web", "site").assert_success()?;
    let script = fs::read_to_string(dir.join("site/data.js"))?;
    assert!(script.starts_with("var RESULTS = "));
    Ok(())
}

#[test]
fn test_doc_export_docx() -> Result<()> {
    let work = populated()?;
    let dir = work.path();

    pr!(dir, "export", "doc", "report.docx").assert_success()?;
    let xml = docx_xml(&dir.join("report.docx"))?;
    assert!(xml.contains("<w:pStyle w:val=\"Title\"/></w:pPr><w:r><w:t xml:space=\"preserve\">Region"));
    assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:t xml:space=\"preserve\">Chart"));
    assert!(xml.contains("<wp:extent cx=\"5486400\""));
    assert!(xml.contains("Online"));

    // Extensionless outputs are Word too, unless --format says otherwise
    pr!(dir, "export", "doc", "report").assert_success()?;
    assert!(docx_xml(&dir.join("report"))?.contains("Region"));
    pr!(dir, "export", "doc", "page", "--format", "html").assert_success()?;
    assert!(fs::read_to_string(dir.join("page"))?.starts_with("<!DOCTYPE html>"));
    pr!(dir, "export", "doc", "x.doc", "--format", "pdf").assert_failure()?;
    Ok(())
}

#[test]
fn test_doc_export_html() -> Result<()> {
    let work = populated()?;
    let dir = work.path();
    pr!(dir, "config", "set", "document.title", "Sales").assert_success()?;

    pr!(dir, "export", "doc", "report.html").assert_success()?;
    let html = fs::read_to_string(dir.join("report.html"))?;
    assert!(html.contains("<title>Sales</title>"));
    assert!(html.contains("<h1>Region</h1>"));
    assert!(html.contains("<h2>Chart</h2>"));
    assert!(html.contains("data:image/jpeg;base64,"));
    assert!(html.contains("<td>Online</td>"));
    Ok(())
}

#[test]
fn test_doc_export_missing_artifact() -> Result<()> {
    let work = populated()?;
    let dir = work.path();
    fs::remove_file(dir.join("results/root.region.bar.jpg"))?;

    let failed = pr!(dir, "export", "doc", "report.docx").assert_failure()?;
    assert!(failed.contains_stderr("Missing artifact"));
    assert!(!dir.join("report.docx").exists());

    // Restricting to the intact subtree still works
    pr!(dir, "export", "doc", "report.docx", "--root", "root.channel").assert_success()?;
    assert!(dir.join("report.docx").is_file());
    Ok(())
}

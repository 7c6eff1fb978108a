//! `pr config` subcommands

use crate::pr;
use anyhow::Result;

#[test]
fn test_get_set_round_trip() -> Result<()> {
    let work = tempfile::tempdir()?;
    let dir = work.path();

    let width = pr!(dir, "config", "get", "document.image_width_px").assert_success()?;
    assert_eq!(width.stdout.trim(), "576");

    pr!(dir, "config", "set", "document.image_width_px", "300").assert_success()?;
    let width = pr!(dir, "config", "get", "document.image_width_px").assert_success()?;
    assert_eq!(width.stdout.trim(), "300");

    let list = pr!(dir, "config", "list").assert_success()?;
    assert!(list.contains_stdout("[document]"));
    assert!(list.contains_stdout("global_name"));
    Ok(())
}

#[test]
fn test_invalid_values_not_saved() -> Result<()> {
    let work = tempfile::tempdir()?;
    let dir = work.path();

    pr!(dir, "config", "set", "document.image_width_px", "5").assert_failure()?;
    pr!(dir, "config", "set", "web.global_name", "not-an-identifier").assert_failure()?;
    pr!(dir, "config", "set", "store.snapshot_file", "../escape.json").assert_failure()?;
    let unknown = pr!(dir, "config", "get", "nope").assert_failure()?;
    assert!(unknown.contains_stderr("Unknown config key"));

    let name = pr!(dir, "config", "get", "web.global_name").assert_success()?;
    assert_eq!(name.stdout.trim(), "ANALYSIS_RESULTS");
    Ok(())
}

#[test]
fn test_path_points_into_results_dir() -> Result<()> {
    let work = tempfile::tempdir()?;
    let path = pr!(work.path(), "--dir", "out", "config", "path").assert_success()?;
    assert!(path.contains_stdout("prettyresults.toml"));
    assert!(path.contains_stdout("out"));
    Ok(())
}

//! Building a tree across invocations and reloading it with merge

use crate::common::FAKE_JPEG;
use crate::pr;
use anyhow::Result;
use std::fs;
use tempfile::TempDir;

fn init() -> Result<TempDir> {
    let work = tempfile::tempdir()?;
    pr!(work.path(), "init").assert_success()?;
    Ok(work)
}

#[test]
fn test_init_creates_results_dir() -> Result<()> {
    let work = init()?;
    let results = work.path().join("results");

    assert!(results.join("prettyresults.toml").is_file());
    let snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(results.join("data.json"))?)?;
    assert_eq!(snapshot["root_result"], "root");
    assert_eq!(snapshot["results"][0]["id"], "root");

    let again = pr!(work.path(), "init").assert_success()?;
    assert!(again.contains_stdout("already initialized"));
    Ok(())
}

#[test]
fn test_build_tree_across_invocations() -> Result<()> {
    let work = init()?;
    let dir = work.path();
    fs::write(dir.join("chart.jpg"), FAKE_JPEG)?;

    pr!(dir, "add", "container", "root", "region", "Region").assert_success()?;
    pr!(dir, "add", "figure", "root.region", "bar", "Chart", "--image", "chart.jpg").assert_success()?;
    pr!(
        dir, "add", "table", "root.region", "freqs", "Freqs",
        "--headings", "Region,Count", "--pre", "Counts per region"
    )
    .assert_success()?;
    pr!(dir, "row", "root.region.freqs", "North", "10").assert_success()?;
    pr!(dir, "row", "root.region.freqs", "South", "7").assert_success()?;
    pr!(
        dir, "add", "keyvalue", "root.region", "test", "Chi-square",
        "--pair", "p=0.01", "--label", "green:significant"
    )
    .assert_success()?;

    assert_eq!(fs::read(dir.join("results/root.region.bar.jpg"))?, FAKE_JPEG);

    let tree = pr!(dir, "tree").assert_success()?;
    assert!(tree.contains_stdout("root.region.bar"));
    assert!(tree.contains_stdout("root.region.freqs"));
    assert!(tree.contains_stdout("(significant)"));
    assert!(tree.contains_stdout("5 results"));

    let show = pr!(dir, "show", "root.region.freqs").assert_success()?;
    assert!(show.contains_stdout("Counts per region"));
    assert!(show.contains_stdout("North | 10"));
    assert!(show.contains_stdout("South | 7"));

    let kv = pr!(dir, "show", "root.region.test").assert_success()?;
    assert!(kv.contains_stdout("Nombre | Valor"));
    assert!(kv.contains_stdout("p | 0.01"));
    Ok(())
}

#[test]
fn test_configured_containers_merge_on_reopen() -> Result<()> {
    let work = tempfile::tempdir()?;
    let dir = work.path();
    let results = dir.join("results");
    fs::create_dir_all(&results)?;
    fs::write(
        results.join("prettyresults.toml"),
        "[[containers]]\nid = \"region\"\nname = \"Region\"\n",
    )?;
    fs::write(dir.join("chart.jpg"), FAKE_JPEG)?;

    pr!(dir, "init").assert_success()?;
    pr!(dir, "add", "figure", "root.region", "bar", "Chart", "--image", "chart.jpg").assert_success()?;

    // Rename the container; the figure added under it must survive
    fs::write(
        results.join("prettyresults.toml"),
        "[[containers]]\nid = \"region\"\nname = \"Sales region\"\n",
    )?;

    let show = pr!(dir, "show", "root.region").assert_success()?;
    assert!(show.contains_stdout("Sales region"));
    assert!(show.contains_stdout("root.region.bar"));
    Ok(())
}

#[test]
fn test_invalid_input_rejected() -> Result<()> {
    let work = init()?;
    let dir = work.path();

    let dotted = pr!(dir, "add", "container", "root", "a.b", "Bad").assert_failure()?;
    assert!(dotted.contains_stderr("cannot contain dots"));

    let missing = pr!(dir, "show", "root.nope").assert_failure()?;
    assert!(missing.contains_stderr("Result not found"));
    let unqualified = pr!(dir, "show", "region").assert_failure()?;
    assert!(unqualified.contains_stderr("Result not found: region"));

    let slashed = pr!(dir, "add", "container", "root", "a/b", "Bad").assert_failure()?;
    assert!(slashed.contains_stderr("path separators"));

    pr!(dir, "add", "container", "root", "region", "Region").assert_success()?;
    let wrong_kind = pr!(dir, "row", "root.region", "x").assert_failure()?;
    assert!(wrong_kind.contains_stderr("is a container, not a table"));

    pr!(dir, "add", "table", "root.region", "t", "T", "--headings", "a,b").assert_success()?;
    let ragged = pr!(dir, "row", "root.region.t", "only-one").assert_failure()?;
    assert!(ragged.contains_stderr("Row does not fit"));
    Ok(())
}

#[test]
fn test_corrupt_snapshot_starts_empty() -> Result<()> {
    let work = init()?;
    let dir = work.path();
    pr!(dir, "add", "container", "root", "region", "Region").assert_success()?;
    fs::write(dir.join("results/data.json"), "{ not json")?;

    let tree = pr!(dir, "tree").assert_success()?;
    assert!(!tree.contains_stdout("root.region"));
    assert!(tree.contains_stdout("1 results"));
    Ok(())
}

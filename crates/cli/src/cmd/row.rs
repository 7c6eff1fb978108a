//! Append a row to a table result

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(dir: &Path, table_id: &str, cells: Vec<String>) -> Result<()> {
    let (_, mut store) = util::open_store(dir)?;
    let rows = {
        let table = store.lookup_mut(table_id)?.as_table_mut()?;
        table
            .add_row(cells)
            .with_context(|| format!("Row does not fit table '{}'", table_id))?;
        table.rows.len()
    };
    util::persist(&store)?;
    println!("{} {} now has {} rows", "✓".green(), table_id.cyan(), rows);
    Ok(())
}

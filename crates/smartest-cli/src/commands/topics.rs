//! The `smartest topics` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, catalog) = super::load_engine(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Keywords"]);

    for (topic, keywords) in catalog.iter() {
        table.add_row(vec![
            Cell::new(topic.id()),
            Cell::new(topic.display_name()),
            Cell::new(keywords.join(", ")),
        ]);
    }

    println!("{table}");
    Ok(())
}

use std::path::PathBuf;

use formfill_core::{regions, Region};

use crate::input::load_document;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Form to inspect (.docx, or a .json document model)
    document: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let loaded = load_document(&app.document)?;
    let found: Vec<Region<'_>> = regions(&loaded.document).collect();

    if app.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Kind", "Location", "Text"]);
    for region in &found {
        table.add_row(prettytable::row![region.kind(), region.location, preview(region.text, 72)]);
    }
    table.printstd();

    Ok(())
}

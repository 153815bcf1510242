use std::path::PathBuf;

use colored::Colorize;
use formfill_core::{best_candidate, Anchor, Document, FillOptions, RegionRef};
use serde::Serialize;

use crate::engine::EngineArgs;
use crate::fill::DEFAULT_FIELDS;
use crate::input::{load_document, load_fields};
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Form to resolve against (.docx, or a .json document model)
    document: PathBuf,

    /// JSON field list
    #[arg(default_value = DEFAULT_FIELDS)]
    fields: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    #[clap(flatten)]
    engine: EngineArgs,
}

/// Where an anchor would land, without filling anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub anchor: String,
    pub resolved: bool,
    /// Best candidate, even when it scores below the threshold.
    pub best: Option<RegionRef>,
    pub score: Option<f64>,
    pub text: Option<String>,
}

pub fn resolutions(document: &Document, anchors: &[Anchor], options: &FillOptions) -> Vec<Resolution> {
    anchors
        .iter()
        .filter(|anchor| !anchor.label.is_empty())
        .map(|anchor| {
            let best = best_candidate(document, &anchor.label, options);
            Resolution {
                anchor: anchor.label.clone(),
                resolved: best.is_some_and(|m| m.score >= options.min_score),
                best: best.map(|m| m.region),
                score: best.map(|m| m.score),
                text: best.and_then(|m| document.text(&m.region)).map(str::to_string),
            }
        })
        .collect()
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let options = app.engine.options()?;
    let anchors = load_fields(&app.fields)?;
    let loaded = load_document(&app.document)?;
    let results = resolutions(&loaded.document, &anchors, &options);

    if app.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Anchor", "Score", "Location", "Text"]);
    for r in &results {
        let score = match r.score {
            Some(s) if r.resolved => f!("{s:.3}").green().to_string(),
            Some(s) => f!("{s:.3}").red().to_string(),
            None => "-".red().to_string(),
        };
        let location = r.best.map(|b| b.to_string()).unwrap_or_default();
        let text = r.text.as_deref().map(|t| preview(t, 60)).unwrap_or_default();
        table.add_row(prettytable::row![preview(&r.anchor, 40), score, location, text]);
    }
    table.printstd();

    let unresolved = results.iter().filter(|r| !r.resolved).count();
    println!(
        "{} of {} anchor(s) resolve at --min-score {}",
        results.len() - unresolved,
        results.len(),
        options.min_score
    );

    Ok(())
}

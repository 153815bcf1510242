use std::path::PathBuf;

use colored::Colorize;
use formfill_core::{fill_with_report, FillReport};

use crate::engine::EngineArgs;
use crate::input::{load_document, load_fields};
use crate::prelude::{eprintln, println, *};

pub const DEFAULT_FIELDS: &str = "filled_fields.json";
pub const DEFAULT_OUTPUT: &str = "result.docx";

#[derive(Debug, clap::Args)]
pub struct App {
    /// Form to fill (.docx, or a .json document model)
    document: PathBuf,

    /// JSON field list
    #[arg(default_value = DEFAULT_FIELDS)]
    fields: PathBuf,

    /// Where to save the filled form
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Maximum number of unresolved anchors to list
    #[arg(long, env = "FORMFILL_REPORT_LIMIT", default_value = "50")]
    report_limit: usize,

    /// Print the full fill report as JSON
    #[arg(long)]
    json: bool,

    #[clap(flatten)]
    engine: EngineArgs,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let options = app.engine.options()?;
    let anchors = load_fields(&app.fields)?;
    let loaded = load_document(&app.document)?;

    let mut document = loaded.document.clone();
    let report = fill_with_report(&mut document, &anchors, &options);
    loaded.save(&document, &app.output)?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if global.verbose {
        print_filled(&report);
    }

    println!(
        "{} {} ({} filled, {} unresolved)",
        "Saved".green().bold(),
        app.output.display(),
        report.filled.len(),
        report.unresolved.len()
    );

    for line in unresolved_lines(&report.unresolved, app.report_limit) {
        eprintln!("{}", line);
    }

    Ok(())
}

fn print_filled(report: &FillReport) {
    if report.filled.is_empty() {
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Anchor", "Score", "Strategy", "Matched", "Written"]);
    for filled in &report.filled {
        table.add_row(prettytable::row![
            preview(&filled.anchor, 40),
            f!("{:.3}", filled.score),
            filled.strategy,
            filled.region,
            filled.target
        ]);
    }
    table.printstd();
}

/// Report lines for unresolved anchors: at most `limit` labels, then a hint.
fn unresolved_lines(unresolved: &[String], limit: usize) -> Vec<String> {
    if unresolved.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![f!(
        "{} {} anchor(s) could not be located:",
        "Unresolved".yellow().bold(),
        unresolved.len()
    )];
    lines.extend(unresolved.iter().take(limit).map(|label| f!("  - {label}")));
    if unresolved.len() > limit {
        lines.push(f!("  ... and {} more", unresolved.len() - limit));
    }
    lines.push(f!(
        "{} check the labels in the fields file, or lower --min-score",
        "hint:".cyan()
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| f!("Field {i}")).collect()
    }

    #[test]
    fn test_no_unresolved_no_report() {
        assert!(unresolved_lines(&[], 50).is_empty());
    }

    #[test]
    fn test_report_lists_every_label_under_limit() {
        colored::control::set_override(false);
        let lines = unresolved_lines(&labels(2), 50);
        assert_eq!(
            lines,
            vec![
                "Unresolved 2 anchor(s) could not be located:",
                "  - Field 0",
                "  - Field 1",
                "hint: check the labels in the fields file, or lower --min-score",
            ]
        );
    }

    #[test]
    fn test_report_capped_at_limit() {
        colored::control::set_override(false);
        let lines = unresolved_lines(&labels(60), 50);
        assert_eq!(lines.iter().filter(|l| l.starts_with("  - ")).count(), 50);
        assert!(lines.contains(&"  ... and 10 more".to_string()));
        assert!(lines[0].contains("60"));
    }
}

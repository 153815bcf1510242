//! Fill strategies
//!
//! Once an anchor is resolved, the value is written by the first applicable
//! rule of a fixed, per-kind chain. Every rule is a pure function that looks
//! at the current document and either declines (`None`) or returns the
//! [`Edit`] it would make; [`apply`] commits the first edit offered.
//!
//! Paragraph chain:
//! 1. [`underscore_fill`]: replace the first underscore run in the paragraph
//! 2. [`colon_fill`]: `Label: <value>` when nothing meaningful follows the colon
//! 3. [`next_paragraph_fill`]: fill a blank or underscored following paragraph
//! 4. [`append_fill`]: append the value after the paragraph text
//!
//! Cell chain, run against the right-hand neighbour of the label cell:
//! 1. [`cell_underscore_fill`]
//! 2. [`cell_overwrite_fill`]: the cell is blank or a placeholder dash
//! 3. [`cell_append_fill`]
//!
//! When the label cell is the last one in its row, the value goes into the
//! label cell itself and the overwrite rule is skipped, so the label text is
//! kept.

use std::fmt;

use serde::Serialize;

use crate::document::{Document, RegionRef};
use crate::options::FillOptions;
use crate::resolve::Match;
use crate::text::{has_underscore_run, is_blank, is_placeholder_dash, replace_underscore_run};

/// Which rule produced a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    UnderscoreRun,
    Colon,
    NextParagraph,
    Append,
    CellUnderscoreRun,
    CellOverwrite,
    CellAppend,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::UnderscoreRun => "underscore-run",
            Strategy::Colon => "colon",
            Strategy::NextParagraph => "next-paragraph",
            Strategy::Append => "append",
            Strategy::CellUnderscoreRun => "cell-underscore-run",
            Strategy::CellOverwrite => "cell-overwrite",
            Strategy::CellAppend => "cell-append",
        };
        write!(f, "{name}")
    }
}

/// A planned text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub target: RegionRef,
    pub text: String,
    pub strategy: Strategy,
}

/// What [`apply`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub target: RegionRef,
    pub strategy: Strategy,
}

/// A paragraph rule: `(document, matched paragraph, value, options) -> edit`.
pub type ParagraphRule = fn(&Document, RegionRef, &str, &FillOptions) -> Option<Edit>;

/// A cell rule: `(current target text, target, value, options) -> edit`.
pub type CellRule = fn(&str, RegionRef, &str, &FillOptions) -> Option<Edit>;

pub static PARAGRAPH_CHAIN: [ParagraphRule; 4] =
    [underscore_fill, colon_fill, next_paragraph_fill, append_fill];

pub static CELL_CHAIN: [CellRule; 3] = [cell_underscore_fill, cell_overwrite_fill, cell_append_fill];

/// Rules used when the value has to go into the label cell itself.
pub static LABEL_CELL_CHAIN: [CellRule; 2] = [cell_underscore_fill, cell_append_fill];

fn appended(text: &str, value: &str) -> String {
    format!("{} {}", text.trim_end(), value)
}

pub fn underscore_fill(
    document: &Document,
    region: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    let text = document.text(&region)?;
    let replaced = replace_underscore_run(text, options.fill_text(value), options.min_underscore_run)?;
    Some(Edit {
        target: region,
        text: replaced,
        strategy: Strategy::UnderscoreRun,
    })
}

pub fn colon_fill(
    document: &Document,
    region: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    let text = document.text(&region)?;
    let (label, rest) = text.split_once(':')?;

    let open = is_blank(rest)
        || has_underscore_run(rest, options.min_underscore_run)
        || is_placeholder_dash(rest);
    if !open {
        return None;
    }

    Some(Edit {
        target: region,
        text: format!("{}: {}", label.trim(), options.fill_text(value)),
        strategy: Strategy::Colon,
    })
}

pub fn next_paragraph_fill(
    document: &Document,
    region: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    let next = document.next_paragraph(&region)?;
    let text = document.text(&next)?;
    let fill = options.fill_text(value);

    let filled = if is_blank(text) {
        fill.to_string()
    } else {
        let replaced = replace_underscore_run(text, fill, options.min_underscore_run)?;
        if is_blank(&replaced) {
            fill.to_string()
        } else {
            replaced
        }
    };

    Some(Edit {
        target: next,
        text: filled,
        strategy: Strategy::NextParagraph,
    })
}

pub fn append_fill(
    document: &Document,
    region: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    let text = document.text(&region)?;
    Some(Edit {
        target: region,
        text: appended(text, options.fill_text(value)),
        strategy: Strategy::Append,
    })
}

pub fn cell_underscore_fill(
    text: &str,
    target: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    let replaced = replace_underscore_run(text, options.fill_text(value), options.min_underscore_run)?;
    Some(Edit {
        target,
        text: replaced,
        strategy: Strategy::CellUnderscoreRun,
    })
}

pub fn cell_overwrite_fill(
    text: &str,
    target: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    (is_blank(text) || is_placeholder_dash(text)).then(|| Edit {
        target,
        text: options.fill_text(value).to_string(),
        strategy: Strategy::CellOverwrite,
    })
}

pub fn cell_append_fill(
    text: &str,
    target: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    Some(Edit {
        target,
        text: appended(text, options.fill_text(value)),
        strategy: Strategy::CellAppend,
    })
}

/// Plan the write for a paragraph match.
///
/// Declines for a blank or missing paragraph.
pub fn plan_paragraph(
    document: &Document,
    region: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    if is_blank(document.text(&region)?) {
        return None;
    }
    PARAGRAPH_CHAIN
        .iter()
        .find_map(|rule| rule(document, region, value, options))
}

/// Plan the write for a cell match.
pub fn plan_cell(
    document: &Document,
    region: RegionRef,
    value: &str,
    options: &FillOptions,
) -> Option<Edit> {
    let (target, chain): (RegionRef, &[CellRule]) = match document.right_neighbor(&region) {
        Some(neighbor) => (neighbor, &CELL_CHAIN[..]),
        None => (region, &LABEL_CELL_CHAIN[..]),
    };
    let text = document.text(&target)?;
    chain
        .iter()
        .find_map(|rule| rule(text, target, value, options))
}

/// Plan the write for a match of either kind.
pub fn plan(document: &Document, m: &Match, value: &str, options: &FillOptions) -> Option<Edit> {
    match m.region {
        RegionRef::Paragraph { .. } => plan_paragraph(document, m.region, value, options),
        RegionRef::Cell { .. } => plan_cell(document, m.region, value, options),
    }
}

/// Write `value` for a resolved match. `None` means the document was not changed.
pub fn apply(document: &mut Document, m: &Match, value: &str, options: &FillOptions) -> Option<Applied> {
    let edit = plan(document, m, value, options)?;
    if !document.set_text(&edit.target, edit.text) {
        return None;
    }
    Some(Applied {
        target: edit.target,
        strategy: edit.strategy,
    })
}

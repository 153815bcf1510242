//! Fill orchestration
//!
//! Drives resolution and strategies over an ordered list of anchors. Each
//! anchor is resolved against the document as it stands after all previous
//! fills, so a value written for one anchor is visible to the next.

use serde::{Deserialize, Serialize};

use crate::document::{Document, RegionRef};
use crate::options::FillOptions;
use crate::resolve::resolve_with;
use crate::strategy::{apply, Strategy};

/// A label to look for and the value to write next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub label: String,
    pub value: String,
}

impl Anchor {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Anchor {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One anchor that was resolved and written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledAnchor {
    pub anchor: String,
    pub value: String,
    /// Region the label matched.
    pub region: RegionRef,
    /// Region that received the value.
    pub target: RegionRef,
    pub score: f64,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillReport {
    pub filled: Vec<FilledAnchor>,
    /// Labels that could not be placed, in input order.
    pub unresolved: Vec<String>,
}

/// Fill every anchor and report what happened to each.
///
/// Anchors with an empty label are skipped. A failure on one anchor never
/// stops the pass.
pub fn fill_with_report(document: &mut Document, anchors: &[Anchor], options: &FillOptions) -> FillReport {
    let mut report = FillReport::default();

    for anchor in anchors {
        if anchor.label.is_empty() {
            continue;
        }

        let Some(m) = resolve_with(document, &anchor.label, options) else {
            log::debug!("unresolved anchor {:?}", anchor.label);
            report.unresolved.push(anchor.label.clone());
            continue;
        };

        match apply(document, &m, &anchor.value, options) {
            Some(applied) => {
                log::debug!(
                    "anchor {:?} matched {} (score {:.3}), wrote {} via {}",
                    anchor.label,
                    m.region,
                    m.score,
                    applied.target,
                    applied.strategy
                );
                report.filled.push(FilledAnchor {
                    anchor: anchor.label.clone(),
                    value: anchor.value.clone(),
                    region: m.region,
                    target: applied.target,
                    score: m.score,
                    strategy: applied.strategy,
                });
            }
            None => {
                log::debug!("anchor {:?} matched {} but nothing was written", anchor.label, m.region);
            }
        }
    }

    log::info!(
        "filled {} anchor(s), {} unresolved",
        report.filled.len(),
        report.unresolved.len()
    );

    report
}

/// Fill every anchor with default options and return the unresolved labels.
pub fn fill(document: &mut Document, anchors: &[Anchor]) -> Vec<String> {
    fill_with_report(document, anchors, &FillOptions::default()).unresolved
}

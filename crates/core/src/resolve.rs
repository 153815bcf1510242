//! Anchor resolution
//!
//! Scores every non-blank region against an anchor label and keeps the best
//! one. The scan order is paragraphs first, then cells, and a later region
//! only replaces the current best when it scores strictly higher, so on a tie
//! the region seen first wins.

use serde::Serialize;

use crate::document::{Document, RegionKind, RegionRef};
use crate::options::FillOptions;
use crate::scan::regions;
use crate::similarity::ratio;
use crate::text::normalize;

/// The region chosen for one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match {
    pub region: RegionRef,
    pub score: f64,
}

impl Match {
    pub fn kind(&self) -> RegionKind {
        self.region.kind()
    }
}

/// Score one candidate text against an already normalized anchor.
///
/// Candidates that contain the whole anchor are raised to at least
/// `options.substring_boost`.
pub fn score_candidate(normalized_anchor: &str, candidate: &str, options: &FillOptions) -> f64 {
    let candidate = normalize(candidate);
    if normalized_anchor.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let score = ratio(normalized_anchor, &candidate);
    if candidate.contains(normalized_anchor) {
        score.max(options.substring_boost)
    } else {
        score
    }
}

/// Best-scoring region for `anchor`, with every candidate considered.
///
/// Unlike [`resolve_with`] this does not apply the confidence threshold.
pub fn best_candidate(document: &Document, anchor: &str, options: &FillOptions) -> Option<Match> {
    let anchor = normalize(anchor);
    let mut best: Option<Match> = None;

    for region in regions(document) {
        let score = score_candidate(&anchor, region.text, options);
        if best.map_or(true, |b| score > b.score) {
            best = Some(Match {
                region: region.location,
                score,
            });
        }
    }

    best
}

/// Resolve `anchor` with explicit options; `None` means unresolved.
pub fn resolve_with(document: &Document, anchor: &str, options: &FillOptions) -> Option<Match> {
    let best = best_candidate(document, anchor, options);
    match best {
        Some(m) if m.score >= options.min_score => {
            log::trace!("anchor {anchor:?} -> {} (score {:.3})", m.region, m.score);
            Some(m)
        }
        Some(m) => {
            log::trace!(
                "anchor {anchor:?} best {} scored {:.3}, below {:.2}",
                m.region,
                m.score,
                options.min_score
            );
            None
        }
        None => None,
    }
}

/// Resolve `anchor` with the default threshold and boost.
pub fn resolve(document: &Document, anchor: &str) -> Option<Match> {
    resolve_with(document, anchor, &FillOptions::default())
}

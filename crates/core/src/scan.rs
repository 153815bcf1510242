//! Region scanning
//!
//! Enumerates the text-bearing regions of a [`Document`]: every paragraph in
//! document order, then every cell in table, row, column order. Regions whose
//! text is blank are skipped. The iterator borrows the document, so each scan
//! sees the texts as they are right now.

use serde::Serialize;

use crate::document::{Document, RegionKind, RegionRef};
use crate::text::is_blank;

/// A non-blank region observed during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region<'a> {
    pub location: RegionRef,
    pub text: &'a str,
}

impl Region<'_> {
    pub fn kind(&self) -> RegionKind {
        self.location.kind()
    }
}

/// Lazily scan the non-blank regions of `document`.
pub fn regions(document: &Document) -> impl Iterator<Item = Region<'_>> + '_ {
    let paragraphs = document
        .paragraphs
        .iter()
        .enumerate()
        .map(|(index, p)| Region {
            location: RegionRef::Paragraph { index },
            text: p.text.as_str(),
        });

    let cells = document
        .tables
        .iter()
        .enumerate()
        .flat_map(|(table, t)| {
            t.rows.iter().enumerate().flat_map(move |(row, r)| {
                r.cells.iter().enumerate().map(move |(column, c)| Region {
                    location: RegionRef::Cell { table, row, column },
                    text: c.text.as_str(),
                })
            })
        });

    paragraphs.chain(cells).filter(|region| !is_blank(region.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_before_cells() {
        let doc = Document::from_paragraphs(["First", "Second"])
            .with_table([["A", "B"], ["C", "D"]]);

        let locations: Vec<RegionRef> = regions(&doc).map(|r| r.location).collect();
        assert_eq!(
            locations,
            vec![
                RegionRef::Paragraph { index: 0 },
                RegionRef::Paragraph { index: 1 },
                RegionRef::Cell { table: 0, row: 0, column: 0 },
                RegionRef::Cell { table: 0, row: 0, column: 1 },
                RegionRef::Cell { table: 0, row: 1, column: 0 },
                RegionRef::Cell { table: 0, row: 1, column: 1 },
            ]
        );
    }

    #[test]
    fn test_blank_regions_skipped_but_indices_kept() {
        let doc = Document::from_paragraphs(["", "  \t", "Signature"])
            .with_table([["Name", "   "]]);

        let found: Vec<(RegionRef, &str)> = regions(&doc).map(|r| (r.location, r.text)).collect();
        assert_eq!(
            found,
            vec![
                (RegionRef::Paragraph { index: 2 }, "Signature"),
                (RegionRef::Cell { table: 0, row: 0, column: 0 }, "Name"),
            ]
        );
    }

    #[test]
    fn test_multiple_tables_in_order() {
        let doc = Document::default()
            .with_table([["t0"]])
            .with_table([["t1-a", "t1-b"]]);
        let kinds: Vec<_> = regions(&doc).map(|r| (r.kind(), r.text)).collect();
        assert_eq!(
            kinds,
            vec![
                (RegionKind::Cell, "t0"),
                (RegionKind::Cell, "t1-a"),
                (RegionKind::Cell, "t1-b"),
            ]
        );
    }

    #[test]
    fn test_rescan_reflects_mutation() {
        let mut doc = Document::from_paragraphs(["Label", ""]);
        assert_eq!(regions(&doc).count(), 1);
        doc.set_text(&RegionRef::Paragraph { index: 1 }, "value".to_string());
        assert_eq!(regions(&doc).count(), 2);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(regions(&Document::default()).count(), 0);
    }
}

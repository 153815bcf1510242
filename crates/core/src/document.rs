//! In-memory document model
//!
//! A [`Document`] is a flat view of the text-bearing structure of a form:
//! top-level paragraphs in order, followed by tables of rows of cells. The
//! engine never adds or removes paragraphs, tables, rows or cells; it only
//! replaces texts. Format crates translate between this model and their
//! on-disk representation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
}

/// Structural kind of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Paragraph,
    Cell,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Paragraph => write!(f, "paragraph"),
            RegionKind::Cell => write!(f, "cell"),
        }
    }
}

/// Coordinate of a text-bearing region inside a [`Document`].
///
/// A `RegionRef` does not borrow the document; it is resolved against the
/// current state every time it is used, so texts written by earlier fills are
/// always what later lookups see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegionRef {
    Paragraph {
        index: usize,
    },
    Cell {
        table: usize,
        row: usize,
        column: usize,
    },
}

impl RegionRef {
    pub fn kind(&self) -> RegionKind {
        match self {
            RegionRef::Paragraph { .. } => RegionKind::Paragraph,
            RegionRef::Cell { .. } => RegionKind::Cell,
        }
    }
}

impl fmt::Display for RegionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionRef::Paragraph { index } => write!(f, "paragraph {index}"),
            RegionRef::Cell { table, row, column } => {
                write!(f, "table {table} row {row} col {column}")
            }
        }
    }
}

impl Document {
    /// Build a document from paragraph texts only.
    pub fn from_paragraphs<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Document {
            paragraphs: texts
                .into_iter()
                .map(|t| Paragraph { text: t.into() })
                .collect(),
            tables: Vec::new(),
        }
    }

    /// Append a table given as rows of cell texts.
    pub fn with_table<R, C, S>(mut self, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.push(Table {
            rows: rows
                .into_iter()
                .map(|cells| Row {
                    cells: cells
                        .into_iter()
                        .map(|t| Cell { text: t.into() })
                        .collect(),
                })
                .collect(),
        });
        self
    }

    /// Current text of a region, or `None` when the coordinate is out of range.
    pub fn text(&self, region: &RegionRef) -> Option<&str> {
        match *region {
            RegionRef::Paragraph { index } => self.paragraphs.get(index).map(|p| p.text.as_str()),
            RegionRef::Cell { table, row, column } => self
                .tables
                .get(table)?
                .rows
                .get(row)?
                .cells
                .get(column)
                .map(|c| c.text.as_str()),
        }
    }

    /// Replace the text of a region. Returns `false` when the coordinate is out of range.
    pub fn set_text(&mut self, region: &RegionRef, text: String) -> bool {
        let slot = match *region {
            RegionRef::Paragraph { index } => self.paragraphs.get_mut(index).map(|p| &mut p.text),
            RegionRef::Cell { table, row, column } => self
                .tables
                .get_mut(table)
                .and_then(|t| t.rows.get_mut(row))
                .and_then(|r| r.cells.get_mut(column))
                .map(|c| &mut c.text),
        };

        match slot {
            Some(slot) => {
                *slot = text;
                true
            }
            None => false,
        }
    }

    /// The cell in the same row, one column to the right.
    pub fn right_neighbor(&self, region: &RegionRef) -> Option<RegionRef> {
        match *region {
            RegionRef::Cell { table, row, column } => {
                let cells = &self.tables.get(table)?.rows.get(row)?.cells;
                (column + 1 < cells.len()).then_some(RegionRef::Cell {
                    table,
                    row,
                    column: column + 1,
                })
            }
            RegionRef::Paragraph { .. } => None,
        }
    }

    /// The paragraph that follows a paragraph in document order.
    pub fn next_paragraph(&self, region: &RegionRef) -> Option<RegionRef> {
        match *region {
            RegionRef::Paragraph { index } if index + 1 < self.paragraphs.len() => {
                Some(RegionRef::Paragraph { index: index + 1 })
            }
            _ => None,
        }
    }

    /// Whether two documents have the same paragraph, table, row and cell counts.
    pub fn same_shape(&self, other: &Document) -> bool {
        self.paragraphs.len() == other.paragraphs.len()
            && self.tables.len() == other.tables.len()
            && self.tables.iter().zip(&other.tables).all(|(a, b)| {
                a.rows.len() == b.rows.len()
                    && a
                        .rows
                        .iter()
                        .zip(&b.rows)
                        .all(|(ra, rb)| ra.cells.len() == rb.cells.len())
            })
    }
}

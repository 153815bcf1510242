//! Core library for formfill
//!
//! This crate implements the **Functional Core** of the formfill application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`formfill_core`** (this crate): anchor resolution and fill heuristics over an
//!   in-memory [`Document`], with zero I/O
//! - **`docx`**: reading and writing `.docx` packages
//! - **`formfill`**: the command-line shell that loads, fills, saves and reports
//!
//! Given a form we do not control the layout of and a list of (label, value)
//! pairs, the engine decides *where* each value belongs and *how* to insert it
//! without destroying the text that is already there.
//!
//! # Module Organization
//!
//! - [`text`]: normalization, underscore runs, placeholder dashes
//! - [`similarity`]: Ratcliff/Obershelp sequence similarity
//! - [`scan`]: enumeration of paragraph and cell regions
//! - [`resolve`]: best region for an anchor, above a confidence threshold
//! - [`strategy`]: ordered mutation rules per region kind
//! - [`fill`]: the pass over all anchors and the resulting report
//! - [`fields`]: the accepted JSON shapes for field lists
//!
//! # Example Usage
//!
//! ```rust
//! use formfill_core::{fill, Anchor, Document};
//!
//! let mut doc = Document::from_paragraphs(["Full Name: _________"])
//!     .with_table([["Date of birth", ""]]);
//!
//! let unresolved = fill(
//!     &mut doc,
//!     &[
//!         Anchor::new("Full Name", "Ana Popescu"),
//!         Anchor::new("Date of birth", "1990-01-01"),
//!         Anchor::new("Nonexistent Field XYZ", "?"),
//!     ],
//! );
//!
//! assert_eq!(doc.paragraphs[0].text, "Full Name: Ana Popescu");
//! assert_eq!(doc.tables[0].rows[0].cells[1].text, "1990-01-01");
//! assert_eq!(unresolved, vec!["Nonexistent Field XYZ".to_string()]);
//! ```

pub mod document;
pub mod fields;
pub mod fill;
pub mod options;
pub mod resolve;
pub mod scan;
pub mod similarity;
pub mod strategy;
pub mod text;

pub use document::{Cell, Document, Paragraph, RegionKind, RegionRef, Row, Table};
pub use fields::{fields_from_value, parse_fields, FieldsError};
pub use fill::{fill, fill_with_report, Anchor, FillReport, FilledAnchor};
pub use options::FillOptions;
pub use resolve::{best_candidate, resolve, resolve_with, Match};
pub use scan::{regions, Region};
pub use similarity::similarity;
pub use strategy::{apply, Applied, Strategy};
pub use text::normalize;

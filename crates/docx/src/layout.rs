//! Body layout extraction
//!
//! Walks `word/document.xml` once and records, for every top-level paragraph
//! and every cell of every top-level table, its text and the byte spans needed
//! to rewrite it later: the whole element, its opening tag, its property
//! block, and the run properties of its first run.

use std::ops::Range;

use formfill_core::{Cell, Document, Paragraph, Row, Table};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::DocxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphSpan {
    /// Qualified element name, e.g. `w:p`.
    pub name: String,
    pub element: Range<usize>,
    pub open_tag: Range<usize>,
    pub self_closing: bool,
    /// `w:pPr`
    pub properties: Option<Range<usize>>,
    /// `w:rPr` of the first run.
    pub run_properties: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpan {
    pub name: String,
    pub element: Range<usize>,
    pub open_tag: Range<usize>,
    pub self_closing: bool,
    /// `w:tcPr`
    pub properties: Option<Range<usize>>,
    pub first_paragraph: Option<ParagraphSpan>,
}

/// Spans of every region, indexed like [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyLayout {
    pub paragraphs: Vec<ParagraphSpan>,
    pub tables: Vec<Vec<Vec<CellSpan>>>,
}

pub fn local_name(name: &[u8]) -> &[u8] {
    name.rsplit(|b| *b == b':').next().unwrap_or(name)
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Offset of the `<` that opens the tag ending at `end`.
fn tag_start(xml: &[u8], end: usize) -> usize {
    xml[..end]
        .iter()
        .rposition(|b| *b == b'<')
        .unwrap_or(end)
}

struct ParagraphBuilder {
    depth: usize,
    in_cell: bool,
    span: ParagraphSpan,
    text: String,
    properties_start: Option<usize>,
    run_depth: Option<usize>,
    seen_run: bool,
    run_properties_start: Option<usize>,
    in_text: bool,
}

impl ParagraphBuilder {
    fn new(depth: usize, in_cell: bool, name: String, start: usize, end: usize, self_closing: bool) -> Self {
        ParagraphBuilder {
            depth,
            in_cell,
            span: ParagraphSpan {
                name,
                element: start..end,
                open_tag: start..end,
                self_closing,
                properties: None,
                run_properties: None,
            },
            text: String::new(),
            properties_start: None,
            run_depth: None,
            seen_run: false,
            run_properties_start: None,
            in_text: false,
        }
    }

    /// Whether a child at `depth` sits directly inside the current run.
    fn in_run_child(&self, depth: usize) -> bool {
        self.run_depth.is_some_and(|run| depth == run + 1)
    }

    /// Runs may be wrapped once (hyperlinks, tracked insertions, smart tags).
    fn accepts_run(&self, depth: usize) -> bool {
        self.run_depth.is_none() && (depth == self.depth + 1 || depth == self.depth + 2)
    }

    fn push_inline(&mut self, local: &[u8], depth: usize) {
        if !self.in_run_child(depth) {
            return;
        }
        match local {
            b"tab" => self.text.push('\t'),
            b"br" | b"cr" => self.text.push('\n'),
            b"noBreakHyphen" => self.text.push('-'),
            _ => {}
        }
    }
}

struct CellBuilder {
    span: CellSpan,
    paragraphs: Vec<String>,
    properties_start: Option<usize>,
}

impl CellBuilder {
    fn new(name: String, start: usize, end: usize, self_closing: bool) -> Self {
        CellBuilder {
            span: CellSpan {
                name,
                element: start..end,
                open_tag: start..end,
                self_closing,
                properties: None,
                first_paragraph: None,
            },
            paragraphs: Vec::new(),
            properties_start: None,
        }
    }

    fn finish(self) -> (CellSpan, String) {
        (self.span, self.paragraphs.join("\n"))
    }
}

#[derive(Default)]
struct Collector {
    document: Document,
    layout: BodyLayout,
    /// Depth of the direct children of `w:body`.
    body_depth: Option<usize>,
    table: Option<(Table, Vec<Vec<CellSpan>>)>,
    row: Option<(Row, Vec<CellSpan>)>,
    cell: Option<CellBuilder>,
    paragraph: Option<ParagraphBuilder>,
}

impl Collector {
    fn at(&self, depth: usize, offset: usize) -> bool {
        self.body_depth == Some(depth.wrapping_sub(offset))
    }

    fn finish_paragraph(&mut self, builder: ParagraphBuilder) {
        if builder.in_cell {
            if let Some(cell) = self.cell.as_mut() {
                if cell.span.first_paragraph.is_none() {
                    cell.span.first_paragraph = Some(builder.span);
                }
                cell.paragraphs.push(builder.text);
            }
        } else {
            self.document.paragraphs.push(Paragraph { text: builder.text });
            self.layout.paragraphs.push(builder.span);
        }
    }

    fn finish_cell(&mut self, builder: CellBuilder) {
        if let Some((row, spans)) = self.row.as_mut() {
            let (span, text) = builder.finish();
            row.cells.push(Cell { text });
            spans.push(span);
        }
    }

    fn finish_row(&mut self) {
        if let (Some((row, spans)), Some((table, table_spans))) = (self.row.take(), self.table.as_mut()) {
            table.rows.push(row);
            table_spans.push(spans);
        }
    }

    fn finish_table(&mut self) {
        if let Some((table, spans)) = self.table.take() {
            self.document.tables.push(table);
            self.layout.tables.push(spans);
        }
    }

    fn start(&mut self, e: &BytesStart<'_>, depth: usize, start: usize, end: usize) {
        let name = e.name();
        let local = local_name(name.as_ref());

        if let Some(p) = self.paragraph.as_mut() {
            match local {
                b"pPr" if depth == p.depth + 1 => p.properties_start = Some(start),
                b"r" if p.accepts_run(depth) => p.run_depth = Some(depth),
                b"rPr" if p.in_run_child(depth) && !p.seen_run => p.run_properties_start = Some(start),
                b"t" if p.in_run_child(depth) => p.in_text = true,
                _ => p.push_inline(local, depth),
            }
            return;
        }

        match local {
            b"body" if self.body_depth.is_none() => self.body_depth = Some(depth + 1),
            b"p" if self.at(depth, 0) => {
                self.paragraph = Some(ParagraphBuilder::new(depth, false, qualified_name(e), start, end, false));
            }
            b"tbl" if self.at(depth, 0) && self.table.is_none() => {
                self.table = Some((Table::default(), Vec::new()));
            }
            b"tr" if self.at(depth, 1) && self.table.is_some() => {
                self.row = Some((Row::default(), Vec::new()));
            }
            b"tc" if self.at(depth, 2) && self.row.is_some() => {
                self.cell = Some(CellBuilder::new(qualified_name(e), start, end, false));
            }
            b"tcPr" if self.at(depth, 3) => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.properties_start = Some(start);
                }
            }
            b"p" if self.at(depth, 3) && self.cell.is_some() => {
                self.paragraph = Some(ParagraphBuilder::new(depth, true, qualified_name(e), start, end, false));
            }
            _ => {}
        }
    }

    fn empty(&mut self, e: &BytesStart<'_>, depth: usize, start: usize, end: usize) {
        let name = e.name();
        let local = local_name(name.as_ref());

        if let Some(p) = self.paragraph.as_mut() {
            match local {
                b"pPr" if depth == p.depth + 1 => p.span.properties = Some(start..end),
                b"rPr" if p.in_run_child(depth) && !p.seen_run => {
                    p.span.run_properties = Some(start..end);
                }
                b"r" if p.accepts_run(depth) => {
                    // An empty run still counts as the first run.
                    p.seen_run = true;
                }
                _ => p.push_inline(local, depth),
            }
            return;
        }

        match local {
            b"p" if self.at(depth, 0) => {
                let builder = ParagraphBuilder::new(depth, false, qualified_name(e), start, end, true);
                self.finish_paragraph(builder);
            }
            b"p" if self.at(depth, 3) && self.cell.is_some() => {
                let builder = ParagraphBuilder::new(depth, true, qualified_name(e), start, end, true);
                self.finish_paragraph(builder);
            }
            b"tcPr" if self.at(depth, 3) => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.span.properties = Some(start..end);
                }
            }
            b"tc" if self.at(depth, 2) && self.row.is_some() => {
                let builder = CellBuilder::new(qualified_name(e), start, end, true);
                self.finish_cell(builder);
            }
            b"tr" if self.at(depth, 1) && self.table.is_some() => {
                self.row = Some((Row::default(), Vec::new()));
                self.finish_row();
            }
            b"tbl" if self.at(depth, 0) && self.table.is_none() => {
                self.table = Some((Table::default(), Vec::new()));
                self.finish_table();
            }
            _ => {}
        }
    }

    fn end(&mut self, local: &[u8], depth: usize, end: usize) {
        if let Some(mut p) = self.paragraph.take() {
            if depth == p.depth && local == b"p" {
                p.span.element.end = end;
                self.finish_paragraph(p);
                return;
            }
            match local {
                b"t" if p.in_run_child(depth) => p.in_text = false,
                b"rPr" if p.in_run_child(depth) => {
                    if let Some(rpr_start) = p.run_properties_start.take() {
                        p.span.run_properties = Some(rpr_start..end);
                    }
                }
                b"r" if p.run_depth == Some(depth) => {
                    p.run_depth = None;
                    p.seen_run = true;
                }
                b"pPr" if depth == p.depth + 1 => {
                    if let Some(ppr_start) = p.properties_start.take() {
                        p.span.properties = Some(ppr_start..end);
                    }
                }
                _ => {}
            }
            self.paragraph = Some(p);
            return;
        }

        match local {
            b"tcPr" if self.at(depth, 3) => {
                if let Some(cell) = self.cell.as_mut() {
                    if let Some(tcpr_start) = cell.properties_start.take() {
                        cell.span.properties = Some(tcpr_start..end);
                    }
                }
            }
            b"tc" if self.at(depth, 2) => {
                if let Some(mut cell) = self.cell.take() {
                    cell.span.element.end = end;
                    self.finish_cell(cell);
                }
            }
            b"tr" if self.at(depth, 1) => self.finish_row(),
            b"tbl" if self.at(depth, 0) => self.finish_table(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(p) = self.paragraph.as_mut() {
            if p.in_text {
                p.text.push_str(text);
            }
        }
    }
}

/// Parse `word/document.xml` into the text model and its byte layout.
pub fn parse_body(xml: &[u8]) -> Result<(Document, BodyLayout), DocxError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);

    let mut collector = Collector::default();
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        let end = reader.buffer_position();
        match event {
            Event::Start(ref e) => {
                let start = tag_start(xml, end);
                collector.start(e, depth, start, end);
                depth += 1;
            }
            Event::Empty(ref e) => {
                let start = tag_start(xml, end);
                collector.empty(e, depth, start, end);
            }
            Event::End(ref e) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| DocxError::Malformed("unbalanced closing tag".to_string()))?;
                let name = e.name();
                collector.end(local_name(name.as_ref()), depth, end);
            }
            Event::Text(ref t) => {
                let text = t.unescape()?;
                collector.text(&text);
            }
            Event::CData(ref t) => {
                let text = String::from_utf8_lossy(t).into_owned();
                collector.text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(DocxError::Malformed("unexpected end of document".to_string()));
    }
    if collector.body_depth.is_none() {
        return Err(DocxError::Malformed("no body element".to_string()));
    }

    log::debug!(
        "parsed body: {} paragraph(s), {} table(s)",
        collector.document.paragraphs.len(),
        collector.document.tables.len()
    );

    Ok((collector.document, collector.layout))
}

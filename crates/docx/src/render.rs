//! Region rewriting
//!
//! Rebuilds the XML of a paragraph or cell whose text changed and splices the
//! replacements into the original `document.xml`. Everything outside a
//! replaced element is copied byte for byte.

use std::ops::Range;

use formfill_core::Document;
use quick_xml::escape::escape;

use crate::layout::{BodyLayout, CellSpan, ParagraphSpan};
use crate::DocxError;

fn prefix(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

fn qualify(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) => format!("{p}:{local}"),
        None => local.to_string(),
    }
}

/// Opening tag bytes, with a self-closing `<x .../>` turned into `<x ...>`.
fn open_tag(xml: &[u8], range: &Range<usize>, self_closing: bool) -> Vec<u8> {
    let raw = &xml[range.clone()];
    if !self_closing {
        return raw.to_vec();
    }
    let mut tag = raw.strip_suffix(b"/>").unwrap_or(raw).to_vec();
    while tag.last().is_some_and(|b| b.is_ascii_whitespace()) {
        tag.pop();
    }
    tag.push(b'>');
    tag
}

fn slice<'a>(xml: &'a [u8], range: &Option<Range<usize>>) -> &'a [u8] {
    match range {
        Some(r) => &xml[r.clone()],
        None => &[],
    }
}

/// Run content for `text`: tabs become `tab`, newlines become `br`.
fn run_content(prefix: Option<&str>, text: &str) -> String {
    let t = qualify(prefix, "t");
    let mut out = String::new();
    let mut segment = String::new();

    let flush = |segment: &mut String, out: &mut String| {
        if !segment.is_empty() {
            out.push_str(&format!(r#"<{t} xml:space="preserve">{}</{t}>"#, escape(segment.as_str())));
            segment.clear();
        }
    };

    for c in text.chars() {
        match c {
            '\t' => {
                flush(&mut segment, &mut out);
                out.push_str(&format!("<{}/>", qualify(prefix, "tab")));
            }
            '\n' => {
                flush(&mut segment, &mut out);
                out.push_str(&format!("<{}/>", qualify(prefix, "br")));
            }
            '\r' => {}
            _ => segment.push(c),
        }
    }
    flush(&mut segment, &mut out);
    out
}

/// A paragraph holding `text` as a single run, keeping paragraph and first-run properties.
pub fn paragraph_xml(xml: &[u8], span: &ParagraphSpan, text: &str) -> Vec<u8> {
    let prefix = prefix(&span.name);
    let mut out = open_tag(xml, &span.open_tag, span.self_closing);
    out.extend_from_slice(slice(xml, &span.properties));

    if !text.is_empty() {
        let r = qualify(prefix, "r");
        out.extend_from_slice(format!("<{r}>").as_bytes());
        out.extend_from_slice(slice(xml, &span.run_properties));
        out.extend_from_slice(run_content(prefix, text).as_bytes());
        out.extend_from_slice(format!("</{r}>").as_bytes());
    }

    out.extend_from_slice(format!("</{}>", span.name).as_bytes());
    out
}

/// A cell reduced to one paragraph holding `text`, keeping cell properties.
pub fn cell_xml(xml: &[u8], span: &CellSpan, text: &str) -> Vec<u8> {
    let prefix = prefix(&span.name);
    let mut out = open_tag(xml, &span.open_tag, span.self_closing);
    out.extend_from_slice(slice(xml, &span.properties));

    match &span.first_paragraph {
        Some(paragraph) => out.extend_from_slice(&paragraph_xml(xml, paragraph, text)),
        None => {
            let p = qualify(prefix, "p");
            out.extend_from_slice(format!("<{p}>").as_bytes());
            if !text.is_empty() {
                let r = qualify(prefix, "r");
                out.extend_from_slice(format!("<{r}>{}</{r}>", run_content(prefix, text)).as_bytes());
            }
            out.extend_from_slice(format!("</{p}>").as_bytes());
        }
    }

    out.extend_from_slice(format!("</{}>", span.name).as_bytes());
    out
}

/// Replacement XML for every region whose text differs between `before` and `after`.
pub fn changed_regions(
    xml: &[u8],
    layout: &BodyLayout,
    before: &Document,
    after: &Document,
) -> Result<Vec<(Range<usize>, Vec<u8>)>, DocxError> {
    if !before.same_shape(after) || layout.paragraphs.len() != before.paragraphs.len() {
        return Err(DocxError::StructureMismatch);
    }

    let mut replacements = Vec::new();

    for ((span, old), new) in layout
        .paragraphs
        .iter()
        .zip(&before.paragraphs)
        .zip(&after.paragraphs)
    {
        if old.text != new.text {
            replacements.push((span.element.clone(), paragraph_xml(xml, span, &new.text)));
        }
    }

    for ((spans, old), new) in layout.tables.iter().zip(&before.tables).zip(&after.tables) {
        for ((row_spans, old_row), new_row) in spans.iter().zip(&old.rows).zip(&new.rows) {
            for ((span, old_cell), new_cell) in row_spans.iter().zip(&old_row.cells).zip(&new_row.cells) {
                if old_cell.text != new_cell.text {
                    replacements.push((span.element.clone(), cell_xml(xml, span, &new_cell.text)));
                }
            }
        }
    }

    Ok(replacements)
}

/// Apply non-overlapping replacements to `xml`.
pub fn splice(xml: &[u8], mut replacements: Vec<(Range<usize>, Vec<u8>)>) -> Result<Vec<u8>, DocxError> {
    replacements.sort_by_key(|(range, _)| range.start);

    let mut out = Vec::with_capacity(xml.len());
    let mut cursor = 0;
    for (range, bytes) in replacements {
        if range.start < cursor || range.end > xml.len() {
            return Err(DocxError::Malformed("overlapping region spans".to_string()));
        }
        out.extend_from_slice(&xml[cursor..range.start]);
        out.extend_from_slice(&bytes);
        cursor = range.end;
    }
    out.extend_from_slice(&xml[cursor..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::parse_body;

    fn body(inner: &str) -> String {
        format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{inner}</w:body></w:document>"#
        )
    }

    fn rewrite(xml: &str, edit: impl FnOnce(&mut Document)) -> (String, Document) {
        let (before, layout) = parse_body(xml.as_bytes()).unwrap();
        let mut after = before.clone();
        edit(&mut after);
        let replacements = changed_regions(xml.as_bytes(), &layout, &before, &after).unwrap();
        let out = splice(xml.as_bytes(), replacements).unwrap();
        let out = String::from_utf8(out).unwrap();
        let (reparsed, _) = parse_body(out.as_bytes()).unwrap();
        (out, reparsed)
    }

    #[test]
    fn test_unchanged_document_is_identical() {
        let xml = body(r#"<w:p><w:r><w:t>Same</w:t></w:r></w:p>"#);
        let (out, _) = rewrite(&xml, |_| {});
        assert_eq!(out, xml);
    }

    #[test]
    fn test_paragraph_keeps_properties() {
        let xml = body(
            r#"<w:p w:rsidR="00A1"><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Full Name: </w:t></w:r><w:r><w:t>____</w:t></w:r></w:p><w:p><w:r><w:t>Untouched</w:t></w:r></w:p>"#,
        );
        let (out, reparsed) = rewrite(&xml, |doc| {
            doc.paragraphs[0].text = "Full Name: Ana Popescu".to_string();
        });
        assert!(out.contains(
            r#"<w:p w:rsidR="00A1"><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Full Name: Ana Popescu</w:t></w:r></w:p>"#
        ));
        assert!(out.contains(r#"<w:p><w:r><w:t>Untouched</w:t></w:r></w:p>"#));
        assert_eq!(reparsed.paragraphs[0].text, "Full Name: Ana Popescu");
    }

    #[test]
    fn test_self_closing_paragraph_filled() {
        let xml = body(r#"<w:p><w:r><w:t>Label</w:t></w:r></w:p><w:p w:rsidR="1" />"#);
        let (out, reparsed) = rewrite(&xml, |doc| {
            doc.paragraphs[1].text = "value".to_string();
        });
        assert!(out.contains(r#"<w:p w:rsidR="1"><w:r><w:t xml:space="preserve">value</w:t></w:r></w:p>"#));
        assert_eq!(reparsed.paragraphs[1].text, "value");
    }

    #[test]
    fn test_escaping_tabs_and_breaks() {
        let xml = body(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        let text = "A <b> & \"c\"\tD\nE";
        let (out, reparsed) = rewrite(&xml, |doc| {
            doc.paragraphs[0].text = text.to_string();
        });
        assert!(out.contains("&lt;b&gt; &amp;"));
        assert!(out.contains("<w:tab/>"));
        assert!(out.contains("<w:br/>"));
        assert_eq!(reparsed.paragraphs[0].text, text);
    }

    #[test]
    fn test_cell_rewrite_keeps_tcpr_and_drops_extra_paragraphs() {
        let xml = body(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Date of birth</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr><w:p><w:pPr><w:jc w:val="left"/></w:pPr></w:p><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let (out, reparsed) = rewrite(&xml, |doc| {
            doc.tables[0].rows[0].cells[1].text = "1990-01-01".to_string();
        });
        assert!(out.contains(
            r#"<w:tc><w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr><w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:t xml:space="preserve">1990-01-01</w:t></w:r></w:p></w:tc>"#
        ));
        assert_eq!(reparsed.tables[0].rows[0].cells[1].text, "1990-01-01");
        assert_eq!(reparsed.tables[0].rows[0].cells[0].text, "Date of birth");
    }

    #[test]
    fn test_cell_without_paragraph() {
        let xml = body(r#"<w:tbl><w:tr><w:tc><w:tcPr/></w:tc></w:tr></w:tbl>"#);
        let (_, reparsed) = rewrite(&xml, |doc| {
            doc.tables[0].rows[0].cells[0].text = "v".to_string();
        });
        assert_eq!(reparsed.tables[0].rows[0].cells[0].text, "v");
    }

    #[test]
    fn test_cleared_paragraph_has_no_run() {
        let xml = body(r#"<w:p><w:r><w:t>gone</w:t></w:r></w:p>"#);
        let (out, reparsed) = rewrite(&xml, |doc| doc.paragraphs[0].text.clear());
        assert!(out.contains("<w:p></w:p>"));
        assert_eq!(reparsed.paragraphs[0].text, "");
    }

    #[test]
    fn test_structure_mismatch() {
        let xml = body(r#"<w:p/>"#);
        let (before, layout) = parse_body(xml.as_bytes()).unwrap();
        let mut after = before.clone();
        after.paragraphs.push(Default::default());
        assert!(matches!(
            changed_regions(xml.as_bytes(), &layout, &before, &after),
            Err(DocxError::StructureMismatch)
        ));
    }

    #[test]
    fn test_splice_rejects_overlap() {
        let result = splice(b"0123456789", vec![(0..5, b"a".to_vec()), (3..7, b"b".to_vec())]);
        assert!(result.is_err());
    }
}

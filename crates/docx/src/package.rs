//! Zip container I/O
//!
//! A `.docx` file is a zip archive of XML parts. Entries are kept in their
//! original order so the rewritten package looks like the input to Word.

use std::io::{Cursor, Read, Write};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::layout::local_name;
use crate::DocxError;

pub const DEFAULT_MAIN_PART: &str = "word/document.xml";
const ROOT_RELS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub is_dir: bool,
}

/// Read every entry of a zip archive, preserving order.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<PackageEntry>, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let is_dir = entry.is_dir();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        entries.push(PackageEntry { name, data, is_dir });
    }
    Ok(entries)
}

/// Write entries back into a zip archive.
///
/// Media parts are stored, everything else is deflated.
pub fn write_entries<'a, I>(entries: I) -> Result<Vec<u8>, DocxError>
where
    I: IntoIterator<Item = (&'a str, &'a [u8], bool)>,
{
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data, is_dir) in entries {
        if is_dir {
            zip.add_directory(name, stored)?;
            continue;
        }
        let options = if name.starts_with("word/media/") {
            stored
        } else {
            deflated
        };
        zip.start_file(name, options)?;
        zip.write_all(data)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Name of the main document part, from the package relationships.
///
/// Falls back to `word/document.xml` when the relationships part is absent
/// or does not name an office document.
pub fn main_part_name(entries: &[PackageEntry]) -> Result<String, DocxError> {
    let Some(rels) = entries.iter().find(|e| e.name == ROOT_RELS) else {
        return Ok(DEFAULT_MAIN_PART.to_string());
    };

    let mut reader = Reader::from_reader(rels.data.as_slice());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if local_name(e.name().as_ref()) == b"Relationship" => {
                let mut kind = None;
                let mut target = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.as_ref() {
                        b"Type" => kind = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }
                if let (Some(kind), Some(target)) = (kind, target) {
                    if kind.ends_with(OFFICE_DOCUMENT_REL) {
                        return Ok(target.trim_start_matches('/').to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(DEFAULT_MAIN_PART.to_string())
}

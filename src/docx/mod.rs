//! Reading of `.docx` packages: the zip container, its relationships and content types.
//!
//! A docx file is an OPC package, a zip archive whose entries ("parts") reference one another
//! through `.rels` relationship parts. The main document lives in `word/document.xml`; images
//! live under `word/media/` and are reached from the document through relationship ids.

pub mod content_types;
pub mod relationships;
pub mod units;
pub mod xml;

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::errors::DocxError;

use self::content_types::ContentTypes;
use self::relationships::Relationships;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const MAX_SIZE_HINT: u64 = 16 << 20;

/// An in-memory docx package
#[derive(Debug)]
pub struct DocxPackage {
    parts: BTreeMap<String, Vec<u8>>,
    relationships: Relationships,
    content_types: ContentTypes,
}

impl DocxPackage {
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        log::debug!("Reading document {:?}", path);
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = BTreeMap::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches('/').to_string();
            let mut data = Vec::with_capacity(capacity_hint(entry.size()));
            entry.read_to_end(&mut data)?;
            parts.insert(name, data);
        }

        if !parts.contains_key(DOCUMENT_PART) {
            return Err(DocxError::MissingPart(DOCUMENT_PART.to_string()));
        }

        let relationships = match parts.get(DOCUMENT_RELS_PART) {
            Some(data) => {
                Relationships::parse(DOCUMENT_RELS_PART, part_text(DOCUMENT_RELS_PART, data)?, "word")?
            }
            None => Relationships::default(),
        };
        let content_types = match parts.get(CONTENT_TYPES_PART) {
            Some(data) => ContentTypes::parse(CONTENT_TYPES_PART, part_text(CONTENT_TYPES_PART, data)?)?,
            None => {
                log::warn!("Document has no {CONTENT_TYPES_PART}; guessing image types");
                ContentTypes::default()
            }
        };
        log::debug!(
            "Loaded {} parts and {} document relationships",
            parts.len(),
            relationships.len()
        );

        Ok(DocxPackage {
            parts,
            relationships,
            content_types,
        })
    }

    /// The main document XML
    pub fn document_xml(&self) -> Result<&str, DocxError> {
        let data = self
            .parts
            .get(DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;
        part_text(DOCUMENT_PART, data)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Relationships of `word/document.xml`
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }
}

/// The size an entry declares in the zip directory is only a hint, capped before allocating
fn capacity_hint(declared: u64) -> usize {
    declared.min(MAX_SIZE_HINT) as usize
}

fn part_text<'a>(name: &str, data: &'a [u8]) -> Result<&'a str, DocxError> {
    std::str::from_utf8(data).map_err(|_| DocxError::Encoding(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_sizes_are_capped() {
        assert_eq!(capacity_hint(2048), 2048);
        assert_eq!(capacity_hint(u64::MAX), MAX_SIZE_HINT as usize);
        assert_eq!(capacity_hint(0xFFFF_FFF0), 16 << 20);
    }

    #[test]
    fn undecodable_parts() {
        assert!(matches!(
            part_text("word/document.xml", &[0xff, 0xfe, 0x00]),
            Err(DocxError::Encoding(part)) if part == "word/document.xml"
        ))
    }
}

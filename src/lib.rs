//! Mail-merge spreadsheet rows with a styled `.docx` body!
//!
//! This crate provides a CLI tool (`docmerge`) that reads a message body from a word-processing
//! document, converts it to an HTML fragment, merges it with per-recipient data from a
//! spreadsheet through a Tera template, and sends one HTML email per recipient (optionally with
//! attachments) through an SMTP relay, or writes them out as `.eml` files.
//!
//! The library exposes the pieces separately:
//!
//! - [`docx`]: reading the docx package (parts, relationships, content types, units)
//! - [`parser`]: converting `word/document.xml` into the [`graph`] of paragraphs, styled spans,
//!   hyperlinks and images
//! - [`backends`]: rendering the graph as HTML, and rendering each recipient's email
//! - [`recipients`]: reading the merge data from xlsx/xls/ods workbooks
//! - [`mailer`]: building MIME messages and delivering them
//!
//! Only the top-level paragraphs of a document are converted; tables, headers, footers and
//! notes are not.

pub mod backends;
pub mod docx;
pub mod errors;
pub mod graph;
pub mod mailer;
pub mod parser;
pub mod recipients;

use std::path::Path;

use docx::DocxPackage;
use errors::DocxError;
use graph::body::Body;
use parser::BodyParser;

/// Reads a document and extracts its body
pub fn extract_body(path: &Path) -> Result<Body, DocxError> {
    let package = DocxPackage::open(path)?;
    BodyParser::new(&package).parse()
}

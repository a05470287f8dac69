use std::io;
use std::path::PathBuf;

/// Errors produced while reading a docx package or its XML parts
#[derive(thiserror::Error, Debug)]
pub enum DocxError {
    #[error("Unable to read document: {0}")]
    Io(#[from] io::Error),
    #[error("Document is not a valid zip package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Malformed XML in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: roxmltree::Error,
    },
    #[error("Document package is missing the {0} part")]
    MissingPart(String),
    #[error("Document part {0} is not valid UTF-8")]
    Encoding(String),
}

/// Errors produced while reading recipients from a spreadsheet
#[derive(thiserror::Error, Debug)]
pub enum RecipientError {
    #[error("Unable to open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook {0:?} contains no worksheets")]
    NoSheets(PathBuf),
    #[error("Worksheet {0:?} not found")]
    SheetNotFound(String),
    #[error("Worksheet is empty; expected a header row")]
    MissingHeader,
    #[error("Required column {0:?} not found in the header row")]
    MissingColumn(String),
}

/// Errors produced while compiling or rendering the email templates
#[derive(thiserror::Error, Debug)]
pub enum MergeError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Errors produced while building or delivering a message
#[derive(thiserror::Error, Debug)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Unable to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Invalid content type {0:?}")]
    ContentType(String),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Unable to write message file: {0}")]
    File(#[from] lettre::transport::file::Error),
    #[error("Unable to read attachment {path:?}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to prepare outbox: {0}")]
    Io(#[from] io::Error),
}

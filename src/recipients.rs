//! Reads the merge data: one recipient per spreadsheet row, the first row being the header.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{Datelike, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::RecipientError;

static RE_NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Clone)]
pub struct RecipientOptions {
    /// Worksheet to read; the first one when `None`
    pub sheet: Option<String>,
    pub name_column: String,
    pub email_column: String,
}

impl Default for RecipientOptions {
    fn default() -> Self {
        RecipientOptions {
            sheet: None,
            name_column: "Name".to_string(),
            email_column: "Email".to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// 1-based row number in the worksheet
    pub row: usize,
    pub name: String,
    pub email: String,
    /// Every column of the row, keyed by the normalized header
    pub fields: BTreeMap<String, String>,
}

/// Reads recipients from any workbook format calamine understands (xlsx, xlsm, xlsb, xls, ods)
pub fn read_recipients(
    path: &Path,
    options: &RecipientOptions,
) -> Result<Vec<Recipient>, RecipientError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    let sheet = match &options.sheet {
        Some(sheet) if sheet_names.contains(sheet) => sheet.clone(),
        Some(sheet) => return Err(RecipientError::SheetNotFound(sheet.clone())),
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| RecipientError::NoSheets(path.to_path_buf()))?,
    };
    log::debug!("Reading recipients from worksheet {sheet:?} of {path:?}");
    let range = workbook.worksheet_range(&sheet)?;
    recipients_from_range(&range, options)
}

/// Turns a worksheet range into recipients. Fully empty rows are ignored and rows without an
/// email address are skipped with a warning.
pub fn recipients_from_range(
    range: &Range<Data>,
    options: &RecipientOptions,
) -> Result<Vec<Recipient>, RecipientError> {
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or(RecipientError::MissingHeader)?
        .iter()
        .map(|cell| column_key(&cell_to_string(cell)))
        .collect();

    let name_index = column_index(&header, &options.name_column)?;
    let email_index = column_index(&header, &options.email_column)?;

    let mut recipients = vec![];
    for (offset, row) in rows.enumerate() {
        let values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(String::is_empty) {
            continue;
        }
        // header is the first row, and sheet rows count from 1
        let row_number = first_row + offset + 2;
        let email = values.get(email_index).cloned().unwrap_or_default();
        if email.is_empty() {
            log::warn!("Row {row_number} has no email address; skipping");
            continue;
        }
        let fields = header
            .iter()
            .zip(values.iter())
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        recipients.push(Recipient {
            row: row_number,
            name: values.get(name_index).cloned().unwrap_or_default(),
            email,
            fields,
        });
    }
    log::debug!("Read {} recipients", recipients.len());
    Ok(recipients)
}

/// Normalizes a header into a template-friendly key: `Email Address` -> `email_address`
pub fn column_key(header: &str) -> String {
    RE_NON_ALPHANUMERIC
        .replace_all(&header.trim().to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

fn column_index(header: &[String], column: &str) -> Result<usize, RecipientError> {
    let key = column_key(column);
    header
        .iter()
        .position(|h| *h == key)
        .ok_or_else(|| RecipientError::MissingColumn(column.to_string()))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => format_datetime(datetime),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            log::debug!("Cell error {e:?} read as empty");
            String::new()
        }
    }
}

/// Time-only cells (which sit on the spreadsheet epoch) print as `14:30`, dates as
/// `26 August 2024`
fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.year() < 1900 {
        datetime.format("%H:%M").to_string()
    } else if datetime.time() == NaiveTime::MIN {
        datetime.format("%d %B %Y").to_string()
    } else {
        datetime.format("%d %B %Y %H:%M").to_string()
    }
}

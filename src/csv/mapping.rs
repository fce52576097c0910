//! Header mapping and row normalization.
//!
//! The header row drives which columns end up in a candidate record. Header
//! names are matched case-insensitively and with one layer of surrounding
//! quotes stripped, because spreadsheet exports routinely over-quote headers.

use std::collections::HashMap;

/// Column names the importer recognizes. Anything else is carried in the
/// header map but never consulted.
pub const CONTACT_FIELDS: [&str; 6] = ["name", "email", "phone", "company", "status", "notes"];

/// A contact row after column mapping but before validation. Every field is
/// optional; an empty cell and a missing column both read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Build a normalized column-name -> index map from the header row.
///
/// Caveat: when the same header name appears twice, the last occurrence
/// wins.
pub fn map_header(header_row: &[String]) -> HashMap<String, usize> {
    header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| (strip_quotes(cell.trim()).trim().to_lowercase(), idx))
        .collect()
}

/// Map one tokenized row into a [`CandidateRecord`] using the header map.
///
/// Pure function of its inputs: rows shorter than the header simply yield
/// absent values for the missing trailing columns.
pub fn normalize_row(row: &[String], header: &HashMap<String, usize>) -> CandidateRecord {
    let field = |key: &str| -> Option<String> {
        let idx = *header.get(key)?;
        let raw = row.get(idx)?;
        let value = strip_quotes(raw.trim()).trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    CandidateRecord {
        name: field("name"),
        email: field("email"),
        phone: field("phone"),
        company: field("company"),
        status: field("status"),
        notes: field("notes"),
    }
}

/// Strip one layer of surrounding single or double quotes, if present.
pub(crate) fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if s.len() >= 2 {
        let (first, last) = (bytes[0], bytes[s.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

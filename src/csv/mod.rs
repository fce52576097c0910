//! Contact CSV import/export pipeline.
//!
//! This module is a self-contained, synchronous pipeline that turns an
//! uploaded CSV file into a batch of validated contacts, and serializes
//! stored contacts back out to CSV.
//!
//! # Pipeline Stages
//!
//! 1. **`tokenizer`**: raw text -> rows of unescaped fields (quote-aware)
//! 2. **`mapping`**: header row -> column map; data row -> candidate record
//! 3. **`validate`**: candidates -> accepted records + per-reason reject counts
//! 4. **`report`**: outcome -> human-readable import summary
//! 5. **`export`**: stored contacts -> CSV text (the reverse direction)
//!
//! The whole import side runs as one pass with no I/O; classification is
//! total, so a bad row never fails the batch. The only failure the pipeline
//! itself can produce is [`ImportError::NothingToImport`] for an empty or
//! header-only file. Everything after the pipeline (the bulk write) belongs
//! to the store.

pub mod export;
pub mod mapping;
pub mod report;
pub mod tokenizer;
pub mod validate;

pub use export::{render_contacts_csv, CsvAttachment, EXPORT_HEADER};
pub use report::{summarize, ImportReport};
pub use validate::{classify, is_valid_email, ImportOutcome, ReasonCounts};

use thiserror::Error;

/// Errors produced by the import pipeline itself.
///
/// Row-level problems are never errors; they are counted in the
/// [`ImportOutcome`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("nothing to import: file has no data rows")]
    NothingToImport,
}

/// Run the full import pipeline over raw CSV text.
///
/// Requires a header row and at least one data row; anything less is
/// reported as [`ImportError::NothingToImport`] before any state is created.
pub fn parse_contacts(input: &str) -> Result<ImportOutcome, ImportError> {
    let rows = tokenizer::tokenize(input);
    if rows.len() < 2 {
        return Err(ImportError::NothingToImport);
    }

    let header = mapping::map_header(&rows[0]);
    let candidates = rows[1..]
        .iter()
        .map(|row| mapping::normalize_row(row, &header))
        .collect();

    Ok(classify(candidates))
}

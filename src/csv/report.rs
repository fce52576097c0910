//! Import outcome summarization.

use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use super::validate::ImportOutcome;

/// Summary returned to the dashboard after an import attempt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    /// Rows that passed classification but were already stored for this
    /// owner. Zero until the store's insert result is folded in.
    #[serde(default)]
    pub already_stored: usize,
    pub missing_email: usize,
    pub invalid_email: usize,
    pub duplicate_email: usize,
    pub message: String,
}

impl ImportReport {
    /// Fold the store's insert count into the report.
    ///
    /// Classification accepts rows before the store sees them; rows whose
    /// email the owner already has are skipped by the bulk insert's conflict
    /// clause. This rewrites `imported` to the number of rows that actually
    /// landed and surfaces the remainder as `already_stored`, keeping the
    /// message in step with the database.
    pub fn apply_inserted(&mut self, inserted: usize) {
        let already_stored = self.imported.saturating_sub(inserted);
        if already_stored == 0 {
            return;
        }

        self.imported = inserted;
        self.already_stored = already_stored;
        self.message = if self.skipped > 0 {
            format!(
                "Imported {inserted} contacts ({already_stored} already stored, {} rows skipped)",
                self.skipped
            )
        } else {
            format!("Imported {inserted} contacts ({already_stored} already stored)")
        };
    }
}

/// Format an [`ImportOutcome`] into counts plus a one-line message.
///
/// Pure formatting; the accepted records themselves are untouched. When
/// nothing was accepted, the message enumerates the non-zero rejection
/// reasons in a fixed order so repeated imports read consistently.
pub fn summarize(outcome: &ImportOutcome) -> ImportReport {
    let imported = outcome.accepted.len();
    let skipped = outcome.rejected.total();

    let message = if imported > 0 {
        if skipped > 0 {
            format!("Imported {imported} contacts ({skipped} rows skipped)")
        } else {
            format!("Imported {imported} contacts")
        }
    } else {
        let r = &outcome.rejected;
        let mut reasons = Vec::new();
        if r.missing_email > 0 {
            reasons.push(format!("{} missing an email address", r.missing_email));
        }
        if r.invalid_email > 0 {
            reasons.push(format!("{} with an invalid email address", r.invalid_email));
        }
        if r.duplicate_email > 0 {
            reasons.push(format!("{} duplicated within the file", r.duplicate_email));
        }
        if reasons.is_empty() {
            "No contacts found in file".to_string()
        } else {
            format!("No contacts imported: {}", reasons.join(", "))
        }
    };

    ImportReport {
        imported,
        skipped,
        already_stored: 0,
        missing_email: outcome.rejected.missing_email,
        invalid_email: outcome.rejected.invalid_email,
        duplicate_email: outcome.rejected.duplicate_email,
        message,
    }
}

//! CSV export of stored contacts.
//!
//! Runs in the opposite direction of the import pipeline but does **not**
//! share its escaping rules: exported fields are joined with commas as-is,
//! with no quoting. A field value containing a comma, quote or newline will
//! not survive a round-trip.

use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use std::io::Cursor;

use crate::models::Contact;

/// Fixed header row of the export file.
pub const EXPORT_HEADER: &str = "Name,Email,Phone,Company,Status,Notes,Created At";

/// Serialize stored contacts to CSV text, newest input first.
///
/// Output is deterministic given the input order. The creation timestamp is
/// rendered as a plain `YYYY-MM-DD` date.
pub fn render_contacts_csv(contacts: &[Contact]) -> String {
    let mut out = String::with_capacity(64 * (contacts.len() + 1));
    out.push_str(EXPORT_HEADER);
    out.push('\n');

    for contact in contacts {
        let created = contact
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            contact.name,
            contact.email,
            contact.phone.as_deref().unwrap_or(""),
            contact.company.as_deref().unwrap_or(""),
            contact.status,
            contact.notes.as_deref().unwrap_or(""),
            created
        ));
    }

    out
}

/// Responder serving CSV text as a downloadable attachment.
pub struct CsvAttachment {
    pub filename: &'static str,
    pub body: String,
}

impl<'r> Responder<'r, 'static> for CsvAttachment {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

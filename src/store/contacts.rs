//! Contact persistence.
//!
//! All operations are scoped to an explicit owner id; there is no ambient
//! session state. The bulk insert is a single UNNEST statement so an import
//! batch lands in one round trip, with the table's unique constraint on
//! `(user_id, email)` absorbing cross-batch duplicates.

use rocket_db_pools::sqlx::{self, PgPool};

use crate::models::{Contact, NewContact};

const CONTACT_COLUMNS: &str =
    "id, user_id, name, email, phone, company, status, notes, created_at";

/// Store handle owning a connection pool, cheap to construct per request.
pub struct ContactStore {
    pool: PgPool,
}

/// Partial update for a stored contact; `None` fields are left unchanged.
#[derive(Debug, Default, Clone)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl ContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an accepted import batch in one statement.
    ///
    /// Emails already stored for this owner are skipped via
    /// `ON CONFLICT DO NOTHING`, which makes re-importing the same file
    /// idempotent. Returns the number of rows actually inserted.
    pub async fn bulk_insert(
        &self,
        owner_id: i32,
        records: &[NewContact],
    ) -> Result<usize, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut names = Vec::with_capacity(records.len());
        let mut emails = Vec::with_capacity(records.len());
        let mut phones = Vec::with_capacity(records.len());
        let mut companies = Vec::with_capacity(records.len());
        let mut statuses = Vec::with_capacity(records.len());
        let mut notes = Vec::with_capacity(records.len());

        for record in records {
            names.push(record.name.clone());
            emails.push(record.email.clone());
            phones.push(record.phone.clone());
            companies.push(record.company.clone());
            statuses.push(record.status.as_str().to_string());
            notes.push(record.notes.clone());
        }

        let result = sqlx::query(
            r#"INSERT INTO contacts (user_id, name, email, phone, company, status, notes)
               SELECT $1, name, email, phone, company, status, notes
               FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[])
                    AS t(name, email, phone, company, status, notes)
               ON CONFLICT (user_id, email) DO NOTHING"#,
        )
        .bind(owner_id)
        .bind(&names)
        .bind(&emails)
        .bind(&phones)
        .bind(&companies)
        .bind(&statuses)
        .bind(&notes)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() as usize;
        log::trace!(
            "bulk inserted {} of {} contacts for user {}",
            inserted,
            records.len(),
            owner_id
        );
        Ok(inserted)
    }

    /// All contacts for an owner, newest first. Also feeds the exporter.
    pub async fn list(&self, owner_id: i32) -> Result<Vec<Contact>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Case-insensitive substring search over name and email.
    pub async fn search(&self, owner_id: i32, query: &str) -> Result<Vec<Contact>, sqlx::Error> {
        let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        sqlx::query_as(&format!(
            r#"SELECT {CONTACT_COLUMNS} FROM contacts
               WHERE user_id = $1 AND (name ILIKE $2 OR email ILIKE $2)
               ORDER BY created_at DESC, id DESC"#
        ))
        .bind(owner_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert a single contact created through the form. Returns `None` when
    /// the owner already has a contact with this email.
    pub async fn insert_one(
        &self,
        owner_id: i32,
        record: &NewContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        sqlx::query_as(&format!(
            r#"INSERT INTO contacts (user_id, name, email, phone, company, status, notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (user_id, email) DO NOTHING
               RETURNING {CONTACT_COLUMNS}"#
        ))
        .bind(owner_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.company)
        .bind(record.status.as_str())
        .bind(&record.notes)
        .fetch_optional(&self.pool)
        .await
    }

    /// Apply a partial update; unspecified fields keep their stored value.
    pub async fn update(
        &self,
        owner_id: i32,
        contact_id: i32,
        changes: &ContactChanges,
    ) -> Result<Option<Contact>, sqlx::Error> {
        sqlx::query_as(&format!(
            r#"UPDATE contacts
               SET name = COALESCE($3, name),
                   email = COALESCE($4, email),
                   phone = COALESCE($5, phone),
                   company = COALESCE($6, company),
                   status = COALESCE($7, status),
                   notes = COALESCE($8, notes)
               WHERE id = $1 AND user_id = $2
               RETURNING {CONTACT_COLUMNS}"#
        ))
        .bind(contact_id)
        .bind(owner_id)
        .bind(&changes.name)
        .bind(changes.email.as_ref().map(|e| e.trim().to_lowercase()))
        .bind(&changes.phone)
        .bind(&changes.company)
        .bind(&changes.status)
        .bind(&changes.notes)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a contact. Returns whether a row was removed.
    pub async fn delete(&self, owner_id: i32, contact_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND user_id = $2")
            .bind(contact_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

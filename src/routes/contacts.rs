//! Contact endpoints: listing, single-record CRUD, and the CSV
//! import/export pair built on the `csv` pipeline.

use rocket::serde::json::Json;
use rocket::State;
use rocket_db_pools::sqlx;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use rocket_okapi::openapi;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::csv::{self, CsvAttachment, ImportReport};
use crate::csv::mapping::CandidateRecord;
use crate::error::ApiError;
use crate::models::{Contact, DataResponse};
use crate::routes::MessageResponse;
use crate::store::{ContactChanges, ContactStore};

/// List the caller's contacts, optionally filtered by a search query over
/// name and email.
#[openapi(tag = "Contacts")]
#[get("/contacts?<search>")]
pub async fn list_contacts(
    user: AuthUser,
    search: Option<String>,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<DataResponse<Vec<Contact>>>, ApiError> {
    let store = ContactStore::new(pool.inner().clone());
    let contacts = match search.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => store.search(user.id, query).await?,
        _ => store.list(user.id).await?,
    };
    Ok(Json(DataResponse { data: contacts }))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Create a single contact from the add-contact form.
///
/// Runs the same validation as the CSV importer, so a malformed email is a
/// 400 here instead of a skipped row.
#[openapi(tag = "Contacts")]
#[post("/contacts", data = "<request>")]
pub async fn create_contact(
    user: AuthUser,
    request: Json<CreateContactRequest>,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<Contact>, ApiError> {
    let request = request.into_inner();
    let candidate = CandidateRecord {
        name: request.name,
        email: Some(request.email),
        phone: request.phone,
        company: request.company,
        status: request.status,
        notes: request.notes,
    };

    let outcome = csv::classify(vec![candidate]);
    let Some(record) = outcome.accepted.into_iter().next() else {
        return Err(ApiError::BadRequest(
            "a valid email address is required".to_string(),
        ));
    };

    let store = ContactStore::new(pool.inner().clone());
    match store.insert_one(user.id, &record).await? {
        Some(contact) => Ok(Json(contact)),
        None => Err(ApiError::BadRequest(format!(
            "a contact with email '{}' already exists",
            record.email
        ))),
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Partially update a contact. Omitted fields are left unchanged. A new
/// email goes through the same shape check as the importer.
#[openapi(tag = "Contacts")]
#[patch("/contacts/<contact_id>", data = "<request>")]
pub async fn update_contact(
    user: AuthUser,
    contact_id: i32,
    request: Json<UpdateContactRequest>,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<Contact>, ApiError> {
    let request = request.into_inner();

    let email = match request.email {
        Some(raw) => {
            let email = raw.trim().to_lowercase();
            if !csv::is_valid_email(&email) {
                return Err(ApiError::BadRequest(
                    "a valid email address is required".to_string(),
                ));
            }
            Some(email)
        }
        None => None,
    };

    let changes = ContactChanges {
        name: request.name,
        email,
        phone: request.phone,
        company: request.company,
        status: request
            .status
            .as_deref()
            .map(|s| crate::models::ContactStatus::normalize(Some(s)).as_str().to_string()),
        notes: request.notes,
    };

    let store = ContactStore::new(pool.inner().clone());
    store
        .update(user.id, contact_id, &changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Contact {contact_id} not found")))
}

/// Delete a contact.
#[openapi(tag = "Contacts")]
#[delete("/contacts/<contact_id>")]
pub async fn delete_contact(
    user: AuthUser,
    contact_id: i32,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<MessageResponse>, ApiError> {
    let store = ContactStore::new(pool.inner().clone());
    if !store.delete(user.id, contact_id).await? {
        return Err(ApiError::NotFound(format!(
            "Contact {contact_id} not found"
        )));
    }
    Ok(Json(MessageResponse {
        message: format!("Contact {contact_id} deleted"),
    }))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ImportRequest {
    /// Raw contents of the uploaded CSV file.
    pub csv: String,
}

/// Import contacts from a CSV file.
///
/// The whole file is classified before anything is written, then the
/// accepted batch goes to the store in one bulk insert. Rejected rows are
/// reported as counts in the response, never as errors; accepted rows the
/// owner already has come back as `already_stored`. An empty or header-only
/// file is a 400 and writes nothing.
#[openapi(tag = "Contacts")]
#[post("/contacts/import", data = "<request>")]
pub async fn import_contacts(
    user: AuthUser,
    request: Json<ImportRequest>,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<ImportReport>, ApiError> {
    let outcome =
        csv::parse_contacts(&request.csv).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let mut report = csv::summarize(&outcome);

    if !outcome.accepted.is_empty() {
        let store = ContactStore::new(pool.inner().clone());
        let inserted = store.bulk_insert(user.id, &outcome.accepted).await?;
        report.apply_inserted(inserted);
        log::info!(
            "user {} imported {} contacts ({} skipped, {} already stored)",
            user.id,
            inserted,
            report.skipped,
            report.already_stored
        );
    } else {
        log::info!(
            "user {} import accepted nothing: {}",
            user.id,
            report.message
        );
    }

    Ok(Json(report))
}

/// Export all of the caller's contacts as a downloadable `contacts.csv`.
#[openapi(skip)]
#[get("/contacts/export")]
pub async fn export_contacts(
    user: AuthUser,
    pool: &State<sqlx::PgPool>,
) -> Result<CsvAttachment, ApiError> {
    let store = ContactStore::new(pool.inner().clone());
    let contacts = store.list(user.id).await?;
    Ok(CsvAttachment {
        filename: "contacts.csv",
        body: csv::render_contacts_csv(&contacts),
    })
}

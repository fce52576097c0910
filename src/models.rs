use chrono::{DateTime, Utc};
use rocket_db_pools::sqlx::FromRow;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

/// Generic envelope wrapping list responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

// ===== Contact Models =====

/// Subscription state of a stored contact.
///
/// Anything that is not exactly `unsubscribed` (case-insensitive) normalizes
/// to `active`; the dashboard only ever distinguishes these two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Active,
    Unsubscribed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Active => "active",
            ContactStatus::Unsubscribed => "unsubscribed",
        }
    }

    /// Normalize a raw status value from user input.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("unsubscribed") => ContactStatus::Unsubscribed,
            _ => ContactStatus::Active,
        }
    }
}

/// A contact as stored, with its persistence-assigned id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct Contact {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A validated contact ready for bulk insertion, before the store has
/// assigned an id or owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ContactStatus,
    pub notes: Option<String>,
}

// ===== Template Models =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct Template {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub category: Option<String>,
    pub subject: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ===== Campaign Models =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct Campaign {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub subject: String,
    pub template_id: Option<i32>,
    pub body: Option<String>,
    pub status: String,
    pub recipient_count: i32,
    pub opened_count: i32,
    pub clicked_count: i32,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

// ===== Dashboard Stats =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct DashboardStats {
    pub total_contacts: i64,
    pub active_contacts: i64,
    pub unsubscribed_contacts: i64,
    pub total_templates: i64,
    pub campaigns_sent: i64,
    pub last_sent_at: Option<DateTime<Utc>>,
}

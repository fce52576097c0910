//! HTTP route handlers grouped by resource domain.
//!
//! Each submodule corresponds to a logical area of the dashboard (contacts,
//! templates, campaigns, stats) and exposes typed Rocket handlers annotated
//! with `#[openapi]` so `rocket_okapi` can derive an OpenAPI document
//! automatically. Every handler except the health check resolves the calling
//! user through the `AuthUser` guard.

pub mod campaigns;
pub mod contacts;
pub mod health;
pub mod stats;
pub mod templates;

use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

/// Trivial acknowledgement payload for deletes and similar operations.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MessageResponse {
    pub message: String,
}

//! Campaign endpoints: drafting, sending, and the send-history listing.

use rocket::serde::json::Json;
use rocket_db_pools::{sqlx, Connection};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use rocket_okapi::openapi;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::CampaignDb;
use crate::error::ApiError;
use crate::models::{Campaign, DataResponse};

const CAMPAIGN_COLUMNS: &str = "id, user_id, name, subject, template_id, body, status, \
     recipient_count, opened_count, clicked_count, sent_at, created_at";

/// List the caller's campaigns, optionally filtered by status
/// (`draft` or `sent`). Sent campaigns come back newest first, which is the
/// shape the history page renders.
#[openapi(tag = "Campaigns")]
#[get("/campaigns?<status>")]
pub async fn list_campaigns(
    user: AuthUser,
    status: Option<String>,
    mut db: Connection<CampaignDb>,
) -> Result<Json<DataResponse<Vec<Campaign>>>, ApiError> {
    let campaigns: Vec<Campaign> = match status.as_deref().map(str::trim) {
        Some(wanted) if !wanted.is_empty() => {
            sqlx::query_as(&format!(
                r#"SELECT {CAMPAIGN_COLUMNS} FROM campaigns
                   WHERE user_id = $1 AND status = lower($2)
                   ORDER BY sent_at DESC NULLS LAST, created_at DESC"#
            ))
            .bind(user.id)
            .bind(wanted)
            .fetch_all(&mut **db)
            .await?
        }
        _ => {
            sqlx::query_as(&format!(
                r#"SELECT {CAMPAIGN_COLUMNS} FROM campaigns
                   WHERE user_id = $1
                   ORDER BY sent_at DESC NULLS LAST, created_at DESC"#
            ))
            .bind(user.id)
            .fetch_all(&mut **db)
            .await?
        }
    };

    Ok(Json(DataResponse { data: campaigns }))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub subject: String,
    pub template_id: Option<i32>,
    pub body: Option<String>,
}

/// Create a draft campaign.
///
/// Name and subject are required (the dashboard surfaces this as its
/// "Missing Information" toast). A referenced template must belong to the
/// caller.
#[openapi(tag = "Campaigns")]
#[post("/campaigns", data = "<request>")]
pub async fn create_campaign(
    user: AuthUser,
    request: Json<CreateCampaignRequest>,
    mut db: Connection<CampaignDb>,
) -> Result<Json<Campaign>, ApiError> {
    let request = request.into_inner();
    if request.name.trim().is_empty() || request.subject.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "campaign name and subject are required".to_string(),
        ));
    }

    if let Some(template_id) = request.template_id {
        let owned: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM templates WHERE id = $1 AND user_id = $2")
                .bind(template_id)
                .bind(user.id)
                .fetch_optional(&mut **db)
                .await?;
        if owned.is_none() {
            return Err(ApiError::NotFound(format!(
                "Template {template_id} not found"
            )));
        }
    }

    let campaign: Campaign = sqlx::query_as(&format!(
        r#"INSERT INTO campaigns (user_id, name, subject, template_id, body, status)
           VALUES ($1, $2, $3, $4, $5, 'draft')
           RETURNING {CAMPAIGN_COLUMNS}"#
    ))
    .bind(user.id)
    .bind(request.name.trim())
    .bind(request.subject.trim())
    .bind(request.template_id)
    .bind(&request.body)
    .fetch_one(&mut **db)
    .await?;

    Ok(Json(campaign))
}

/// Send a draft campaign.
///
/// Marks the campaign sent, stamps `sent_at`, and snapshots the number of
/// currently-active contacts as the recipient count. Sending an
/// already-sent campaign is a 400.
#[openapi(tag = "Campaigns")]
#[post("/campaigns/<campaign_id>/send")]
pub async fn send_campaign(
    user: AuthUser,
    campaign_id: i32,
    mut db: Connection<CampaignDb>,
) -> Result<Json<Campaign>, ApiError> {
    let status: Option<(String,)> =
        sqlx::query_as("SELECT status FROM campaigns WHERE id = $1 AND user_id = $2")
            .bind(campaign_id)
            .bind(user.id)
            .fetch_optional(&mut **db)
            .await?;

    match status {
        None => {
            return Err(ApiError::NotFound(format!(
                "Campaign {campaign_id} not found"
            )))
        }
        Some((status,)) if status != "draft" => {
            return Err(ApiError::BadRequest(format!(
                "Campaign {campaign_id} has already been sent"
            )));
        }
        Some(_) => {}
    }

    let campaign: Campaign = sqlx::query_as(&format!(
        r#"UPDATE campaigns
           SET status = 'sent',
               sent_at = NOW(),
               recipient_count = (
                   SELECT COUNT(*) FROM contacts
                   WHERE user_id = $2 AND status = 'active'
               )
           WHERE id = $1 AND user_id = $2
           RETURNING {CAMPAIGN_COLUMNS}"#
    ))
    .bind(campaign_id)
    .bind(user.id)
    .fetch_one(&mut **db)
    .await?;

    log::info!(
        "user {} sent campaign {} to {} recipients",
        user.id,
        campaign.id,
        campaign.recipient_count
    );

    Ok(Json(campaign))
}

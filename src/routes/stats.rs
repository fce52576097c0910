//! Dashboard stats endpoint.

use rocket::serde::json::Json;
use rocket_db_pools::{sqlx, Connection};
use rocket_okapi::openapi;

use crate::auth::AuthUser;
use crate::db::CampaignDb;
use crate::error::ApiError;
use crate::models::DashboardStats;

/// Aggregate counts backing the dashboard cards.
#[openapi(tag = "Stats")]
#[get("/stats")]
pub async fn get_stats(
    user: AuthUser,
    mut db: Connection<CampaignDb>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            CAST((SELECT COUNT(*) FROM contacts WHERE user_id = $1) AS BIGINT) as total_contacts,
            CAST((SELECT COUNT(*) FROM contacts WHERE user_id = $1 AND status = 'active') AS BIGINT) as active_contacts,
            CAST((SELECT COUNT(*) FROM contacts WHERE user_id = $1 AND status = 'unsubscribed') AS BIGINT) as unsubscribed_contacts,
            CAST((SELECT COUNT(*) FROM templates WHERE user_id = $1) AS BIGINT) as total_templates,
            CAST((SELECT COUNT(*) FROM campaigns WHERE user_id = $1 AND status = 'sent') AS BIGINT) as campaigns_sent,
            (SELECT MAX(sent_at) FROM campaigns WHERE user_id = $1) as last_sent_at
        "#,
    )
    .bind(user.id)
    .fetch_one(&mut **db)
    .await?;

    Ok(Json(stats))
}

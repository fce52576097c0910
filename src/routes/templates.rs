//! Email template endpoints.

use rocket::serde::json::Json;
use rocket_db_pools::{sqlx, Connection};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use rocket_okapi::openapi;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::CampaignDb;
use crate::error::ApiError;
use crate::models::{DataResponse, Template};
use crate::routes::MessageResponse;

/// List the caller's templates, optionally filtered by category.
#[openapi(tag = "Templates")]
#[get("/templates?<category>")]
pub async fn list_templates(
    user: AuthUser,
    category: Option<String>,
    mut db: Connection<CampaignDb>,
) -> Result<Json<DataResponse<Vec<Template>>>, ApiError> {
    let templates: Vec<Template> = match category.as_deref().map(str::trim) {
        Some(cat) if !cat.is_empty() => {
            sqlx::query_as(
                r#"SELECT id, user_id, name, category, subject, body, created_at, updated_at
                   FROM templates
                   WHERE user_id = $1 AND lower(category) = lower($2)
                   ORDER BY name ASC"#,
            )
            .bind(user.id)
            .bind(cat)
            .fetch_all(&mut **db)
            .await?
        }
        _ => {
            sqlx::query_as(
                r#"SELECT id, user_id, name, category, subject, body, created_at, updated_at
                   FROM templates
                   WHERE user_id = $1
                   ORDER BY name ASC"#,
            )
            .bind(user.id)
            .fetch_all(&mut **db)
            .await?
        }
    };

    Ok(Json(DataResponse { data: templates }))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub category: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Create a template.
#[openapi(tag = "Templates")]
#[post("/templates", data = "<request>")]
pub async fn create_template(
    user: AuthUser,
    request: Json<CreateTemplateRequest>,
    mut db: Connection<CampaignDb>,
) -> Result<Json<Template>, ApiError> {
    let request = request.into_inner();
    if request.name.trim().is_empty() || request.subject.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "template name and subject are required".to_string(),
        ));
    }

    let template: Template = sqlx::query_as(
        r#"INSERT INTO templates (user_id, name, category, subject, body)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id, user_id, name, category, subject, body, created_at, updated_at"#,
    )
    .bind(user.id)
    .bind(request.name.trim())
    .bind(request.category.as_deref().map(str::trim))
    .bind(request.subject.trim())
    .bind(&request.body)
    .fetch_one(&mut **db)
    .await?;

    Ok(Json(template))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Partially update a template; omitted fields keep their stored value.
#[openapi(tag = "Templates")]
#[patch("/templates/<template_id>", data = "<request>")]
pub async fn update_template(
    user: AuthUser,
    template_id: i32,
    request: Json<UpdateTemplateRequest>,
    mut db: Connection<CampaignDb>,
) -> Result<Json<Template>, ApiError> {
    let request = request.into_inner();

    let template: Option<Template> = sqlx::query_as(
        r#"UPDATE templates
           SET name = COALESCE($3, name),
               category = COALESCE($4, category),
               subject = COALESCE($5, subject),
               body = COALESCE($6, body),
               updated_at = NOW()
           WHERE id = $1 AND user_id = $2
           RETURNING id, user_id, name, category, subject, body, created_at, updated_at"#,
    )
    .bind(template_id)
    .bind(user.id)
    .bind(&request.name)
    .bind(&request.category)
    .bind(&request.subject)
    .bind(&request.body)
    .fetch_optional(&mut **db)
    .await?;

    template
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Template {template_id} not found")))
}

/// Delete a template.
#[openapi(tag = "Templates")]
#[delete("/templates/<template_id>")]
pub async fn delete_template(
    user: AuthUser,
    template_id: i32,
    mut db: Connection<CampaignDb>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
        .bind(template_id)
        .bind(user.id)
        .execute(&mut **db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "Template {template_id} not found"
        )));
    }

    Ok(Json(MessageResponse {
        message: format!("Template {template_id} deleted"),
    }))
}

//! Bearer-token authentication.
//!
//! Every data route resolves the calling user through the [`AuthUser`]
//! request guard, and the resulting id is passed explicitly to store calls.
//! Tokens are opaque: clients present the raw token, the database stores only
//! its SHA-256 digest. Tokens are minted with the `create_token` binary.

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::response::{self, Responder};
use rocket::{Request, Response, State};
use rocket_db_pools::sqlx;
use rocket_okapi::request::OpenApiFromRequest;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or invalid credentials")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("auth configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn status(&self) -> Status {
        match self {
            AuthError::Unauthorized => Status::Unauthorized,
            AuthError::Database(_) | AuthError::Config(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AuthError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            log::error!("auth failure: {}", self);
        } else {
            log::debug!("auth failure: {}", self);
        }

        let body = serde_json::json!({
            "error": "AuthError",
            "message": self.to_string(),
        })
        .to_string();
        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

/// The authenticated owner of the records a request operates on.
#[derive(Debug, Clone, OpenApiFromRequest)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match extract_user(request).await {
            Ok(user) => Outcome::Success(user),
            Err(err) => Outcome::Error((err.status(), err)),
        }
    }
}

/// Hex-encoded SHA-256 digest of a raw token, as stored in `api_tokens`.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

async fn extract_user(request: &Request<'_>) -> Result<AuthUser, AuthError> {
    let token = bearer_token_from_request(request)?;

    let pool = request
        .guard::<&State<sqlx::PgPool>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("database pool missing from state".into()))?;

    let row: Option<(i32, String)> = sqlx::query_as(
        r#"SELECT u.id, u.email
           FROM api_tokens t
           JOIN users u ON u.id = t.user_id
           WHERE t.token_hash = $1"#,
    )
    .bind(hash_token(token))
    .fetch_optional(pool.inner())
    .await?;

    let (id, email) = row.ok_or(AuthError::Unauthorized)?;
    Ok(AuthUser { id, email })
}

fn bearer_token_from_request<'r>(request: &'r Request<'_>) -> Result<&'r str, AuthError> {
    let header = request
        .headers()
        .get_one("Authorization")
        .ok_or(AuthError::Unauthorized)?;
    let mut parts = header.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();
    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Ok(token)
    } else {
        Err(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let digest = hash_token("secret-token");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token("secret-token"));
        assert_ne!(digest, hash_token("other-token"));
    }
}

use campaign_api::models::{Contact, DataResponse};
use campaign_api::routes::contacts::{
    create_contact, delete_contact, list_contacts, update_contact,
};
use campaign_api::test_support::{TestDatabase, TestFixtures, TestRocketBuilder};
use rocket::http::{ContentType, Header, Status};
use rocket::routes;
use serde_json::json;

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

#[tokio::test]
async fn contact_crud_requires_auth_and_scopes_to_owner() {
    let test_db = match TestDatabase::new().await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping contact CRUD integration test: {err}");
            return;
        }
    };

    let pool = test_db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    let user_id = fixtures
        .insert_user("owner@example.com", Some("Owner"))
        .await
        .expect("failed to insert user");
    fixtures
        .insert_api_token(user_id, "owner-token")
        .await
        .expect("failed to insert token");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(routes![
            list_contacts,
            create_contact,
            update_contact,
            delete_contact
        ])
        .async_client()
        .await;

    // No credentials -> 401 before any data access.
    let response = client.get("/api/v1/contacts").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .get("/api/v1/contacts")
        .header(bearer("not-a-real-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    // Create goes through the same validation as the importer.
    let response = client
        .post("/api/v1/contacts")
        .header(ContentType::JSON)
        .header(bearer("owner-token"))
        .body(json!({ "email": "Dana@Example.com", "company": "Acme" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let created: Contact = response.into_json().await.expect("valid contact payload");
    assert_eq!(created.email, "dana@example.com");
    // Name defaults to the lower-cased email when absent.
    assert_eq!(created.name, "dana@example.com");
    assert_eq!(created.status, "active");

    // A second contact with the same email is rejected by the store.
    let response = client
        .post("/api/v1/contacts")
        .header(ContentType::JSON)
        .header(bearer("owner-token"))
        .body(json!({ "email": "dana@example.com" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // An invalid email is a 400 on this path, not a skipped row.
    let response = client
        .post("/api/v1/contacts")
        .header(ContentType::JSON)
        .header(bearer("owner-token"))
        .body(json!({ "email": "not-an-email" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Search matches name and email case-insensitively.
    let response = client
        .get("/api/v1/contacts?search=DANA")
        .header(bearer("owner-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let payload: DataResponse<Vec<Contact>> =
        response.into_json().await.expect("valid list payload");
    assert_eq!(payload.data.len(), 1);

    // Update normalizes the status value.
    let response = client
        .patch(format!("/api/v1/contacts/{}", created.id))
        .header(ContentType::JSON)
        .header(bearer("owner-token"))
        .body(json!({ "name": "Dana", "status": "Unsubscribed" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: Contact = response.into_json().await.expect("valid contact payload");
    assert_eq!(updated.name, "Dana");
    assert_eq!(updated.status, "unsubscribed");

    // Editing cannot smuggle in an email the importer would reject.
    let response = client
        .patch(format!("/api/v1/contacts/{}", created.id))
        .header(ContentType::JSON)
        .header(bearer("owner-token"))
        .body(json!({ "email": "not-an-email" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Another user cannot see or delete the owner's contacts.
    let other_id = fixtures
        .insert_user("other@example.com", None)
        .await
        .expect("failed to insert user");
    fixtures
        .insert_api_token(other_id, "other-token")
        .await
        .expect("failed to insert token");

    let response = client
        .get("/api/v1/contacts")
        .header(bearer("other-token"))
        .dispatch()
        .await;
    let payload: DataResponse<Vec<Contact>> =
        response.into_json().await.expect("valid list payload");
    assert!(payload.data.is_empty());

    let response = client
        .delete(format!("/api/v1/contacts/{}", created.id))
        .header(bearer("other-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    // The owner can.
    let response = client
        .delete(format!("/api/v1/contacts/{}", created.id))
        .header(bearer("owner-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .expect("count query");
    assert_eq!(remaining, 0);

    test_db.close().await;
}

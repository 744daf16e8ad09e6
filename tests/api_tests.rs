use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use foundation_api::config::Settings;
use foundation_api::db::{Document, DocumentStore, Filter, StoreError, Update};
use foundation_api::routes::create_router;
use foundation_api::state::{AppState, SharedState};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn spawn_app() -> (Router, SharedState) {
    let state = Arc::new(AppState::in_memory());
    let app = create_router(Arc::clone(&state), &Settings::default());
    (app, state)
}

fn app_with_store(store: Arc<dyn DocumentStore>) -> Router {
    create_router(Arc::new(AppState::new(store)), &Settings::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn contact_body(n: usize) -> Value {
    json!({
        "subject": format!("Subject {}", n),
        "fullName": "Ayesha Malik",
        "email": "ayesha@example.com",
        "message": format!("Message number {}", n),
        "contactNumber": "+92 321 1234567"
    })
}

fn inquiry_body() -> Value {
    json!({
        "fullName": "Usman Tariq",
        "email": "usman@example.com",
        "contactNumber": "+92 333 7654321",
        "subject": "Sponsorship",
        "message": "I would like to sponsor a student."
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = spawn_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_contact_lifecycle() {
    let (app, _) = spawn_app();

    let submitted = contact_body(1);
    let (status, body) = send(&app, "POST", "/contact", Some(submitted.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Contact message sent successfully");
    for field in ["subject", "fullName", "email", "message", "contactNumber"] {
        assert_eq!(body["contact"][field], submitted[field], "field {}", field);
    }

    let id = body["contact"]["id"].as_str().unwrap().to_string();
    let (status, body) = send(&app, "GET", &format!("/contact/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"]["id"], id);
    assert_eq!(body["message"]["fullName"], "Ayesha Malik");

    let (status, body) = send(&app, "DELETE", &format!("/contact/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Contact message deleted successfully" })
    );

    let (status, body) = send(&app, "GET", &format!("/contact/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Contact message not found");
}

#[tokio::test]
async fn test_delete_nonexistent_contact_is_404() {
    let (app, _) = spawn_app();
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/contact/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Contact message not found");
}

#[tokio::test]
async fn test_malformed_contact_id_is_400() {
    let (app, _) = spawn_app();
    let (status, body) = send(&app, "GET", "/contact/not-an-id", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid contact message id");
}

#[tokio::test]
async fn test_contact_missing_field_is_rejected() {
    let (app, state) = spawn_app();
    let mut body = contact_body(1);
    body.as_object_mut().unwrap().remove("email");

    let (status, response) = send(&app, "POST", "/contact", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Please fill in all fields");
    assert_eq!(state.contacts.count_documents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_contact_list_pagination() {
    let (app, _) = spawn_app();
    for n in 0..5 {
        let (status, _) = send(&app, "POST", "/contact", Some(contact_body(n))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/contact?page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 1);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["subject"], "Subject 4");
    assert_eq!(messages[1]["subject"], "Subject 3");

    let (_, body) = send(&app, "GET", "/contact?page=3&limit=2", None).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["subject"], "Subject 0");

    let (_, body) = send(&app, "GET", "/contact", None).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 5);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn test_contact_list_is_newest_first_across_full_page() {
    let (app, _) = spawn_app();
    for n in 0..5 {
        send(&app, "POST", "/contact", Some(contact_body(n))).await;
    }

    let (status, body) = send(&app, "GET", "/contact?limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();

    let subjects: Vec<&str> = messages
        .iter()
        .map(|m| m["subject"].as_str().unwrap())
        .collect();
    assert_eq!(
        subjects,
        vec!["Subject 4", "Subject 3", "Subject 2", "Subject 1", "Subject 0"]
    );

    // Equal timestamps fall back to insertion order, newest first
    let created: Vec<chrono::DateTime<chrono::Utc>> = messages
        .iter()
        .map(|m| m["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    for pair in created.windows(2) {
        assert!(pair[0] >= pair[1], "{} before {}", pair[0], pair[1]);
    }
}

#[tokio::test]
async fn test_contact_list_rejects_bad_pagination() {
    let (app, _) = spawn_app();

    for uri in ["/contact?page=abc", "/contact?limit=0", "/contact?page=-1"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], "Invalid pagination parameters");
    }
}

#[tokio::test]
async fn test_inquiry_created() {
    let (app, _) = spawn_app();
    let submitted = inquiry_body();

    let (status, body) = send(&app, "POST", "/messages", Some(submitted.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());

    let mut echoed = body.as_object().unwrap().clone();
    echoed.remove("id");
    assert_eq!(Value::Object(echoed), submitted);
}

#[tokio::test]
async fn test_numeric_contact_number_is_echoed_as_text() {
    let (app, _) = spawn_app();

    let mut inquiry = inquiry_body();
    inquiry["contactNumber"] = json!(923001234567u64);
    let (status, body) = send(&app, "POST", "/messages", Some(inquiry)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["contactNumber"], "923001234567");

    let mut contact = contact_body(1);
    contact["contactNumber"] = json!(923001234567u64);
    let (status, body) = send(&app, "POST", "/contact", Some(contact)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["contact"]["contactNumber"], "923001234567");

    let id = body["contact"]["id"].as_str().unwrap().to_string();
    let (_, body) = send(&app, "GET", &format!("/contact/{}", id), None).await;
    assert_eq!(body["message"]["contactNumber"], "923001234567");
}

#[tokio::test]
async fn test_numeric_settings_phone_number_is_stored_as_text() {
    let (app, _) = spawn_app();

    let (status, body) = send(
        &app,
        "PUT",
        "/settings/update",
        Some(json!({ "phoneNumber": 923359424716u64 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phoneNumber"], "923359424716");
    assert_eq!(body["data"]["email"], "rafahiyahfoundation@gmail.com");
}

#[tokio::test]
async fn test_inquiry_missing_contact_number() {
    let (app, state) = spawn_app();
    let mut body = inquiry_body();
    body.as_object_mut().unwrap().remove("contactNumber");

    let (status, response) = send(&app, "POST", "/messages", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Please fill in all fields");
    assert_eq!(state.inquiries.count_documents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let (app, _) = spawn_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/messages")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_settings_defaults_on_empty_store() {
    let (app, state) = spawn_app();

    let (status, body) = send(&app, "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "phoneNumber": "+92 335 9424716",
                "email": "rafahiyahfoundation@gmail.com",
                "address": "Pakistan"
            }
        })
    );
    assert_eq!(state.site_settings.count_documents().await.unwrap(), 1);

    let (status, again) = send(&app, "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, body);
    assert_eq!(state.site_settings.count_documents().await.unwrap(), 1);

    let record = state
        .site_settings
        .find_one(&Filter::eq("key", "site_settings"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.data.key, "site_settings");
}

#[tokio::test]
async fn test_settings_full_update_then_read() {
    let (app, state) = spawn_app();
    let values = json!({
        "phoneNumber": "+1",
        "email": "x",
        "address": "y",
        "copyrightText": "c"
    });

    let (status, body) = send(&app, "PUT", "/settings/update", Some(values.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Settings updated successfully");
    assert_eq!(body["data"], values);

    let (status, body) = send(&app, "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], values);
    assert_eq!(state.site_settings.count_documents().await.unwrap(), 1);
}

#[tokio::test]
async fn test_settings_partial_update_keeps_other_fields() {
    let (app, _) = spawn_app();
    send(&app, "GET", "/settings", None).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/settings/update",
        Some(json!({ "copyrightText": "© Rafahiyah Foundation" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "phoneNumber": "+92 335 9424716",
            "email": "rafahiyahfoundation@gmail.com",
            "address": "Pakistan",
            "copyrightText": "© Rafahiyah Foundation"
        })
    );
}

#[tokio::test]
async fn test_settings_update_rejects_unknown_fields() {
    let (app, state) = spawn_app();

    let (status, body) = send(
        &app,
        "PUT",
        "/settings/update",
        Some(json!({ "twitter": "@foundation" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(state.site_settings.count_documents().await.unwrap(), 0);
}

/// Store whose every call fails
struct FailingStore;

fn outage() -> StoreError {
    StoreError::UnknownCollection("offline".to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_one(
        &self,
        _: &str,
        _: Map<String, Value>,
    ) -> Result<Option<Document>, StoreError> {
        Err(outage())
    }
    async fn find_many(&self, _: &str, _: u64, _: u64) -> Result<Vec<Document>, StoreError> {
        Err(outage())
    }
    async fn count(&self, _: &str) -> Result<u64, StoreError> {
        Err(outage())
    }
    async fn find_by_id(&self, _: &str, _: Uuid) -> Result<Option<Document>, StoreError> {
        Err(outage())
    }
    async fn find_by_id_and_delete(
        &self,
        _: &str,
        _: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        Err(outage())
    }
    async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Document>, StoreError> {
        Err(outage())
    }
    async fn find_one_and_update(
        &self,
        _: &str,
        _: &Filter,
        _: &Update,
        _: bool,
    ) -> Result<Option<Document>, StoreError> {
        Err(outage())
    }
}

/// Store that accepts calls but never writes anything
struct DecliningStore;

#[async_trait]
impl DocumentStore for DecliningStore {
    async fn insert_one(
        &self,
        _: &str,
        _: Map<String, Value>,
    ) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
    async fn find_many(&self, _: &str, _: u64, _: u64) -> Result<Vec<Document>, StoreError> {
        Ok(Vec::new())
    }
    async fn count(&self, _: &str) -> Result<u64, StoreError> {
        Ok(0)
    }
    async fn find_by_id(&self, _: &str, _: Uuid) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
    async fn find_by_id_and_delete(
        &self,
        _: &str,
        _: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
    async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
    async fn find_one_and_update(
        &self,
        _: &str,
        _: &Filter,
        _: &Update,
        _: bool,
    ) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_store_failures_are_500_envelopes() {
    let app = app_with_store(Arc::new(FailingStore));

    let (status, body) = send(&app, "POST", "/contact", Some(contact_body(1))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server Error");

    let (status, body) = send(&app, "GET", "/contact", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "POST", "/messages", Some(inquiry_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server Error");
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server Error");

    let (status, _) = send(&app, "PUT", "/settings/update", Some(json!({ "email": "a" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_declined_inquiry_is_invalid_data() {
    let app = app_with_store(Arc::new(DecliningStore));

    let (status, body) = send(&app, "POST", "/messages", Some(inquiry_body())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid message data");
}

#[tokio::test]
async fn test_declined_contact_is_server_error() {
    let app = app_with_store(Arc::new(DecliningStore));

    let (status, body) = send(&app, "POST", "/contact", Some(contact_body(1))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server Error");
}

#[tokio::test]
async fn test_validation_happens_before_the_store() {
    let app = app_with_store(Arc::new(FailingStore));

    let (status, body) = send(&app, "POST", "/messages", Some(json!({ "fullName": "Only" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please fill in all fields");
}

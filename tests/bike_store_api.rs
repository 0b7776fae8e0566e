use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bike_store_api::api::routes::create_router;
use bike_store_api::store::{SqliteStore, Store};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// The router under test runs in-process against an in-memory database, so
// every test is self-contained.
async fn test_app() -> Router {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    create_router().with_state(Arc::new(store))
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let app = test_app().await;

    let response = app.oneshot(request("GET", "/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn products_crud_round_trip() {
    let app = test_app().await;

    // Create
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/products",
            Some(json!({
                "name": "Mountain Bike",
                "description": "Durable mountain bike.",
                "price": 500.0,
                "categoryId": 1,
                "supplierId": 1
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["name"], "Mountain Bike");

    // List
    let response = app
        .clone()
        .oneshot(request("GET", "/products", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/products/{}", id),
            Some(json!({
                "name": "Mountain Bike",
                "description": "Durable mountain bike.",
                "price": 450.0,
                "categoryId": 1,
                "supplierId": 1
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["price"], 450.0);

    // Row count is unchanged by the update
    let response = app
        .clone()
        .oneshot(request("GET", "/products", None))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["price"], 450.0);

    // Delete
    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/products/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again reports not-found
    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/products/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(request("GET", "/products", None))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_ignores_caller_supplied_identifier() {
    let app = test_app().await;

    let response = app
        .oneshot(request(
            "POST",
            "/tags",
            Some(json!({ "id": 777, "name": "Mountain" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_ne!(created["id"], 777);
    assert!(created["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn update_of_nonexistent_row_is_not_found() {
    let app = test_app().await;

    let response = app
        .oneshot(request(
            "PUT",
            "/tags/42",
            Some(json!({ "name": "Nowhere" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("42"));
}

#[tokio::test]
async fn list_reflects_creates_minus_deletes() {
    let app = test_app().await;

    let mut ids = Vec::new();
    for name in ["Mountain", "Road", "Cycling", "Sports", "Outdoor"] {
        let response = app
            .clone()
            .oneshot(request("POST", "/tags", Some(json!({ "name": name }))))
            .await
            .unwrap();
        let created = body_json(response).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    for id in &ids[..2] {
        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/tags/{}", id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app.oneshot(request("GET", "/tags", None)).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn customers_accept_camel_case_wire_format() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/customers",
            Some(json!({
                "firstName": "John",
                "lastName": "Doe",
                "email": "john.doe@example.com",
                "phoneNumber": "+1 234 567 890",
                "registrationDate": "2023-01-15T00:00:00Z",
                "addressId": 1
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["firstName"], "John");
    assert_eq!(created["addressId"], 1);

    let response = app.oneshot(request("GET", "/customers", None)).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed[0]["lastName"], "Doe");
    assert!(listed[0].get("last_name").is_none());
}

#[tokio::test]
async fn reset_database_restores_the_seed_rows() {
    let app = test_app().await;

    // Leave some junk behind first
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(request("POST", "/tags", Some(json!({ "name": "Junk" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/reset-database", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Database has been reset successfully.");

    // Every table holds exactly the seed rows, regardless of prior state
    for (path, expected) in [
        ("/address", 5),
        ("/categories", 5),
        ("/suppliers", 5),
        ("/products", 8),
        ("/customers", 5),
        ("/invoices", 5),
        ("/invoiceitems", 5),
        ("/news", 3),
        ("/tags", 5),
        ("/producttags", 7),
    ] {
        let response = app
            .clone()
            .oneshot(request("GET", path, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), expected, "{}", path);
    }
}

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

use server::{ServerState, TokenSigner};

async fn test_app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder().database(db).build().await.unwrap();

    server::router(ServerState {
        engine: Arc::new(engine),
        tokens: TokenSigner::new("test-secret"),
    })
}

async fn request(app: &Router, method: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = if body.is_null() {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Register a user and return `(user_id, token)`.
async fn register(app: &Router, username: &str) -> (i64, String) {
    let (status, body) = request(
        app,
        "POST",
        "/register",
        json!({"username": username, "password": "password123"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["user_id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

async fn create_group(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/groups",
        json!({"token": token, "name": name}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["group_id"].as_i64().unwrap()
}

async fn add_expense(
    app: &Router,
    token: &str,
    group_id: i64,
    description: &str,
    amount: f64,
    date: &str,
) -> (StatusCode, Value) {
    request(
        app,
        "POST",
        "/expenses",
        json!({
            "token": token,
            "group_id": group_id,
            "description": description,
            "amount": amount,
            "category": "Transport",
            "date": date,
        }),
    )
    .await
}

#[tokio::test]
async fn ping_pongs() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/ping", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("pong".to_string()));
}

#[tokio::test]
async fn register_login_and_track_an_expense() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = request(
        &app,
        "POST",
        "/login",
        json!({"username": "alice", "password": "password123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alice_id = body["user_id"].as_i64().unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    // The token names alice.
    let (status, body) = request(&app, "POST", "/validate/token", json!({"token": token})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"].as_i64().unwrap(), alice_id);
    assert_eq!(body["valid"], Value::Bool(true));

    let group_id = create_group(&app, &token, "Trip").await;
    let (status, body) = add_expense(&app, &token, group_id, "Taxi", 20.0, "2024-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["expense_id"].as_i64().unwrap() > 0);

    // Listing without a group id returns exactly that one record.
    let (status, body) = request(&app, "POST", "/expenses/get", json!({"token": token})).await;
    assert_eq!(status, StatusCode::OK);
    let expenses = body.as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["description"], "Taxi");
    assert_eq!(expenses[0]["amount"], 20.0);
    assert_eq!(expenses[0]["category"], "Transport");
    assert_eq!(expenses[0]["date"], "2024-01-01");
    assert_eq!(expenses[0]["group_id"].as_i64().unwrap(), group_id);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = request(
        &app,
        "POST",
        "/register",
        json!({"username": "alice", "password": "password456"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/register",
        json!({"username": "alice", "password": "short"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = request(
        &app,
        "POST",
        "/login",
        json!({"username": "alice", "password": "password124"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn bad_tokens_are_unauthorized() {
    let app = test_app().await;
    let (_, token) = register(&app, "alice").await;
    let group_id = create_group(&app, &token, "Trip").await;

    for bad in ["", "garbage", "AAAA.BBBB"] {
        let (status, body) = add_expense(&app, bad, group_id, "Taxi", 20.0, "2024-01-01").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    let (status, _) = request(&app, "POST", "/validate/token", json!({"token": "garbage"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_members_are_forbidden() {
    let app = test_app().await;
    let (_, alice_token) = register(&app, "alice").await;
    let (_, bob_token) = register(&app, "bob").await;
    let group_id = create_group(&app, &alice_token, "Trip").await;

    let (status, _) = add_expense(&app, &bob_token, group_id, "Taxi", 20.0, "2024-01-01").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        "/expenses/get",
        json!({"token": bob_token, "group_id": group_id}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        "/groups/members/get",
        json!({"token": bob_token, "group_id": group_id}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nothing was inserted by the rejected attempt.
    let (_, body) = request(&app, "POST", "/expenses/get", json!({"token": alice_token})).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn removing_a_missing_expense_is_not_found() {
    let app = test_app().await;
    let (_, token) = register(&app, "alice").await;
    let group_id = create_group(&app, &token, "Trip").await;

    let (status, _) = request(
        &app,
        "DELETE",
        "/expenses",
        json!({"token": token, "group_id": group_id, "expense_id": 999}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_mismatched_group_is_not_found() {
    let app = test_app().await;
    let (_, token) = register(&app, "alice").await;
    let trip = create_group(&app, &token, "Trip").await;
    let lunch = create_group(&app, &token, "Lunch").await;
    let (_, body) = add_expense(&app, &token, trip, "Taxi", 20.0, "2024-01-01").await;
    let expense_id = body["expense_id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/expenses/update",
        json!({
            "token": token,
            "group_id": lunch,
            "expense_id": expense_id,
            "description": "Train",
            "amount": 35.5,
            "category": "Travel",
            "date": "2024-01-02",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The record kept its fields.
    let (_, body) = request(
        &app,
        "POST",
        "/expenses/get",
        json!({"token": token, "group_id": trip}),
    )
    .await;
    assert_eq!(body.as_array().unwrap()[0]["description"], "Taxi");
}

#[tokio::test]
async fn membership_management_is_owner_only() {
    let app = test_app().await;
    let (_, alice_token) = register(&app, "alice").await;
    let (bob_id, bob_token) = register(&app, "bob").await;
    let (charlie_id, _) = register(&app, "charlie").await;
    let group_id = create_group(&app, &alice_token, "Trip").await;

    let (status, _) = request(
        &app,
        "POST",
        "/groups/members/add",
        json!({"token": alice_token, "group_id": group_id, "user_id": bob_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Second add of the same member conflicts.
    let (status, _) = request(
        &app,
        "POST",
        "/groups/members/add",
        json!({"token": alice_token, "group_id": group_id, "user_id": bob_id}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // bob is a member but not the owner.
    let (status, _) = request(
        &app,
        "POST",
        "/groups/members/add",
        json!({"token": bob_token, "group_id": group_id, "user_id": charlie_id}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = request(
        &app,
        "POST",
        "/groups/members/get",
        json!({"token": bob_token, "group_id": group_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    let names: Vec<&str> = users.iter().map(|u| u["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = test_app().await;
    let (_, token) = register(&app, "alice").await;
    let group_id = create_group(&app, &token, "Trip").await;

    // Wrong type for amount.
    let (status, body) = request(
        &app,
        "POST",
        "/expenses",
        json!({
            "token": token,
            "group_id": group_id,
            "description": "Taxi",
            "amount": "twenty",
            "category": "Transport",
            "date": "2024-01-01",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Unparseable date.
    let (status, _) = add_expense(&app, &token, group_id, "Taxi", 20.0, "01/01/2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn group_and_user_listings() {
    let app = test_app().await;
    let (_, alice_token) = register(&app, "alice").await;
    let (bob_id, _) = register(&app, "bob").await;
    let (charlie_id, _) = register(&app, "charlie").await;

    create_group(&app, &alice_token, "Trip").await;
    create_group(&app, &alice_token, "Family").await;

    let (status, body) = request(&app, "POST", "/groups/get", json!({"token": alice_token})).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Family", "Trip"]);

    let (status, body) = request(&app, "POST", "/users/get", json!({"token": alice_token})).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![bob_id, charlie_id]);
}

#[tokio::test]
async fn expenses_union_and_group_filter() {
    let app = test_app().await;
    let (_, token) = register(&app, "alice").await;
    let family = create_group(&app, &token, "Family").await;
    let trip = create_group(&app, &token, "Trip").await;

    add_expense(&app, &token, family, "Groceries", 85.5, "2024-01-02").await;
    add_expense(&app, &token, trip, "Taxi", 20.0, "2024-01-03").await;
    add_expense(&app, &token, family, "Cinema", 45.0, "2024-01-01").await;

    // No group id: union across both groups, date descending.
    let (_, body) = request(&app, "POST", "/expenses/get", json!({"token": token})).await;
    let descriptions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["Taxi", "Groceries", "Cinema"]);

    // Non-positive group id behaves like no group id.
    let (_, body) = request(
        &app,
        "POST",
        "/expenses/get",
        json!({"token": token, "group_id": -1}),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = request(
        &app,
        "POST",
        "/expenses/get",
        json!({"token": token, "group_id": family}),
    )
    .await;
    let descriptions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["Groceries", "Cinema"]);
}

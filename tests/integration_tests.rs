//! Integration tests for the RecipeBox Server API
//!
//! These tests verify the complete request/response cycle for all endpoints.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use recipebox_server::{AppState, Config, Db, open_database, routes};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const TEST_PASSWORD: &str = "Passw0rd!";

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,                // Random port
        database_path: "".to_string(), // Set per test via TempDir
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
        session_secret_key: "integration-test-pepper".to_string(),
        session_ttl_secs: 3600,
        secure_cookies: false,
        enforce_ownership: false,
    }
}

/// Create a test database in a temporary directory
fn create_test_db(temp_dir: &TempDir) -> Db {
    open_database(temp_dir.path().join("test.redb")).expect("Failed to create test database")
}

fn create_test_app(db: Db) -> Router {
    routes::router(AppState::new(db, test_config()))
}

fn create_strict_app(db: Db) -> Router {
    let config = Config {
        enforce_ownership: true,
        ..test_config()
    };
    routes::router(AppState::new(db, config))
}

fn create_app_with_session_ttl(db: Db, session_ttl_secs: i64) -> Router {
    let config = Config {
        session_ttl_secs,
        ..test_config()
    };
    routes::router(AppState::new(db, config))
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a request with an optional JSON body and session cookie
fn make_request(method: &str, uri: &str, body: Option<Value>, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("sessionid={session}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    session: Option<&str>,
) -> Response<Body> {
    app.clone()
        .oneshot(make_request(method, uri, body, session))
        .await
        .unwrap()
}

/// Extract the session token from a `Set-Cookie` header
fn session_from(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()?
        .strip_prefix("sessionid=")
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

async fn register(app: &Router, email: &str, name: &str) -> Value {
    let body = json!({ "email": email, "password": TEST_PASSWORD, "name": name });
    let response = send(app, "POST", "/api/register", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_to_json(response.into_body()).await
}

async fn login(app: &Router, email: &str) -> String {
    let body = json!({ "email": email, "password": TEST_PASSWORD });
    let response = send(app, "POST", "/api/login", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_from(&response).expect("login sets a session cookie")
}

/// Register and log in; returns (profile id, session token)
async fn setup_user(app: &Router, email: &str, name: &str) -> (u64, String) {
    let profile = register(app, email, name).await;
    let session = login(app, email).await;
    (profile["id"].as_u64().unwrap(), session)
}

fn recipe_body(title: &str) -> Value {
    json!({
        "title": title,
        "instructions": "Mix and bake",
        "equipment": "Oven",
        "ingredients": "Flour, water",
    })
}

async fn create_recipe(app: &Router, session: &str, title: &str) -> u64 {
    let response = send(app, "POST", "/api/recipes", Some(recipe_body(title)), Some(session)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_to_json(response.into_body()).await["id"].as_u64().unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check_returns_healthy() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = send(&app, "GET", "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].as_str().is_some());
}

// =============================================================================
// Registration Tests
// =============================================================================

#[tokio::test]
async fn test_register_returns_profile() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let body = json!({
        "email": "cook@example.com",
        "password": TEST_PASSWORD,
        "name": "Cook",
        "bio": "Bakes bread",
    });
    let response = send(&app, "POST", "/api/register", Some(body), None).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_to_json(response.into_body()).await;
    assert!(body["id"].as_u64().is_some());
    assert_eq!(body["name"], "Cook");
    assert_eq!(body["bio"], "Bakes bread");
    assert!(body["image"].is_null());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    register(&app, "cook@example.com", "Cook").await;

    // Same address, different case
    let body = json!({ "email": "COOK@example.com", "password": TEST_PASSWORD, "name": "Other" });
    let response = send(&app, "POST", "/api/register", Some(body), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_register_invalid_input_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let cases = [
        json!({ "email": "not-an-email", "password": TEST_PASSWORD, "name": "A" }),
        json!({ "email": "a@example.com", "password": "short", "name": "A" }),
        json!({ "email": "a@example.com", "password": TEST_PASSWORD }),
        json!({ "email": "a@example.com", "password": TEST_PASSWORD, "name": "   " }),
    ];

    for body in cases {
        let response = send(&app, "POST", "/api/register", Some(body), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_register_malformed_json_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let profile = register(&app, "cook@example.com", "Cook").await;

    let body = json!({ "email": "cook@example.com", "password": TEST_PASSWORD });
    let response = send(&app, "POST", "/api/login", Some(body), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["id"], profile["id"]);
    assert_eq!(body["email"], "cook@example.com");
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    register(&app, "cook@example.com", "Cook").await;

    let body = json!({ "email": "cook@example.com", "password": "Wrong1234" });
    let response = send(&app, "POST", "/api/login", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_from(&response).is_none());

    // Unknown account gets the same answer
    let body = json!({ "email": "nobody@example.com", "password": TEST_PASSWORD });
    let response = send(&app, "POST", "/api/login", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (id, session) = setup_user(&app, "cook@example.com", "Cook").await;

    let response = send(&app, "GET", "/api/user", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], "cook@example.com");
}

#[tokio::test]
async fn test_logout_without_session() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = send(&app, "POST", "/api/logout", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_expired_session_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_app_with_session_ttl(create_test_db(&temp_dir), 0);
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;

    let response = send(&app, "GET", "/api/user", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", "/api/recipes", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_oversized_password_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    register(&app, "cook@example.com", "Cook").await;

    let body = json!({ "email": "cook@example.com", "password": "a1".repeat(100_000) });
    let response = send(&app, "POST", "/api/login", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;

    let response = send(&app, "POST", "/api/logout", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/user", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_relogin_rotates_session() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, first) = setup_user(&app, "cook@example.com", "Cook").await;

    let body = json!({ "email": "cook@example.com", "password": TEST_PASSWORD });
    let response = send(&app, "POST", "/api/login", Some(body), Some(&first)).await;
    let second = session_from(&response).unwrap();
    assert_ne!(first, second);

    let response = send(&app, "GET", "/api/user", None, Some(&first)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, "GET", "/api/user", None, Some(&second)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_endpoints_require_session() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    for (method, uri) in [
        ("GET", "/api/user"),
        ("GET", "/api/profiles"),
        ("GET", "/api/recipes"),
        ("GET", "/api/recipes/1"),
        ("POST", "/api/recipes/1/favorite"),
        ("DELETE", "/api/recipes/1/favorite"),
        ("GET", "/api/favorites"),
    ] {
        let response = send(&app, method, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");

        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].as_str().is_some());
    }

    // A cookie that was never issued is treated the same as none
    let response = send(&app, "GET", "/api/user", None, Some(&"ab".repeat(32))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Profile Tests
// =============================================================================

#[tokio::test]
async fn test_profile_list_only_own() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (alice, session) = setup_user(&app, "alice@example.com", "Alice").await;
    register(&app, "bob@example.com", "Bob").await;

    let response = send(&app, "GET", "/api/profiles", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    let profiles = body.as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["id"], alice);
    assert_eq!(profiles[0]["name"], "Alice");
}

#[tokio::test]
async fn test_profile_retrieve_and_update() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (id, _) = setup_user(&app, "cook@example.com", "Cook").await;
    let uri = format!("/api/profiles/{id}");

    let body = json!({ "bio": "Now with bio", "image": "avatars/cook.png" });
    let response = send(&app, "PATCH", &uri, Some(body), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["name"], "Cook");
    assert_eq!(body["bio"], "Now with bio");
    assert_eq!(body["image"], "avatars/cook.png");

    // PUT replaces; omitted bio resets to empty
    let body = json!({ "name": "Head Cook" });
    let response = send(&app, "PUT", &uri, Some(body), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["name"], "Head Cook");
    assert_eq!(body["bio"], "");
    assert!(body["image"].is_null());
}

#[tokio::test]
async fn test_profile_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));

    let response = send(&app, "GET", "/api/profiles/999", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_ids_are_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;

    for (method, uri) in [
        ("GET", "/api/profiles/abc"),
        ("DELETE", "/api/profiles/-1"),
        ("GET", "/api/recipes/abc"),
        ("DELETE", "/api/recipes/1.5"),
        ("POST", "/api/recipes/abc/favorite"),
        ("DELETE", "/api/recipes/abc/favorite"),
    ] {
        let response = send(&app, method, uri, None, Some(&session)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");

        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "application/json");
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body, json!({ "error": "Not found" }));
    }
}

#[tokio::test]
async fn test_profile_delete_and_recreate() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (id, session) = setup_user(&app, "cook@example.com", "Cook").await;
    let recipe = create_recipe(&app, &session, "Bread").await;

    // Profile already exists
    let body = json!({ "name": "Again" });
    let response = send(&app, "POST", "/api/profiles", Some(body.clone()), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "DELETE", &format!("/api/profiles/{id}"), None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Recipes go with the profile
    let uri = format!("/api/recipes/{recipe}");
    let response = send(&app, "GET", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Account and session survive; a new profile can be created
    let response = send(&app, "POST", "/api/profiles", Some(body), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Again");
}

// =============================================================================
// Recipe Tests
// =============================================================================

#[tokio::test]
async fn test_recipe_crud() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (profile, session) = setup_user(&app, "cook@example.com", "Cook").await;

    let first = create_recipe(&app, &session, "Bread").await;
    let second = create_recipe(&app, &session, "Soup").await;
    assert!(second > first);

    let response = send(&app, "GET", "/api/recipes", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    let recipes = body.as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["title"], "Bread");
    assert_eq!(recipes[0]["user_profile"], profile);
    assert_eq!(recipes[1]["title"], "Soup");

    let uri = format!("/api/recipes/{first}");
    let body = json!({ "title": "Sourdough" });
    let response = send(&app, "PATCH", &uri, Some(body), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["title"], "Sourdough");
    assert_eq!(body["equipment"], "Oven");

    let response = send(&app, "PUT", &uri, Some(recipe_body("Rye")), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["title"], "Rye");
    assert_eq!(body["user_profile"], profile);

    let response = send(&app, "DELETE", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_create_validation() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;

    let body = json!({ "title": "Bread" });
    let response = send(&app, "POST", "/api/recipes", Some(body), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = recipe_body("Bread");
    body["user_profile"] = json!(999);
    let response = send(&app, "POST", "/api/recipes", Some(body), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ownership_enforced_when_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_db(&temp_dir);
    let app = create_strict_app(db);
    let (alice, alice_session) = setup_user(&app, "alice@example.com", "Alice").await;
    let (_, bob_session) = setup_user(&app, "bob@example.com", "Bob").await;
    let recipe = create_recipe(&app, &alice_session, "Bread").await;

    let uri = format!("/api/recipes/{recipe}");
    let body = json!({ "title": "Stolen" });
    let response = send(&app, "PATCH", &uri, Some(body), Some(&bob_session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "DELETE", &uri, None, Some(&bob_session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mut body = recipe_body("Impostor");
    body["user_profile"] = json!(alice);
    let response = send(&app, "POST", "/api/recipes", Some(body), Some(&bob_session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let profile_uri = format!("/api/profiles/{alice}");
    let body = json!({ "name": "Mallory" });
    let response = send(&app, "PATCH", &profile_uri, Some(body.clone()), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, "PATCH", &profile_uri, Some(body), Some(&bob_session)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Owner is unaffected
    let response = send(&app, "DELETE", &uri, None, Some(&alice_session)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Favorite Tests
// =============================================================================

#[tokio::test]
async fn test_favorite_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;
    let recipe = create_recipe(&app, &session, "Bread").await;
    let uri = format!("/api/recipes/{recipe}/favorite");

    let response = send(&app, "POST", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Recipe added to favorites" }));

    let response = send(&app, "POST", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Recipe already in favorites" }));

    let response = send(&app, "GET", "/api/favorites", None, Some(&session)).await;
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], recipe);

    let response = send(&app, "DELETE", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Recipe removed from favorites" }));

    let response = send(&app, "DELETE", &uri, None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Recipe not in favorites" }));

    let response = send(&app, "GET", "/api/favorites", None, Some(&session)).await;
    let body = body_to_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_favorite_missing_recipe() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;

    let response = send(&app, "POST", "/api/recipes/999/favorite", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/api/recipes/999/favorite", None, Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_are_per_account() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, alice) = setup_user(&app, "alice@example.com", "Alice").await;
    let (_, bob) = setup_user(&app, "bob@example.com", "Bob").await;
    let recipe = create_recipe(&app, &alice, "Bread").await;
    let uri = format!("/api/recipes/{recipe}/favorite");

    let response = send(&app, "POST", &uri, None, Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Bob's first favorite of the same recipe is still a creation
    let response = send(&app, "POST", &uri, None, Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "DELETE", &uri, None, Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/favorites", None, Some(&alice)).await;
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleted_recipe_leaves_favorites() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (_, session) = setup_user(&app, "cook@example.com", "Cook").await;
    let recipe = create_recipe(&app, &session, "Bread").await;

    let uri = format!("/api/recipes/{recipe}/favorite");
    send(&app, "POST", &uri, None, Some(&session)).await;
    send(&app, "DELETE", &format!("/api/recipes/{recipe}"), None, Some(&session)).await;

    let response = send(&app, "GET", "/api/favorites", None, Some(&session)).await;
    let body = body_to_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}

// =============================================================================
// Account Deletion Tests
// =============================================================================

#[tokio::test]
async fn test_delete_account_cascades() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(create_test_db(&temp_dir));
    let (id, alice) = setup_user(&app, "alice@example.com", "Alice").await;
    let (_, bob) = setup_user(&app, "bob@example.com", "Bob").await;
    let recipe = create_recipe(&app, &alice, "Bread").await;
    send(&app, "POST", &format!("/api/recipes/{recipe}/favorite"), None, Some(&bob)).await;

    // Wrong password is refused
    let body = json!({ "password": "Wrong1234" });
    let response = send(&app, "DELETE", "/api/user", Some(body), Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json!({ "password": TEST_PASSWORD });
    let response = send(&app, "DELETE", "/api/user", Some(body), Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);

    let response = send(&app, "GET", "/api/user", None, Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "GET", &format!("/api/profiles/{id}"), None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/api/favorites", None, Some(&bob)).await;
    let body = body_to_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());

    // The address is free again
    let body = json!({ "email": "alice@example.com", "password": TEST_PASSWORD });
    let response = send(&app, "POST", "/api/login", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    register(&app, "alice@example.com", "Alice Again").await;
}

//! Shared helpers for API integration tests.
//!
//! Every test builds a fresh app over the in-memory backend, so tests are
//! isolated and need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use trialsite_api::auth::jwt::{generate_access_token, JwtConfig};
use trialsite_api::auth::login_code::LoginCodeConfig;
use trialsite_api::auth::password::hash_password;
use trialsite_api::config::{ServerConfig, StorageBackend};
use trialsite_api::router::build_app_router;
use trialsite_api::state::AppState;
use trialsite_core::roles::{ROLE_COMPANY_ADMIN, ROLE_INVESTIGATOR, ROLE_SUPER_ADMIN};
use trialsite_core::types::DbId;
use trialsite_db::models::company::{Company, CreateCompany};
use trialsite_db::models::hospital::{CreateHospital, Hospital};
use trialsite_db::models::user::{CreateUser, User};
use trialsite_db::{CompanyStore, HospitalStore, JsonStore, Store, UserStore};

/// Password given to every seeded account that has one.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Login codes are echoed in responses so the code flow can be driven
/// end to end.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        storage: StorageBackend::Memory,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        login_codes: LoginCodeConfig {
            ttl_secs: 600,
            max_attempts: 3,
            echo: true,
        },
        bootstrap_admin: None,
    }
}

/// A running app plus direct access to its store for seeding.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
}

impl TestApp {
    /// Clone of the router, ready for a single `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses [`build_app_router`], so tests exercise the same middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) as production.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store: Arc<dyn Store> = Arc::new(JsonStore::in_memory());
    let state = AppState::new(Arc::clone(&store), config.clone());
    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn seed_company(store: &Arc<dyn Store>, name: &str) -> Company {
    let input = CreateCompany {
        name: name.to_string(),
        slug: None,
        description: None,
        clinical_trial_id: None,
        logo_url: None,
        primary_color: Some("#0055aa".to_string()),
        contact_email: None,
    };
    let slug = trialsite_core::validation::slugify(name);
    CompanyStore::create_company(&**store, &input, &slug)
        .await
        .expect("company creation should succeed")
}

pub async fn seed_user(
    store: &Arc<dyn Store>,
    company_id: Option<DbId>,
    email: &str,
    role: &str,
    with_password: bool,
) -> User {
    let password_hash = with_password
        .then(|| hash_password(TEST_PASSWORD).expect("hashing should succeed"));
    let input = CreateUser {
        company_id,
        hospital_id: None,
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: email.split('@').next().unwrap_or("user").to_string(),
        role: role.to_string(),
        password_hash,
    };
    UserStore::create_user(&**store, &input)
        .await
        .expect("user creation should succeed")
}

pub async fn seed_super_admin(store: &Arc<dyn Store>) -> User {
    seed_user(store, None, "root@platform.test", ROLE_SUPER_ADMIN, true).await
}

pub async fn seed_admin(store: &Arc<dyn Store>, company_id: DbId, email: &str) -> User {
    seed_user(store, Some(company_id), email, ROLE_COMPANY_ADMIN, false).await
}

pub async fn seed_investigator(store: &Arc<dyn Store>, company_id: DbId, email: &str) -> User {
    seed_user(store, Some(company_id), email, ROLE_INVESTIGATOR, false).await
}

pub async fn seed_hospital(
    store: &Arc<dyn Store>,
    company_id: DbId,
    name: &str,
    target: Option<i32>,
) -> Hospital {
    let input = CreateHospital {
        name: name.to_string(),
        city: None,
        country: None,
        principal_investigator: None,
        target_enrollment: target,
        screened_count: None,
    };
    HospitalStore::create_hospital(&**store, company_id, &input)
        .await
        .expect("hospital creation should succeed")
}

/// Mint an access token for `user` without going through login.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.company_id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Assert the status and return the parsed body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

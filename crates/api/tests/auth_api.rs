//! HTTP-level tests for password login, login codes and the caller profile.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, expect_status, get, get_auth, post_json, post_json_auth, seed_company,
    seed_investigator, seed_super_admin, seed_user, token_for, TEST_PASSWORD,
};
use serde_json::json;
use trialsite_core::roles::ROLE_COMPANY_ADMIN;
use trialsite_db::models::company::UpdateCompany;
use trialsite_db::{CompanyStore, UserStore};

// ---------------------------------------------------------------------------
// Password login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_success_returns_token_and_profile() {
    let app = common::build_test_app();
    let admin = seed_super_admin(&app.store).await;

    let body = json!({ "email": "root@platform.test", "password": TEST_PASSWORD });
    let json = expect_status(post_json(app.app(), "/api/auth/login", body).await, StatusCode::OK).await;

    assert_eq!(json["success"], true);
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
    assert_eq!(json["data"]["user"]["id"], admin.id);
    assert_eq!(json["data"]["user"]["role"], "super_admin");
    assert!(
        json["data"]["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = common::build_test_app();
    seed_super_admin(&app.store).await;

    let body = json!({ "email": "  ROOT@Platform.test ", "password": TEST_PASSWORD });
    let response = post_json(app.app(), "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_records_last_login() {
    let app = common::build_test_app();
    let admin = seed_super_admin(&app.store).await;
    assert!(admin.last_login_at.is_none());

    let body = json!({ "email": "root@platform.test", "password": TEST_PASSWORD });
    post_json(app.app(), "/api/auth/login", body).await;

    let reloaded = app.store.find_user(admin.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[tokio::test]
async fn login_wrong_password_returns_401() {
    let app = common::build_test_app();
    seed_super_admin(&app.store).await;

    let body = json!({ "email": "root@platform.test", "password": "not-the-password" });
    let json = expect_status(
        post_json(app.app(), "/api/auth/login", body).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;

    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test]
async fn login_unknown_email_returns_401() {
    let app = common::build_test_app();

    let body = json!({ "email": "ghost@nowhere.test", "password": TEST_PASSWORD });
    let response = post_json(app.app(), "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn code_only_account_cannot_use_password_login() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let body = json!({ "email": "inv@acme.test", "password": TEST_PASSWORD });
    let response = post_json(app.app(), "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_user_gets_403() {
    let app = common::build_test_app();
    let admin = seed_super_admin(&app.store).await;
    app.store.deactivate_user(admin.id).await.unwrap();

    let body = json!({ "email": "root@platform.test", "password": TEST_PASSWORD });
    let response = post_json(app.app(), "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn inactive_company_blocks_sign_in() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Dormant Bio").await;
    seed_user(
        &app.store,
        Some(company.id),
        "admin@dormant.test",
        ROLE_COMPANY_ADMIN,
        true,
    )
    .await;
    let update = UpdateCompany {
        is_active: Some(false),
        ..Default::default()
    };
    app.store.update_company(company.id, &update).await.unwrap();

    let body = json!({ "email": "admin@dormant.test", "password": TEST_PASSWORD });
    let json = expect_status(
        post_json(app.app(), "/api/auth/login", body).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(json["error"], "Company is inactive");
}

// ---------------------------------------------------------------------------
// Login codes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_code_round_trip() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let inv = seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let json = expect_status(
        post_json(app.app(), "/api/auth/login-code", json!({ "email": "inv@acme.test" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["expires_in"], 600);
    let code = json["data"]["code"].as_str().expect("code is echoed in tests").to_string();
    assert_eq!(code.len(), 6);

    let verify = json!({ "email": "inv@acme.test", "code": code });
    let json = expect_status(
        post_json(app.app(), "/api/auth/login-code/verify", verify.clone()).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["user"]["id"], inv.id);
    assert_eq!(json["data"]["user"]["company_id"], company.id);
    assert!(json["data"]["access_token"].is_string());

    // Single use.
    let response = post_json(app.app(), "/api/auth/login-code/verify", verify).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_code_for_unknown_email_looks_the_same() {
    let app = common::build_test_app();

    let json = expect_status(
        post_json(app.app(), "/api/auth/login-code", json!({ "email": "nobody@x.test" })).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["expires_in"], 600);
    assert!(json["data"].get("code").is_none());
}

#[tokio::test]
async fn login_code_rejects_malformed_email() {
    let app = common::build_test_app();

    let json = expect_status(
        post_json(app.app(), "/api/auth/login-code", json!({ "email": "not-an-email" })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_code_exhausted_after_max_attempts() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let json = body_json(
        post_json(app.app(), "/api/auth/login-code", json!({ "email": "inv@acme.test" })).await,
    )
    .await;
    let code = json["data"]["code"].as_str().unwrap().to_string();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    // The test config allows three attempts.
    let bad = json!({ "email": "inv@acme.test", "code": wrong });
    let first = expect_status(
        post_json(app.app(), "/api/auth/login-code/verify", bad.clone()).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(first["error"], "Invalid login code. 2 attempt(s) left");
    post_json(app.app(), "/api/auth/login-code/verify", bad.clone()).await;
    let third = body_json(post_json(app.app(), "/api/auth/login-code/verify", bad).await).await;
    assert_eq!(third["error"], "Too many invalid attempts. Try again later");

    // The real code is gone too.
    let good = json!({ "email": "inv@acme.test", "code": code });
    let response = post_json(app.app(), "/api/auth/login-code/verify", good).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requesting_new_codes_does_not_reset_attempts() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let mut last_error = String::new();
    for _ in 0..3 {
        let issued = body_json(
            post_json(app.app(), "/api/auth/login-code", json!({ "email": "inv@acme.test" }))
                .await,
        )
        .await;
        let code = issued["data"]["code"].as_str().unwrap().to_string();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let json = expect_status(
            post_json(
                app.app(),
                "/api/auth/login-code/verify",
                json!({ "email": "inv@acme.test", "code": wrong }),
            )
            .await,
            StatusCode::UNAUTHORIZED,
        )
        .await;
        last_error = json["error"].as_str().unwrap().to_string();
    }
    assert_eq!(last_error, "Too many invalid attempts. Try again later");

    // While locked, the request still succeeds but no code is handed out.
    let json = expect_status(
        post_json(app.app(), "/api/auth/login-code", json!({ "email": "inv@acme.test" })).await,
        StatusCode::OK,
    )
    .await;
    assert!(json["data"].get("code").is_none());
}

// ---------------------------------------------------------------------------
// Profile and password
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_returns_user_and_company_branding() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let inv = seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let json = expect_status(
        get_auth(app.app(), "/api/auth/me", &token_for(&inv)).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(json["data"]["user"]["email"], "inv@acme.test");
    assert_eq!(json["data"]["user"]["has_password"], false);
    assert_eq!(json["data"]["company"]["slug"], "acme-trials");
    assert_eq!(json["data"]["company"]["primary_color"], "#0055aa");
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = common::build_test_app();

    let response = get(app.app(), "/api/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.app(), "/api/auth/me", "garbage.token.value").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn code_only_user_can_set_then_use_a_password() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let inv = seed_investigator(&app.store, company.id, "inv@acme.test").await;
    let token = token_for(&inv);

    let body = json!({ "new_password": "a-brand-new-secret" });
    let response = post_json_auth(app.app(), "/api/auth/change-password", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = json!({ "email": "inv@acme.test", "password": "a-brand-new-secret" });
    let response = post_json(app.app(), "/api/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn change_password_checks_current_password() {
    let app = common::build_test_app();
    let admin = seed_super_admin(&app.store).await;
    let token = token_for(&admin);

    let missing = json!({ "new_password": "another-long-secret" });
    let response = post_json_auth(app.app(), "/api/auth/change-password", missing, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let wrong = json!({ "current_password": "nope-nope-nope", "new_password": "another-long-secret" });
    let response = post_json_auth(app.app(), "/api/auth/change-password", wrong, &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let short = json!({ "current_password": TEST_PASSWORD, "new_password": "short" });
    let response = post_json_auth(app.app(), "/api/auth/change-password", short, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let ok = json!({ "current_password": TEST_PASSWORD, "new_password": "another-long-secret" });
    let response = post_json_auth(app.app(), "/api/auth/change-password", ok, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

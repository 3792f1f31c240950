//! HTTP-level tests for companies, users and hospitals.

mod common;

use axum::http::StatusCode;
use common::{
    delete_auth, expect_status, get, get_auth, post_json, post_json_auth, put_json_auth,
    seed_admin, seed_company, seed_hospital, seed_investigator, seed_super_admin, token_for,
};
use serde_json::json;
use trialsite_db::UserStore;

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn super_admin_creates_company_with_derived_slug() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);

    let body = json!({ "name": "Nova Cardio Study", "primary_color": "#AA3300" });
    let json = expect_status(
        post_json_auth(app.app(), "/api/companies", body, &root).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(json["message"], "Company created");
    assert_eq!(json["data"]["slug"], "nova-cardio-study");
    assert_eq!(json["data"]["is_active"], true);
}

#[tokio::test]
async fn duplicate_slug_returns_409() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);
    seed_company(&app.store, "Acme Trials").await;

    let body = json!({ "name": "Another", "slug": "acme-trials" });
    let json = expect_status(
        post_json_auth(app.app(), "/api/companies", body, &root).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn invalid_company_input_is_rejected() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);

    for body in [
        json!({ "name": "" }),
        json!({ "name": "Bad Color", "primary_color": "red" }),
        json!({ "name": "Bad Slug", "slug": "Not A Slug" }),
        json!({ "name": "!!!" }),
    ] {
        let response = post_json_auth(app.app(), "/api/companies", body, &root).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn only_super_admin_creates_companies() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);

    let response =
        post_json_auth(app.app(), "/api/companies", json!({ "name": "Rogue" }), &admin).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn company_list_is_scoped_to_caller() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);
    let acme = seed_company(&app.store, "Acme Trials").await;
    seed_company(&app.store, "Beta Pharma").await;
    let inv = token_for(&seed_investigator(&app.store, acme.id, "inv@acme.test").await);

    let all = expect_status(get_auth(app.app(), "/api/companies", &root).await, StatusCode::OK).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let own = expect_status(get_auth(app.app(), "/api/companies", &inv).await, StatusCode::OK).await;
    let own = own["data"].as_array().unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["id"], acme.id);
}

#[tokio::test]
async fn public_lookup_returns_branding_only() {
    let app = common::build_test_app();
    seed_company(&app.store, "Acme Trials").await;

    let json = expect_status(
        get(app.app(), "/api/companies/lookup/acme-trials").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["name"], "Acme Trials");
    assert_eq!(json["data"]["primary_color"], "#0055aa");
    assert!(json["data"].get("contact_email").is_none());

    let response = get(app.app(), "/api/companies/lookup/no-such-company").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn company_admin_updates_branding_but_not_active_flag() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    let uri = format!("/api/company/{}", company.id);

    let json = expect_status(
        put_json_auth(app.app(), &uri, json!({ "primary_color": "#101010" }), &admin).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["primary_color"], "#101010");
    assert_eq!(json["data"]["name"], "Acme Trials");

    let response = put_json_auth(app.app(), &uri, json!({ "is_active": false }), &admin).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleted_company_disappears_and_keeps_slug() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);
    let company = seed_company(&app.store, "Acme Trials").await;
    let uri = format!("/api/company/{}", company.id);

    let json = expect_status(delete_auth(app.app(), &uri, &root).await, StatusCode::OK).await;
    assert!(json["data"].is_null());

    let response = get_auth(app.app(), &uri, &root).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.app(), &uri, &root).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json!({ "name": "Acme Trials" });
    let response = post_json_auth(app.app(), "/api/companies", body, &root).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn stats_count_company_records() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    seed_investigator(&app.store, company.id, "inv@acme.test").await;
    seed_hospital(&app.store, company.id, "Site A", Some(10)).await;
    seed_hospital(&app.store, company.id, "Site B", Some(5)).await;

    let json = expect_status(
        get_auth(app.app(), &format!("/api/company/{}/stats", company.id), &admin).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["user_count"], 2);
    assert_eq!(json["data"]["investigator_count"], 1);
    assert_eq!(json["data"]["hospital_count"], 2);
    assert_eq!(json["data"]["total_target"], 15);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_creates_investigator_and_duplicate_email_conflicts() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    let uri = format!("/api/company/{}/users", company.id);

    let body = json!({
        "email": "New.Investigator@Acme.test",
        "first_name": "Nia",
        "last_name": "Okafor"
    });
    let json = expect_status(
        post_json_auth(app.app(), &uri, body.clone(), &admin).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(json["data"]["email"], "new.investigator@acme.test");
    assert_eq!(json["data"]["role"], "investigator");
    assert_eq!(json["data"]["company_id"], company.id);
    assert_eq!(json["data"]["has_password"], false);

    let response = post_json_auth(app.app(), &uri, body, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn super_admin_role_cannot_be_granted_inside_a_company() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    let inv = seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let body = json!({
        "email": "sneaky@acme.test",
        "first_name": "S",
        "last_name": "Neaky",
        "role": "super_admin"
    });
    let uri = format!("/api/company/{}/users", company.id);
    let response = post_json_auth(app.app(), &uri, body, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/company/{}/users/{}", company.id, inv.id);
    let response = put_json_auth(app.app(), &uri, json!({ "role": "super_admin" }), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_assignment_must_use_own_hospital() {
    let app = common::build_test_app();
    let acme = seed_company(&app.store, "Acme Trials").await;
    let beta = seed_company(&app.store, "Beta Pharma").await;
    let admin = token_for(&seed_admin(&app.store, acme.id, "admin@acme.test").await);
    let inv = seed_investigator(&app.store, acme.id, "inv@acme.test").await;
    let own_site = seed_hospital(&app.store, acme.id, "Acme Site", None).await;
    let foreign_site = seed_hospital(&app.store, beta.id, "Beta Site", None).await;
    let uri = format!("/api/company/{}/users/{}", acme.id, inv.id);

    let response =
        put_json_auth(app.app(), &uri, json!({ "hospital_id": foreign_site.id }), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = expect_status(
        put_json_auth(app.app(), &uri, json!({ "hospital_id": own_site.id }), &admin).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["hospital_id"], own_site.id);
}

#[tokio::test]
async fn deactivate_user_and_not_self() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin_user = seed_admin(&app.store, company.id, "admin@acme.test").await;
    let admin = token_for(&admin_user);
    let inv = seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let uri = format!("/api/company/{}/users/{}", company.id, inv.id);
    let json = expect_status(delete_auth(app.app(), &uri, &admin).await, StatusCode::OK).await;
    assert!(json["data"].is_null());
    let reloaded = app.store.find_user(inv.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);

    let own = format!("/api/company/{}/users/{}", company.id, admin_user.id);
    let response = delete_auth(app.app(), &own, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn investigators_read_but_cannot_manage_users() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let inv = token_for(&seed_investigator(&app.store, company.id, "inv@acme.test").await);
    let uri = format!("/api/company/{}/users", company.id);

    let json = expect_status(get_auth(app.app(), &uri, &inv).await, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let body = json!({ "email": "x@acme.test", "first_name": "X", "last_name": "Y" });
    let response = post_json_auth(app.app(), &uri, body, &inv).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reset_password_enables_login() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    let inv = seed_investigator(&app.store, company.id, "inv@acme.test").await;

    let uri = format!("/api/company/{}/users/{}/reset-password", company.id, inv.id);
    let response = post_json_auth(
        app.app(),
        &uri,
        json!({ "new_password": "site-password-2025" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = json!({ "email": "inv@acme.test", "password": "site-password-2025" });
    let response = post_json(app.app(), "/api/auth/login", login).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Hospitals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hospital_crud() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    let base = format!("/api/company/{}/hospitals", company.id);

    let body = json!({ "name": "St. Mary", "city": "Leeds", "target_enrollment": 40 });
    let created = expect_status(
        post_json_auth(app.app(), &base, body, &admin).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["enrolled_count"], 0);
    assert_eq!(created["data"]["company_id"], company.id);

    let uri = format!("{base}/{id}");
    let updated = expect_status(
        put_json_auth(app.app(), &uri, json!({ "screened_count": 12 }), &admin).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["data"]["screened_count"], 12);
    assert_eq!(updated["data"]["city"], "Leeds");

    let response = put_json_auth(app.app(), &uri, json!({ "enrolled_count": -1 }), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let list = expect_status(get_auth(app.app(), &base, &admin).await, StatusCode::OK).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    expect_status(delete_auth(app.app(), &uri, &admin).await, StatusCode::OK).await;
    let response = get_auth(app.app(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

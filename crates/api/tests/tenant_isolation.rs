//! Cross-tenant access: foreign company paths are 403, foreign record ids
//! under one's own company path are 404.

mod common;

use axum::http::StatusCode;
use common::{
    delete_auth, get_auth, post_json_auth, put_json_auth, seed_admin, seed_company,
    seed_hospital, seed_investigator, seed_super_admin, token_for,
};
use serde_json::json;
use trialsite_core::roles::ROLE_INVESTIGATOR;
use trialsite_db::models::company::UpdateCompany;
use trialsite_db::models::news::CreateNews;
use trialsite_db::models::user::UpdateUser;
use trialsite_db::{CompanyStore, NewsStore, UserStore};

#[tokio::test]
async fn member_of_a_gets_403_on_company_b_paths() {
    let app = common::build_test_app();
    let a = seed_company(&app.store, "Acme Trials").await;
    let b = seed_company(&app.store, "Beta Pharma").await;
    let admin_a = token_for(&seed_admin(&app.store, a.id, "admin@acme.test").await);
    let inv_a = token_for(&seed_investigator(&app.store, a.id, "inv@acme.test").await);

    for path in [
        "",
        "/stats",
        "/leaderboard",
        "/users",
        "/hospitals",
        "/enrollments",
        "/news",
        "/pdfs",
        "/training",
        "/protocols",
        "/protocols/current",
    ] {
        let uri = format!("/api/company/{}{path}", b.id);
        for token in [&admin_a, &inv_a] {
            let response = get_auth(app.app(), &uri, token).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "GET {uri}");
        }
    }

    let uri = format!("/api/company/{}/hospitals", b.id);
    let response = post_json_auth(app.app(), &uri, json!({ "name": "Intruder" }), &admin_a).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/company/{}", b.id);
    let response = put_json_auth(app.app(), &uri, json!({ "name": "Renamed" }), &admin_a).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn foreign_record_ids_are_not_found_under_own_path() {
    let app = common::build_test_app();
    let a = seed_company(&app.store, "Acme Trials").await;
    let b = seed_company(&app.store, "Beta Pharma").await;
    let admin_a = token_for(&seed_admin(&app.store, a.id, "admin@acme.test").await);
    let user_b = seed_investigator(&app.store, b.id, "inv@beta.test").await;
    let site_b = seed_hospital(&app.store, b.id, "Beta Site", None).await;
    let news_b = app
        .store
        .create_news(
            b.id,
            None,
            &CreateNews {
                title: "Beta only".to_string(),
                body: "Private".to_string(),
                image_url: None,
                is_published: Some(true),
            },
        )
        .await
        .unwrap();

    for uri in [
        format!("/api/company/{}/users/{}", a.id, user_b.id),
        format!("/api/company/{}/hospitals/{}", a.id, site_b.id),
        format!("/api/company/{}/hospitals/{}/enrollments", a.id, site_b.id),
        format!("/api/company/{}/news/{}", a.id, news_b.id),
        format!("/api/company/{}/enrollments?hospital_id={}", a.id, site_b.id),
    ] {
        let response = get_auth(app.app(), &uri, &admin_a).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    let uri = format!("/api/company/{}/hospitals/{}", a.id, site_b.id);
    let response = delete_auth(app.app(), &uri, &admin_a).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uri = format!("/api/company/{}/hospitals/{}/enrollments", a.id, site_b.id);
    let response =
        post_json_auth(app.app(), &uri, json!({ "subject_code": "X-1" }), &admin_a).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uri = format!("/api/company/{}/news/{}", a.id, news_b.id);
    let response = put_json_auth(app.app(), &uri, json!({ "title": "Hijacked" }), &admin_a).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn super_admin_crosses_tenants() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);
    let a = seed_company(&app.store, "Acme Trials").await;
    let b = seed_company(&app.store, "Beta Pharma").await;
    seed_hospital(&app.store, b.id, "Beta Site", None).await;

    let response = get_auth(app.app(), &format!("/api/company/{}/hospitals", b.id), &root).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/company/{}/hospitals", a.id);
    let response = post_json_auth(app.app(), &uri, json!({ "name": "Root Site" }), &root).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app.app(), "/api/company/9999", &root).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivated_user_token_stops_working() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@acme.test").await);
    let inv_user = seed_investigator(&app.store, company.id, "inv@acme.test").await;
    let inv = token_for(&inv_user);
    let site = seed_hospital(&app.store, company.id, "Site A", None).await;

    let uri = format!("/api/company/{}/users/{}", company.id, inv_user.id);
    let response = delete_auth(app.app(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/company/{}/hospitals/{}/enrollments", company.id, site.id);
    let response = post_json_auth(app.app(), &uri, json!({ "subject_code": "S-1" }), &inv).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.app(), &format!("/api/company/{}/users", company.id), &inv).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn demoted_admin_loses_admin_rights_immediately() {
    let app = common::build_test_app();
    let company = seed_company(&app.store, "Acme Trials").await;
    let admin_user = seed_admin(&app.store, company.id, "admin@acme.test").await;
    let admin = token_for(&admin_user);

    let update = UpdateUser {
        role: Some(ROLE_INVESTIGATOR.to_string()),
        ..Default::default()
    };
    app.store.update_user(admin_user.id, &update).await.unwrap();

    let uri = format!("/api/company/{}/hospitals", company.id);
    let response = post_json_auth(app.app(), &uri, json!({ "name": "New Site" }), &admin).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Member reads still work.
    let response = get_auth(app.app(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn inactive_company_refuses_existing_tokens() {
    let app = common::build_test_app();
    let root = token_for(&seed_super_admin(&app.store).await);
    let company = seed_company(&app.store, "Dormant Bio").await;
    let admin = token_for(&seed_admin(&app.store, company.id, "admin@dormant.test").await);
    let inv = token_for(&seed_investigator(&app.store, company.id, "inv@dormant.test").await);

    let update = UpdateCompany {
        is_active: Some(false),
        ..Default::default()
    };
    app.store.update_company(company.id, &update).await.unwrap();

    let hospitals = format!("/api/company/{}/hospitals", company.id);
    for token in [&admin, &inv] {
        let response = get_auth(app.app(), &hospitals, token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
    let response = post_json_auth(app.app(), &hospitals, json!({ "name": "Late Site" }), &admin).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The platform admin can still reach it and switch it back on.
    let uri = format!("/api/company/{}", company.id);
    let response = put_json_auth(app.app(), &uri, json!({ "is_active": true }), &root).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app.app(), &hospitals, &inv).await;
    assert_eq!(response.status(), StatusCode::OK);
}

//! Behaviour of the document backend, including persistence to disk.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use trialsite_db::models::company::{CreateCompany, UpdateCompany};
use trialsite_db::models::enrollment::CreateEnrollment;
use trialsite_db::models::hospital::CreateHospital;
use trialsite_db::models::news::{CreateNews, UpdateNews};
use trialsite_db::models::protocol::{CreateStudyProtocol, UpdateStudyProtocol};
use trialsite_db::models::user::CreateUser;
use trialsite_db::store::{
    CompanyStore, EnrollmentStore, HospitalStore, NewsStore, ProtocolStore, StatsStore, UserStore,
};
use trialsite_db::{JsonStore, Store, StoreError};

fn new_company(name: &str) -> CreateCompany {
    CreateCompany {
        name: name.to_string(),
        slug: None,
        description: None,
        clinical_trial_id: Some("NCT00000001".to_string()),
        logo_url: None,
        primary_color: Some("#112233".to_string()),
        contact_email: None,
    }
}

fn new_hospital(name: &str, target: Option<i32>) -> CreateHospital {
    CreateHospital {
        name: name.to_string(),
        city: Some("Lyon".to_string()),
        country: Some("FR".to_string()),
        principal_investigator: None,
        target_enrollment: target,
        screened_count: None,
    }
}

fn new_enrollment(code: &str) -> CreateEnrollment {
    CreateEnrollment {
        subject_code: code.to_string(),
        notes: None,
        enrolled_at: None,
    }
}

fn new_protocol(version: &str, is_current: bool) -> CreateStudyProtocol {
    CreateStudyProtocol {
        title: "Main protocol".to_string(),
        version: version.to_string(),
        summary: None,
        document_url: None,
        effective_date: None,
        is_current: Some(is_current),
    }
}

fn new_investigator(company_id: i64, email: &str) -> CreateUser {
    CreateUser {
        company_id: Some(company_id),
        hospital_id: None,
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Byron".to_string(),
        role: "investigator".to_string(),
        password_hash: None,
    }
}

#[tokio::test]
async fn backend_names() {
    assert_eq!(JsonStore::in_memory().backend_name(), "memory");

    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path().join("data.json")).await.unwrap();
    assert_eq!(store.backend_name(), "json");
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data.json");

    let company_id = {
        let store = JsonStore::open(&path).await.unwrap();
        let company = store
            .create_company(&new_company("Acme"), "acme")
            .await
            .unwrap();
        store
            .create_hospital(company.id, &new_hospital("St. Mary", Some(10)))
            .await
            .unwrap();
        company.id
    };

    let reopened = JsonStore::open(&path).await.unwrap();
    let company = reopened.find_company_by_slug("acme").await.unwrap().unwrap();
    assert_eq!(company.id, company_id);
    assert_eq!(reopened.list_hospitals(company_id).await.unwrap().len(), 1);

    // Ids keep counting from where the previous process stopped.
    let second = reopened
        .create_company(&new_company("Beta"), "beta")
        .await
        .unwrap();
    assert_eq!(second.id, company_id + 1);
}

#[tokio::test]
async fn failed_persist_rolls_back_memory() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let store = JsonStore::open(data_dir.join("data.json")).await.unwrap();
    store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();

    std::fs::remove_dir_all(&data_dir).unwrap();

    let result = store.create_company(&new_company("Beta"), "beta").await;
    assert_matches!(result, Err(StoreError::Io(_)));
    assert_eq!(store.list_companies().await.unwrap().len(), 1);
    assert!(store.find_company_by_slug("beta").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_slug_conflicts_even_after_delete() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();

    let dup = store.create_company(&new_company("Acme 2"), "acme").await;
    assert_matches!(dup, Err(StoreError::Conflict(_)));

    assert!(store.delete_company(acme.id).await.unwrap());
    assert!(store.find_company(acme.id).await.unwrap().is_none());
    let again = store.create_company(&new_company("Acme 3"), "acme").await;
    assert_matches!(again, Err(StoreError::Conflict(_)));
}

#[tokio::test]
async fn company_update_applies_only_given_fields() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();

    let updated = store
        .update_company(
            acme.id,
            &UpdateCompany {
                name: Some("Acme Pharma".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Acme Pharma");
    assert_eq!(updated.primary_color.as_deref(), Some("#112233"));
    assert_eq!(updated.slug, "acme");

    let missing = store
        .update_company(999, &UpdateCompany::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();

    store
        .create_user(&new_investigator(acme.id, "ada@example.com"))
        .await
        .unwrap();
    let dup = store
        .create_user(&new_investigator(acme.id, "ada@example.com"))
        .await;
    assert_matches!(dup, Err(StoreError::Conflict(_)));

    let found = store
        .find_user_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(store.deactivate_user(found.id).await.unwrap());
    assert!(!store.deactivate_user(found.id).await.unwrap());
}

#[tokio::test]
async fn enrollment_keeps_counter_in_step() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();
    let site = store
        .create_hospital(acme.id, &new_hospital("St. Mary", Some(4)))
        .await
        .unwrap();

    let first = store
        .record_enrollment(acme.id, site.id, None, &new_enrollment("S-001"))
        .await
        .unwrap();
    store
        .record_enrollment(acme.id, site.id, None, &new_enrollment("S-002"))
        .await
        .unwrap();

    let site_now = store.find_hospital(site.id).await.unwrap().unwrap();
    assert_eq!(site_now.enrolled_count, 2);

    assert!(store.withdraw_enrollment(first.id).await.unwrap());
    assert!(!store.withdraw_enrollment(first.id).await.unwrap());
    let site_now = store.find_hospital(site.id).await.unwrap().unwrap();
    assert_eq!(site_now.enrolled_count, 1);
}

#[tokio::test]
async fn duplicate_subject_is_rejected_without_side_effects() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();
    let site = store
        .create_hospital(acme.id, &new_hospital("St. Mary", None))
        .await
        .unwrap();

    store
        .record_enrollment(acme.id, site.id, None, &new_enrollment("S-001"))
        .await
        .unwrap();
    let dup = store
        .record_enrollment(acme.id, site.id, None, &new_enrollment("S-001"))
        .await;
    assert_matches!(dup, Err(StoreError::Conflict(_)));

    let site_now = store.find_hospital(site.id).await.unwrap().unwrap();
    assert_eq!(site_now.enrolled_count, 1);
}

#[tokio::test]
async fn enrollment_requires_hospital_in_company() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();
    let beta = store
        .create_company(&new_company("Beta"), "beta")
        .await
        .unwrap();
    let beta_site = store
        .create_hospital(beta.id, &new_hospital("Beta General", None))
        .await
        .unwrap();

    let result = store
        .record_enrollment(acme.id, beta_site.id, None, &new_enrollment("S-001"))
        .await;
    assert_matches!(
        result,
        Err(StoreError::NotFound { entity: "Hospital", id }) if id == beta_site.id
    );
}

#[tokio::test]
async fn enrollments_list_newest_first_with_paging() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();
    let a = store
        .create_hospital(acme.id, &new_hospital("A", None))
        .await
        .unwrap();
    let b = store
        .create_hospital(acme.id, &new_hospital("B", None))
        .await
        .unwrap();

    let now = Utc::now();
    for (i, site) in [a.id, b.id, a.id].into_iter().enumerate() {
        let input = CreateEnrollment {
            subject_code: format!("S-{i}"),
            notes: None,
            enrolled_at: Some(now - Duration::days(10 - i as i64)),
        };
        store
            .record_enrollment(acme.id, site, None, &input)
            .await
            .unwrap();
    }

    let all = store
        .list_enrollments(acme.id, None, 50, 0)
        .await
        .unwrap();
    let codes: Vec<&str> = all.iter().map(|e| e.subject_code.as_str()).collect();
    assert_eq!(codes, vec!["S-2", "S-1", "S-0"]);

    let only_a = store
        .list_enrollments(acme.id, Some(a.id), 50, 0)
        .await
        .unwrap();
    assert_eq!(only_a.len(), 2);

    let second_page = store
        .list_enrollments(acme.id, None, 1, 1)
        .await
        .unwrap();
    assert_eq!(second_page[0].subject_code, "S-1");

    assert_eq!(store.enrollment_dates(acme.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn current_protocol_is_unique() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();

    let v1 = store
        .create_protocol(acme.id, &new_protocol("1.0", true))
        .await
        .unwrap();
    let v2 = store
        .create_protocol(acme.id, &new_protocol("2.0", true))
        .await
        .unwrap();

    let current = store.current_protocol(acme.id).await.unwrap().unwrap();
    assert_eq!(current.id, v2.id);
    assert!(!store.find_protocol(v1.id).await.unwrap().unwrap().is_current);

    store
        .update_protocol(
            v1.id,
            &UpdateStudyProtocol {
                is_current: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let current = store.current_protocol(acme.id).await.unwrap().unwrap();
    assert_eq!(current.id, v1.id);

    let currents = store
        .list_protocols(acme.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.is_current)
        .count();
    assert_eq!(currents, 1);
}

#[tokio::test]
async fn drafts_hidden_and_publish_stamps_once() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();

    let draft = store
        .create_news(
            acme.id,
            None,
            &CreateNews {
                title: "Coming soon".to_string(),
                body: "Draft body".to_string(),
                image_url: None,
                is_published: Some(false),
            },
        )
        .await
        .unwrap();
    assert!(draft.published_at.is_none());

    assert!(store
        .list_news(acme.id, false, 50, 0)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.list_news(acme.id, true, 50, 0).await.unwrap().len(), 1);

    let publish = UpdateNews {
        is_published: Some(true),
        ..Default::default()
    };
    let published = store
        .update_news(draft.id, &publish)
        .await
        .unwrap()
        .unwrap();
    let stamped = published.published_at.unwrap();

    let unpublish = UpdateNews {
        is_published: Some(false),
        ..Default::default()
    };
    store.update_news(draft.id, &unpublish).await.unwrap();
    let republished = store
        .update_news(draft.id, &publish)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(republished.published_at, Some(stamped));

    assert!(store.delete_news(draft.id).await.unwrap());
    assert!(store.find_news(draft.id).await.unwrap().is_none());
}

#[tokio::test]
async fn stats_cover_live_rows_only() {
    let store = JsonStore::in_memory();
    let acme = store
        .create_company(&new_company("Acme"), "acme")
        .await
        .unwrap();
    let kept = store
        .create_hospital(acme.id, &new_hospital("Kept", Some(10)))
        .await
        .unwrap();
    let dropped = store
        .create_hospital(acme.id, &new_hospital("Dropped", Some(5)))
        .await
        .unwrap();
    store
        .record_enrollment(acme.id, kept.id, None, &new_enrollment("S-1"))
        .await
        .unwrap();
    store
        .create_user(&new_investigator(acme.id, "ada@example.com"))
        .await
        .unwrap();
    store.delete_hospital(dropped.id).await.unwrap();

    let stats = store.company_stats(acme.id).await.unwrap();
    assert_eq!(stats.company_id, acme.id);
    assert_eq!(stats.user_count, 1);
    assert_eq!(stats.investigator_count, 1);
    assert_eq!(stats.hospital_count, 1);
    assert_eq!(stats.total_enrolled, 1);
    assert_eq!(stats.total_target, 10);
    assert_eq!(stats.enrollment_records, 1);
}

//! Hospitals, enrollments and dashboard counters.

use async_trait::async_trait;
use chrono::Utc;
use trialsite_core::types::{DbId, Timestamp};

use super::dataset::page;
use super::JsonStore;
use crate::models::enrollment::{CreateEnrollment, Enrollment};
use crate::models::hospital::{CreateHospital, Hospital, UpdateHospital};
use crate::models::stats::CompanyStats;
use crate::store::{EnrollmentStore, HospitalStore, StatsStore, StoreError, StoreResult};

#[async_trait]
impl HospitalStore for JsonStore {
    async fn create_hospital(
        &self,
        company_id: DbId,
        input: &CreateHospital,
    ) -> StoreResult<Hospital> {
        self.write(|data| {
            let now = Utc::now();
            Ok(data.hospitals.insert(|id| Hospital {
                id,
                company_id,
                name: input.name.clone(),
                city: input.city.clone(),
                country: input.country.clone(),
                principal_investigator: input.principal_investigator.clone(),
                target_enrollment: input.target_enrollment,
                enrolled_count: 0,
                screened_count: input.screened_count.unwrap_or(0),
                is_active: true,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_hospital(&self, id: DbId) -> StoreResult<Option<Hospital>> {
        Ok(self.read(|data| data.hospitals.live(id).cloned()).await)
    }

    async fn list_hospitals(&self, company_id: DbId) -> StoreResult<Vec<Hospital>> {
        Ok(self
            .read(|data| {
                let mut hospitals: Vec<Hospital> = data
                    .hospitals
                    .live_values()
                    .filter(|h| h.company_id == company_id)
                    .cloned()
                    .collect();
                hospitals.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                hospitals
            })
            .await)
    }

    async fn update_hospital(
        &self,
        id: DbId,
        input: &UpdateHospital,
    ) -> StoreResult<Option<Hospital>> {
        self.write(|data| {
            let Some(hospital) = data.hospitals.live_mut(id) else {
                return Ok(None);
            };
            if let Some(name) = &input.name {
                hospital.name = name.clone();
            }
            if let Some(city) = &input.city {
                hospital.city = Some(city.clone());
            }
            if let Some(country) = &input.country {
                hospital.country = Some(country.clone());
            }
            if let Some(pi) = &input.principal_investigator {
                hospital.principal_investigator = Some(pi.clone());
            }
            if let Some(target) = input.target_enrollment {
                hospital.target_enrollment = Some(target);
            }
            if let Some(enrolled) = input.enrolled_count {
                hospital.enrolled_count = enrolled;
            }
            if let Some(screened) = input.screened_count {
                hospital.screened_count = screened;
            }
            if let Some(is_active) = input.is_active {
                hospital.is_active = is_active;
            }
            hospital.updated_at = Utc::now();
            Ok(Some(hospital.clone()))
        })
        .await
    }

    async fn delete_hospital(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(hospital) = data.hospitals.live_mut(id) else {
                return Ok(false);
            };
            let now = Utc::now();
            hospital.deleted_at = Some(now);
            hospital.updated_at = now;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl EnrollmentStore for JsonStore {
    async fn record_enrollment(
        &self,
        company_id: DbId,
        hospital_id: DbId,
        investigator_id: Option<DbId>,
        input: &CreateEnrollment,
    ) -> StoreResult<Enrollment> {
        self.write(|data| {
            let in_company = data
                .hospitals
                .live(hospital_id)
                .is_some_and(|h| h.company_id == company_id);
            if !in_company {
                return Err(StoreError::NotFound {
                    entity: "Hospital",
                    id: hospital_id,
                });
            }
            data.ensure_subject_free(company_id, &input.subject_code)?;

            let now = Utc::now();
            let enrollment = data.enrollments.insert(|id| Enrollment {
                id,
                company_id,
                hospital_id,
                investigator_id,
                subject_code: input.subject_code.clone(),
                notes: input.notes.clone(),
                enrolled_at: input.enrolled_at.unwrap_or(now),
                created_at: now,
            });

            if let Some(hospital) = data.hospitals.get_mut(hospital_id) {
                hospital.enrolled_count += 1;
                hospital.updated_at = now;
            }
            Ok(enrollment)
        })
        .await
    }

    async fn find_enrollment(&self, id: DbId) -> StoreResult<Option<Enrollment>> {
        Ok(self.read(|data| data.enrollments.get(id).cloned()).await)
    }

    async fn list_enrollments(
        &self,
        company_id: DbId,
        hospital_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Enrollment>> {
        Ok(self
            .read(|data| {
                let mut rows: Vec<Enrollment> = data
                    .enrollments
                    .values()
                    .filter(|e| e.company_id == company_id)
                    .filter(|e| hospital_id.is_none_or(|h| e.hospital_id == h))
                    .cloned()
                    .collect();
                rows.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at).then(b.id.cmp(&a.id)));
                page(rows, limit, offset)
            })
            .await)
    }

    async fn enrollment_dates(&self, company_id: DbId) -> StoreResult<Vec<(DbId, Timestamp)>> {
        Ok(self
            .read(|data| {
                data.enrollments
                    .values()
                    .filter(|e| e.company_id == company_id)
                    .map(|e| (e.hospital_id, e.enrolled_at))
                    .collect()
            })
            .await)
    }

    async fn withdraw_enrollment(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(enrollment) = data.enrollments.remove(id) else {
                return Ok(false);
            };
            if let Some(hospital) = data.hospitals.get_mut(enrollment.hospital_id) {
                hospital.enrolled_count = (hospital.enrolled_count - 1).max(0);
                hospital.updated_at = Utc::now();
            }
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl StatsStore for JsonStore {
    async fn company_stats(&self, company_id: DbId) -> StoreResult<CompanyStats> {
        Ok(self.read(|data| data.stats(company_id)).await)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

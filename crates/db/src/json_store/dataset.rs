//! The whole document-backend dataset and its cross-collection rules.

use serde::{Deserialize, Serialize};
use trialsite_core::roles::ROLE_INVESTIGATOR;
use trialsite_core::types::DbId;

use super::collection::Collection;
use crate::models::company::Company;
use crate::models::enrollment::Enrollment;
use crate::models::hospital::Hospital;
use crate::models::news::News;
use crate::models::pdf::Pdf;
use crate::models::protocol::StudyProtocol;
use crate::models::stats::CompanyStats;
use crate::models::training::TrainingMaterial;
use crate::models::user::User;
use crate::store::{StoreError, StoreResult};

/// Every collection, serialized as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub companies: Collection<Company>,
    pub users: Collection<User>,
    pub hospitals: Collection<Hospital>,
    pub enrollments: Collection<Enrollment>,
    pub news: Collection<News>,
    pub pdfs: Collection<Pdf>,
    pub training: Collection<TrainingMaterial>,
    pub protocols: Collection<StudyProtocol>,
}

impl Dataset {
    /// Slugs stay reserved after a company is soft-deleted.
    pub fn ensure_slug_free(&self, slug: &str) -> StoreResult<()> {
        if self.companies.values().any(|c| c.slug == slug) {
            return Err(StoreError::Conflict(format!(
                "Company slug '{slug}' is already taken"
            )));
        }
        Ok(())
    }

    pub fn ensure_email_free(&self, email: &str) -> StoreResult<()> {
        if self.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!(
                "A user with email '{email}' already exists"
            )));
        }
        Ok(())
    }

    pub fn ensure_subject_free(&self, company_id: DbId, subject_code: &str) -> StoreResult<()> {
        let taken = self
            .enrollments
            .values()
            .any(|e| e.company_id == company_id && e.subject_code == subject_code);
        if taken {
            return Err(StoreError::Conflict(format!(
                "Subject '{subject_code}' is already enrolled"
            )));
        }
        Ok(())
    }

    /// Clear `is_current` on the company's protocols, except `keep`.
    pub fn demote_protocols(&mut self, company_id: DbId, keep: Option<DbId>) {
        for protocol in self.protocols.values_mut() {
            if protocol.company_id == company_id && Some(protocol.id) != keep {
                protocol.is_current = false;
            }
        }
    }

    pub fn stats(&self, company_id: DbId) -> CompanyStats {
        let users = self.users.values().filter(|u| u.company_id == Some(company_id));
        let (user_count, investigator_count) = users.fold((0, 0), |(all, inv), u| {
            (all + 1, inv + i64::from(u.role == ROLE_INVESTIGATOR))
        });

        let mut stats = CompanyStats {
            company_id,
            user_count,
            investigator_count,
            ..CompanyStats::default()
        };

        for h in self
            .hospitals
            .live_values()
            .filter(|h| h.company_id == company_id)
        {
            stats.hospital_count += 1;
            stats.active_hospital_count += i64::from(h.is_active);
            stats.total_enrolled += i64::from(h.enrolled_count);
            stats.total_screened += i64::from(h.screened_count);
            stats.total_target += i64::from(h.target_enrollment.unwrap_or(0));
        }

        stats.enrollment_records = self
            .enrollments
            .values()
            .filter(|e| e.company_id == company_id)
            .count() as i64;
        stats.published_news = self
            .news
            .live_values()
            .filter(|n| n.company_id == company_id && n.is_published)
            .count() as i64;
        stats.pdf_count = self
            .pdfs
            .live_values()
            .filter(|p| p.company_id == company_id)
            .count() as i64;
        stats.training_count = self
            .training
            .live_values()
            .filter(|t| t.company_id == company_id)
            .count() as i64;
        stats.protocol_count = self
            .protocols
            .live_values()
            .filter(|p| p.company_id == company_id)
            .count() as i64;

        stats
    }
}

/// Apply `limit`/`offset` to an already-sorted list.
pub fn page<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    let skip = usize::try_from(offset).unwrap_or(0);
    let take = usize::try_from(limit).unwrap_or(0);
    rows.into_iter().skip(skip).take(take).collect()
}

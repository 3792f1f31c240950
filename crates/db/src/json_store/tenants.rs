//! Companies and users.

use async_trait::async_trait;
use chrono::Utc;
use trialsite_core::types::DbId;

use super::JsonStore;
use crate::models::company::{Company, CreateCompany, UpdateCompany};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::{CompanyStore, StoreResult, UserStore};

#[async_trait]
impl CompanyStore for JsonStore {
    async fn create_company(&self, input: &CreateCompany, slug: &str) -> StoreResult<Company> {
        self.write(|data| {
            data.ensure_slug_free(slug)?;
            let now = Utc::now();
            Ok(data.companies.insert(|id| Company {
                id,
                name: input.name.clone(),
                slug: slug.to_string(),
                description: input.description.clone(),
                clinical_trial_id: input.clinical_trial_id.clone(),
                logo_url: input.logo_url.clone(),
                primary_color: input.primary_color.clone(),
                contact_email: input.contact_email.clone(),
                is_active: true,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_company(&self, id: DbId) -> StoreResult<Option<Company>> {
        Ok(self.read(|data| data.companies.live(id).cloned()).await)
    }

    async fn find_company_by_slug(&self, slug: &str) -> StoreResult<Option<Company>> {
        Ok(self
            .read(|data| {
                data.companies
                    .live_values()
                    .find(|c| c.slug == slug)
                    .cloned()
            })
            .await)
    }

    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        Ok(self
            .read(|data| {
                let mut companies: Vec<Company> = data.companies.live_values().cloned().collect();
                companies.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                companies
            })
            .await)
    }

    async fn update_company(
        &self,
        id: DbId,
        input: &UpdateCompany,
    ) -> StoreResult<Option<Company>> {
        self.write(|data| {
            let Some(company) = data.companies.live_mut(id) else {
                return Ok(None);
            };
            if let Some(name) = &input.name {
                company.name = name.clone();
            }
            if let Some(description) = &input.description {
                company.description = Some(description.clone());
            }
            if let Some(trial_id) = &input.clinical_trial_id {
                company.clinical_trial_id = Some(trial_id.clone());
            }
            if let Some(logo_url) = &input.logo_url {
                company.logo_url = Some(logo_url.clone());
            }
            if let Some(color) = &input.primary_color {
                company.primary_color = Some(color.clone());
            }
            if let Some(email) = &input.contact_email {
                company.contact_email = Some(email.clone());
            }
            if let Some(is_active) = input.is_active {
                company.is_active = is_active;
            }
            company.updated_at = Utc::now();
            Ok(Some(company.clone()))
        })
        .await
    }

    async fn delete_company(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(company) = data.companies.live_mut(id) else {
                return Ok(false);
            };
            let now = Utc::now();
            company.deleted_at = Some(now);
            company.is_active = false;
            company.updated_at = now;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl UserStore for JsonStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        self.write(|data| {
            data.ensure_email_free(&input.email)?;
            let now = Utc::now();
            Ok(data.users.insert(|id| User {
                id,
                company_id: input.company_id,
                hospital_id: input.hospital_id,
                email: input.email.clone(),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                role: input.role.clone(),
                password_hash: input.password_hash.clone(),
                is_active: true,
                last_login_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.read(|data| data.users.get(id).cloned()).await)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read(|data| data.users.values().find(|u| u.email == email).cloned())
            .await)
    }

    async fn list_users(&self, company_id: DbId) -> StoreResult<Vec<User>> {
        Ok(self
            .read(|data| {
                let mut users: Vec<User> = data
                    .users
                    .values()
                    .filter(|u| u.company_id == Some(company_id))
                    .cloned()
                    .collect();
                users.sort_by(|a, b| {
                    a.last_name
                        .cmp(&b.last_name)
                        .then_with(|| a.first_name.cmp(&b.first_name))
                        .then(a.id.cmp(&b.id))
                });
                users
            })
            .await)
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>> {
        self.write(|data| {
            let Some(user) = data.users.get_mut(id) else {
                return Ok(None);
            };
            if let Some(hospital_id) = input.hospital_id {
                user.hospital_id = Some(hospital_id);
            }
            if let Some(first_name) = &input.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(last_name) = &input.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(role) = &input.role {
                user.role = role.clone();
            }
            if let Some(is_active) = input.is_active {
                user.is_active = is_active;
            }
            user.updated_at = Utc::now();
            Ok(Some(user.clone()))
        })
        .await
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        self.write(|data| {
            let Some(user) = data.users.get_mut(id) else {
                return Ok(false);
            };
            user.password_hash = Some(password_hash.to_string());
            user.updated_at = Utc::now();
            Ok(true)
        })
        .await
    }

    async fn record_login(&self, id: DbId) -> StoreResult<()> {
        self.write(|data| {
            if let Some(user) = data.users.get_mut(id) {
                user.last_login_at = Some(Utc::now());
            }
            Ok(())
        })
        .await
    }

    async fn deactivate_user(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            match data.users.get_mut(id) {
                Some(user) if user.is_active => {
                    user.is_active = false;
                    user.updated_at = Utc::now();
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
        .await
    }
}

//! News, PDFs, training materials and study protocols.

use async_trait::async_trait;
use chrono::Utc;
use trialsite_core::types::DbId;

use super::dataset::page;
use super::JsonStore;
use crate::models::news::{CreateNews, News, UpdateNews};
use crate::models::pdf::{CreatePdf, Pdf, UpdatePdf};
use crate::models::protocol::{CreateStudyProtocol, StudyProtocol, UpdateStudyProtocol};
use crate::models::training::{CreateTrainingMaterial, TrainingMaterial, UpdateTrainingMaterial};
use crate::store::{NewsStore, PdfStore, ProtocolStore, StoreResult, TrainingStore};

#[async_trait]
impl NewsStore for JsonStore {
    async fn create_news(
        &self,
        company_id: DbId,
        author_id: Option<DbId>,
        input: &CreateNews,
    ) -> StoreResult<News> {
        self.write(|data| {
            let now = Utc::now();
            let is_published = input.is_published.unwrap_or(true);
            Ok(data.news.insert(|id| News {
                id,
                company_id,
                author_id,
                title: input.title.clone(),
                body: input.body.clone(),
                image_url: input.image_url.clone(),
                is_published,
                published_at: is_published.then_some(now),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_news(&self, id: DbId) -> StoreResult<Option<News>> {
        Ok(self.read(|data| data.news.live(id).cloned()).await)
    }

    async fn list_news(
        &self,
        company_id: DbId,
        include_drafts: bool,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<News>> {
        Ok(self
            .read(|data| {
                let mut rows: Vec<News> = data
                    .news
                    .live_values()
                    .filter(|n| n.company_id == company_id && (include_drafts || n.is_published))
                    .cloned()
                    .collect();
                rows.sort_by(|a, b| {
                    let a_at = a.published_at.unwrap_or(a.created_at);
                    let b_at = b.published_at.unwrap_or(b.created_at);
                    b_at.cmp(&a_at).then(b.id.cmp(&a.id))
                });
                page(rows, limit, offset)
            })
            .await)
    }

    async fn update_news(&self, id: DbId, input: &UpdateNews) -> StoreResult<Option<News>> {
        self.write(|data| {
            let Some(post) = data.news.live_mut(id) else {
                return Ok(None);
            };
            let now = Utc::now();
            if let Some(title) = &input.title {
                post.title = title.clone();
            }
            if let Some(body) = &input.body {
                post.body = body.clone();
            }
            if let Some(image_url) = &input.image_url {
                post.image_url = Some(image_url.clone());
            }
            if let Some(is_published) = input.is_published {
                post.is_published = is_published;
            }
            if post.is_published && post.published_at.is_none() {
                post.published_at = Some(now);
            }
            post.updated_at = now;
            Ok(Some(post.clone()))
        })
        .await
    }

    async fn delete_news(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(post) = data.news.live_mut(id) else {
                return Ok(false);
            };
            let now = Utc::now();
            post.deleted_at = Some(now);
            post.updated_at = now;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl PdfStore for JsonStore {
    async fn create_pdf(
        &self,
        company_id: DbId,
        uploaded_by: Option<DbId>,
        input: &CreatePdf,
        category: &str,
    ) -> StoreResult<Pdf> {
        self.write(|data| {
            let now = Utc::now();
            Ok(data.pdfs.insert(|id| Pdf {
                id,
                company_id,
                title: input.title.clone(),
                description: input.description.clone(),
                category: category.to_string(),
                file_name: input.file_name.clone(),
                file_url: input.file_url.clone(),
                size_bytes: input.size_bytes,
                uploaded_by,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_pdf(&self, id: DbId) -> StoreResult<Option<Pdf>> {
        Ok(self.read(|data| data.pdfs.live(id).cloned()).await)
    }

    async fn list_pdfs(&self, company_id: DbId, category: Option<&str>) -> StoreResult<Vec<Pdf>> {
        Ok(self
            .read(|data| {
                let mut rows: Vec<Pdf> = data
                    .pdfs
                    .live_values()
                    .filter(|p| p.company_id == company_id)
                    .filter(|p| category.is_none_or(|c| p.category == c))
                    .cloned()
                    .collect();
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
                rows
            })
            .await)
    }

    async fn update_pdf(&self, id: DbId, input: &UpdatePdf) -> StoreResult<Option<Pdf>> {
        self.write(|data| {
            let Some(pdf) = data.pdfs.live_mut(id) else {
                return Ok(None);
            };
            if let Some(title) = &input.title {
                pdf.title = title.clone();
            }
            if let Some(description) = &input.description {
                pdf.description = Some(description.clone());
            }
            if let Some(category) = &input.category {
                pdf.category = category.clone();
            }
            if let Some(file_name) = &input.file_name {
                pdf.file_name = file_name.clone();
            }
            if let Some(file_url) = &input.file_url {
                pdf.file_url = file_url.clone();
            }
            if let Some(size) = input.size_bytes {
                pdf.size_bytes = Some(size);
            }
            pdf.updated_at = Utc::now();
            Ok(Some(pdf.clone()))
        })
        .await
    }

    async fn delete_pdf(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(pdf) = data.pdfs.live_mut(id) else {
                return Ok(false);
            };
            let now = Utc::now();
            pdf.deleted_at = Some(now);
            pdf.updated_at = now;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl TrainingStore for JsonStore {
    async fn create_training(
        &self,
        company_id: DbId,
        input: &CreateTrainingMaterial,
    ) -> StoreResult<TrainingMaterial> {
        self.write(|data| {
            let now = Utc::now();
            Ok(data.training.insert(|id| TrainingMaterial {
                id,
                company_id,
                title: input.title.clone(),
                description: input.description.clone(),
                material_type: input.material_type.clone(),
                url: input.url.clone(),
                duration_minutes: input.duration_minutes,
                sort_order: input.sort_order.unwrap_or(0),
                is_required: input.is_required.unwrap_or(false),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_training(&self, id: DbId) -> StoreResult<Option<TrainingMaterial>> {
        Ok(self.read(|data| data.training.live(id).cloned()).await)
    }

    async fn list_training(&self, company_id: DbId) -> StoreResult<Vec<TrainingMaterial>> {
        Ok(self
            .read(|data| {
                let mut rows: Vec<TrainingMaterial> = data
                    .training
                    .live_values()
                    .filter(|t| t.company_id == company_id)
                    .cloned()
                    .collect();
                rows.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
                rows
            })
            .await)
    }

    async fn update_training(
        &self,
        id: DbId,
        input: &UpdateTrainingMaterial,
    ) -> StoreResult<Option<TrainingMaterial>> {
        self.write(|data| {
            let Some(material) = data.training.live_mut(id) else {
                return Ok(None);
            };
            if let Some(title) = &input.title {
                material.title = title.clone();
            }
            if let Some(description) = &input.description {
                material.description = Some(description.clone());
            }
            if let Some(material_type) = &input.material_type {
                material.material_type = material_type.clone();
            }
            if let Some(url) = &input.url {
                material.url = url.clone();
            }
            if let Some(minutes) = input.duration_minutes {
                material.duration_minutes = Some(minutes);
            }
            if let Some(sort_order) = input.sort_order {
                material.sort_order = sort_order;
            }
            if let Some(is_required) = input.is_required {
                material.is_required = is_required;
            }
            material.updated_at = Utc::now();
            Ok(Some(material.clone()))
        })
        .await
    }

    async fn delete_training(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(material) = data.training.live_mut(id) else {
                return Ok(false);
            };
            let now = Utc::now();
            material.deleted_at = Some(now);
            material.updated_at = now;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl ProtocolStore for JsonStore {
    async fn create_protocol(
        &self,
        company_id: DbId,
        input: &CreateStudyProtocol,
    ) -> StoreResult<StudyProtocol> {
        self.write(|data| {
            let is_current = input.is_current.unwrap_or(false);
            if is_current {
                data.demote_protocols(company_id, None);
            }
            let now = Utc::now();
            Ok(data.protocols.insert(|id| StudyProtocol {
                id,
                company_id,
                title: input.title.clone(),
                version: input.version.clone(),
                summary: input.summary.clone(),
                document_url: input.document_url.clone(),
                effective_date: input.effective_date,
                is_current,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        })
        .await
    }

    async fn find_protocol(&self, id: DbId) -> StoreResult<Option<StudyProtocol>> {
        Ok(self.read(|data| data.protocols.live(id).cloned()).await)
    }

    async fn list_protocols(&self, company_id: DbId) -> StoreResult<Vec<StudyProtocol>> {
        Ok(self
            .read(|data| {
                let mut rows: Vec<StudyProtocol> = data
                    .protocols
                    .live_values()
                    .filter(|p| p.company_id == company_id)
                    .cloned()
                    .collect();
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
                rows
            })
            .await)
    }

    async fn current_protocol(&self, company_id: DbId) -> StoreResult<Option<StudyProtocol>> {
        Ok(self
            .read(|data| {
                data.protocols
                    .live_values()
                    .find(|p| p.company_id == company_id && p.is_current)
                    .cloned()
            })
            .await)
    }

    async fn update_protocol(
        &self,
        id: DbId,
        input: &UpdateStudyProtocol,
    ) -> StoreResult<Option<StudyProtocol>> {
        self.write(|data| {
            let Some(company_id) = data.protocols.live(id).map(|p| p.company_id) else {
                return Ok(None);
            };
            if input.is_current == Some(true) {
                data.demote_protocols(company_id, Some(id));
            }
            let Some(protocol) = data.protocols.live_mut(id) else {
                return Ok(None);
            };
            if let Some(title) = &input.title {
                protocol.title = title.clone();
            }
            if let Some(version) = &input.version {
                protocol.version = version.clone();
            }
            if let Some(summary) = &input.summary {
                protocol.summary = Some(summary.clone());
            }
            if let Some(url) = &input.document_url {
                protocol.document_url = Some(url.clone());
            }
            if let Some(date) = input.effective_date {
                protocol.effective_date = Some(date);
            }
            if let Some(is_current) = input.is_current {
                protocol.is_current = is_current;
            }
            protocol.updated_at = Utc::now();
            Ok(Some(protocol.clone()))
        })
        .await
    }

    async fn delete_protocol(&self, id: DbId) -> StoreResult<bool> {
        self.write(|data| {
            let Some(protocol) = data.protocols.live_mut(id) else {
                return Ok(false);
            };
            let now = Utc::now();
            protocol.deleted_at = Some(now);
            protocol.is_current = false;
            protocol.updated_at = now;
            Ok(true)
        })
        .await
    }
}

//! Handlers for company news posts.
//!
//! Drafts (`is_published = false`) exist only for admins: other members
//! never see them in lists and get 404 when fetching one directly.

use axum::extract::{Path, Query, State};
use axum::Json;
use trialsite_core::error::CoreError;
use trialsite_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use trialsite_core::tenant::scoped;
use trialsite_core::types::DbId;
use trialsite_core::validation::validate_not_blank;
use trialsite_db::models::news::{CreateNews, News, UpdateNews};
use trialsite_db::NewsStore;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::NewsListParams;
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/company/{id}/news?include_drafts=&limit=&offset=
///
/// Newest first. `include_drafts` is ignored for non-admins.
pub async fn list_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
    Query(params): Query<NewsListParams>,
) -> AppResult<ApiJson<Vec<News>>> {
    member_of(&state, &auth, company_id).await?;

    let include_drafts = params.include_drafts && auth.is_admin();
    let news = state
        .store
        .list_news(
            company_id,
            include_drafts,
            clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(params.offset),
        )
        .await?;
    Ok(ApiResponse::ok(news))
}

/// POST /api/company/{id}/news
///
/// Create a post. Unless `is_published` is false it is published at once.
pub async fn create_news(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateNews>,
) -> AppResult<Created<News>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("title", &input.title)?;
    validate_not_blank("body", &input.body)?;

    let news = state
        .store
        .create_news(company_id, Some(auth.user_id), &input)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        news_id = news.id,
        published = news.is_published,
        "News created"
    );
    Ok(ApiResponse::created("News created", news))
}

/// GET /api/company/{id}/news/{news_id}
pub async fn get_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, news_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<News>> {
    member_of(&state, &auth, company_id).await?;
    let news = fetch_news(&state, company_id, news_id).await?;

    if !news.is_published && !auth.is_admin() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }));
    }
    Ok(ApiResponse::ok(news))
}

/// PUT /api/company/{id}/news/{news_id}
///
/// Partial update. The first publish stamps `published_at`; unpublishing
/// keeps the stamp.
pub async fn update_news(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, news_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateNews>,
) -> AppResult<ApiJson<News>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    if let Some(title) = input.title.as_deref() {
        validate_not_blank("title", title)?;
    }
    if let Some(body) = input.body.as_deref() {
        validate_not_blank("body", body)?;
    }
    fetch_news(&state, company_id, news_id).await?;

    let news = state
        .store
        .update_news(news_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: news_id,
        }))?;

    tracing::info!(user_id = auth.user_id, news_id, "News updated");
    Ok(ApiResponse::with_message("News updated", news))
}

/// DELETE /api/company/{id}/news/{news_id}
pub async fn delete_news(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, news_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_news(&state, company_id, news_id).await?;

    state.store.delete_news(news_id).await?;

    tracing::info!(user_id = auth.user_id, news_id, "News deleted");
    Ok(deleted("News deleted"))
}

async fn fetch_news(state: &AppState, company_id: DbId, news_id: DbId) -> AppResult<News> {
    let news = state.store.find_news(news_id).await?;
    Ok(scoped(news, |n| n.company_id, company_id, "News", news_id)?)
}

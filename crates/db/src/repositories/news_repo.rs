//! Repository for the `news` table.

use sqlx::PgPool;
use trialsite_core::types::DbId;

use crate::models::news::{CreateNews, News, UpdateNews};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, author_id, title, body, image_url, is_published, \
                       published_at, deleted_at, created_at, updated_at";

/// Provides CRUD operations for news posts.
pub struct NewsRepo;

impl NewsRepo {
    /// Insert a news post. Published posts get `published_at = NOW()`.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        author_id: Option<DbId>,
        input: &CreateNews,
    ) -> Result<News, sqlx::Error> {
        let query = format!(
            "INSERT INTO news (company_id, author_id, title, body, image_url, is_published, published_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE),
                     CASE WHEN COALESCE($6, TRUE) THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(company_id)
            .bind(author_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.image_url)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List posts newest first. Drafts only when `include_drafts`.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
        include_drafts: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<News>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM news
             WHERE company_id = $1 AND deleted_at IS NULL AND ($2 OR is_published)
             ORDER BY COALESCE(published_at, created_at) DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(company_id)
            .bind(include_drafts)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a post. Publishing for the first time stamps `published_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNews,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!(
            "UPDATE news SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                image_url = COALESCE($4, image_url),
                is_published = COALESCE($5, is_published),
                published_at = CASE
                    WHEN COALESCE($5, is_published) AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.image_url)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a post. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE news SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

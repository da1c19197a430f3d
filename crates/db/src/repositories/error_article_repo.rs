//! Repository for the `error_articles` table.

use sqlx::PgPool;

use helpcenter_core::search::like_pattern;
use helpcenter_core::types::DbId;

use crate::models::error_article::{ArticleFilter, CategoryCount, CreateErrorArticle, ErrorArticle};

/// Column list for error_articles queries.
const COLUMNS: &str = "id, kind, title, category, short_description, customer_message, \
    description, causes, customer_steps, support_steps, guide_steps, answer, tags, \
    screenshots, video, featured, created_at, updated_at";

/// Provides CRUD and search operations for articles.
pub struct ErrorArticleRepo;

impl ErrorArticleRepo {
    /// Insert a new article, returning the stored row with its assigned id.
    pub async fn create(
        pool: &PgPool,
        input: &CreateErrorArticle,
    ) -> Result<ErrorArticle, sqlx::Error> {
        let query = format!(
            "INSERT INTO error_articles
                (kind, title, category, short_description, customer_message, description,
                 causes, customer_steps, support_steps, guide_steps, answer, tags,
                 screenshots, video, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let article = sqlx::query_as::<_, ErrorArticle>(&query)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.short_description)
            .bind(&input.customer_message)
            .bind(&input.description)
            .bind(&input.causes)
            .bind(&input.customer_steps)
            .bind(&input.support_steps)
            .bind(&input.guide_steps)
            .bind(&input.answer)
            .bind(&input.tags)
            .bind(&input.screenshots)
            .bind(&input.video)
            .bind(input.featured)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(article)
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ErrorArticle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM error_articles WHERE id = $1");
        sqlx::query_as::<_, ErrorArticle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List articles matching `filter`, newest first.
    ///
    /// `limit: None` returns every match.
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
    ) -> Result<Vec<ErrorArticle>, sqlx::Error> {
        let pattern = filter.query.as_deref().map(like_pattern);
        let query = format!(
            "SELECT {COLUMNS} FROM error_articles
             WHERE ($1::TEXT IS NULL
                    OR title ILIKE $1
                    OR customer_message ILIKE $1
                    OR category ILIKE $1
                    OR COALESCE(short_description, '') ILIKE $1)
               AND ($2::TEXT IS NULL OR category = $2)
               AND ($3::BOOL IS NULL OR featured = $3)
               AND ($4::TEXT IS NULL OR kind = $4)
             ORDER BY created_at DESC, id DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, ErrorArticle>(&query)
            .bind(pattern)
            .bind(&filter.category)
            .bind(filter.featured)
            .bind(filter.kind.map(|k| k.as_str()))
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Replace every editable field of an article. Returns `None` if the id
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateErrorArticle,
    ) -> Result<Option<ErrorArticle>, sqlx::Error> {
        let query = format!(
            "UPDATE error_articles SET
                kind = $2,
                title = $3,
                category = $4,
                short_description = $5,
                customer_message = $6,
                description = $7,
                causes = $8,
                customer_steps = $9,
                support_steps = $10,
                guide_steps = $11,
                answer = $12,
                tags = $13,
                screenshots = $14,
                video = $15,
                featured = $16,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let mut tx = pool.begin().await?;
        let article = sqlx::query_as::<_, ErrorArticle>(&query)
            .bind(id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.category)
            .bind(&input.short_description)
            .bind(&input.customer_message)
            .bind(&input.description)
            .bind(&input.causes)
            .bind(&input.customer_steps)
            .bind(&input.support_steps)
            .bind(&input.guide_steps)
            .bind(&input.answer)
            .bind(&input.tags)
            .bind(&input.screenshots)
            .bind(&input.video)
            .bind(input.featured)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(article)
    }

    /// Delete an article. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM error_articles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct non-empty categories, alphabetically.
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM error_articles
             WHERE category <> ''
             ORDER BY category ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of articles per non-empty category, alphabetically.
    pub async fn category_counts(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category AS name, COUNT(*) AS count FROM error_articles
             WHERE category <> ''
             GROUP BY category
             ORDER BY category ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Total number of articles.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM error_articles")
            .fetch_one(pool)
            .await
    }
}

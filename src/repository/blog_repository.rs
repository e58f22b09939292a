use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{BlogPost, BlogRecord},
    error::{AppError, Result},
    repository::BlogRepository,
};

const BLOG_COLUMNS: &str =
    "id, title, slug, category, tag, color, img_url, excerpt, created_by, created_at, updated_at";

#[derive(FromRow)]
struct BlogRow {
    id: i64,
    title: String,
    slug: String,
    category: String,
    tag: Option<String>,
    color: Option<String>,
    img_url: String,
    excerpt: Option<String>,
    created_by: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<BlogRow> for BlogPost {
    fn from(row: BlogRow) -> Self {
        BlogPost {
            id: row.id,
            title: row.title,
            slug: row.slug,
            category: row.category,
            tag: row.tag,
            color: row.color,
            img_url: row.img_url,
            excerpt: row.excerpt,
            created_by: row.created_by,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }
}

pub struct SqliteBlogRepository {
    pool: SqlitePool,
}

impl SqliteBlogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for SqliteBlogRepository {
    async fn create(&self, record: BlogRecord) -> Result<BlogPost> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            r#"
            INSERT INTO blog_posts (
                title, slug, category, tag, color, img_url, excerpt, created_by,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&record.title)
        .bind(&record.slug)
        .bind(&record.category)
        .bind(&record.tag)
        .bind(&record.color)
        .bind(&record.img_url)
        .bind(&record.excerpt)
        .bind(&record.created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created blog post".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogRow>(
            &format!("SELECT {} FROM blog_posts WHERE id = ?", BLOG_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogRow>(
            &format!("SELECT {} FROM blog_posts WHERE slug = ?", BLOG_COLUMNS)
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BlogPost::from))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_posts WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn list(&self) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, BlogRow>(
            &format!("SELECT {} FROM blog_posts ORDER BY created_at DESC, id DESC", BLOG_COLUMNS)
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn update(&self, id: i64, record: BlogRecord) -> Result<BlogPost> {
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?,
                slug = ?,
                category = ?,
                tag = ?,
                color = ?,
                img_url = ?,
                excerpt = ?,
                created_by = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&record.title)
        .bind(&record.slug)
        .bind(&record.category)
        .bind(&record.tag)
        .bind(&record.color)
        .bind(&record.img_url)
        .bind(&record.excerpt)
        .bind(&record.created_by)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated blog post".to_string())
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

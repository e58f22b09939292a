use std::sync::Arc;
use chrono::Utc;
use crate::{
    domain::*,
    error::{AppError, Result},
    repository::BlogRepository,
};

pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
}

fn required(value: Option<&str>, field: &str) -> Result<String> {
    value
        .map(sanitize)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

/// Present but blank fields are cleared; absent fields fall back to `current`.
fn optional(value: Option<String>, current: Option<String>) -> Option<String> {
    match value {
        Some(v) => Some(sanitize(&v)).filter(|v| !v.is_empty()),
        None => current,
    }
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: BlogInput) -> Result<BlogPost> {
        let title = required(input.title.as_deref(), "title")?;
        let category = required(input.category.as_deref(), "category")?;
        let img_url = required(input.img_url.as_deref(), "img_url")?;

        let base = slugify(&title);
        if base.is_empty() {
            return Err(AppError::Validation(
                "Title must contain letters or digits".to_string(),
            ));
        }
        let slug = if self.repo.slug_exists(&base).await? {
            format!("{}-{}", base, Utc::now().timestamp_millis())
        } else {
            base
        };

        let post = self
            .repo
            .create(BlogRecord {
                title,
                slug,
                category,
                tag: optional(input.tag, None),
                color: optional(input.color, None),
                img_url,
                excerpt: optional(input.excerpt, None),
                created_by: optional(input.created_by, None),
            })
            .await?;
        tracing::info!("Created blog post {} ({})", post.id, post.slug);
        Ok(post)
    }

    /// The slug is fixed at creation so published links keep working.
    pub async fn update(&self, id: i64, input: BlogInput) -> Result<BlogPost> {
        let current = self.get(id).await?;

        let title = match input.title.as_deref() {
            Some(t) => required(Some(t), "title")?,
            None => current.title,
        };
        let category = match input.category.as_deref() {
            Some(c) => required(Some(c), "category")?,
            None => current.category,
        };
        let img_url = match input.img_url.as_deref() {
            Some(u) => required(Some(u), "img_url")?,
            None => current.img_url,
        };

        self.repo
            .update(
                id,
                BlogRecord {
                    title,
                    slug: current.slug,
                    category,
                    tag: optional(input.tag, current.tag),
                    color: optional(input.color, current.color),
                    img_url,
                    excerpt: optional(input.excerpt, current.excerpt),
                    created_by: optional(input.created_by, current.created_by),
                },
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Blog post not found".to_string()));
        }
        tracing::info!("Deleted blog post {}", id);
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<BlogPost> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<BlogPost> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<BlogPost>> {
        self.repo.list().await
    }
}

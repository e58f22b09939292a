use std::sync::Arc;
use chrono::Utc;
use crate::{
    domain::*,
    error::{AppError, Result},
    repository::CourseRepository,
};

pub const DEFAULT_RELATED_LIMIT: i64 = 3;

pub struct CourseService {
    repo: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(repo: Arc<dyn CourseRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CourseInput) -> Result<Course> {
        let title = input
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Title is required".to_string()))?
            .to_string();

        let slug = self.unique_slug(&title, None).await?;
        let pricing = PriceInputs::for_create(input.price, input.discount_percent, input.gst_percent);

        let record = CourseRecord {
            title,
            slug,
            subtitle: input.subtitle,
            category: input.category,
            description: input.description,
            duration: input.duration,
            instructor: input.instructor,
            level: input.level,
            features: input.features.unwrap_or_default(),
            tags: input.tags,
            rating: input.rating.filter(|r| r.is_finite()).unwrap_or(0.0),
            students_count: input.students_count.unwrap_or(0).max(0),
            next_batch: input.next_batch,
            discount_price: pricing.discount_price(),
            pricing,
        };

        let course = self.repo.create(record).await?;
        tracing::info!("Created course {} ({})", course.id, course.slug);
        Ok(course)
    }

    /// Fields absent from `input` keep their stored values.
    pub async fn update(&self, id: i64, input: CourseInput) -> Result<Course> {
        let current = self.get(id).await?;

        let title = match input.title.as_deref().map(str::trim) {
            Some("") => return Err(AppError::Validation("Title cannot be empty".to_string())),
            Some(t) => t.to_string(),
            None => current.title.clone(),
        };

        let slug = if title != current.title {
            self.unique_slug(&title, Some(id)).await?
        } else {
            current.slug.clone()
        };

        let pricing = PriceInputs::resolve(
            input.price,
            input.discount_percent,
            input.gst_percent,
            current.price_inputs(),
        );

        let record = CourseRecord {
            title,
            slug,
            subtitle: input.subtitle.or(current.subtitle),
            category: input.category.or(current.category),
            description: input.description.or(current.description),
            duration: input.duration.or(current.duration),
            instructor: input.instructor.or(current.instructor),
            level: input.level.or(current.level),
            features: input.features.unwrap_or(current.features),
            tags: input.tags.or(current.tags),
            rating: input.rating.filter(|r| r.is_finite()).unwrap_or(current.rating),
            students_count: input.students_count.map(|c| c.max(0)).unwrap_or(current.students_count),
            next_batch: input.next_batch.or(current.next_batch),
            discount_price: pricing.discount_price(),
            pricing,
        };

        self.repo.update(id, record).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Course not found".to_string()));
        }
        tracing::info!("Deleted course {}", id);
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Course> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Course> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Course>> {
        self.repo.list().await
    }

    pub async fn related(&self, id: i64, limit: Option<i64>) -> Result<Vec<Course>> {
        let course = self.get(id).await?;
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_RELATED_LIMIT);
        self.repo.list_related(id, course.category.as_deref(), limit).await
    }

    async fn unique_slug(&self, title: &str, excluding: Option<i64>) -> Result<String> {
        let base = slugify(title);
        if base.is_empty() {
            return Err(AppError::Validation(
                "Title must contain letters or digits".to_string(),
            ));
        }

        if self.repo.slug_exists(&base, excluding).await? {
            Ok(format!("{}-{}", base, Utc::now().timestamp_millis()))
        } else {
            Ok(base)
        }
    }
}

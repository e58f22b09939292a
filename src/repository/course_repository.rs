use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    domain::{Course, CourseRecord},
    error::{AppError, Result},
    repository::CourseRepository,
};

const COURSE_COLUMNS: &str = r#"
    id, title, slug, subtitle, category, description, duration, instructor,
    level, features, tags, rating, students_count, next_batch, price,
    discount_percent, gst_percent, discount_price, created_at, updated_at
"#;

#[derive(FromRow)]
struct CourseRow {
    id: i64,
    title: String,
    slug: String,
    subtitle: Option<String>,
    category: Option<String>,
    description: Option<String>,
    duration: Option<String>,
    instructor: Option<String>,
    level: Option<String>,
    features: String,
    tags: Option<String>,
    rating: f64,
    students_count: i64,
    next_batch: Option<String>,
    price: f64,
    discount_percent: f64,
    gst_percent: f64,
    discount_price: f64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_course(row: CourseRow) -> Result<Course> {
        let features: Vec<String> = serde_json::from_str(&row.features)
            .map_err(|e| AppError::Database(format!("Invalid course features: {}", e)))?;

        Ok(Course {
            id: row.id,
            title: row.title,
            slug: row.slug,
            subtitle: row.subtitle,
            category: row.category,
            description: row.description,
            duration: row.duration,
            instructor: row.instructor,
            level: row.level,
            features,
            tags: row.tags,
            rating: row.rating,
            students_count: row.students_count,
            next_batch: row.next_batch,
            price: row.price,
            discount_percent: row.discount_percent,
            gst_percent: row.gst_percent,
            discount_price: row.discount_price,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn encode_features(features: &[String]) -> Result<String> {
        serde_json::to_string(features).map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn create(&self, record: CourseRecord) -> Result<Course> {
        let now = Utc::now().naive_utc();
        let features = Self::encode_features(&record.features)?;

        let id = sqlx::query(
            r#"
            INSERT INTO courses (
                title, slug, subtitle, category, description, duration, instructor,
                level, features, tags, rating, students_count, next_batch, price,
                discount_percent, gst_percent, discount_price, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&record.title)
        .bind(&record.slug)
        .bind(&record.subtitle)
        .bind(&record.category)
        .bind(&record.description)
        .bind(&record.duration)
        .bind(&record.instructor)
        .bind(&record.level)
        .bind(&features)
        .bind(&record.tags)
        .bind(record.rating)
        .bind(record.students_count)
        .bind(&record.next_batch)
        .bind(record.pricing.price)
        .bind(record.pricing.discount_percent)
        .bind(record.pricing.gst_percent)
        .bind(record.discount_price)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created course".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            &format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_course).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            &format!("SELECT {} FROM courses WHERE slug = ?", COURSE_COLUMNS)
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_course).transpose()
    }

    async fn slug_exists(&self, slug: &str, excluding: Option<i64>) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses WHERE slug = ? AND (? IS NULL OR id != ?)"
        )
        .bind(slug)
        .bind(excluding)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn list(&self) -> Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            &format!("SELECT {} FROM courses ORDER BY id ASC", COURSE_COLUMNS)
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_course).collect()
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM courses WHERE id IN (", COURSE_COLUMNS));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let rows = builder
            .build_query_as::<CourseRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_course).collect()
    }

    async fn list_related(&self, id: i64, category: Option<&str>, limit: i64) -> Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            &format!(
                "SELECT {} FROM courses WHERE category IS ? AND id != ? ORDER BY id DESC LIMIT ?",
                COURSE_COLUMNS
            )
        )
        .bind(category)
        .bind(id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_course).collect()
    }

    async fn update(&self, id: i64, record: CourseRecord) -> Result<Course> {
        let now = Utc::now().naive_utc();
        let features = Self::encode_features(&record.features)?;

        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = ?,
                slug = ?,
                subtitle = ?,
                category = ?,
                description = ?,
                duration = ?,
                instructor = ?,
                level = ?,
                features = ?,
                tags = ?,
                rating = ?,
                students_count = ?,
                next_batch = ?,
                price = ?,
                discount_percent = ?,
                gst_percent = ?,
                discount_price = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&record.title)
        .bind(&record.slug)
        .bind(&record.subtitle)
        .bind(&record.category)
        .bind(&record.description)
        .bind(&record.duration)
        .bind(&record.instructor)
        .bind(&record.level)
        .bind(&features)
        .bind(&record.tags)
        .bind(record.rating)
        .bind(record.students_count)
        .bind(&record.next_batch)
        .bind(record.pricing.price)
        .bind(record.pricing.discount_percent)
        .bind(record.pricing.gst_percent)
        .bind(record.discount_price)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated course".to_string())
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e.as_database_error().map(|d| d.kind()) {
                Some(sqlx::error::ErrorKind::ForeignKeyViolation) => AppError::Conflict(
                    "Course has payments or enrollments and cannot be deleted".to_string(),
                ),
                _ => AppError::from(e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

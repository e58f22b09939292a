use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{Enrollment, EnrollmentStatus},
    error::{AppError, Result},
    repository::EnrollmentRepository,
};

#[derive(FromRow)]
struct EnrollmentRow {
    id: i64,
    student_id: i64,
    course_id: i64,
    status: String,
    payment_id: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteEnrollmentRepository {
    pool: SqlitePool,
}

impl SqliteEnrollmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_enrollment(row: EnrollmentRow) -> Result<Enrollment> {
        Ok(Enrollment {
            id: row.id,
            student_id: row.student_id,
            course_id: row.course_id,
            status: EnrollmentStatus::from_str(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid enrollment status: {}", row.status)))?,
            payment_id: row.payment_id,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl EnrollmentRepository for SqliteEnrollmentRepository {
    async fn upsert(
        &self,
        student_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
        payment_id: i64,
    ) -> Result<Enrollment> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO enrollments (student_id, course_id, status, payment_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(student_id, course_id) DO UPDATE SET
                status = excluded.status,
                payment_id = excluded.payment_id,
                updated_at = excluded.updated_at
            "#
        )
        .bind(student_id)
        .bind(course_id)
        .bind(status.as_str())
        .bind(payment_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_student_and_course(student_id, course_id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve enrollment".to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, course_id, status, payment_id, created_at, updated_at
            FROM enrollments
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_enrollment).transpose()
    }

    async fn find_by_student_and_course(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, course_id, status, payment_id, created_at, updated_at
            FROM enrollments
            WHERE student_id = ? AND course_id = ?
            "#
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_enrollment).transpose()
    }

    async fn find_by_student(&self, student_id: i64, status: Option<EnrollmentStatus>) -> Result<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, course_id, status, payment_id, created_at, updated_at
            FROM enrollments
            WHERE student_id = ? AND (? IS NULL OR status = ?)
            ORDER BY id ASC
            "#
        )
        .bind(student_id)
        .bind(status.map(|s| s.as_str()))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_enrollment).collect()
    }

    async fn list(&self) -> Result<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, course_id, status, payment_id, created_at, updated_at
            FROM enrollments
            ORDER BY updated_at DESC, id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_enrollment).collect()
    }

    async fn update_status(&self, id: i64, status: EnrollmentStatus) -> Result<Enrollment> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query("UPDATE enrollments SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Enrollment not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated enrollment".to_string())
        })
    }

    async fn count_by_status(&self, status: EnrollmentStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

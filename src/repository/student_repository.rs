use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{NewStudent, Student},
    error::{AppError, Result},
    repository::StudentRepository,
};

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct StudentRow {
    id: i64,
    username: String,
    email: String,
    mobile: Option<String>,
    is_verified: i32,
    verification_expires: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_student(row: StudentRow) -> Student {
        Student {
            id: row.id,
            username: row.username,
            email: row.email,
            mobile: row.mobile,
            is_verified: row.is_verified != 0,
            verification_expires: row
                .verification_expires
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn create(&self, student: NewStudent) -> Result<Student> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            r#"
            INSERT INTO students (
                username, email, mobile, password_hash, is_verified,
                verification_token_hash, verification_expires, created_at, updated_at
            ) VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?)
            "#
        )
        .bind(&student.username)
        .bind(&student.email)
        .bind(&student.mobile)
        .bind(&student.password_hash)
        .bind(&student.verification_token_hash)
        .bind(student.verification_expires.naive_utc())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created student".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, username, email, mobile, is_verified, verification_expires, created_at, updated_at
            FROM students
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_student))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, username, email, mobile, is_verified, verification_expires, created_at, updated_at
            FROM students
            WHERE email = ?
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_student))
    }

    async fn find_by_verification_hash(&self, token_hash: &str) -> Result<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, username, email, mobile, is_verified, verification_expires, created_at, updated_at
            FROM students
            WHERE verification_token_hash = ?
            "#
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_student))
    }

    async fn get_password_hash(&self, email: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM students WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hash)
    }

    async fn set_verification(&self, id: i64, token_hash: &str, expires: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET verification_token_hash = ?, verification_expires = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(token_hash)
        .bind(expires.naive_utc())
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_verified(&self, id: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET is_verified = 1, verification_token_hash = NULL, verification_expires = NULL, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

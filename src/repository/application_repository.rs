use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    domain::{CreateApplicationRequest, JobApplication},
    error::{AppError, Result},
    repository::ApplicationRepository,
};

const APPLICATION_COLUMNS: &str = r#"
    id, name, email, phone, position, experience, cover_letter,
    current_ctc_amount, current_ctc_currency, current_ctc_period,
    expected_ctc_amount, expected_ctc_currency, expected_ctc_period,
    location, applied_at
"#;

#[derive(FromRow)]
struct ApplicationRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    position: String,
    experience: Option<f64>,
    cover_letter: Option<String>,
    current_ctc_amount: Option<f64>,
    current_ctc_currency: Option<String>,
    current_ctc_period: Option<String>,
    expected_ctc_amount: Option<f64>,
    expected_ctc_currency: Option<String>,
    expected_ctc_period: Option<String>,
    location: Option<String>,
    applied_at: NaiveDateTime,
}

impl From<ApplicationRow> for JobApplication {
    fn from(row: ApplicationRow) -> Self {
        JobApplication {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            position: row.position,
            experience: row.experience,
            cover_letter: row.cover_letter,
            current_ctc_amount: row.current_ctc_amount,
            current_ctc_currency: row.current_ctc_currency,
            current_ctc_period: row.current_ctc_period,
            expected_ctc_amount: row.expected_ctc_amount,
            expected_ctc_currency: row.expected_ctc_currency,
            expected_ctc_period: row.expected_ctc_period,
            location: row.location,
            applied_at: DateTime::from_naive_utc_and_offset(row.applied_at, Utc),
        }
    }
}

pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
    async fn create(&self, request: CreateApplicationRequest) -> Result<JobApplication> {
        let id = sqlx::query(
            r#"
            INSERT INTO job_applications (
                name, email, phone, position, experience, cover_letter,
                current_ctc_amount, current_ctc_currency, current_ctc_period,
                expected_ctc_amount, expected_ctc_currency, expected_ctc_period,
                location, applied_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.position)
        .bind(request.experience)
        .bind(&request.cover_letter)
        .bind(request.current_ctc_amount)
        .bind(&request.current_ctc_currency)
        .bind(&request.current_ctc_period)
        .bind(request.expected_ctc_amount)
        .bind(&request.expected_ctc_currency)
        .bind(&request.expected_ctc_period)
        .bind(&request.location)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created application".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<JobApplication>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            &format!("SELECT {} FROM job_applications WHERE id = ?", APPLICATION_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobApplication::from))
    }

    async fn list(&self) -> Result<Vec<JobApplication>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            &format!(
                "SELECT {} FROM job_applications ORDER BY applied_at DESC, id DESC",
                APPLICATION_COLUMNS
            )
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobApplication::from).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM job_applications WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

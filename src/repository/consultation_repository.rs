use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{Consultation, ConsultationStatus, CreateConsultationRequest},
    error::{AppError, Result},
    repository::ConsultationRepository,
};

#[derive(FromRow)]
struct ConsultationRow {
    id: i64,
    full_name: String,
    email: String,
    phone: String,
    country_code: String,
    service_interest: String,
    requirement_description: String,
    city_country: String,
    company_name: Option<String>,
    preferred_mode: Option<String>,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteConsultationRepository {
    pool: SqlitePool,
}

impl SqliteConsultationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_consultation(row: ConsultationRow) -> Result<Consultation> {
        Ok(Consultation {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            country_code: row.country_code,
            service_interest: row.service_interest,
            requirement_description: row.requirement_description,
            city_country: row.city_country,
            company_name: row.company_name,
            preferred_mode: row.preferred_mode,
            status: ConsultationStatus::from_str(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid consultation status: {}", row.status)))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ConsultationRepository for SqliteConsultationRepository {
    async fn create(&self, request: CreateConsultationRequest) -> Result<Consultation> {
        let now = Utc::now().naive_utc();
        let country_code = request
            .country_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "+91".to_string());

        let id = sqlx::query(
            r#"
            INSERT INTO consultations (
                full_name, email, phone, country_code, service_interest,
                requirement_description, city_country, company_name, preferred_mode,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&country_code)
        .bind(&request.service_interest)
        .bind(&request.requirement_description)
        .bind(&request.city_country)
        .bind(&request.company_name)
        .bind(&request.preferred_mode)
        .bind(ConsultationStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created consultation".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Consultation>> {
        let row = sqlx::query_as::<_, ConsultationRow>(
            r#"
            SELECT id, full_name, email, phone, country_code, service_interest,
                   requirement_description, city_country, company_name, preferred_mode,
                   status, created_at, updated_at
            FROM consultations
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_consultation).transpose()
    }

    async fn list(&self) -> Result<Vec<Consultation>> {
        let rows = sqlx::query_as::<_, ConsultationRow>(
            r#"
            SELECT id, full_name, email, phone, country_code, service_interest,
                   requirement_description, city_country, company_name, preferred_mode,
                   status, created_at, updated_at
            FROM consultations
            ORDER BY created_at DESC, id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_consultation).collect()
    }

    async fn update_status(&self, id: i64, status: ConsultationStatus) -> Result<Consultation> {
        let result = sqlx::query("UPDATE consultations SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().naive_utc())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Consultation not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated consultation".to_string())
        })
    }

    async fn count_by_status(&self, status: ConsultationStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM consultations WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

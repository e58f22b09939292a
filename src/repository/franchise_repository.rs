use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{FranchiseLead, FranchiseStatus, NewFranchiseLead},
    error::{AppError, Result},
    repository::FranchiseRepository,
};

const FRANCHISE_COLUMNS: &str =
    "id, name, mobile, email, city, interested, ip, status, notes, created_at, updated_at";

#[derive(FromRow)]
struct FranchiseRow {
    id: i64,
    name: String,
    mobile: String,
    email: String,
    city: String,
    interested: String,
    ip: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteFranchiseRepository {
    pool: SqlitePool,
}

impl SqliteFranchiseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_lead(row: FranchiseRow) -> Result<FranchiseLead> {
        Ok(FranchiseLead {
            id: row.id,
            name: row.name,
            mobile: row.mobile,
            email: row.email,
            city: row.city,
            interested: row.interested,
            ip: row.ip,
            status: FranchiseStatus::from_str(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid franchise status: {}", row.status)))?,
            notes: row.notes,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl FranchiseRepository for SqliteFranchiseRepository {
    async fn create(&self, lead: NewFranchiseLead) -> Result<FranchiseLead> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            r#"
            INSERT INTO franchise_leads (
                name, mobile, email, city, interested, ip, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&lead.name)
        .bind(&lead.mobile)
        .bind(&lead.email)
        .bind(&lead.city)
        .bind(&lead.interested)
        .bind(&lead.ip)
        .bind(FranchiseStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created franchise lead".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FranchiseLead>> {
        let row = sqlx::query_as::<_, FranchiseRow>(
            &format!("SELECT {} FROM franchise_leads WHERE id = ?", FRANCHISE_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_lead).transpose()
    }

    async fn list(&self) -> Result<Vec<FranchiseLead>> {
        let rows = sqlx::query_as::<_, FranchiseRow>(
            &format!("SELECT {} FROM franchise_leads ORDER BY created_at DESC, id DESC", FRANCHISE_COLUMNS)
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_lead).collect()
    }

    async fn update_status(&self, id: i64, status: FranchiseStatus, notes: &str) -> Result<FranchiseLead> {
        let result = sqlx::query(
            "UPDATE franchise_leads SET status = ?, notes = ?, updated_at = ? WHERE id = ?"
        )
        .bind(status.as_str())
        .bind(notes)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Franchise lead not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated franchise lead".to_string())
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM franchise_leads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM franchise_leads")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_by_status(&self, status: FranchiseStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM franchise_leads WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

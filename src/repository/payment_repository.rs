use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{NewPayment, Payment, PaymentMethod, PaymentStatus},
    error::{AppError, Result},
    repository::PaymentRepository,
};

const PAYMENT_COLUMNS: &str = r#"
    id, student_id, course_id, amount, currency, status, payment_method,
    provider, provider_payment_id, upi_id, initiated_at, transaction_time,
    created_at, updated_at
"#;

#[derive(FromRow)]
struct PaymentRow {
    id: i64,
    student_id: i64,
    course_id: i64,
    amount: f64,
    currency: String,
    status: String,
    payment_method: String,
    provider: String,
    provider_payment_id: Option<String>,
    upi_id: Option<String>,
    initiated_at: NaiveDateTime,
    transaction_time: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: row.id,
            student_id: row.student_id,
            course_id: row.course_id,
            amount: row.amount,
            currency: row.currency,
            status: PaymentStatus::from_str(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", row.status)))?,
            payment_method: PaymentMethod::from_str(&row.payment_method)
                .ok_or_else(|| AppError::Database(format!("Invalid payment method: {}", row.payment_method)))?,
            provider: row.provider,
            provider_payment_id: row.provider_payment_id,
            upi_id: row.upi_id,
            initiated_at: DateTime::from_naive_utc_and_offset(row.initiated_at, Utc),
            transaction_time: row.transaction_time.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn fetch(&self, id: i64) -> Result<Payment> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            r#"
            INSERT INTO payments (
                student_id, course_id, amount, currency, status, payment_method,
                provider, upi_id, initiated_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(payment.student_id)
        .bind(payment.course_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(PaymentStatus::Pending.as_str())
        .bind(payment.payment_method.as_str())
        .bind(payment.payment_method.provider())
        .bind(&payment.upi_id)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            &format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn find_by_student(&self, student_id: i64) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            &format!(
                "SELECT {} FROM payments WHERE student_id = ? ORDER BY created_at DESC, id DESC",
                PAYMENT_COLUMNS
            )
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            &format!(
                "SELECT {} FROM payments ORDER BY created_at DESC, id DESC LIMIT ?",
                PAYMENT_COLUMNS
            )
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn mark_completed(
        &self,
        id: i64,
        provider_payment_id: &str,
        transaction_time: DateTime<Utc>,
    ) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        // Only a pending payment may complete.
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?,
                provider_payment_id = ?,
                transaction_time = ?,
                updated_at = ?
            WHERE id = ? AND status = ?
            "#
        )
        .bind(PaymentStatus::Completed.as_str())
        .bind(provider_payment_id)
        .bind(transaction_time.naive_utc())
        .bind(now)
        .bind(id)
        .bind(PaymentStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation("Payment is no longer pending".to_string()));
        }

        self.fetch(id).await
    }

    async fn mark_failed(&self, id: i64) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE payments
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#
        )
        .bind(PaymentStatus::Failed.as_str())
        .bind(now)
        .bind(id)
        .bind(PaymentStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        self.fetch(id).await
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{NewOperator, Operator, Role},
    error::{AppError, Result},
    repository::OperatorRepository,
};

#[derive(FromRow)]
struct OperatorRow {
    id: i64,
    username: String,
    role: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteOperatorRepository {
    pool: SqlitePool,
}

impl SqliteOperatorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_operator(row: OperatorRow) -> Result<Operator> {
        let role = match row.role {
            Some(ref r) => Some(
                Role::from_str(r).ok_or_else(|| AppError::Database(format!("Invalid role: {}", r)))?,
            ),
            None => None,
        };

        Ok(Operator {
            id: row.id,
            username: row.username,
            role,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl OperatorRepository for SqliteOperatorRepository {
    async fn create(&self, operator: NewOperator) -> Result<Operator> {
        let now = Utc::now().naive_utc();

        let id = sqlx::query(
            r#"
            INSERT INTO operators (username, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&operator.username)
        .bind(&operator.password_hash)
        .bind(operator.role.map(|r| r.as_str()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created operator".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Operator>> {
        let row = sqlx::query_as::<_, OperatorRow>(
            "SELECT id, username, role, created_at, updated_at FROM operators WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_operator).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Operator>> {
        let row = sqlx::query_as::<_, OperatorRow>(
            "SELECT id, username, role, created_at, updated_at FROM operators WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_operator).transpose()
    }

    async fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM operators WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hash)
    }
}

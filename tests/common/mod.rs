#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use academy::{
    api,
    config::Settings,
    domain::{Course, CourseInput, NewOperator, NewStudent, Operator, Role, Student},
    notifications::{Notification, Notifier},
    repository::{OperatorRepository, SqliteOperatorRepository, SqliteStudentRepository, StudentRepository},
    service::ServiceContext,
};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Captures notifications instead of mailing them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Token from the most recent verification mail.
    pub fn last_verification_token(&self) -> Option<String> {
        self.all().into_iter().rev().find_map(|n| match n {
            Notification::StudentVerification { verify_url, .. } => verify_url
                .split("token=")
                .nth(1)
                .map(str::to_string),
            _ => None,
        })
    }
}

pub struct TestContext {
    pub pool: SqlitePool,
    pub settings: Settings,
    pub context: Arc<ServiceContext>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.admin_create_key = Some(ADMIN_KEY.to_string());
    settings.server.base_url = "http://academy.test".to_string();
    settings
}

/// A single in-memory connection that never recycles, so the schema survives
/// for the whole test.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub async fn setup() -> anyhow::Result<TestContext> {
    setup_with(test_settings()).await
}

pub async fn setup_with(settings: Settings) -> anyhow::Result<TestContext> {
    let pool = test_pool().await?;
    let notifier = Arc::new(RecordingNotifier::default());
    let context = Arc::new(ServiceContext::new(pool.clone(), &settings, notifier.clone()));

    Ok(TestContext {
        pool,
        settings,
        context,
        notifier,
    })
}

impl TestContext {
    pub fn app(&self) -> Router {
        api::create_app(self.context.clone(), Arc::new(self.settings.clone()))
    }

    /// Inserts a verified student directly; the password hash is a placeholder.
    pub async fn student(&self, email: &str) -> anyhow::Result<Student> {
        let repo = SqliteStudentRepository::new(self.pool.clone());
        let student = repo
            .create(NewStudent {
                username: email.split('@').next().unwrap_or("student").to_string(),
                email: email.to_string(),
                mobile: None,
                password_hash: "unused".to_string(),
                verification_token_hash: format!("unused-{}", email),
                verification_expires: Utc::now() + Duration::hours(1),
            })
            .await?;
        repo.mark_verified(student.id).await?;
        Ok(repo.find_by_id(student.id).await?.expect("student exists"))
    }

    pub async fn operator(&self, username: &str, role: Option<Role>) -> anyhow::Result<Operator> {
        let repo = SqliteOperatorRepository::new(self.pool.clone());
        Ok(repo
            .create(NewOperator {
                username: username.to_string(),
                password_hash: "unused".to_string(),
                role,
            })
            .await?)
    }

    pub async fn operator_token(&self, username: &str, role: Option<Role>) -> anyhow::Result<String> {
        let operator = self.operator(username, role).await?;
        Ok(self.context.token_service.issue_operator(&operator)?)
    }

    pub async fn student_token(&self, email: &str) -> anyhow::Result<(Student, String)> {
        let student = self.student(email).await?;
        let token = self.context.token_service.issue_student(&student)?;
        Ok((student, token))
    }

    pub async fn course(&self, title: &str, category: &str, price: f64) -> anyhow::Result<Course> {
        Ok(self
            .context
            .course_service
            .create(CourseInput {
                title: Some(title.to_string()),
                category: Some(category.to_string()),
                price: Some(price),
                ..Default::default()
            })
            .await?)
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    send_from(app, method, uri, token, body, None).await
}

pub async fn send_from(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    forwarded_for: Option<&str>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

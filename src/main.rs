use std::net::SocketAddr;
use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy::{
    api,
    config::Settings,
    notifications::{LogMailer, Mailer, NotificationQueue, SmtpMailer},
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "academy=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    if settings.auth.operator_secret.starts_with("change-me")
        || settings.auth.student_secret.starts_with("change-me")
    {
        tracing::warn!("Token secrets are using development defaults; set ACADEMY__AUTH__* in production");
    }

    tracing::info!("Starting Academy server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Outbound mail
    let mailer: Arc<dyn Mailer> = match settings.mail.smtp.as_ref() {
        Some(smtp) => {
            tracing::info!("SMTP delivery enabled via {}", smtp.host);
            Arc::new(SmtpMailer::new(smtp, &settings.mail.from)?)
        }
        None => {
            tracing::info!("SMTP not configured, mail will be logged");
            Arc::new(LogMailer)
        }
    };
    let (notification_queue, _mail_worker) = NotificationQueue::start(
        mailer,
        settings.mail.admin_address.clone(),
        settings.mail.queue_capacity,
    );

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        db_pool.clone(),
        &settings,
        Arc::new(notification_queue),
    ));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

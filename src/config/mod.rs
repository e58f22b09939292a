use std::collections::HashMap;
use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Operator and student tokens are signed with separate secrets.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub operator_secret: String,
    pub student_secret: String,
    pub operator_token_hours: i64,
    pub student_token_hours: i64,
    /// Shared key required to self-register an `admin` operator. Unset disables it.
    pub admin_create_key: Option<String>,
    pub verification_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub max_attempts: u32,
    pub window_minutes: u64,
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub from: String,
    pub admin_address: Option<String>,
    /// HR inbox per job location. Keys are matched case-insensitively.
    #[serde(default)]
    pub hr_addresses: HashMap<String, String>,
    pub queue_capacity: usize,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub starttls: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_minutes: 15,
            capacity: 10_000,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: "Academy <no-reply@academy.local>".to_string(),
            admin_address: None,
            hr_addresses: HashMap::new(),
            queue_capacity: 256,
            smtp: None,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.base_url", "http://localhost:5000")?
            .set_default("database.url", "sqlite://academy.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.operator_token_hours", 168)?
            .set_default("auth.student_token_hours", 24)?
            .set_default("auth.verification_ttl_minutes", 60)?
            .set_default("rate_limit.max_attempts", 5)?
            .set_default("rate_limit.window_minutes", 15)?
            .set_default("rate_limit.capacity", 10_000)?
            .set_default("mail.from", "Academy <no-reply@academy.local>")?
            .set_default("mail.queue_capacity", 256)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Environment variables (ACADEMY__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ACADEMY").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                base_url: "http://localhost:5000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://academy.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                operator_secret: "change-me-operator".to_string(),
                student_secret: "change-me-student".to_string(),
                operator_token_hours: 168,
                student_token_hours: 24,
                admin_create_key: None,
                verification_ttl_minutes: 60,
            },
            rate_limit: RateLimitConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

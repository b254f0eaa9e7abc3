use std::time::Duration;

use color_eyre::Result;
use dotenv::dotenv;
use eyre::WrapErr;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub smtp_host: String,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub platform_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        info!("Initializing configuration");
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .wrap_err("Building configuration")?;

        settings
            .try_deserialize()
            .wrap_err("loading configuration from environment")
    }

    pub async fn db_pool(&self) -> Result<PgPool> {
        info!("Initializing database pool");
        PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&self.database_url)
            .await
            .wrap_err("Creating database pool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_environment() {
        temp_env::with_vars(
            [
                ("HOST", Some("127.0.0.1")),
                ("PORT", Some("8080")),
                ("DATABASE_URL", Some("postgres://localhost/tasks")),
                ("JWT_SECRET", Some("super-secret")),
                ("SMTP_HOST", Some("smtp.example.com")),
                ("SMTP_USER", Some("mailer@example.com")),
                ("SMTP_PASS", Some("hunter2")),
                ("PLATFORM_NAME", Some("Taskdeck")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.host, "127.0.0.1");
                assert_eq!(config.port, 8080);
                assert_eq!(config.platform_name, "Taskdeck");
            },
        );
    }
}

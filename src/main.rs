mod config;
mod controllers;
mod errors;
mod models;
mod service;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use color_eyre::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{config::Config, crypto::CryptoService, routes::routes},
    service::{
        email_service::EmailService, otp_registry::OtpRegistry, task_service::TaskService,
        token_service::TokenService, user_service::UserService,
    },
};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = config.db_pool().await?;

    let email_service = EmailService::new(
        &config.smtp_host,
        &config.smtp_user,
        &config.smtp_pass,
        &config.platform_name,
    )?;
    let otp_registry = web::Data::new(OtpRegistry::new(Arc::new(email_service)));
    let token_service = web::Data::new(TokenService::new(&config.jwt_secret));
    let user_service = web::Data::new(UserService::new(pool.clone(), CryptoService::new()));
    let task_service = web::Data::new(TaskService::new(pool.clone()));

    let sweeper = otp_registry.clone();
    let sweep_handle = actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(OtpRegistry::SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = sweeper.sweep();
            if removed > 0 {
                debug!(removed, "removed expired otp entries");
            }
        }
    });

    info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(otp_registry.clone())
            .app_data(token_service.clone())
            .app_data(user_service.clone())
            .app_data(task_service.clone())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    sweep_handle.abort();
    Ok(())
}

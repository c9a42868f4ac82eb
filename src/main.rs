//! The website for a small martial arts club: members browse and sign up
//! for classes, the committee manages events and the roster.

mod auth;
mod config;
mod error;
mod models;
mod routes;
mod schedule;
#[cfg(test)]
mod tests;
mod util;

use std::sync::Arc;

use axum::extract::Extension;
use sqlx::mysql::MySqlPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tatami=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::from_env()?);

    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    tracing::info!("connected to the database");

    let app = routes::router()
        .layer(Extension(pool))
        .layer(Extension(config.clone()));

    tracing::info!("serving on {}", config.address);
    axum::Server::bind(&config.address)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

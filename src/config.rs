use std::net::SocketAddr;

use anyhow::Context;

/// Process configuration, read once at startup and passed to whatever
/// needs it rather than sitting in globals.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub address: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").context("`DATABASE_URL` not set")?;
        let secret_key = std::env::var("SECRET_KEY").context("`SECRET_KEY` not set")?;
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_owned())
            .parse::<u16>()
            .context("`PORT` must be a number")?;

        Ok(Self {
            database_url,
            secret_key,
            address: SocketAddr::from(([0, 0, 0, 0], port)),
        })
    }
}

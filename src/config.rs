use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub session_ttl_days: i64,
    pub secure_cookies: bool,
    pub min_password_length: usize,
    pub orphan_sweep_secs: u64,
    pub orphan_grace_secs: i64,
    pub default_avatar_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://catalogd.db?mode=rwc".to_string());

        let session_ttl_days: i64 =
            std::env::var("SESSION_TTL_DAYS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let secure_cookies = std::env::var("SECURE_COOKIES")
            .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let min_password_length: usize =
            std::env::var("MIN_PASSWORD_LENGTH").ok().and_then(|s| s.parse().ok()).unwrap_or(8);

        let orphan_sweep_secs: u64 =
            std::env::var("ORPHAN_SWEEP_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(300);

        let orphan_grace_secs: i64 =
            std::env::var("ORPHAN_GRACE_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(60);

        let default_avatar_url = std::env::var("DEFAULT_AVATAR_URL")
            .unwrap_or_else(|_| "/static/default-avatar.jpg".to_string());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            session_ttl_days,
            secure_cookies,
            min_password_length,
            orphan_sweep_secs,
            orphan_grace_secs,
            default_avatar_url,
        })
    }

    /// Defaults suited to in-memory databases and tests.
    pub fn local(database_url: impl Into<String>) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: database_url.into(),
            session_ttl_days: 30,
            secure_cookies: false,
            min_password_length: 8,
            orphan_sweep_secs: 0,
            orphan_grace_secs: 60,
            default_avatar_url: "/static/default-avatar.jpg".to_string(),
        }
    }
}

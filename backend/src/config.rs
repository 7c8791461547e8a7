use anyhow::anyhow;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{env, net::SocketAddr};

use crate::utils::cookies::{CookieOptions, SameSite};

pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Idle timeout in minutes; `None` keeps sessions until logout.
    pub session_idle_timeout_minutes: Option<u64>,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./webapp.db".to_string());

        let bind_addr_raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|_| anyhow!("Invalid BIND_ADDR value: {}", bind_addr_raw))?;

        let session_idle_timeout_minutes = match env::var("SESSION_IDLE_TIMEOUT_MINUTES") {
            Ok(raw) => parse_idle_timeout(&raw)?,
            Err(_) => None,
        };

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("Invalid COOKIE_SECURE value: {}", raw))?,
            Err(_) => false,
        };

        let cookie_same_site = match env::var("COOKIE_SAME_SITE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow!("Invalid COOKIE_SAME_SITE value: {}", raw))?,
            Err(_) => SameSite::Lax,
        };

        Ok(Config {
            database_url,
            bind_addr,
            session_idle_timeout_minutes,
            cookie_secure,
            cookie_same_site,
        })
    }

    pub fn session_idle_timeout(&self) -> Option<Duration> {
        self.session_idle_timeout_minutes
            .map(|minutes| Duration::minutes(minutes as i64))
    }

    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn parse_idle_timeout(raw: &str) -> anyhow::Result<Option<u64>> {
    let minutes: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid SESSION_IDLE_TIMEOUT_MINUTES value: {}", raw))?;
    Ok((minutes > 0).then_some(minutes))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

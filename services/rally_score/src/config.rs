use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://score.sqlite".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Exact length of the anonymous `token` cookie.
    pub token_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { token_length: 64 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    /// How far back the index page looks for modified matches.
    pub recent_window_hours: i64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = env::var("LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        } else if let Ok(path) = env::var("DB_PATH") {
            config.database.url = format!("sqlite://{}", path);
        }
        if let Some(max) = env_parse("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = max;
        }
        if let Some(len) = env_parse("TOKEN_LENGTH") {
            config.session.token_length = len;
        }
        if let Some(hours) = env_parse("RECENT_WINDOW_HOURS") {
            config.recent_window_hours = hours;
        }

        config
    }

    pub fn recent_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.recent_window_hours)
    }
}

/// Unset and unparsable variables both leave the default in place.
fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok()?.parse().ok()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            recent_window_hours: 24,
        }
    }
}

use crate::service::TieBreak;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Statements slower than this are logged at warn
    pub slow_statement_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/gst_billing".to_string(),
                max_connections: 20,
                acquire_timeout_secs: 10,
                slow_statement_secs: 5,
            },
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then `config/default.toml` if present, then `APP__*` env vars.
    /// `DATABASE_URL` wins over everything for the database URL.
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();
        let mut builder = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default("database.acquire_timeout_secs", defaults.database.acquire_timeout_secs as i64)?
            .set_default("database.slow_statement_secs", defaults.database.slow_statement_secs as i64)?
            .set_default("reconcile.tie_break", "first")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Database URL with the password masked, for logs.
    pub fn redacted_database_url(&self) -> String {
        let url = &self.database.url;
        let (Some(scheme_end), Some(at)) = (url.find("://"), url.rfind('@')) else {
            return url.clone();
        };
        let creds_start = scheme_end + 3;
        if at <= creds_start {
            return url.clone();
        }
        match url[creds_start..at].find(':') {
            Some(colon) => format!(
                "{}:***{}",
                &url[..creds_start + colon],
                &url[at..]
            ),
            None => url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.reconcile.tie_break, TieBreak::First);
    }

    #[test]
    fn password_is_masked() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://billing:s3cret@db:5432/gst".to_string();
        assert_eq!(
            config.redacted_database_url(),
            "postgres://billing:***@db:5432/gst"
        );
    }

    #[test]
    fn url_without_credentials_is_unchanged() {
        let config = AppConfig::default();
        assert_eq!(config.redacted_database_url(), "postgres://localhost/gst_billing");
    }
}

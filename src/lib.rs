//! ADR Desk core library
//!
//! Hospital and patient records plus drug-information lookups, served over
//! a JSON REST API.

pub mod api;
pub mod core;
pub mod db;
pub mod error;
pub mod models;

pub use error::{AppError, AppResult};

use crate::core::detection::DetectionClient;
use crate::core::fda::FdaClient;
use crate::core::reddit::RedditClient;
use crate::core::session::SessionCodec;

/// Application configuration
pub mod config {
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
        pub database: DatabaseConfig,
        pub session: SessionConfig,
        pub upstream: UpstreamConfig,
        pub log: LogConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: "127.0.0.1".into(),
                port: 3000,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct DatabaseConfig {
        pub url: String,
        pub max_connections: u32,
    }

    impl Default for DatabaseConfig {
        fn default() -> Self {
            Self {
                url: "sqlite://adr.db".into(),
                max_connections: 5,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct SessionConfig {
        /// HMAC key for session tokens. Must be set; startup fails when empty.
        pub secret: String,
        pub ttl_days: i64,
    }

    impl Default for SessionConfig {
        fn default() -> Self {
            Self {
                secret: String::new(),
                ttl_days: 7,
            }
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct UpstreamConfig {
        pub fda_base_url: String,
        pub reddit_auth_url: String,
        pub reddit_api_url: String,
        pub reddit_client_id: String,
        pub reddit_client_secret: String,
        pub reddit_user_agent: String,
        pub reddit_limit: u32,
        pub detection_url: String,
    }

    impl Default for UpstreamConfig {
        fn default() -> Self {
            Self {
                fda_base_url: "https://api.fda.gov".into(),
                reddit_auth_url: "https://www.reddit.com".into(),
                reddit_api_url: "https://oauth.reddit.com".into(),
                reddit_client_id: String::new(),
                reddit_client_secret: String::new(),
                reddit_user_agent: "adr-desk/0.1".into(),
                reddit_limit: 100,
                detection_url: "http://localhost:8000/detect_adverse_events".into(),
            }
        }
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(default)]
    pub struct LogConfig {
        /// Emit JSON lines instead of the human-readable format.
        pub json: bool,
    }

    /// Load configuration from file
    pub fn load_config() -> Result<Config, config::ConfigError> {
        let env = std::env::var("ADR_ENV").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            // Start with default settings
            .add_source(config::File::with_name("config/default").required(false))
            // Override with environment-specific settings
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables, e.g. ADR__SERVER__PORT=8080
            .add_source(
                config::Environment::with_prefix("ADR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn defaults_fill_every_section() {
            let config = Config::default();
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.session.ttl_days, 7);
            assert!(config.session.secret.is_empty());
            assert_eq!(config.upstream.fda_base_url, "https://api.fda.gov");
            assert!(!config.log.json);
        }

        #[test]
        fn partial_sources_keep_defaults() {
            let config: Config = config::Config::builder()
                .set_override("server.port", 8080)
                .and_then(|b| b.set_override("upstream.reddit_limit", 25))
                .and_then(|b| b.build())
                .and_then(|c| c.try_deserialize())
                .unwrap();
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.upstream.reddit_limit, 25);
            assert_eq!(config.database.max_connections, 5);
        }
    }
}

/// Shared state handed to every handler through `web::Data`.
pub struct AppState {
    pub db: db::Database,
    pub sessions: SessionCodec,
    pub fda: FdaClient,
    pub reddit: RedditClient,
    pub detection: DetectionClient,
}

impl AppState {
    pub fn new(db: db::Database, config: &config::Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            db,
            sessions: SessionCodec::new(&config.session),
            fda: FdaClient::new(http.clone(), &config.upstream.fda_base_url),
            reddit: RedditClient::new(http.clone(), &config.upstream),
            detection: DetectionClient::new(http, &config.upstream.detection_url),
        }
    }
}

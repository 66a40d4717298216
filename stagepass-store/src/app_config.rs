use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storefront: StorefrontConfig,
    pub document_store: DocumentStoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorefrontConfig {
    /// Where the cart snapshot file lives.
    pub snapshot_path: String,
    /// Cosmetic processing window before the booking write.
    #[serde(default = "default_checkout_delay_ms")]
    pub checkout_delay_ms: u64,
}

fn default_checkout_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentStoreConfig {
    /// Whether the bookings collection carries a date index. Without it,
    /// ordered history queries degrade to the unordered fallback.
    #[serde(default = "default_date_index")]
    pub date_index: bool,
}

fn default_date_index() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of STAGEPASS)
            // Eg.. `STAGEPASS__SERVER__PORT=8080` would set `server.port`
            .add_source(config::Environment::with_prefix("STAGEPASS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

use std::env;
use std::fmt;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Default pattern for both usernames and passwords.
pub const DEFAULT_CREDENTIAL_PATTERN: &str = r"^[a-zA-Z0-9\._-]*$";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent means accounts are kept in memory for the lifetime of the process.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub accounts: AccountsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Zero disables expiry.
    pub ttl_seconds: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountsConfig {
    pub username_pattern: String,
    pub password_pattern: String,
    pub default_active: bool,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__TTL_SECONDS=3600 overrides jwt.ttl_seconds
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }

    /// Builder seeded with the built-in defaults.
    ///
    /// The signing secret defaults to a random value, so tokens do not
    /// survive a restart unless `jwt.secret` is configured.
    pub fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.http_port", 8080_i64)?
            .set_default("jwt.secret", uuid::Uuid::new_v4().to_string())?
            .set_default("jwt.ttl_seconds", 0_i64)?
            .set_default("accounts.username_pattern", DEFAULT_CREDENTIAL_PATTERN)?
            .set_default("accounts.password_pattern", DEFAULT_CREDENTIAL_PATTERN)?
            .set_default("accounts.default_active", true)
    }
}

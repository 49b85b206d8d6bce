use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Longest rate-limit window accepted, one day.
pub const MAX_RATE_WINDOW_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub environment: RuntimeEnvironment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeEnvironment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

impl DatabaseConfig {
    /// ## Summary
    /// A `memory:` URL selects the in-process store instead of PostgreSQL.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.starts_with("memory:")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_days: i64,
    pub invite_ttl_days: i64,
    pub frontend_url: String,
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl AuthConfig {
    /// ## Summary
    /// Builds the registration link handed out with a fresh invite.
    #[must_use]
    pub fn invite_url(&self, token: &str) -> String {
        format!(
            "{}/register?token={token}",
            self.frontend_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub folder: String,
    pub max_upload_bytes: u64,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: usize,
    pub window_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, an optional `config.toml` and
    /// `COCINA_`-prefixed environment variables (`__` separates nested keys).
    /// A plain `DATABASE_URL` overrides `database.url`.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(
                config::Environment::with_prefix("COCINA")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?;

        Self::build(builder)
    }

    /// ## Summary
    /// Loads configuration from defaults plus a TOML document. Used by tests and tooling
    /// that must not read the process environment.
    ///
    /// ## Errors
    /// Returns an error if the TOML is malformed or the resulting settings are invalid.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));

        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5001)?
            .set_default("database.url", "memory:")?
            .set_default("database.max_connections", 4)?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.session_ttl_days", 7)?
            .set_default("auth.invite_ttl_days", 7)?
            .set_default("auth.frontend_url", "http://localhost:5173")?
            .set_default("media.folder", "family-recipes")?
            .set_default("media.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.max_requests", 100)?
            .set_default("rate_limit.window_minutes", 15)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .set_default("logging.level", "debug")?
            .set_default("environment", "development")?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder.build()?.try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Rejects settings the server cannot run with.
    ///
    /// ## Errors
    /// Returns [`CoreError::ConfigError`] naming the first offending key.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |message: &'static str| Err(CoreError::ConfigError(message));

        if self.auth.jwt_secret.trim().is_empty() {
            return invalid("auth.jwt_secret must be set");
        }
        if self.auth.session_ttl_days <= 0 {
            return invalid("auth.session_ttl_days must be positive");
        }
        if self.auth.invite_ttl_days <= 0 {
            return invalid("auth.invite_ttl_days must be positive");
        }
        if self.database.max_connections == 0 {
            return invalid("database.max_connections must be at least 1");
        }
        if self.rate_limit.enabled {
            if self.rate_limit.max_requests == 0 {
                return invalid("rate_limit.max_requests must be positive");
            }
            if !(1..=MAX_RATE_WINDOW_MINUTES).contains(&self.rate_limit.window_minutes) {
                return invalid("rate_limit.window_minutes must be between 1 and 1440");
            }
        }
        if self.media.max_upload_bytes == 0 {
            return invalid("media.max_upload_bytes must be positive");
        }
        Ok(())
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == RuntimeEnvironment::Production
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

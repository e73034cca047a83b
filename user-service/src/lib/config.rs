use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent means the in-memory user directory is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub health_check: HealthCheckConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Token lifetime. Saturates for hour counts `validate()` rejects.
    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.expiration_hours).unwrap_or(chrono::Duration::MAX)
    }
}

// Keeps the signing key out of logs
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HealthCheckConfig {
    pub interval_secs: u64,
    pub reference_user: ReferenceUserConfig,
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Known user the health check expects to find in the directory.
#[derive(Deserialize, Clone)]
pub struct ReferenceUserConfig {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// Only used when seeding the in-memory directory.
    #[serde(default)]
    pub password: Option<String>,
}

impl ReferenceUserConfig {
    /// Expected profile of the reference user. The password hash is left empty.
    ///
    /// # Errors
    /// * `InvalidEmail` - Configured email is not a valid address
    pub fn to_user(&self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: EmailAddress::new(self.email.clone())?,
            password_hash: None,
        })
    }
}

impl std::fmt::Debug for ReferenceUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceUserConfig")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (APP_DATABASE__URL, APP_JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables
            // Example: APP_DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        if chrono::Duration::try_hours(self.jwt.expiration_hours).is_none() {
            return Err(ConfigError::Message(
                "jwt.expiration_hours is out of range".to_string(),
            ));
        }
        if self.health_check.interval_secs == 0 {
            return Err(ConfigError::Message(
                "health_check.interval_secs must be positive".to_string(),
            ));
        }
        if let Some(database) = &self.database {
            if database.url.trim().is_empty() {
                return Err(ConfigError::Message("database.url must not be empty".to_string()));
            }
        }

        Ok(())
    }
}

//! Database settings.
//!
//! [`DatabaseConfig::load`] reads the `database` section of `config/config.toml`, then layers
//! `JUNCTION__DATABASE__*` environment variables over it.

use crate::transaction::IsolationLevel;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

const CONFIG_PATH: &str = "config/config.toml";
const ENV_PREFIX: &str = "JUNCTION";

/// Drivers the relation store can talk to.
const DRIVERS: &[&str] = &["postgres"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URI; when set it wins over the individual fields.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u32,
    /// Isolation level for atomic replacement of an association set.
    #[serde(default)]
    pub set_isolation_level: IsolationLevel,
}

fn default_driver() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "fleet_admin".to_string()
}

fn default_username() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u32 {
    5432
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            driver: default_driver(),
            database: default_database(),
            username: default_username(),
            password: String::new(),
            host: default_host(),
            port: default_port(),
            set_isolation_level: IsolationLevel::default(),
        }
    }
}

impl DatabaseConfig {
    /// Load the database configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_PATH).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // An unreadable file is not fatal as long as the environment is usable.
                if std::path::Path::new(CONFIG_PATH).exists() {
                    log::warn!("failed to load {CONFIG_PATH}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document containing a `[database]` table.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<DatabaseConfig>("database") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Database configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }

    /// Ensures the settings describe a reachable PostgreSQL data source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_some() {
            return Ok(());
        }
        if !DRIVERS.contains(&self.driver.as_str()) {
            return Err(ConfigError::Message(format!(
                "'{}': not an available database driver",
                self.driver
            )));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Message("database cannot be empty".to_string()));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Message("username cannot be empty".to_string()));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Message("host cannot be empty".to_string()));
        }
        if self.port == 0 || self.port > 65535 {
            return Err(ConfigError::Message(format!(
                "{}: not a valid port",
                self.port
            )));
        }
        Ok(())
    }

    /// Connection URI for these settings, with the credentials percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if the host, port or database do not form a valid URI.
    pub fn data_source_name(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        let invalid =
            |detail: String| ConfigError::Message(format!("invalid data source name: {detail}"));

        let mut dsn = Url::parse(&format!(
            "{}://{}:{}/{}",
            self.driver, self.host, self.port, self.database
        ))
        .map_err(|e| invalid(e.to_string()))?;
        dsn.set_username(&self.username)
            .map_err(|()| invalid("username cannot be set".to_string()))?;
        if !self.password.is_empty() {
            dsn.set_password(Some(&self.password))
                .map_err(|()| invalid("password cannot be set".to_string()))?;
        }
        Ok(dsn.into())
    }
}

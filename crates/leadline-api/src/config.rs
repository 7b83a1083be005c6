//! Configuration management for the lead endpoint.

use std::{collections::BTreeMap, fmt, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use leadline_core::store::is_plain_identifier;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

const CONFIG_FILE: &str = "leadline.toml";

/// Environment used when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "DEVELOPMENT";
/// Environment name that selects production behaviour.
pub const PRODUCTION_ENVIRONMENT: &str = "PRODUCTION";

/// Service configuration with defaults, file, and environment overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`leadline.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// Database profiles live under `[environments.<NAME>]` in the file. The
/// `ENVIRONMENT` variable picks which one the process binds to.
///
/// # Example
///
/// ```no_run
/// use leadline_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
/// println!("Active environment: {}", config.active_environment());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the active configuration profile.
    ///
    /// Environment variable: `ENVIRONMENT`
    #[serde(default = "default_environment", alias = "ENVIRONMENT")]
    pub environment: String,

    /// Database profiles keyed by upper-case environment name.
    #[serde(default = "default_environments")]
    pub environments: BTreeMap<String, DatabaseProfile>,

    /// Table receiving lead rows.
    ///
    /// Environment variable: `LEADS_TABLE`
    #[serde(default = "default_leads_table", alias = "LEADS_TABLE")]
    pub leads_table: String,

    /// Maximum number of pooled store connections.
    ///
    /// Environment variable: `DATABASE_MAX_CONNECTIONS`
    #[serde(default = "default_max_connections", alias = "DATABASE_MAX_CONNECTIONS")]
    pub database_max_connections: u32,

    /// Deadline for a single store insert in milliseconds.
    ///
    /// Environment variable: `STORE_TIMEOUT_MS`
    #[serde(default = "default_store_timeout_ms", alias = "STORE_TIMEOUT_MS")]
    pub store_timeout_ms: u64,

    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,

    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,

    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Log filter directive. Unset means `info`, or `warn` in production.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default, alias = "RUST_LOG")]
    pub rust_log: Option<String>,
}

/// Connection settings of one environment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseProfile {
    /// Database server host.
    pub hostname: String,
    /// Login user.
    pub username: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
    /// Database name.
    pub database: String,
    /// Database server port.
    #[serde(default = "default_database_port")]
    pub port: u16,
}

impl DatabaseProfile {
    /// Connection options for the PostgreSQL store.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.hostname)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }

    /// Connection summary with the password masked, for logging.
    pub fn masked(&self) -> String {
        format!("{}:***@{}:{}/{}", self.username, self.hostname, self.port, self.database)
    }
}

impl fmt::Debug for DatabaseProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseProfile")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed("")),
        )
    }

    /// Extracts and validates configuration from an explicit figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Upper-cased active environment name, `DEVELOPMENT` when blank.
    pub fn active_environment(&self) -> String {
        let name = self.environment.trim();
        if name.is_empty() {
            DEFAULT_ENVIRONMENT.to_string()
        } else {
            name.to_uppercase()
        }
    }

    /// True when running the production profile.
    pub fn is_production(&self) -> bool {
        self.active_environment() == PRODUCTION_ENVIRONMENT
    }

    /// Database profile of the active environment, if one is configured.
    pub fn active_profile(&self) -> Option<&DatabaseProfile> {
        self.environments.get(&self.active_environment())
    }

    /// Log filter directive to install.
    pub fn log_filter(&self) -> String {
        match &self.rust_log {
            Some(filter) if !filter.trim().is_empty() => filter.clone(),
            _ if self.is_production() => "warn,leadline=info".to_string(),
            _ => "info".to_string(),
        }
    }

    /// Deadline applied to each store insert.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Deadline applied to each HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.store_timeout_ms == 0 {
            anyhow::bail!("store_timeout_ms must be greater than 0");
        }

        if self.store_timeout() >= self.request_timeout() {
            anyhow::bail!(
                "store_timeout_ms ({}) must be shorter than request_timeout ({}s)",
                self.store_timeout_ms,
                self.request_timeout
            );
        }

        if self.database_max_connections == 0 {
            anyhow::bail!("database_max_connections must be greater than 0");
        }

        if !is_plain_identifier(&self.leads_table) {
            anyhow::bail!("leads_table `{}` is not a plain SQL identifier", self.leads_table);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            environments: default_environments(),
            leads_table: default_leads_table(),
            database_max_connections: default_max_connections(),
            store_timeout_ms: default_store_timeout_ms(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            rust_log: None,
        }
    }
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_environments() -> BTreeMap<String, DatabaseProfile> {
    BTreeMap::from([(DEFAULT_ENVIRONMENT.to_string(), DatabaseProfile {
        hostname: "localhost".to_string(),
        username: "leadline".to_string(),
        password: String::new(),
        database: "leadline".to_string(),
        port: default_database_port(),
    })])
}

fn default_leads_table() -> String {
    "leads".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_store_timeout_ms() -> u64 {
    5000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_database_port() -> u16 {
    5432
}

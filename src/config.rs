use serde::Deserialize;

pub const LIST_LIMIT: i64 = 50;
pub const MAX_CONTENT_LENGTH: usize = 280;
pub const MAX_USERNAME_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP server settings, read from `APP_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_store")]
    pub store: StoreBackend,
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

/// Connection parameters for the post store, read from `DB_*` variables.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

// Keeps the password out of startup logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect::<Vec<_>>())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)> + Clone,
    {
        Ok(Config {
            app: envy::prefixed("APP_").from_iter(vars.clone())?,
            database: envy::prefixed("DB_").from_iter(vars)?,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.app.host.clone(), self.app.port)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.app
            .cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_store() -> StoreBackend {
    StoreBackend::Postgres
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_db_host() -> String {
    "db".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "devops_social".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_compose_setup() {
        let config = Config::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.bind_addr(), ("0.0.0.0".to_string(), 8000));
        assert_eq!(config.app.store, StoreBackend::Postgres);
        assert_eq!(config.app.log_format, LogFormat::Pretty);
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.name, "devops_social");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.cors_origins(), vec!["*".to_string()]);
    }

    #[test]
    fn reads_prefixed_overrides() {
        let config = Config::from_vars(vars(&[
            ("APP_PORT", "9000"),
            ("APP_STORE", "memory"),
            ("APP_LOG_FORMAT", "json"),
            ("APP_CORS_ALLOWED_ORIGINS", "http://localhost:3000, http://ui.local ,"),
            ("DB_HOST", "localhost"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.app.port, 9000);
        assert_eq!(config.app.store, StoreBackend::Memory);
        assert_eq!(config.app.log_format, LogFormat::Json);
        assert_eq!(
            config.cors_origins(),
            vec!["http://localhost:3000".to_string(), "http://ui.local".to_string()]
        );
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.max_connections, 12);
    }

    #[test]
    fn rejects_unknown_store_backend() {
        assert!(Config::from_vars(vars(&[("APP_STORE", "redis")])).is_err());
    }

    #[test]
    fn debug_output_hides_password() {
        let config = Config::from_vars(vars(&[("DB_PASSWORD", "hunter2")])).unwrap();
        assert!(!format!("{:?}", config.database).contains("hunter2"));
    }
}

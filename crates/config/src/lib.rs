use dotenv::dotenv;
use dotenv::from_path;
use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_LOG_FILTER: &str = "movie_rentals=info,api_server=debug,tower_http=debug";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load .env file from path {path}: {message}")]
    EnvFile { path: String, message: String },

    #[error("Invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub db_pool_size: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "movie_rentals.db".to_string(),
            api_host: "127.0.0.1".to_string(),
            api_port: 8080,
            db_pool_size: 8,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        } else {
            // A missing default `.env` is fine
            dotenv().ok();
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source, falling back to
    /// defaults for unset names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            api_host: lookup("API_HOST").unwrap_or(defaults.api_host),
            api_port: parse_or(&lookup, "API_PORT", defaults.api_port)?,
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", defaults.db_pool_size)?,
            log_filter: lookup("LOG_FILTER").unwrap_or(defaults.log_filter),
        })
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

use std::{env, path::PathBuf, str::FromStr};

use tracing::Level;

use crate::errors::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_api_url: String,
    pub storage_path: Option<PathBuf>,
    pub port: u16,
    pub log_path: Option<PathBuf>,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_api_url = lookup("CATALOG_API_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("CATALOG_API_URL"))?;

        Ok(Config {
            catalog_api_url: catalog_api_url,
            storage_path: lookup("CART_STORAGE_PATH").filter(|v| !v.is_empty()).map(PathBuf::from),
            port: parse_or("AXUM_PORT", lookup("AXUM_PORT"), 3000)?,
            log_path: lookup("LOG_PATH").filter(|v| !v.is_empty()).map(PathBuf::from),
            log_level: parse_or("LOG_LEVEL", lookup("LOG_LEVEL"), Level::DEBUG)?,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name: name, value: value }),
    }
}

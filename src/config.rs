use std::env;

use crate::errors::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Legacy clients read `password` from the users list.
    pub users_list_include_passwords: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".into()))?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT={raw}: {e}")))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => {
                    return Err(AppError::Config(
                        "DATABASE_MAX_CONNECTIONS must be at least 1".into(),
                    ))
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(AppError::Config(format!(
                        "DATABASE_MAX_CONNECTIONS={raw}: {e}"
                    )))
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let users_list_include_passwords = match lookup("USERS_LIST_INCLUDE_PASSWORDS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("USERS_LIST_INCLUDE_PASSWORDS={raw}: expected a boolean"))
            })?,
            None => false,
        };

        Ok(Config {
            database_url: normalize_sqlite_url(&database_url),
            host,
            port,
            max_connections,
            users_list_include_passwords,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// sqlx expects `sqlite://<path>` or `sqlite::memory:`.
pub fn normalize_sqlite_url(input: &str) -> String {
    let input = input.trim();
    if input.starts_with("sqlite://") || input.starts_with("sqlite::memory:") {
        return input.to_owned();
    }
    if let Some(rest) = input.strip_prefix("sqlite:") {
        return format!("sqlite://{}", rest.trim_start_matches('/'));
    }
    if let Some(rest) = input.strip_prefix("file:") {
        return format!("sqlite://{rest}");
    }
    format!("sqlite://{input}")
}

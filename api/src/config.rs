use std::{net::IpAddr, str::FromStr};

use axum::http::HeaderValue;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    pub fn from_env() -> Self {
        match var("ENVIRONMENT") {
            Ok(Some(env)) => Env::parse(&env),
            _ => Env::Dev,
        }
    }

    fn parse(env: &str) -> Self {
        match env {
            "dev" => Env::Dev,
            "staging" => Env::Staging,
            "production" => Env::Production,
            _ => Env::Dev,
        }
    }
}

pub struct ServerConfig {
    pub env: Env,
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: usize,
    pub cors_allowed_origins: Option<Vec<HeaderValue>>,
}

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!(
            "Could not get the environment variable `{key}` due to unicode error"
        )),
    }
}

fn required_var(key: &str) -> String {
    match var(key) {
        Ok(Some(val)) => val,
        Ok(None) => {
            tracing::error!("Environment variable `{key}` is required");
            std::process::exit(1)
        }
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

fn parsed_var<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Ok(Some(val)) => match parse_value(&val) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("Environment variable `{key}` is invalid: {e}");
                std::process::exit(1)
            }
        },
        Ok(None) => default,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1)
        }
    }
}

fn parse_value<T>(val: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    val.trim()
        .parse::<T>()
        .map_err(|e| format!("`{val}`: {e}"))
}

fn parse_origins(val: &str) -> Result<Vec<HeaderValue>, String> {
    val.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| format!("origin `{origin}`: {e}"))
        })
        .collect()
}

impl ServerConfig {
    pub fn new_from_env(env: Env) -> Self {
        let cors_allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Ok(Some(val)) => match parse_origins(&val) {
                Ok(origins) => Some(origins),
                Err(e) => {
                    tracing::error!("Environment variable `CORS_ALLOWED_ORIGINS` is invalid: {e}");
                    std::process::exit(1)
                }
            },
            _ => None,
        };

        ServerConfig {
            env,
            host: parsed_var("HOST", IpAddr::from([0, 0, 0, 0])),
            port: parsed_var("PORT", 3000),
            database_url: required_var("DATABASE_URL"),
            database_max_connections: parsed_var("DATABASE_MAX_CONNECTIONS", 10),
            cors_allowed_origins,
        }
    }
}

//! Handles settings for the application.
//!
//! Values come, lowest priority first, from the built-in defaults, an optional
//! settings file (`settings.toml` unless `--config` says otherwise), an
//! optional `.env` file and the process environment (`APP_NAME`,
//! `DATABASE_URL`, `CORS_ORIGINS`, ...). Missing files are not an error.
use std::path::Path;

use clap::Parser;
use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use server::ServerConfig;

const DEFAULT_CONFIG_PATH: &str = "settings";
const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub database_url: String,
    pub api_prefix: String,
    /// Comma separated list of allowed origins.
    pub cors_origins: String,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Expense Tracker API".to_string(),
            app_version: "1.0.0".to_string(),
            debug: false,
            database_url: migration::DEFAULT_DATABASE_URL.to_string(),
            api_prefix: "/api/v1".to_string(),
            cors_origins: "http://localhost:3000,http://localhost:8080".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Settings {
    /// Split `cors_origins` into distinct, non-empty origins, keeping the
    /// first occurrence of each.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for origin in self.cors_origins.split(',').map(str::trim) {
            if !origin.is_empty() && !origins.iter().any(|seen| seen == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Default `tracing` directives when `RUST_LOG` is unset.
    ///
    /// `sea_orm` and `sqlx` are included so statement logging, enabled in
    /// debug mode, is actually printed.
    pub fn log_directives(&self) -> String {
        let level = self.log_level();
        [
            "expense_tracker",
            "server",
            "engine",
            "migration",
            "tower_http",
            "sea_orm",
            "sqlx",
        ]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone(),
            api_prefix: self.api_prefix.clone(),
            cors_origins: self.cors_origins(),
        }
    }

    fn from_sources(config_path: &str, environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

/// Read `KEY=value` pairs from a dotenv file. A missing file yields no pairs.
fn dotenv_vars(path: &Path) -> Result<Map<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(Map::new()),
        Err(err) => return Err(ConfigError::Foreign(Box::new(err))),
    };
    iter.map(|item| item.map_err(|err| ConfigError::Foreign(Box::new(err))))
        .collect()
}

/// Variables from `env_file`, overridden by the process environment.
fn environment(env_file: &Path) -> Result<Environment, ConfigError> {
    let mut vars = dotenv_vars(env_file)?;
    vars.extend(std::env::vars());
    Ok(Environment::default().source(Some(vars)))
}

#[derive(Debug, Parser)]
#[command(name = "expense_tracker", disable_version_flag = true)]
struct Args {
    /// Optional settings file path (TOML, YAML or JSON).
    #[arg(long)]
    config: Option<String>,
    /// Optional dotenv file with `KEY=value` lines.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: String,
}

pub fn load() -> Result<Settings, ConfigError> {
    let args = Args::parse();
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    Settings::from_sources(config_path, environment(Path::new(&args.env_file))?)
}

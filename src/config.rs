//! Application configuration.
//!
//! Values resolve with the priority: config.toml > environment > default.
//! A `.env` file is loaded first so environment lookups see it.

use serde::Deserialize;
use std::path::PathBuf;

/// Default bind port (the original deployment's port)
pub const DEFAULT_PORT: u16 = 8001;

/// Signing secret fallback. Must never reach production; a warning is logged
/// whenever it is in effect.
pub const INSECURE_DEFAULT_SECRET: &str = "your-super-secret-key-here";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    database: Option<DatabaseSection>,
    auth: Option<AuthSection>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthSection {
    secret_key: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub port: u16,
    pub secret_key: String,
}

impl Config {
    /// Load configuration: `.env`, then config.toml > env > defaults.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        let file = read_file_config();

        let database_path = file
            .database
            .as_ref()
            .and_then(|d| d.path.clone())
            .map(PathBuf::from)
            .or_else(|| std::env::var("DATABASE_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("data/pyquest.db"));

        let port = file
            .server
            .as_ref()
            .and_then(|s| s.port)
            .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let secret_key = file
            .auth
            .as_ref()
            .and_then(|a| a.secret_key.clone())
            .or_else(|| std::env::var("SECRET_KEY").ok())
            .unwrap_or_else(|| INSECURE_DEFAULT_SECRET.to_string());

        if secret_key == INSECURE_DEFAULT_SECRET {
            tracing::warn!("SECRET_KEY not configured; using the insecure default");
        }

        Self {
            database_path,
            port,
            secret_key,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn read_file_config() -> FileConfig {
    match std::fs::read_to_string("config.toml") {
        Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
            Ok(cfg) => {
                tracing::info!("Loaded config.toml");
                cfg
            }
            Err(e) => {
                tracing::warn!("Failed to parse config.toml: {}", e);
                FileConfig::default()
            }
        },
        Err(_) => FileConfig::default(),
    }
}

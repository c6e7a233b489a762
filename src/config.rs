//! Configuration management for the Chapterwise server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::summarize::BackendKind;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub uploads: UploadConfig,
    pub database: DatabaseConfig,
    pub summarizer: SummarizerConfig,
    pub tasks: TaskConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub provider: BackendKind,
    pub url: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
    pub timeout_secs: u64,
    pub max_concurrent: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown summarizer provider '{0}' (expected 'huggingface' or 'ollama')")]
    UnknownProvider(String),
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        let provider = BackendKind::default();
        SummarizerConfig {
            provider,
            url: provider.default_url().to_string(),
            model: provider.default_model().to_string(),
            api_token: None,
            timeout_secs: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_bytes: 50 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "sqlite:./chapterwise.db".to_string(),
            },
            summarizer: SummarizerConfig::default(),
            tasks: TaskConfig {
                capacity: 256,
                ttl_secs: 3600,
                timeout_secs: 1800,
                max_concurrent: 2,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from a variable lookup
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let provider = match lookup("SUMMARIZER_PROVIDER") {
            Some(value) => BackendKind::parse(&value).ok_or(ConfigError::UnknownProvider(value))?,
            None => defaults.summarizer.provider,
        };

        Ok(Config {
            server: ServerConfig {
                host: string("SERVER_HOST", &defaults.server.host),
                port: parsed(&lookup, "SERVER_PORT", defaults.server.port),
            },
            uploads: UploadConfig {
                dir: lookup("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.uploads.dir),
                max_bytes: parsed(&lookup, "MAX_UPLOAD_BYTES", defaults.uploads.max_bytes),
            },
            database: DatabaseConfig {
                url: string("DATABASE_URL", &defaults.database.url),
            },
            summarizer: SummarizerConfig {
                provider,
                url: string("SUMMARIZER_URL", provider.default_url()),
                model: string("SUMMARIZER_MODEL", provider.default_model()),
                api_token: lookup("SUMMARIZER_API_TOKEN").filter(|token| !token.is_empty()),
                timeout_secs: parsed(
                    &lookup,
                    "SUMMARIZER_TIMEOUT_SECS",
                    defaults.summarizer.timeout_secs,
                ),
            },
            tasks: TaskConfig {
                capacity: parsed(&lookup, "TASK_CAPACITY", defaults.tasks.capacity),
                ttl_secs: parsed(&lookup, "TASK_TTL_SECS", defaults.tasks.ttl_secs),
                timeout_secs: parsed(&lookup, "TASK_TIMEOUT_SECS", defaults.tasks.timeout_secs),
                max_concurrent: parsed(
                    &lookup,
                    "MAX_CONCURRENT_TASKS",
                    defaults.tasks.max_concurrent,
                ),
            },
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

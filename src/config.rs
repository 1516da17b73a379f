//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `GEMINI_API_KEY` | none (required to call the backend) |
//! | `GEMINI_MODEL` | `gemini-2.5-flash` |
//! | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta` |
//! | `IDEAPLAN_TIMEOUT_SECS` | `60` |
//! | `IDEAS_DIR` | `data/ideas` |
//! | `PLANS_DIR` | `data/plans` |
//! | `IDEAPLAN_STORE` | `fs` (`fs` or `sqlite`) |
//! | `IDEAPLAN_DB` | platform data dir `ideaplan.db` |
//! | `IDEAPLAN_PROMPTS_DIR` | none (embedded templates) |
//! | `IDEAPLAN_CORS_ORIGINS` | `http://127.0.0.1:5500,http://localhost:5500` |

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CORS_ORIGINS: &[&str] = &["http://127.0.0.1:5500", "http://localhost:5500"];

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    /// Directory holding `{name}.txt` prompt overrides.
    pub prompts_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

/// Settings for the Gemini generation backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Wall-clock ceiling for a single request attempt.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreBackend {
    /// JSON and markdown files under the ideas and plans directories.
    Fs,
    /// A single SQLite database.
    Sqlite,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fs" | "file" | "files" => Some(Self::Fs),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub ideas_dir: PathBuf,
    pub plans_dir: PathBuf,
    /// SQLite database path. `None` uses the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = non_empty("IDEAPLAN_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let backend = match non_empty("IDEAPLAN_STORE") {
            Some(value) => StoreBackend::from_str(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown IDEAPLAN_STORE value {:?}, using files", value);
                StoreBackend::Fs
            }),
            None => StoreBackend::Fs,
        };

        let cors_origins = non_empty("IDEAPLAN_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect());

        Self {
            gemini: GeminiConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: non_empty("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            storage: StorageConfig {
                backend,
                ideas_dir: non_empty("IDEAS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/ideas")),
                plans_dir: non_empty("PLANS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/plans")),
                db_path: non_empty("IDEAPLAN_DB").map(PathBuf::from),
            },
            prompts_dir: non_empty("IDEAPLAN_PROMPTS_DIR").map(PathBuf::from),
            cors_origins,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

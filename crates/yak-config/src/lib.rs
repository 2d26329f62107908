//! Configuration for Yak.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > ~/.yak/config.toml > defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use yak_types::ConfigError;

/// The default hosted API base URL (includes the version segment).
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// The default local Ollama base URL.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// The default hosted model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// The default local model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Message count past which the driving loop auto-summarizes.
pub const DEFAULT_COMPACT_THRESHOLD: usize = 20;

/// Resolved configuration for a Yak session.
#[derive(Debug, Clone)]
pub struct YakConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub history_path: PathBuf,
    pub request_timeout_secs: u64,
    pub compact_threshold: usize,
    pub use_ollama: bool,
    pub config_dir: PathBuf,
}

/// Settings that can be read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub chat: ChatSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    pub history_path: Option<PathBuf>,
    pub compact_threshold: Option<usize>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub history_path: Option<PathBuf>,
    pub use_ollama: bool,
}

/// Environment variables that feed into resolution, captured up front so
/// resolution itself never touches ambient state.
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("YAK_MODEL").ok(),
            base_url: std::env::var("YAK_API_BASE_URL").ok(),
        }
    }
}

impl YakConfig {
    /// Load configuration from all sources, applying precedence rules.
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let config_dir = config_dir();
        let settings = load_settings_file(&config_dir.join("config.toml"));
        Self::resolve(overrides, settings, EnvOverrides::from_env(), config_dir)
    }

    fn resolve(
        overrides: CliOverrides,
        settings: SettingsFile,
        env: EnvOverrides,
        config_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        // Ollama needs no real key; the hosted API does.
        let api_key = if overrides.use_ollama {
            "ollama".to_string()
        } else {
            overrides
                .api_key
                .or(env.api_key)
                .or(settings.api.api_key)
                .ok_or_else(|| ConfigError::MissingKey {
                    key: "api_key (set OPENAI_API_KEY or add to ~/.yak/config.toml)".into(),
                })?
        };

        let model = overrides
            .model
            .or(env.model)
            .or(settings.api.model)
            .unwrap_or_else(|| {
                if overrides.use_ollama {
                    DEFAULT_OLLAMA_MODEL.to_string()
                } else {
                    DEFAULT_MODEL.to_string()
                }
            });

        let api_base_url = env
            .base_url
            .or(settings.api.base_url)
            .unwrap_or_else(|| {
                if overrides.use_ollama {
                    DEFAULT_OLLAMA_BASE_URL.to_string()
                } else {
                    DEFAULT_API_BASE_URL.to_string()
                }
            });

        let history_path = overrides
            .history_path
            .or(settings.chat.history_path)
            .unwrap_or_else(|| config_dir.join("conversation.json"));

        let request_timeout_secs = settings.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".into(),
                message: "must be greater than zero".into(),
            });
        }

        let compact_threshold = settings
            .chat
            .compact_threshold
            .unwrap_or(DEFAULT_COMPACT_THRESHOLD);

        Ok(YakConfig {
            api_key,
            model,
            api_base_url,
            history_path,
            request_timeout_secs,
            compact_threshold,
            use_ollama: overrides.use_ollama,
            config_dir,
        })
    }
}

/// Get the Yak config directory path (~/.yak/).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("YAK_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".yak")
}

/// Load and parse a TOML settings file, returning defaults on any error.
fn load_settings_file(path: &std::path::Path) -> SettingsFile {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            SettingsFile::default()
        }),
        Err(_) => SettingsFile::default(),
    }
}

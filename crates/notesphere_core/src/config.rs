//! Application configuration.
//!
//! # Responsibility
//! - Load `notesphere.toml`-style settings with a default for every field.
//! - Convert settings into the typed values consumed by core modules.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - API keys are never stored in the file, only the env var name.

use crate::ai::model::{ModelSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ai::prompt::{PromptTemplate, NOTE_CONTENT_PLACEHOLDER};
use crate::editor::EditorLimits;
use crate::repo::note_store::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DB_FILE_NAME: &str = "notesphere.sqlite3";
const DEFAULT_API_KEY_ENV: &str = "NOTESPHERE_AI_API_KEY";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub ai: AiConfig,
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    /// Key of the entry holding the serialized note array.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `None` falls back to `default_log_level()`.
    pub level: Option<String>,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Replaces the built-in instruction template; must contain
    /// `{{noteContent}}`.
    pub prompt_template: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            prompt_template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub title_max_chars: usize,
    pub objective_max_chars: usize,
    pub max_images: usize,
    pub max_image_bytes: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let limits = EditorLimits::default();
        Self {
            title_max_chars: limits.title_max_chars,
            objective_max_chars: limits.objective_max_chars,
            max_images: limits.max_images,
            max_image_bytes: limits.max_image_bytes,
        }
    }
}

impl AppConfig {
    /// Loads and validates `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_toml_str(&text).map_err(|source| match source {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let editor = &self.editor;
        if editor.title_max_chars == 0
            || editor.objective_max_chars == 0
            || editor.max_images == 0
            || editor.max_image_bytes == 0
        {
            return Err(ConfigError::Invalid(
                "editor limits must be greater than zero".to_string(),
            ));
        }
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.key cannot be empty".to_string()));
        }
        if self.ai.model.trim().is_empty() {
            return Err(ConfigError::Invalid("ai.model cannot be empty".to_string()));
        }
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "ai.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(template) = &self.ai.prompt_template {
            if !template.contains(NOTE_CONTENT_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "ai.prompt_template must contain `{NOTE_CONTENT_PLACEHOLDER}`"
                )));
            }
        }
        Ok(())
    }

    pub fn editor_limits(&self) -> EditorLimits {
        EditorLimits {
            title_max_chars: self.editor.title_max_chars,
            objective_max_chars: self.editor.objective_max_chars,
            max_images: self.editor.max_images,
            max_image_bytes: self.editor.max_image_bytes,
        }
    }

    pub fn prompt_template(&self) -> PromptTemplate {
        self.ai
            .prompt_template
            .clone()
            .and_then(PromptTemplate::new)
            .unwrap_or_default()
    }

    /// Model settings with the API key resolved from the environment.
    pub fn model_settings(&self) -> ModelSettings {
        let api_key = std::env::var(&self.ai.api_key_env)
            .ok()
            .filter(|value| !value.trim().is_empty());
        ModelSettings {
            base_url: self.ai.base_url.clone(),
            model: self.ai.model.clone(),
            api_key,
            api_key_env: self.ai.api_key_env.clone(),
            temperature: self.ai.temperature,
            timeout: Duration::from_secs(self.ai.timeout_secs),
        }
    }
}

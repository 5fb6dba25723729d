use std::fmt;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_BACKEND: &str = "ollama";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LANGUAGE: &str = "en";

pub const BACKEND_VAR: &str = "LLM_BACKEND";
pub const MODEL_VAR: &str = "LLM_MODEL";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OLLAMA_URL_VAR: &str = "OLLAMA_URL";
pub const OPENAI_URL_VAR: &str = "OPENAI_URL";
pub const TRANSCRIPT_DIR_VAR: &str = "TRANSCRIPT_DIR";

/// Optional on-disk defaults, overridden by the environment
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub ollama_url: Option<String>,
    pub openai_url: Option<String>,
    pub transcript_dir: Option<PathBuf>,
    pub default_languages: Option<Vec<String>>,
    pub default_translate: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
            toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// The summarization backend, carrying what each transport needs
#[derive(Clone, PartialEq, Eq)]
pub enum Backend {
    /// Local Ollama-style `/api/generate` endpoint
    Ollama { endpoint: String },
    /// Hosted OpenAI-style chat completion API
    OpenAi { endpoint: String, api_key: Option<String> },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Ollama { .. } => "ollama",
            Backend::OpenAi { .. } => "openai",
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Ollama { endpoint } => f.debug_struct("Ollama").field("endpoint", endpoint).finish(),
            Backend::OpenAi { endpoint, api_key } => f
                .debug_struct("OpenAi")
                .field("endpoint", endpoint)
                .field("api_key", &api_key.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Process-wide settings, resolved once at startup and never mutated
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: Backend,
    pub model: String,
    pub languages: Vec<String>,
    pub translate: String,
    pub transcript_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from the process environment layered over `config`
    pub fn from_env(config: &Config) -> Result<Self> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an explicit variable lookup.
    ///
    /// Environment values win over the config file, which wins over the
    /// built-in defaults. Empty values count as unset.
    pub fn resolve<F>(config: &Config, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let selector = var(BACKEND_VAR)
            .or_else(|| config.backend.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

        let backend = match selector.to_lowercase().as_str() {
            "ollama" => Backend::Ollama {
                endpoint: var(OLLAMA_URL_VAR)
                    .or_else(|| config.ollama_url.clone())
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            },
            "openai" => Backend::OpenAi {
                endpoint: var(OPENAI_URL_VAR)
                    .or_else(|| config.openai_url.clone())
                    .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
                api_key: var(OPENAI_KEY_VAR),
            },
            _ => return Err(Error::UnsupportedBackend(selector)),
        };

        let model = var(MODEL_VAR)
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let languages = config
            .default_languages
            .clone()
            .filter(|langs| !langs.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_LANGUAGE.to_string()]);

        let translate = config
            .default_translate
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let transcript_dir = var(TRANSCRIPT_DIR_VAR)
            .map(PathBuf::from)
            .or_else(|| config.transcript_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Settings {
            backend,
            model,
            languages,
            translate,
            transcript_dir,
        })
    }
}

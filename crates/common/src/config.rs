use crate::error::SemsortError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which service computes embeddings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Hosted Hugging Face inference API
    HuggingFace,
    /// Locally served Ollama model
    Ollama,
}

impl FromStr for EmbeddingBackend {
    type Err = SemsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" | "local" => Ok(Self::Ollama),
            other => Err(SemsortError::config(format!(
                "Unknown embedding backend '{}' (expected huggingface or ollama)",
                other
            ))),
        }
    }
}

/// Where entries are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Supabase table through PostgREST
    Supabase,
    /// Local JSON file
    Json,
}

impl FromStr for StoreBackend {
    type Err = SemsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(Self::Supabase),
            "json" | "file" => Ok(Self::Json),
            other => Err(SemsortError::config(format!(
                "Unknown store backend '{}' (expected supabase or json)",
                other
            ))),
        }
    }
}

/// SemSort application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Embedding backend
    pub embedding_backend: EmbeddingBackend,

    /// Hugging Face API token
    pub hf_api_token: Option<String>,

    /// Hugging Face sentence-transformer model id
    pub hf_model_id: String,

    /// Hugging Face inference API base URL
    pub hf_base_url: String,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Ollama embedding model name
    pub embedding_model: String,

    /// Attempts per embedding call (1 = no retry)
    pub embed_max_attempts: u32,

    /// Persistence backend
    pub store_backend: StoreBackend,

    /// Supabase project URL
    pub supabase_url: Option<String>,

    /// Supabase API key
    pub supabase_key: Option<String>,

    /// Supabase table holding entries
    pub supabase_table: String,

    /// JSON store file path
    pub data_path: PathBuf,

    /// Sentence template for composed submissions
    pub compose_template: String,

    /// Timeout for outgoing HTTP requests, in seconds
    pub http_timeout_secs: u64,
}

pub const DEFAULT_HF_MODEL_ID: &str = "sentence-transformers/paraphrase-MiniLM-L3-v2";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_COMPOSE_TEMPLATE: &str = "{first} {second}";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 5000,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
            embedding_backend: EmbeddingBackend::HuggingFace,
            hf_api_token: None,
            hf_model_id: DEFAULT_HF_MODEL_ID.to_string(),
            hf_base_url: DEFAULT_HF_BASE_URL.to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embed_max_attempts: 1,
            store_backend: StoreBackend::Supabase,
            supabase_url: None,
            supabase_key: None,
            supabase_table: "entries".to_string(),
            data_path: PathBuf::from("./data/entries.json"),
            compose_template: DEFAULT_COMPOSE_TEMPLATE.to_string(),
            http_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// `.env` is not read here; the binary loads it once before calling this.
    pub fn from_env() -> Result<Self, SemsortError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unset keys fall back to [`AppConfig::default`]. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SemsortError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: match get("SERVER_PORT") {
                Some(v) => parse_number("SERVER_PORT", &v)?,
                None => defaults.server_port,
            },
            log_dir: get("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            embedding_backend: match get("EMBEDDING_BACKEND") {
                Some(v) => v.parse()?,
                None => defaults.embedding_backend,
            },
            hf_api_token: get("HF_API_TOKEN"),
            hf_model_id: get("HF_MODEL_ID").unwrap_or(defaults.hf_model_id),
            hf_base_url: get("HF_BASE_URL").unwrap_or(defaults.hf_base_url),
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            embedding_model: get("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embed_max_attempts: match get("EMBED_MAX_ATTEMPTS") {
                Some(v) => parse_number("EMBED_MAX_ATTEMPTS", &v)?,
                None => defaults.embed_max_attempts,
            },
            store_backend: match get("STORE_BACKEND") {
                Some(v) => v.parse()?,
                None => defaults.store_backend,
            },
            supabase_url: get("SUPABASE_URL"),
            supabase_key: get("SUPABASE_KEY"),
            supabase_table: get("SUPABASE_TABLE").unwrap_or(defaults.supabase_table),
            data_path: get("DATA_PATH").map(PathBuf::from).unwrap_or(defaults.data_path),
            compose_template: get("COMPOSE_TEMPLATE").unwrap_or(defaults.compose_template),
            http_timeout_secs: match get("HTTP_TIMEOUT_SECS") {
                Some(v) => parse_number("HTTP_TIMEOUT_SECS", &v)?,
                None => defaults.http_timeout_secs,
            },
        };

        Ok(config)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), SemsortError> {
        let mut dirs = vec![self.log_dir.clone()];
        if self.store_backend == StoreBackend::Json {
            if let Some(parent) = self.data_path.parent() {
                if !parent.as_os_str().is_empty() {
                    dirs.push(parent.to_path_buf());
                }
            }
        }

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(&dir).map_err(|e| {
                    SemsortError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Name of the embedding model in use
    pub fn active_embedding_model(&self) -> &str {
        match self.embedding_backend {
            EmbeddingBackend::HuggingFace => &self.hf_model_id,
            EmbeddingBackend::Ollama => &self.embedding_model,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SemsortError> {
        if self.server_port == 0 {
            return Err(SemsortError::config("Server port cannot be 0"));
        }

        if self.embed_max_attempts == 0 {
            return Err(SemsortError::config("EMBED_MAX_ATTEMPTS must be at least 1"));
        }

        match self.embedding_backend {
            EmbeddingBackend::HuggingFace => {
                if self.hf_api_token.is_none() {
                    return Err(SemsortError::config(
                        "HF_API_TOKEN is required for the huggingface embedding backend",
                    ));
                }
                if self.hf_model_id.is_empty() {
                    return Err(SemsortError::config("HF_MODEL_ID cannot be empty"));
                }
                check_http_url("HF_BASE_URL", &self.hf_base_url)?;
            }
            EmbeddingBackend::Ollama => {
                if self.embedding_model.is_empty() {
                    return Err(SemsortError::config("EMBEDDING_MODEL cannot be empty"));
                }
                check_http_url("OLLAMA_BASE_URL", &self.ollama_base_url)?;
            }
        }

        if self.store_backend == StoreBackend::Supabase {
            match (&self.supabase_url, &self.supabase_key) {
                (Some(url), Some(_)) => check_http_url("SUPABASE_URL", url)?,
                _ => {
                    return Err(SemsortError::config(
                        "SUPABASE_URL and SUPABASE_KEY are required for the supabase store",
                    ))
                }
            }
        }

        if !self.compose_template.contains("{first}") || !self.compose_template.contains("{second}") {
            return Err(SemsortError::config(
                "COMPOSE_TEMPLATE must contain both {first} and {second}",
            ));
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, SemsortError> {
    value
        .trim()
        .parse()
        .map_err(|_| SemsortError::config(format!("{} must be a number, got '{}'", key, value)))
}

fn check_http_url(key: &str, url: &str) -> Result<(), SemsortError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(SemsortError::config(format!(
            "{} must start with http:// or https://",
            key
        )));
    }
    Ok(())
}

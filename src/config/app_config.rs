use serde::Deserialize;

use crate::domain::{RetryConfig, WorkflowConfig, WorkflowError};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub web_search: WebSearchConfig,
    pub workflow: WorkflowConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

/// Chat model endpoint (any OpenAI-compatible server)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

/// Query embedding endpoint, falls back to the chat endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreBackend {
    #[default]
    Qdrant,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorStoreBackend,
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub content_key: String,
    pub vector_name: Option<String>,
    pub top_k: usize,
    /// Paragraph file loaded by the in-memory backend
    pub documents_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebSearchBackend {
    #[default]
    DuckDuckGo,
    Tavily,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub provider: WebSearchBackend,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "smollm2".to_string(),
            api_key: "ollama".to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "smollm2".to_string(),
            api_key: None,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            url: "http://localhost:6333".to_string(),
            collection: "SCKS".to_string(),
            api_key: None,
            content_key: "page_content".to_string(),
            vector_name: None,
            top_k: 3,
            documents_path: None,
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            provider: WebSearchBackend::default(),
            api_key: None,
            base_url: None,
            max_results: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl EmbeddingConfig {
    /// Embedding endpoint, defaulting to the chat endpoint
    pub fn resolved_base_url<'a>(&'a self, llm: &'a LlmConfig) -> &'a str {
        self.base_url.as_deref().unwrap_or(&llm.base_url)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(config::Environment::with_prefix("APP"))
    }

    fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment.separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// Check the values the workflow depends on
    pub fn validate(&self) -> Result<(), WorkflowError> {
        self.workflow.validate()?;

        if self.vector_store.top_k == 0 {
            return Err(WorkflowError::configuration("vector_store.top_k must be at least 1"));
        }
        if self.web_search.max_results == 0 {
            return Err(WorkflowError::configuration(
                "web_search.max_results must be at least 1",
            ));
        }
        if self.web_search.provider == WebSearchBackend::Tavily
            && self.web_search.api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(WorkflowError::configuration(
                "web_search.api_key is required for tavily",
            ));
        }

        Ok(())
    }
}

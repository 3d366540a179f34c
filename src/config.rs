use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub model: String,
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,
}

fn default_llm_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.2".to_string()
}

fn default_extraction_model() -> String {
    "etalab-ia/camembert-base-squadFR-fquad-piaf".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of FAQ entries retrieved as context on the service path
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    pub faq_path: String,
}

fn default_top_k() -> usize {
    6
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub golden_set_path: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Retrieval depth for the RAG benchmark runner
    #[serde(default = "default_bench_top_k")]
    pub top_k: usize,
    /// Inter-row pause in seconds, purely to respect backend rate limits
    #[serde(default)]
    pub delay_seconds: f64,
    /// Run-level complexity constant applied to every row of a run
    #[serde(default = "default_complexite")]
    pub complexite_score: f64,
}

fn default_output_dir() -> String {
    "data".to_string()
}

fn default_bench_top_k() -> usize {
    5
}

fn default_complexite() -> f64 {
    1.0
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            golden_set_path: "data/golden-set.json".to_string(),
            output_dir: default_output_dir(),
            top_k: default_bench_top_k(),
            delay_seconds: 0.0,
            complexite_score: default_complexite(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::FaqRagError::Io)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(crate::FaqRagError::TomlParsing)?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::FaqRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding endpoint
    pub fn embedding_endpoint(&self) -> &str {
        &self.embeddings.endpoint
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get extraction model name
    pub fn extraction_model(&self) -> &str {
        &self.llm.extraction_model
    }

    /// Get FAQ data path
    pub fn faq_path(&self) -> &str {
        &self.retrieval.faq_path
    }

    /// Get retrieval depth for the answering service
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Resolve the inference API token: config value first, then HF_TOKEN
    /// from the environment. Missing token is fatal at startup.
    pub fn resolve_api_token(&self) -> crate::Result<String> {
        if let Some(token) = &self.llm.api_token {
            if !token.is_empty() {
                return Ok(token.clone());
            }
        }
        match std::env::var("HF_TOKEN") {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(crate::FaqRagError::Config(
                "HF_TOKEN missing from environment and config".to_string(),
            )),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                enable_cors: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            embeddings: EmbeddingsConfig {
                model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
                endpoint: "https://router.huggingface.co/hf-inference".to_string(),
                api_token: None,
            },
            llm: LlmConfig {
                endpoint: "https://router.huggingface.co/v1".to_string(),
                api_token: None,
                model: default_llm_model(),
                extraction_model: default_extraction_model(),
            },
            retrieval: RetrievalConfig {
                top_k: default_top_k(),
                faq_path: "data/faq-base.json".to_string(),
            },
            benchmark: BenchmarkConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.top_k(), 6);
        assert_eq!(config.benchmark.top_k, 5);
        assert_eq!(config.embedding_model(), "sentence-transformers/all-MiniLM-L6-v2");
        assert!((config.benchmark.complexite_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[logging]
level = "debug"
backtrace = false

[embeddings]
model = "sentence-transformers/all-MiniLM-L6-v2"
endpoint = "http://localhost:8080"

[llm]
endpoint = "http://localhost:8081"
api_token = "test-token"

[retrieval]
faq_path = "data/faq-base.json"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        // Defaults fill the omitted fields
        assert_eq!(config.top_k(), 6);
        assert_eq!(config.llm_model(), "mistralai/Mistral-7B-Instruct-v0.2");
        assert_eq!(config.resolve_api_token().unwrap(), "test-token");
    }

    #[test]
    fn test_from_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not valid toml [[[").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqRagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Embedding backend error: {0}")]
    EmbeddingBackend(String),

    #[error("Generation backend error: {0}")]
    GenerationBackend(String),

    #[error("Extraction backend error: {0}")]
    ExtractionBackend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FaqRagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FaqRagError::Config("HF token missing".to_string());
        assert_eq!(err.to_string(), "Configuration error: HF token missing");

        let err = FaqRagError::EmbeddingBackend("timeout".to_string());
        assert_eq!(err.to_string(), "Embedding backend error: timeout");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FaqRagError = io.into();
        assert!(matches!(err, FaqRagError::Io(_)));
    }
}

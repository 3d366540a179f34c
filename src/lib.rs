pub mod api;
pub mod bench;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod loader;
pub mod logging;
pub mod models;
pub mod rag;

pub use config::AppConfig;
pub use errors::*;

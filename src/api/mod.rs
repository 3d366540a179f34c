//! HTTP surface: pass-through adapters onto the core pipeline

pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod types;

pub use server::serve_api;

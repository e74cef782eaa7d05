//! Résumé Analyzer Service
//!
//! Accepts a PDF résumé upload, extracts its text and returns the analysis
//! streamed back from an OpenAI-compatible chat completions endpoint.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use services::MODEL;
pub use state::AppState;

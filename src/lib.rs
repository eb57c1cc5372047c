//! MindSpace batch jobs.
//!
//! Two standalone jobs over the app's Firestore database: LLM moderation of
//! user posts (`moderate-posts`) and weekly journal summaries
//! (`weekly-summary`). Each job is a single sequential pass — read records,
//! call the generative service, write the result back.

pub mod config;
pub mod firestore;
pub mod llm;
pub mod models;
pub mod moderation;
pub mod store;
pub mod summary;

use tracing_subscriber::EnvFilter;

/// Initialize line-oriented operator logging to stdout.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

pub mod gemini;
pub mod types;

pub use gemini::GeminiClient;
pub use types::{MockTextGenerator, TextGenerator};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("cannot reach the generative service at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("generative service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("no text in the response candidates")]
    EmptyCompletion,

    #[error("response parsing error: {0}")]
    ResponseParsing(String),
}

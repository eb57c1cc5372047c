pub mod auth;
pub mod client;
pub mod value;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::{Document, FirestoreClient};
pub use value::{Fields, Value};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirestoreError {
    #[error("cannot reach Firestore at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Firestore returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed Firestore response: {0}")]
    Decode(String),

    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

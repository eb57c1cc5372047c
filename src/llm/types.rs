use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::LlmError;

/// Generative-text service abstraction (allows mocking).
///
/// One blocking request per call: a prompt string in, the raw completion out.
pub trait TextGenerator {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Mock generator for testing — returns a configurable completion or error,
/// and counts how many times it was called.
pub struct MockTextGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockTextGenerator {
    pub fn new(completion: &str) -> Self {
        Self {
            reply: Ok(completion.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of generate calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt of the most recent call, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().expect("mock lock poisoned").clone()
    }
}

impl TextGenerator for MockTextGenerator {
    fn generate(&self, _model: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().expect("mock lock poisoned") = Some(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(LlmError::HttpClient(message.clone())),
        }
    }
}

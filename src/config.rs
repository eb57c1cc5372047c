//! Runtime configuration for the batch jobs.
//!
//! Everything comes from the environment at startup; each job receives an
//! explicit [`JobConfig`], so there is no module-level state to share.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(String),

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: String, value: String },
}

/// What a failed journal read means for the summary job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFailurePolicy {
    /// Treat the user as having an empty week.
    #[default]
    DefaultEmpty,
    /// Propagate the error and end the run.
    Fail,
}

impl ReadFailurePolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "default-empty" => Some(Self::DefaultEmpty),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobConfig {
    pub gemini_api_key: String,
    pub credentials_path: PathBuf,
    /// Defaults to the service-account key's project when unset.
    pub project_id: Option<String>,
    pub posts_collection: String,
    pub flagged_collection: String,
    pub users_collection: String,
    pub moderation_model: String,
    pub summary_model: String,
    pub http_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    pub journal_read_failure: ReadFailurePolicy,
}

impl JobConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; tests pass a map instead of touching
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingVar(var.to_string()))
        };
        let or_default = |var: &str, default: &str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            gemini_api_key: required("GEMINI_API_KEY")?,
            credentials_path: PathBuf::from(required("GOOGLE_APPLICATION_CREDENTIALS")?),
            project_id: lookup("FIRESTORE_PROJECT_ID").filter(|value| !value.is_empty()),
            posts_collection: or_default("POSTS_COLLECTION", "posts"),
            flagged_collection: or_default("FLAGGED_COLLECTION", "flagged"),
            users_collection: or_default("USERS_COLLECTION", "users"),
            moderation_model: or_default("MODERATION_MODEL", "gemini-2.5-flash"),
            summary_model: or_default("SUMMARY_MODEL", "gemini-1.5-flash"),
            http_timeout_secs: parse_secs(&lookup, "HTTP_TIMEOUT_SECS", 120)?,
            llm_timeout_secs: parse_secs(&lookup, "LLM_TIMEOUT_SECS", 300)?,
            journal_read_failure: match lookup("JOURNAL_READ_FAILURE") {
                None => ReadFailurePolicy::default(),
                Some(raw) => ReadFailurePolicy::parse(&raw).ok_or(ConfigError::InvalidValue {
                    var: "JOURNAL_READ_FAILURE".into(),
                    value: raw,
                })?,
            },
        })
    }
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}

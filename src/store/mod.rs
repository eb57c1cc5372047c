//! Domain-facing repositories over the raw Firestore client.
//!
//! The jobs are written against these traits; tests substitute in-memory
//! implementations.

pub mod posts;
pub mod users;

pub use posts::FirestorePostStore;
pub use users::FirestoreUserStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::firestore::FirestoreError;
use crate::models::{JournalEntry, Post, User, Verdict, WeeklySummary};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Firestore(#[from] FirestoreError),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Post collection operations used by the moderation job.
pub trait PostStore {
    /// Every post where `llmVerified` is not strictly `true`.
    fn unverified(&self) -> Result<Vec<Post>, StoreError>;

    /// Clean path: set `llmVerified = true` and attach the verdict in place.
    fn mark_verified(&self, id: &str, verdict: &Verdict) -> Result<(), StoreError>;

    /// Flagged path: atomically copy the post (plus verdict and timestamp)
    /// into the flagged collection and delete the original.
    fn move_to_flagged(
        &self,
        post: &Post,
        verdict: &Verdict,
        verified_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// User collection operations used by the weekly summary job.
pub trait UserStore {
    fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Point read of one user's journal entries.
    fn journal(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError>;

    /// Replace the user's `weeklySummary` field.
    fn write_weekly_summary(
        &self,
        user_id: &str,
        summary: &WeeklySummary,
    ) -> Result<(), StoreError>;
}

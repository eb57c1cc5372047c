//! The weekly summary job: for every user, summarize the trailing week of
//! journal entries and write the result back onto the user document.

use chrono::Utc;

use super::prompt::build_summary_prompt;
use super::window::weekly_entries;
use crate::config::ReadFailurePolicy;
use crate::llm::TextGenerator;
use crate::models::{JournalEntry, WeeklySummary};
use crate::store::{StoreError, UserStore};

pub const NO_ENTRIES_MESSAGE: &str = "No journal entries from the last week to summarize.";

pub struct SummaryJob<'a> {
    users: &'a dyn UserStore,
    llm: &'a dyn TextGenerator,
    model: &'a str,
    read_failure: ReadFailurePolicy,
}

impl<'a> SummaryJob<'a> {
    pub fn new(
        users: &'a dyn UserStore,
        llm: &'a dyn TextGenerator,
        model: &'a str,
        read_failure: ReadFailurePolicy,
    ) -> Self {
        Self {
            users,
            llm,
            model,
            read_failure,
        }
    }

    /// One sequential pass over every user. Every processed user gets a fresh
    /// `weeklySummary`, including the empty-week and model-failure cases; a
    /// store write failure ends the run.
    pub fn run(&self) -> Result<usize, StoreError> {
        tracing::info!("Fetching all users");
        let users = self.users.users()?;

        let mut count = 0;
        for user in &users {
            count += 1;
            tracing::info!(user = %user.id, "Processing user");

            let journal = match self.users.journal(&user.id) {
                Ok(journal) => journal,
                Err(e) => match self.read_failure {
                    ReadFailurePolicy::DefaultEmpty => {
                        tracing::warn!(user = %user.id, error = %e, "Journal read failed, treating as empty week");
                        Vec::new()
                    }
                    ReadFailurePolicy::Fail => return Err(e),
                },
            };

            let weekly = weekly_entries(&journal, Utc::now());
            let summary_text = self.summarize(&user.id, &weekly);
            tracing::info!(user = %user.id, "Summary generated");

            self.users.write_weekly_summary(
                &user.id,
                &WeeklySummary {
                    summary_text,
                    generated_at: Utc::now(),
                },
            )?;
            tracing::info!(user = %user.id, "Summary saved");
        }

        tracing::info!(count, "All user summaries have been updated");
        Ok(count)
    }

    /// Never fails: an empty week gets the fixed message without a model
    /// call, and a model failure becomes an inline error text.
    fn summarize(&self, user_id: &str, entries: &[JournalEntry]) -> String {
        if entries.is_empty() {
            return NO_ENTRIES_MESSAGE.to_string();
        }

        let prompt = build_summary_prompt(entries);
        match self.llm.generate(self.model, &prompt) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(user = %user_id, error = %e, "Summary generation failed");
                format!("Error generating summary: {e}")
            }
        }
    }
}

//! The moderation job: scan unverified posts, classify each with the model,
//! and apply exactly one terminal transition per post.

use chrono::Utc;

use super::parser::parse_verdict;
use super::prompt::build_moderation_prompt;
use crate::llm::TextGenerator;
use crate::models::{Post, Verdict};
use crate::store::{PostStore, StoreError};

pub struct ModerationJob<'a> {
    posts: &'a dyn PostStore,
    llm: &'a dyn TextGenerator,
    model: &'a str,
}

impl<'a> ModerationJob<'a> {
    pub fn new(posts: &'a dyn PostStore, llm: &'a dyn TextGenerator, model: &'a str) -> Self {
        Self { posts, llm, model }
    }

    /// One sequential pass over every unverified post. Classification
    /// failures fail closed per post; a store failure ends the run with
    /// prior transitions already persisted.
    pub fn run(&self) -> Result<usize, StoreError> {
        tracing::info!("Fetching unverified posts from the posts collection");
        let posts = self.posts.unverified()?;

        let mut count = 0;
        for post in &posts {
            count += 1;
            tracing::info!(post_id = %post.id(), "Processing post");

            let verdict = self.classify(post);
            tracing::info!(post_id = %post.id(), %verdict, "LLM verification");

            if verdict.is_flagged {
                tracing::info!(post_id = %post.id(), reason = %verdict.reason, "Post flagged");
                self.posts.move_to_flagged(post, &verdict, Utc::now())?;
                tracing::info!(post_id = %post.id(), "Moved post to the flagged collection");
            } else {
                self.posts.mark_verified(post.id(), &verdict)?;
                tracing::info!(post_id = %post.id(), "Post is clean and marked as verified");
            }
        }

        if count == 0 {
            tracing::info!("No new posts to moderate");
        } else {
            tracing::info!(count, "Moderation complete");
        }
        Ok(count)
    }

    /// Never fails: any model or parse failure becomes the sentinel verdict.
    fn classify(&self, post: &Post) -> Verdict {
        let prompt = build_moderation_prompt(post.title(), post.content());
        match self.llm.generate(self.model, &prompt) {
            Ok(completion) => parse_verdict(&completion).unwrap_or_else(|e| {
                tracing::warn!(post_id = %post.id(), error = %e, "Malformed verdict, failing closed");
                Verdict::verification_error()
            }),
            Err(e) => {
                tracing::warn!(post_id = %post.id(), error = %e, "Model call failed, failing closed");
                Verdict::verification_error()
            }
        }
    }
}

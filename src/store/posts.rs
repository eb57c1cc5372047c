use chrono::{DateTime, Utc};

use super::{PostStore, StoreError};
use crate::firestore::{Fields, FirestoreClient, Value};
use crate::models::{Post, Verdict};

/// Post repository backed by two Firestore collections: the live posts and
/// the flagged copies.
pub struct FirestorePostStore {
    client: FirestoreClient,
    posts_collection: String,
    flagged_collection: String,
}

impl FirestorePostStore {
    pub fn new(client: FirestoreClient, posts_collection: &str, flagged_collection: &str) -> Self {
        Self {
            client,
            posts_collection: posts_collection.to_string(),
            flagged_collection: flagged_collection.to_string(),
        }
    }
}

impl PostStore for FirestorePostStore {
    fn unverified(&self) -> Result<Vec<Post>, StoreError> {
        let documents = self.client.query_not_equal(
            &self.posts_collection,
            "llmVerified",
            &Value::Boolean(true),
        )?;
        Ok(documents.iter().map(Post::from_document).collect())
    }

    fn mark_verified(&self, id: &str, verdict: &Verdict) -> Result<(), StoreError> {
        self.client
            .update(&self.posts_collection, id, &verified_fields(verdict))?;
        Ok(())
    }

    fn move_to_flagged(
        &self,
        post: &Post,
        verdict: &Verdict,
        verified_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let fields = post.flagged_fields(verdict, verified_at);
        self.client.commit_set_and_delete(
            &self.flagged_collection,
            post.id(),
            &fields,
            &self.posts_collection,
            post.id(),
        )?;
        Ok(())
    }
}

fn verified_fields(verdict: &Verdict) -> Fields {
    let mut fields = Fields::new();
    fields.insert("llmVerified".into(), Value::Boolean(true));
    fields.insert("llmVerification".into(), verdict.to_value());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlagReason, Severity};

    #[test]
    fn verified_fields_mask_covers_flag_and_verdict() {
        let verdict = Verdict {
            is_flagged: false,
            reason: FlagReason::None,
            severity: Severity::None,
        };
        let fields = verified_fields(&verdict);

        assert_eq!(fields["llmVerified"], Value::Boolean(true));
        let verification = fields["llmVerification"].as_map().unwrap();
        assert_eq!(verification["isFlagged"], Value::Boolean(false));
        assert_eq!(verification["reason"], Value::Str("None".into()));
    }
}

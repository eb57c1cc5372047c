use super::{StoreError, UserStore};
use crate::firestore::{Fields, FirestoreClient};
use crate::models::{JournalEntry, User, WeeklySummary};

/// User repository backed by the users collection.
pub struct FirestoreUserStore {
    client: FirestoreClient,
    users_collection: String,
}

impl FirestoreUserStore {
    pub fn new(client: FirestoreClient, users_collection: &str) -> Self {
        Self {
            client,
            users_collection: users_collection.to_string(),
        }
    }
}

impl UserStore for FirestoreUserStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        let documents = self.client.list_documents(&self.users_collection)?;
        Ok(documents.iter().map(User::from_document).collect())
    }

    fn journal(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError> {
        let document = self.client.get(&self.users_collection, user_id)?;
        Ok(document
            .map(|doc| User::from_document(&doc).journal)
            .unwrap_or_default())
    }

    fn write_weekly_summary(
        &self,
        user_id: &str,
        summary: &WeeklySummary,
    ) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("weeklySummary".into(), summary.to_value());
        self.client.update(&self.users_collection, user_id, &fields)?;
        Ok(())
    }
}

//! Blocking HTTP client for the Firestore REST v1 API.
//!
//! Covers exactly the operations the batch jobs use: an inequality-filtered
//! collection query, a paginated collection listing, point reads, full-document
//! sets, field-masked updates, deletes, and an atomic two-write commit.

use serde_json::json;

use super::auth::{ServiceAccountKey, TokenProvider};
use super::value::{fields_from_json, fields_to_json, Fields, Value};
use super::FirestoreError;

const BASE_URL: &str = "https://firestore.googleapis.com/v1";
const LIST_PAGE_SIZE: u32 = 300;

/// A Firestore document: full resource name plus decoded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub fields: Fields,
}

impl Document {
    /// The document id (last segment of the resource name).
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn from_json(value: &serde_json::Value) -> Result<Self, FirestoreError> {
        let name = value
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| FirestoreError::Decode("document has no name".into()))?
            .to_string();
        let fields = match value.get("fields").and_then(|f| f.as_object()) {
            Some(map) => fields_from_json(map)?,
            None => Fields::new(),
        };
        Ok(Self { name, fields })
    }
}

pub struct FirestoreClient {
    http: reqwest::blocking::Client,
    auth: TokenProvider,
    project_id: String,
}

impl FirestoreClient {
    pub fn new(
        key: ServiceAccountKey,
        project_id: String,
        timeout_secs: u64,
    ) -> Result<Self, FirestoreError> {
        let auth = TokenProvider::new(key, timeout_secs)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            http,
            auth,
            project_id,
        })
    }

    /// Run a `field != value` query over a collection.
    pub fn query_not_equal(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}:runQuery", self.documents_url());
        let body = not_equal_query_body(collection, field, value);
        let response = self.check(
            self.http
                .post(&url)
                .bearer_auth(self.auth.bearer_token()?)
                .json(&body)
                .send()
                .map_err(transport_error)?,
        )?;

        let parsed: serde_json::Value = response
            .json()
            .map_err(|e| FirestoreError::Decode(format!("runQuery response: {e}")))?;
        parse_query_results(&parsed)
    }

    /// Fetch every document in a collection, following pagination.
    pub fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}/{collection}", self.documents_url());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize".to_string(), LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken".to_string(), token.clone()));
            }
            let response = self.check(
                self.http
                    .get(&url)
                    .bearer_auth(self.auth.bearer_token()?)
                    .query(&query)
                    .send()
                    .map_err(transport_error)?,
            )?;
            let parsed: serde_json::Value = response
                .json()
                .map_err(|e| FirestoreError::Decode(format!("list response: {e}")))?;

            let (mut page, next) = parse_list_response(&parsed)?;
            documents.append(&mut page);
            match next {
                Some(token) => page_token = Some(token),
                None => return Ok(documents),
            }
        }
    }

    /// Point read. `Ok(None)` when the document does not exist.
    pub fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, FirestoreError> {
        let response = self
            .http
            .get(self.document_url(collection, id))
            .bearer_auth(self.auth.bearer_token()?)
            .send()
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.check(response)?;
        let parsed: serde_json::Value = response
            .json()
            .map_err(|e| FirestoreError::Decode(format!("get response: {e}")))?;
        Document::from_json(&parsed).map(Some)
    }

    /// Create or fully replace a document.
    pub fn set(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), FirestoreError> {
        self.check(
            self.http
                .patch(self.document_url(collection, id))
                .bearer_auth(self.auth.bearer_token()?)
                .json(&json!({ "fields": fields_to_json(fields) }))
                .send()
                .map_err(transport_error)?,
        )?;
        Ok(())
    }

    /// Update only the given fields, leaving the rest of the document intact.
    pub fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> Result<(), FirestoreError> {
        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();
        self.check(
            self.http
                .patch(self.document_url(collection, id))
                .bearer_auth(self.auth.bearer_token()?)
                .query(&mask)
                .json(&json!({ "fields": fields_to_json(fields) }))
                .send()
                .map_err(transport_error)?,
        )?;
        Ok(())
    }

    pub fn delete(&self, collection: &str, id: &str) -> Result<(), FirestoreError> {
        self.check(
            self.http
                .delete(self.document_url(collection, id))
                .bearer_auth(self.auth.bearer_token()?)
                .send()
                .map_err(transport_error)?,
        )?;
        Ok(())
    }

    /// Write one document and delete another in a single atomic commit.
    pub fn commit_set_and_delete(
        &self,
        set_collection: &str,
        set_id: &str,
        fields: &Fields,
        delete_collection: &str,
        delete_id: &str,
    ) -> Result<(), FirestoreError> {
        let url = format!("{}:commit", self.documents_url());
        let body = commit_body(
            &self.document_name(set_collection, set_id),
            fields,
            &self.document_name(delete_collection, delete_id),
        );
        self.check(
            self.http
                .post(&url)
                .bearer_auth(self.auth.bearer_token()?)
                .json(&body)
                .send()
                .map_err(transport_error)?,
        )?;
        Ok(())
    }

    /// Full resource name for a document, as used in commit writes.
    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{collection}/{id}",
            self.project_id
        )
    }

    fn documents_url(&self) -> String {
        format!(
            "{BASE_URL}/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.documents_url())
    }

    fn check(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, FirestoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(FirestoreError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn transport_error(e: reqwest::Error) -> FirestoreError {
    if e.is_connect() {
        FirestoreError::Connection(BASE_URL.to_string())
    } else if e.is_timeout() {
        FirestoreError::HttpClient(format!("request timed out: {e}"))
    } else {
        FirestoreError::HttpClient(e.to_string())
    }
}

fn not_equal_query_body(collection: &str, field: &str, value: &Value) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "NOT_EQUAL",
                    "value": value.to_json()
                }
            }
        }
    })
}

fn commit_body(set_name: &str, fields: &Fields, delete_name: &str) -> serde_json::Value {
    json!({
        "writes": [
            { "update": { "name": set_name, "fields": fields_to_json(fields) } },
            { "delete": delete_name }
        ]
    })
}

/// runQuery streams one object per result; trailing entries may carry only a
/// `readTime` and no document.
fn parse_query_results(body: &serde_json::Value) -> Result<Vec<Document>, FirestoreError> {
    let entries = body
        .as_array()
        .ok_or_else(|| FirestoreError::Decode("runQuery response is not an array".into()))?;
    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(Document::from_json)
        .collect()
}

fn parse_list_response(
    body: &serde_json::Value,
) -> Result<(Vec<Document>, Option<String>), FirestoreError> {
    let documents = match body.get("documents").and_then(|d| d.as_array()) {
        Some(items) => items
            .iter()
            .map(Document::from_json)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let next = body
        .get("nextPageToken")
        .and_then(|t| t.as_str())
        .map(str::to_string);
    Ok((documents, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_is_last_name_segment() {
        let doc = Document {
            name: "projects/p/databases/(default)/documents/posts/abc123".into(),
            fields: Fields::new(),
        };
        assert_eq!(doc.id(), "abc123");
    }

    #[test]
    fn not_equal_query_body_shape() {
        let body = not_equal_query_body("posts", "llmVerified", &Value::Boolean(true));
        assert_eq!(
            body,
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "posts" }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": "llmVerified" },
                            "op": "NOT_EQUAL",
                            "value": { "booleanValue": true }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn commit_body_sets_then_deletes() {
        let mut fields = Fields::new();
        fields.insert("title".into(), Value::Str("hi".into()));
        let body = commit_body(
            "projects/p/databases/(default)/documents/flagged/abc",
            &fields,
            "projects/p/databases/(default)/documents/posts/abc",
        );

        let writes = body["writes"].as_array().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(
            writes[0]["update"]["name"],
            "projects/p/databases/(default)/documents/flagged/abc"
        );
        assert_eq!(writes[0]["update"]["fields"]["title"]["stringValue"], "hi");
        assert_eq!(
            writes[1]["delete"],
            "projects/p/databases/(default)/documents/posts/abc"
        );
    }

    #[test]
    fn query_results_skip_documentless_entries() {
        let body = json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/posts/a",
                    "fields": { "title": { "stringValue": "first" } }
                },
                "readTime": "2024-06-01T00:00:00Z"
            },
            { "readTime": "2024-06-01T00:00:00Z" }
        ]);
        let docs = parse_query_results(&body).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id(), "a");
        assert_eq!(docs[0].fields["title"], Value::Str("first".into()));
    }

    #[test]
    fn empty_query_result_is_empty() {
        let docs = parse_query_results(&json!([{ "readTime": "2024-06-01T00:00:00Z" }])).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn list_response_carries_page_token() {
        let body = json!({
            "documents": [
                { "name": "projects/p/databases/(default)/documents/users/a@x.com" }
            ],
            "nextPageToken": "tok"
        });
        let (docs, next) = parse_list_response(&body).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id(), "a@x.com");
        assert!(docs[0].fields.is_empty());
        assert_eq!(next.as_deref(), Some("tok"));
    }

    #[test]
    fn empty_collection_lists_no_documents() {
        let (docs, next) = parse_list_response(&json!({})).unwrap();
        assert!(docs.is_empty());
        assert!(next.is_none());
    }
}

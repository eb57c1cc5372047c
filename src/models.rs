//! Domain types for the MindSpace batch jobs.
//!
//! Posts travel as their full Firestore field map so a flagged move preserves
//! every field the app wrote; typed accessors cover the fields the jobs read.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::firestore::{Document, Fields, Value};

/// A user-generated post pending moderation.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: String,
    fields: Fields,
}

impl Post {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn from_document(doc: &Document) -> Self {
        Self::new(doc.id(), doc.fields.clone())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        self.fields
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn content(&self) -> &str {
        self.fields
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Strictly-true check; an absent or non-boolean field counts as unverified.
    pub fn llm_verified(&self) -> bool {
        self.fields
            .get("llmVerified")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The field map for the flagged copy: every original field plus the
    /// verdict and the verification timestamp.
    pub fn flagged_fields(&self, verdict: &Verdict, verified_at: DateTime<Utc>) -> Fields {
        let mut fields = self.fields.clone();
        fields.insert("llmVerification".into(), verdict.to_value());
        fields.insert("verifiedAt".into(), Value::Timestamp(verified_at));
        fields
    }
}

/// The structured moderation judgment produced per post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_flagged: bool,
    pub reason: FlagReason,
    pub severity: Severity,
}

impl Verdict {
    /// Fail-closed sentinel substituted when classification fails.
    pub fn verification_error() -> Self {
        Self {
            is_flagged: true,
            reason: FlagReason::VerificationError,
            severity: Severity::Unknown,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut fields = Fields::new();
        fields.insert("isFlagged".into(), Value::Boolean(self.is_flagged));
        fields.insert("reason".into(), Value::Str(self.reason.as_str().into()));
        fields.insert(
            "severity".into(),
            Value::Str(self.severity.as_str().into()),
        );
        Value::Map(fields)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "isFlagged={} reason={} severity={}",
            self.is_flagged, self.reason, self.severity
        )
    }
}

/// Community-guideline categories a post can be flagged under. Closed set;
/// completions outside it fail verdict parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagReason {
    #[serde(rename = "Hate Speech")]
    HateSpeech,
    Harassment,
    Spam,
    #[serde(rename = "Self-Harm")]
    SelfHarm,
    Misinformation,
    None,
    #[serde(rename = "Verification Error")]
    VerificationError,
}

impl FlagReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagReason::HateSpeech => "Hate Speech",
            FlagReason::Harassment => "Harassment",
            FlagReason::Spam => "Spam",
            FlagReason::SelfHarm => "Self-Harm",
            FlagReason::Misinformation => "Misinformation",
            FlagReason::None => "None",
            FlagReason::VerificationError => "Verification Error",
        }
    }
}

impl fmt::Display for FlagReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    None,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::None => "None",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal entry, read-only input to summarization.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub date: Option<DateTime<Utc>>,
    pub mood: Option<String>,
    pub entry: String,
}

impl JournalEntry {
    /// Decode one element of the `journal` array. Non-map elements are
    /// dropped; a missing or unparseable date yields `date: None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_map()?;
        Some(Self {
            date: map.get("date").and_then(entry_date),
            mood: map
                .get("mood")
                .and_then(Value::as_str)
                .map(str::to_string),
            entry: map
                .get("entry")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        })
    }
}

/// Coerce a journal entry date. Timestamps pass through; RFC 3339 strings are
/// normalized; naive datetime strings are interpreted as UTC. Anything else
/// is not a date.
fn entry_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(t) => Some(*t),
        Value::Str(s) => {
            if let Ok(aware) = DateTime::parse_from_rfc3339(s) {
                return Some(aware.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            None
        }
        _ => None,
    }
}

/// A user document, keyed by an email-like id.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub journal: Vec<JournalEntry>,
}

impl User {
    pub fn from_document(doc: &Document) -> Self {
        let journal = doc
            .fields
            .get("journal")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(JournalEntry::from_value).collect())
            .unwrap_or_default();
        Self {
            id: doc.id().to_string(),
            journal,
        }
    }
}

/// The weekly summary written back onto the user document.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub summary_text: String,
    pub generated_at: DateTime<Utc>,
}

impl WeeklySummary {
    pub fn to_value(&self) -> Value {
        let mut fields = Fields::new();
        fields.insert(
            "summaryText".into(),
            Value::Str(self.summary_text.clone()),
        );
        fields.insert(
            "generatedAt".into(),
            Value::Timestamp(self.generated_at),
        );
        Value::Map(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_fields() -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".into(), Value::Str("A rough week".into()));
        fields.insert("content".into(), Value::Str("Venting a little.".into()));
        fields.insert("authorId".into(), Value::Str("user-9".into()));
        fields.insert("likes".into(), Value::Integer(4));
        fields
    }

    #[test]
    fn post_accessors_read_expected_fields() {
        let post = Post::new("p1", post_fields());
        assert_eq!(post.id(), "p1");
        assert_eq!(post.title(), "A rough week");
        assert_eq!(post.content(), "Venting a little.");
        assert!(!post.llm_verified());
    }

    #[test]
    fn llm_verified_requires_strict_true() {
        let mut fields = post_fields();
        fields.insert("llmVerified".into(), Value::Str("true".into()));
        assert!(!Post::new("p1", fields.clone()).llm_verified());

        fields.insert("llmVerified".into(), Value::Boolean(true));
        assert!(Post::new("p1", fields).llm_verified());
    }

    #[test]
    fn flagged_fields_preserve_every_original_field() {
        let post = Post::new("p1", post_fields());
        let verdict = Verdict {
            is_flagged: true,
            reason: FlagReason::Spam,
            severity: Severity::Low,
        };
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();

        let flagged = post.flagged_fields(&verdict, at);
        assert_eq!(flagged["title"], Value::Str("A rough week".into()));
        assert_eq!(flagged["authorId"], Value::Str("user-9".into()));
        assert_eq!(flagged["likes"], Value::Integer(4));
        assert_eq!(flagged["verifiedAt"], Value::Timestamp(at));

        let verification = flagged["llmVerification"].as_map().unwrap();
        assert_eq!(verification["isFlagged"], Value::Boolean(true));
        assert_eq!(verification["reason"], Value::Str("Spam".into()));
        assert_eq!(verification["severity"], Value::Str("Low".into()));
    }

    #[test]
    fn verdict_parses_renamed_reasons() {
        let verdict: Verdict = serde_json::from_str(
            r#"{"isFlagged": true, "reason": "Self-Harm", "severity": "High"}"#,
        )
        .unwrap();
        assert!(verdict.is_flagged);
        assert_eq!(verdict.reason, FlagReason::SelfHarm);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn verdict_rejects_reasons_outside_the_closed_set() {
        let result: Result<Verdict, _> = serde_json::from_str(
            r#"{"isFlagged": true, "reason": "Rudeness", "severity": "Low"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn sentinel_verdict_is_fail_closed() {
        let sentinel = Verdict::verification_error();
        assert!(sentinel.is_flagged);
        assert_eq!(sentinel.reason, FlagReason::VerificationError);
        assert_eq!(sentinel.severity, Severity::Unknown);
    }

    #[test]
    fn journal_entry_decodes_timestamp_date() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let mut map = Fields::new();
        map.insert("date".into(), Value::Timestamp(t));
        map.insert("mood".into(), Value::Str("calm".into()));
        map.insert("entry".into(), Value::Str("Slept well.".into()));

        let entry = JournalEntry::from_value(&Value::Map(map)).unwrap();
        assert_eq!(entry.date, Some(t));
        assert_eq!(entry.mood.as_deref(), Some("calm"));
        assert_eq!(entry.entry, "Slept well.");
    }

    #[test]
    fn naive_date_string_is_interpreted_as_utc() {
        let mut map = Fields::new();
        map.insert("date".into(), Value::Str("2024-06-01T09:00:00".into()));
        let entry = JournalEntry::from_value(&Value::Map(map)).unwrap();
        assert_eq!(
            entry.date,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn offset_date_string_normalizes_to_utc() {
        let mut map = Fields::new();
        map.insert("date".into(), Value::Str("2024-06-01T11:00:00+02:00".into()));
        let entry = JournalEntry::from_value(&Value::Map(map)).unwrap();
        assert_eq!(
            entry.date,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn non_date_values_yield_no_date() {
        let mut map = Fields::new();
        map.insert("date".into(), Value::Str("last tuesday".into()));
        assert_eq!(JournalEntry::from_value(&Value::Map(map)).unwrap().date, None);

        let mut map = Fields::new();
        map.insert("date".into(), Value::Integer(1717232400));
        assert_eq!(JournalEntry::from_value(&Value::Map(map)).unwrap().date, None);
    }

    #[test]
    fn non_map_journal_elements_are_dropped() {
        assert!(JournalEntry::from_value(&Value::Str("oops".into())).is_none());
    }

    #[test]
    fn user_decodes_journal_leniently() {
        let mut entry = Fields::new();
        entry.insert("entry".into(), Value::Str("ok".into()));
        let mut fields = Fields::new();
        fields.insert(
            "journal".into(),
            Value::Array(vec![
                Value::Map(entry),
                Value::Str("not an entry".into()),
            ]),
        );
        let doc = Document {
            name: "projects/p/databases/(default)/documents/users/a@x.com".into(),
            fields,
        };

        let user = User::from_document(&doc);
        assert_eq!(user.id, "a@x.com");
        assert_eq!(user.journal.len(), 1);
    }

    #[test]
    fn user_without_journal_has_no_entries() {
        let doc = Document {
            name: "projects/p/databases/(default)/documents/users/b@x.com".into(),
            fields: Fields::new(),
        };
        assert!(User::from_document(&doc).journal.is_empty());
    }

    #[test]
    fn weekly_summary_encodes_as_map() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let summary = WeeklySummary {
            summary_text: "<p>Steady.</p>".into(),
            generated_at: at,
        };
        let map = summary.to_value();
        let fields = map.as_map().unwrap();
        assert_eq!(fields["summaryText"], Value::Str("<p>Steady.</p>".into()));
        assert_eq!(fields["generatedAt"], Value::Timestamp(at));
    }
}
